//! Booking wizard: tickets for a catalog event, or a free-text event
//! request addressed to an artist.
//!
//! The flow walks Selection → Payment → Processing → Done. Payment is
//! simulated: card fields are checked locally, then the flow waits a fixed
//! processing delay before submitting the booking.

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::{
    client::api::{BookingRepository, ClientError},
    models::{Booking, BookingStatus, Event, NewCatalogBooking, NewDirectRequest},
};

pub const SIMULATED_PROCESSING: Duration = Duration::from_secs(2);
pub const MAX_QUANTITY: u32 = 10;

static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("valid card number pattern"));
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry pattern"));
static CVC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("valid cvc pattern"));

/// A ticket tier, priced in bolivianos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketOption {
    pub label: &'static str,
    pub price: u32,
}

const fn tier(label: &'static str, price: u32) -> TicketOption {
    TicketOption { label, price }
}

const CONCIERTO: &[TicketOption] = &[tier("General", 50), tier("VIP", 120), tier("Platea", 80)];
const TEATRO: &[TicketOption] = &[tier("General", 40), tier("Palco", 90), tier("Platea", 60)];
const DANZA: &[TicketOption] = &[tier("General", 30), tier("Preferencial", 60)];
const FERIA: &[TicketOption] = &[tier("Ingreso", 20)];
const LITERATURA: &[TicketOption] = &[tier("Entrada", 25)];
const PINTURA: &[TicketOption] = &[tier("Entrada", 25)];
const ARTESANIA: &[TicketOption] = &[tier("Ingreso", 15)];
const DEFAULT_TIERS: &[TicketOption] = &[tier("General", 30)];

/// Tiers on sale for an event category. Never empty.
pub fn ticket_options(category: Option<&str>) -> &'static [TicketOption] {
    match category {
        Some("Concierto") => CONCIERTO,
        Some("Teatro") => TEATRO,
        Some("Danza") => DANZA,
        Some("Feria") => FERIA,
        Some("Literatura") => LITERATURA,
        Some("Pintura") => PINTURA,
        Some("Artesanía") => ARTESANIA,
        _ => DEFAULT_TIERS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Selection,
    Payment,
    Processing,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvc: String,
    pub holder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    Card(CardDetails),
    Qr,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card(CardDetails::default())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Card number must have 16 digits")]
    CardNumber,
    #[error("Expiry must use MM/YY")]
    Expiry,
    #[error("CVC must have 3 or 4 digits")]
    Cvc,
    #[error("Cardholder name is required")]
    Holder,
}

impl PaymentMethod {
    pub fn validate(&self) -> Result<(), PaymentError> {
        let card = match self {
            PaymentMethod::Qr => return Ok(()),
            PaymentMethod::Card(card) => card,
        };
        let digits: String = card.number.chars().filter(|c| !c.is_whitespace()).collect();
        if !CARD_NUMBER.is_match(&digits) {
            return Err(PaymentError::CardNumber);
        }
        if !EXPIRY.is_match(&card.expiry) {
            return Err(PaymentError::Expiry);
        }
        if !CVC.is_match(&card.cvc) {
            return Err(PaymentError::Cvc);
        }
        if card.holder.trim().is_empty() {
            return Err(PaymentError::Holder);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("A booking is already being processed")]
    InFlight,
    #[error("Not available at the {0:?} step")]
    WrongStep(Step),
    #[error("Unknown ticket type '{0}'")]
    UnknownTicket(String),
    #[error("Only catalog ticket selections have tickets")]
    NotATicket,
    #[error("Only artist requests have event details")]
    NotARequest,
    #[error("Event title is required")]
    MissingTitle,
    #[error("Event date must be a date in YYYY-MM-DD format")]
    InvalidDate,
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Submit(#[from] ClientError),
}

/// What the client picked in the first step.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Tickets for a catalog event.
    Ticket {
        event: Event,
        ticket: TicketOption,
        quantity: u32,
        seat: Option<String>,
    },
    /// A free-text event addressed to one artist.
    Request {
        artist_id: i64,
        event_title: String,
        event_date: String,
        message: Option<String>,
    },
}

/// The body a confirmed flow submits.
#[derive(Debug, Clone)]
pub enum Submission {
    Catalog(NewCatalogBooking),
    Direct(NewDirectRequest),
}

/// Where a confirmed flow sends its booking.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, submission: Submission) -> Result<Booking, ClientError>;
}

#[async_trait]
impl<'a> BookingSubmitter for BookingRepository<'a> {
    async fn submit(&self, submission: Submission) -> Result<Booking, ClientError> {
        match submission {
            Submission::Catalog(booking) => self.create(&booking).await,
            Submission::Direct(request) => self.request(&request).await,
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    selection: Selection,
    step: Step,
    payment: PaymentMethod,
    processing_delay: Duration,
    last_error: Option<String>,
    booking: Option<Booking>,
}

impl BookingFlow {
    fn with_selection(selection: Selection) -> Self {
        Self {
            selection,
            step: Step::Selection,
            payment: PaymentMethod::default(),
            processing_delay: SIMULATED_PROCESSING,
            last_error: None,
            booking: None,
        }
    }

    /// Ticket purchase for a catalog event, starting at its first tier.
    pub fn new(event: Event) -> Self {
        let ticket = ticket_options(event.category.as_deref())[0];
        Self::with_selection(Selection::Ticket {
            event,
            ticket,
            quantity: 1,
            seat: None,
        })
    }

    /// Free-text request addressed to `artist_id`.
    pub fn for_artist(artist_id: i64) -> Self {
        Self::with_selection(Selection::Request {
            artist_id,
            event_title: String::new(),
            event_date: String::new(),
            message: None,
        })
    }

    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Tiers on sale; empty for artist requests.
    pub fn options(&self) -> &'static [TicketOption] {
        match &self.selection {
            Selection::Ticket { event, .. } => ticket_options(event.category.as_deref()),
            Selection::Request { .. } => &[],
        }
    }

    pub fn ticket(&self) -> Option<TicketOption> {
        match &self.selection {
            Selection::Ticket { ticket, .. } => Some(*ticket),
            Selection::Request { .. } => None,
        }
    }

    pub fn quantity(&self) -> u32 {
        match &self.selection {
            Selection::Ticket { quantity, .. } => *quantity,
            Selection::Request { .. } => 1,
        }
    }

    /// Price in bolivianos. Artist requests are quoted by the artist.
    pub fn total_price(&self) -> Option<u32> {
        self.ticket().map(|ticket| ticket.price * self.quantity())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    fn expect_step(&self, expected: Step) -> Result<(), FlowError> {
        match self.step {
            Step::Processing => Err(FlowError::InFlight),
            step if step == expected => Ok(()),
            step => Err(FlowError::WrongStep(step)),
        }
    }

    pub fn select_ticket(&mut self, label: &str) -> Result<(), FlowError> {
        self.expect_step(Step::Selection)?;
        let options = self.options();
        let Selection::Ticket { ticket, .. } = &mut self.selection else {
            return Err(FlowError::NotATicket);
        };
        *ticket = options
            .iter()
            .copied()
            .find(|option| option.label == label)
            .ok_or_else(|| FlowError::UnknownTicket(label.to_string()))?;
        Ok(())
    }

    /// Clamped to `1..=MAX_QUANTITY`. Ignored for artist requests.
    pub fn set_quantity(&mut self, value: u32) {
        if let Selection::Ticket { quantity, .. } = &mut self.selection {
            *quantity = value.clamp(1, MAX_QUANTITY);
        }
    }

    pub fn set_seat(&mut self, value: &str) {
        if let Selection::Ticket { seat, .. } = &mut self.selection {
            *seat = optional_text(value);
        }
    }

    /// Fills in the free-text event of an artist request.
    pub fn describe_event(&mut self, title: &str, date: &str, note: &str) -> Result<(), FlowError> {
        self.expect_step(Step::Selection)?;
        let Selection::Request {
            event_title,
            event_date,
            message,
            ..
        } = &mut self.selection
        else {
            return Err(FlowError::NotARequest);
        };
        *event_title = title.trim().to_string();
        *event_date = date.trim().to_string();
        *message = optional_text(note);
        Ok(())
    }

    /// Leaves the first step. Artist requests need a title and a
    /// `YYYY-MM-DD` date first.
    pub fn proceed_to_payment(&mut self) -> Result<(), FlowError> {
        self.expect_step(Step::Selection)?;
        if let Selection::Request {
            event_title,
            event_date,
            ..
        } = &self.selection
        {
            let check = if event_title.is_empty() {
                Err(FlowError::MissingTitle)
            } else if NaiveDate::parse_from_str(event_date, "%Y-%m-%d").is_err() {
                Err(FlowError::InvalidDate)
            } else {
                Ok(())
            };
            if let Err(err) = check {
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        }
        self.last_error = None;
        self.step = Step::Payment;
        Ok(())
    }

    pub fn back_to_selection(&mut self) -> Result<(), FlowError> {
        self.expect_step(Step::Payment)?;
        self.step = Step::Selection;
        self.last_error = None;
        Ok(())
    }

    pub fn set_payment(&mut self, payment: PaymentMethod) {
        self.payment = payment;
    }

    pub fn can_submit(&self) -> bool {
        self.step == Step::Payment
    }

    pub fn submission(&self) -> Submission {
        match &self.selection {
            Selection::Ticket {
                event,
                ticket,
                quantity,
                seat,
            } => Submission::Catalog(NewCatalogBooking {
                event_id: Some(event.id),
                ticket_type: Some(ticket.label.to_string()),
                quantity: Some(*quantity as i32),
                seat: seat.clone(),
            }),
            Selection::Request {
                artist_id,
                event_title,
                event_date,
                message,
            } => Submission::Direct(NewDirectRequest {
                artist_id: Some(*artist_id),
                event_title: Some(event_title.clone()),
                event_date: Some(event_date.clone()),
                message: message.clone(),
                status: Some(BookingStatus::Confirmed.as_str().to_string()),
            }),
        }
    }

    /// Validates payment, waits out the simulated processing time and submits
    /// the booking. A failed submission returns the flow to the payment step
    /// with nothing recorded locally.
    ///
    /// Dropping the returned future mid-processing leaves the flow in
    /// [`Step::Processing`]; call [`BookingFlow::reset`] to start over.
    pub async fn confirm(&mut self, submitter: &dyn BookingSubmitter) -> Result<&Booking, FlowError> {
        self.expect_step(Step::Payment)?;
        if let Err(err) = self.payment.validate() {
            self.last_error = Some(err.to_string());
            return Err(err.into());
        }

        self.last_error = None;
        self.step = Step::Processing;
        tokio::time::sleep(self.processing_delay).await;

        match submitter.submit(self.submission()).await {
            Ok(booking) => {
                self.step = Step::Done;
                Ok(self.booking.insert(booking))
            }
            Err(err) => {
                log::warn!("Booking submission failed: {err}");
                self.step = Step::Payment;
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Back to the first step with the same event or artist.
    pub fn reset(&mut self) {
        let fresh = match &self.selection {
            Selection::Ticket { event, .. } => BookingFlow::new(event.clone()),
            Selection::Request { artist_id, .. } => BookingFlow::for_artist(*artist_id),
        };
        *self = fresh.with_processing_delay(self.processing_delay);
    }
}
