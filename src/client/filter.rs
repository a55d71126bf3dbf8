//! Narrowing of already-fetched lists.
//!
//! A [`Criteria`] is a conjunction of clauses. Each clause names one or more
//! fields and passes when any of them satisfies its [`Matcher`]. Filter
//! values of `all` or empty disable their clause.

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};

use crate::models::{Artist, Event, UnknownValue};

pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Tags(&'a [String]),
    Date(NaiveDate),
}

pub trait Filterable {
    /// The value stored under `name`, or `None` when the record has none.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl Filterable for Artist {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(if self.artist_name.is_empty() {
                &self.name
            } else {
                &self.artist_name
            })),
            "bio" => self.bio.as_deref().map(FieldValue::Text),
            "location" => self.location.as_deref().map(FieldValue::Text),
            "tags" => Some(FieldValue::Tags(&self.tags)),
            _ => None,
        }
    }
}

impl Filterable for Event {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "description" => self.description.as_deref().map(FieldValue::Text),
            "location" => Some(FieldValue::Text(&self.location)),
            "category" => self.category.as_deref().map(FieldValue::Text),
            "date" => Some(FieldValue::Date(self.date)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    /// Today through seven days from now.
    Week,
    /// Today through the same day next month.
    Month,
    Past,
}

impl DateRange {
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateRange::Today => date == today,
            DateRange::Week => {
                let end = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
                date >= today && date <= end
            }
            DateRange::Month => {
                let end = today.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
                date >= today && date <= end
            }
            DateRange::Past => date < today,
        }
    }
}

impl FromStr for DateRange {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "past" => Ok(DateRange::Past),
            other => Err(UnknownValue::new("date range", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Case-insensitive substring.
    Contains(String),
    Equals(String),
    Date(DateRange),
}

impl Matcher {
    pub fn matches(&self, value: FieldValue<'_>, today: NaiveDate) -> bool {
        match (self, value) {
            (Matcher::Contains(needle), FieldValue::Text(text)) => {
                text.to_lowercase().contains(needle.as_str())
            }
            (Matcher::Contains(needle), FieldValue::Tags(tags)) => tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle.as_str())),
            (Matcher::Equals(expected), FieldValue::Text(text)) => text == expected,
            (Matcher::Equals(expected), FieldValue::Tags(tags)) => {
                tags.iter().any(|tag| tag == expected)
            }
            (Matcher::Equals(expected), FieldValue::Date(date)) => {
                date.format("%Y-%m-%d").to_string() == *expected
            }
            (Matcher::Date(range), FieldValue::Date(date)) => range.contains(date, today),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Clause {
    fields: Vec<String>,
    matcher: Matcher,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    clauses: Vec<Clause>,
}

fn disabled(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == ALL
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artist directory filter: free text over name, bio, location and tags,
    /// plus an exact tag.
    pub fn for_artists(search: &str, tag: &str) -> Self {
        Self::new()
            .search(&["name", "bio", "location", "tags"], search)
            .equals("tags", tag)
    }

    /// Event listing filter: free text over title and description, an exact
    /// category and a date bucket.
    pub fn for_events(search: &str, category: &str, date: &str) -> Self {
        Self::new()
            .search(&["title", "description"], search)
            .equals("category", category)
            .dated("date", date)
    }

    pub fn search(mut self, fields: &[&str], term: &str) -> Self {
        if !disabled(term) {
            self.clauses.push(Clause {
                fields: fields.iter().map(|field| field.to_string()).collect(),
                matcher: Matcher::Contains(term.trim().to_lowercase()),
            });
        }
        self
    }

    pub fn equals(mut self, field: &str, value: &str) -> Self {
        if !disabled(value) {
            self.clauses.push(Clause {
                fields: vec![field.to_string()],
                matcher: Matcher::Equals(value.to_string()),
            });
        }
        self
    }

    /// Unrecognised bucket names match everything, like `all`.
    pub fn dated(mut self, field: &str, range: &str) -> Self {
        if let Ok(range) = range.trim().parse::<DateRange>() {
            self.clauses.push(Clause {
                fields: vec![field.to_string()],
                matcher: Matcher::Date(range),
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches<T: Filterable>(&self, item: &T, today: NaiveDate) -> bool {
        self.clauses.iter().all(|clause| {
            clause.fields.iter().any(|field| {
                item.field(field)
                    .is_some_and(|value| clause.matcher.matches(value, today))
            })
        })
    }

    pub fn apply<'a, T: Filterable>(&self, items: &'a [T], today: NaiveDate) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item, today)).collect()
    }
}
