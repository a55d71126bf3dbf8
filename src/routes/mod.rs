pub mod artists;
pub mod bookings;
pub mod events;
pub mod public;
