//! Typed consumer of the HTTP API, used by front ends and scripts.
//!
//! [`api`] wraps the REST endpoints, [`store`] keeps local copies in step
//! with canonical server records, [`filter`] narrows fetched lists and
//! [`booking_flow`] drives the ticket purchase wizard.

pub mod api;
pub mod booking_flow;
pub mod filter;
pub mod store;
