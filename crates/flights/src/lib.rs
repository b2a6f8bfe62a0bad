//! Flight seat ledger (domain module).
//!
//! This crate contains the business rules for booking and cancelling seats on a
//! fixed-capacity flight, implemented as deterministic domain logic (no IO, no
//! storage).

pub mod error;
pub mod flight;

pub use error::BookingError;
pub use flight::{Booking, Flight};
