//! Booking rule violations raised by the flight aggregate.

use seatledger_core::DomainError;
use thiserror::Error;

/// Reason a booking or cancellation was rejected.
///
/// Every variant is raised before any state change; a rejected operation
/// leaves the flight exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// More seats were requested than remain on the flight.
    #[error("overbooking: requested {requested} seats, {remaining} remaining")]
    Overbooking { requested: u32, remaining: u32 },

    /// No booking exists for the passenger.
    #[error("no booking found for passenger '{passenger_email}'")]
    BookingNotFound { passenger_email: String },

    /// A cancellation asked to release more seats than the matched booking holds.
    #[error("cannot cancel {requested} seats, booking holds {booked}")]
    CancellationExceedsBooking { booked: u32, requested: u32 },

    #[error("number of seats must be positive")]
    InvalidSeatCount,

    #[error("passenger email cannot be empty")]
    MissingPassengerEmail,
}

impl From<BookingError> for DomainError {
    fn from(value: BookingError) -> Self {
        match &value {
            BookingError::Overbooking { .. } | BookingError::CancellationExceedsBooking { .. } => {
                DomainError::invariant(value.to_string())
            }
            BookingError::BookingNotFound { .. } => DomainError::not_found(value.to_string()),
            BookingError::InvalidSeatCount | BookingError::MissingPassengerEmail => {
                DomainError::validation(value.to_string())
            }
        }
    }
}
