//! Request and read-model shapes exchanged with callers of the booking layer.

use serde::{Deserialize, Serialize};

use seatledger_core::FlightId;
use seatledger_flights::Booking;

/// Request: book seats on a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    pub flight_id: FlightId,
    pub passenger_email: String,
    pub number_of_seats: u32,
}

impl BookDto {
    pub fn new(flight_id: FlightId, passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self {
            flight_id,
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }
}

/// Request: release seats from a passenger's booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingDto {
    pub flight_id: FlightId,
    pub passenger_email: String,
    pub number_of_seats: u32,
}

impl CancelBookingDto {
    pub fn new(flight_id: FlightId, passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self {
            flight_id,
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }
}

/// Read model: one booking as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRm {
    pub passenger_email: String,
    pub number_of_seats: u32,
}

impl BookingRm {
    pub fn new(passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self {
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }
}

impl From<&Booking> for BookingRm {
    fn from(booking: &Booking) -> Self {
        Self::new(booking.passenger_email(), booking.number_of_seats())
    }
}
