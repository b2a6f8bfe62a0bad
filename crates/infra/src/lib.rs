//! Infrastructure layer: flight persistence, booking orchestration, config.

pub mod booking_service;
pub mod config;
pub mod dto;
pub mod flight_store;

pub use booking_service::{BookingService, BookingServiceError};
pub use config::ServiceConfig;
pub use dto::{BookDto, BookingRm, CancelBookingDto};
pub use flight_store::{FlightStore, FlightStoreError, InMemoryFlightStore};
