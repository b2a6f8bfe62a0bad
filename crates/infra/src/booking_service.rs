//! Booking orchestration (application-level coordination).
//!
//! `BookingService` turns caller requests into aggregate calls. It owns no
//! business rules; every decision about seats is made by [`Flight`].
//!
//! ## Execution flow
//!
//! ```text
//! Request
//!   ↓
//! 1. Fetch the flight from the store (by value)
//!   ↓
//! 2. Invoke the aggregate operation (book / cancel)
//!   ↓
//! 3. Save with the version that was fetched (optimistic check)
//!   ↓
//! 4. On a version conflict, start over from 1 (bounded by config)
//! ```
//!
//! A rejected aggregate operation returns before step 3, so nothing is saved.

use thiserror::Error;

use seatledger_core::{AggregateRoot, ExpectedVersion, FlightId};
use seatledger_flights::{BookingError, Flight};

use crate::config::ServiceConfig;
use crate::dto::{BookDto, BookingRm, CancelBookingDto};
use crate::flight_store::{FlightStore, FlightStoreError};

#[derive(Debug, Error)]
pub enum BookingServiceError {
    /// The flight rejected the operation (overbooking, unknown booking, ...).
    #[error(transparent)]
    Domain(#[from] BookingError),

    #[error("flight {0} not found")]
    FlightNotFound(FlightId),

    /// Every attempt lost an optimistic concurrency race.
    #[error("gave up after concurrent modifications: {0}")]
    Concurrency(String),

    /// Persistence failed for reasons unrelated to booking rules.
    #[error(transparent)]
    Store(#[from] FlightStoreError),
}

/// Coordinates flight lookups, aggregate operations and persistence.
#[derive(Debug)]
pub struct BookingService<S> {
    store: S,
    config: ServiceConfig,
}

impl<S> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> BookingService<S>
where
    S: FlightStore,
{
    /// Create a flight with `seat_capacity` seats and register it.
    pub fn register_flight(&self, seat_capacity: u32) -> Result<FlightId, BookingServiceError> {
        let flight = Flight::new(seat_capacity);
        let id = flight.id_typed();
        self.store.add_flight(flight)?;

        tracing::info!("Registered flight {} with {} seats", id, seat_capacity);
        Ok(id)
    }

    pub fn book(&self, request: BookDto) -> Result<(), BookingServiceError> {
        let BookDto {
            flight_id,
            passenger_email,
            number_of_seats,
        } = request;

        self.mutate(flight_id, |flight| {
            flight.book(&passenger_email, number_of_seats)
        })?;

        tracing::info!("Booked {} seats on flight {}", number_of_seats, flight_id);
        tracing::debug!("Booked seats on flight {} for {}", flight_id, passenger_email);
        Ok(())
    }

    pub fn cancel_booking(&self, request: CancelBookingDto) -> Result<(), BookingServiceError> {
        let CancelBookingDto {
            flight_id,
            passenger_email,
            number_of_seats,
        } = request;

        self.mutate(flight_id, |flight| {
            flight.cancel_booking(&passenger_email, number_of_seats)
        })?;

        tracing::info!("Cancelled {} seats on flight {}", number_of_seats, flight_id);
        tracing::debug!("Cancelled seats on flight {} for {}", flight_id, passenger_email);
        Ok(())
    }

    /// Current bookings of a flight, in the order they were made.
    pub fn find_bookings(&self, flight_id: FlightId) -> Result<Vec<BookingRm>, BookingServiceError> {
        let flight = self.load(flight_id)?;
        Ok(flight.booking_list().iter().map(BookingRm::from).collect())
    }

    pub fn get_remaining_number_of_seats_for(
        &self,
        flight_id: FlightId,
    ) -> Result<u32, BookingServiceError> {
        Ok(self.load(flight_id)?.remaining_number_of_seats())
    }

    fn load(&self, flight_id: FlightId) -> Result<Flight, BookingServiceError> {
        self.store
            .find_flight_by_id(flight_id)?
            .ok_or(BookingServiceError::FlightNotFound(flight_id))
    }

    /// Fetch, apply `operation`, save; retry the whole cycle on version conflicts.
    fn mutate<F>(&self, flight_id: FlightId, operation: F) -> Result<(), BookingServiceError>
    where
        F: Fn(&mut Flight) -> Result<(), BookingError>,
    {
        let mut attempt = 0u32;
        loop {
            let mut flight = self.load(flight_id)?;
            let expected = ExpectedVersion::Exact(flight.version());

            if let Err(err) = operation(&mut flight) {
                tracing::warn!("Rejected operation on flight {}: {}", flight_id, err);
                return Err(err.into());
            }

            match self.store.save_changes(&flight, expected) {
                Ok(()) => return Ok(()),
                Err(FlightStoreError::Concurrency(msg)) => {
                    if attempt >= self.config.max_conflict_retries {
                        tracing::warn!(
                            "Giving up on flight {} after {} attempts: {}",
                            flight_id,
                            attempt + 1,
                            msg
                        );
                        return Err(BookingServiceError::Concurrency(msg));
                    }
                    attempt += 1;
                    tracing::warn!(
                        "Concurrent update on flight {}, retrying ({}/{})",
                        flight_id,
                        attempt,
                        self.config.max_conflict_retries
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
