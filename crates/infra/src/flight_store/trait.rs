use std::sync::Arc;

use thiserror::Error;

use seatledger_core::{ExpectedVersion, FlightId};
use seatledger_flights::Flight;

/// Flight store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// booking rule violations, which the aggregate reports itself.
#[derive(Debug, Error)]
pub enum FlightStoreError {
    #[error("flight {0} is already registered")]
    DuplicateFlight(FlightId),

    /// A save targeted a flight that was never added.
    #[error("flight {0} is not registered")]
    UnknownFlight(FlightId),

    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("failed to (de)serialize flight snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing storage cannot be reached (or its lock was poisoned).
    #[error("flight store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed storage for flight aggregates.
///
/// Flights are handed out **by value**: a caller fetches a copy, mutates it
/// through the aggregate's operations, then commits it with `save_changes`.
/// Nothing done to a fetched copy is visible to other callers until saved.
///
/// ## Optimistic concurrency
///
/// `save_changes` takes the version the caller loaded. A store must reject
/// the save with [`FlightStoreError::Concurrency`] when the stored flight has
/// moved on since then, so two bookers can never both spend the same seats.
pub trait FlightStore: Send + Sync {
    /// Look up a flight. `Ok(None)` means the id is unknown.
    fn find_flight_by_id(&self, id: FlightId) -> Result<Option<Flight>, FlightStoreError>;

    /// Register a newly created flight for later lookup.
    fn add_flight(&self, flight: Flight) -> Result<(), FlightStoreError>;

    /// Commit the state of a previously fetched flight.
    fn save_changes(
        &self,
        flight: &Flight,
        expected_version: ExpectedVersion,
    ) -> Result<(), FlightStoreError>;
}

impl<S> FlightStore for Arc<S>
where
    S: FlightStore + ?Sized,
{
    fn find_flight_by_id(&self, id: FlightId) -> Result<Option<Flight>, FlightStoreError> {
        (**self).find_flight_by_id(id)
    }

    fn add_flight(&self, flight: Flight) -> Result<(), FlightStoreError> {
        (**self).add_flight(flight)
    }

    fn save_changes(
        &self,
        flight: &Flight,
        expected_version: ExpectedVersion,
    ) -> Result<(), FlightStoreError> {
        (**self).save_changes(flight, expected_version)
    }
}
