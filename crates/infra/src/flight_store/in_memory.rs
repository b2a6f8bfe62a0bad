use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use seatledger_core::{AggregateRoot, ExpectedVersion, FlightId};
use seatledger_flights::Flight;

use super::r#trait::{FlightStore, FlightStoreError};

#[derive(Debug, Clone)]
struct StoredFlight {
    version: u64,
    snapshot: JsonValue,
}

/// In-memory flight store.
///
/// Keeps serialized snapshots rather than live aggregates, so every lookup
/// returns an independent copy. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryFlightStore {
    flights: RwLock<HashMap<FlightId, StoredFlight>>,
}

impl InMemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered flights.
    pub fn len(&self) -> Result<usize, FlightStoreError> {
        let flights = self
            .flights
            .read()
            .map_err(|_| FlightStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(flights.len())
    }

    pub fn is_empty(&self) -> Result<bool, FlightStoreError> {
        Ok(self.len()? == 0)
    }

    fn snapshot(flight: &Flight) -> Result<StoredFlight, FlightStoreError> {
        Ok(StoredFlight {
            version: flight.version(),
            snapshot: serde_json::to_value(flight)?,
        })
    }
}

impl FlightStore for InMemoryFlightStore {
    fn find_flight_by_id(&self, id: FlightId) -> Result<Option<Flight>, FlightStoreError> {
        let flights = self
            .flights
            .read()
            .map_err(|_| FlightStoreError::Unavailable("lock poisoned".to_string()))?;

        match flights.get(&id) {
            Some(stored) => Ok(Some(serde_json::from_value(stored.snapshot.clone())?)),
            None => Ok(None),
        }
    }

    fn add_flight(&self, flight: Flight) -> Result<(), FlightStoreError> {
        let id = flight.id_typed();
        let stored = Self::snapshot(&flight)?;

        let mut flights = self
            .flights
            .write()
            .map_err(|_| FlightStoreError::Unavailable("lock poisoned".to_string()))?;

        if flights.contains_key(&id) {
            return Err(FlightStoreError::DuplicateFlight(id));
        }
        flights.insert(id, stored);

        tracing::debug!("Registered flight {} with {} seats", id, flight.seat_capacity());
        Ok(())
    }

    fn save_changes(
        &self,
        flight: &Flight,
        expected_version: ExpectedVersion,
    ) -> Result<(), FlightStoreError> {
        let id = flight.id_typed();
        let stored = Self::snapshot(flight)?;

        let mut flights = self
            .flights
            .write()
            .map_err(|_| FlightStoreError::Unavailable("lock poisoned".to_string()))?;

        let entry = flights
            .get_mut(&id)
            .ok_or(FlightStoreError::UnknownFlight(id))?;

        expected_version
            .check(entry.version)
            .map_err(|e| FlightStoreError::Concurrency(format!("flight {id}: {e}")))?;

        tracing::debug!(
            "Saved flight {} (version {} -> {})",
            id,
            entry.version,
            stored.version
        );
        *entry = stored;
        Ok(())
    }
}
