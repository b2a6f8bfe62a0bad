//! Flight persistence boundary.
//!
//! This module defines the narrow contract the booking layer needs from a
//! store (find, add, save) without making any storage assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryFlightStore;
pub use r#trait::{FlightStore, FlightStoreError};
