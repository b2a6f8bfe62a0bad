//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A booking held by a flight is one: two bookings for the
//! same passenger and seat count are indistinguishable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** from the outside and **compared by value**.
/// The owning aggregate may replace them, but callers only ever see copies.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Money {
///     amount: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
