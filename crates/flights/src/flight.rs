use serde::{Deserialize, Serialize};

use seatledger_core::{AggregateRoot, DomainError, FlightId, ValueObject};

use crate::error::BookingError;

/// A passenger's seat reservation held by a [`Flight`].
///
/// Bookings have no identity of their own; two bookings for the same passenger
/// and seat count compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BookingSnapshot")]
pub struct Booking {
    passenger_email: String,
    number_of_seats: u32,
}

impl Booking {
    pub fn new(passenger_email: impl Into<String>, number_of_seats: u32) -> Self {
        Self {
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }

    pub fn passenger_email(&self) -> &str {
        &self.passenger_email
    }

    pub fn number_of_seats(&self) -> u32 {
        self.number_of_seats
    }
}

impl ValueObject for Booking {}

#[derive(Deserialize)]
struct BookingSnapshot {
    passenger_email: String,
    number_of_seats: u32,
}

impl TryFrom<BookingSnapshot> for Booking {
    type Error = DomainError;

    fn try_from(snapshot: BookingSnapshot) -> Result<Self, Self::Error> {
        ensure_passenger_email(&snapshot.passenger_email)?;
        ensure_seat_count(snapshot.number_of_seats)?;
        Ok(Booking::new(snapshot.passenger_email, snapshot.number_of_seats))
    }
}

/// Aggregate root: Flight.
///
/// Owns the seat capacity of one scheduled departure and the bookings made
/// against it. Remaining seats are always derived from the live booking list,
/// never stored.
///
/// Deserialization re-checks the booking rules, so a snapshot holding more
/// booked seats than the flight has is rejected instead of loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlightSnapshot")]
pub struct Flight {
    id: FlightId,
    seat_capacity: u32,
    booking_list: Vec<Booking>,
    version: u64,
}

impl Flight {
    /// Create a flight with no bookings and a fresh identifier.
    pub fn new(seat_capacity: u32) -> Self {
        Self::with_id(FlightId::new(), seat_capacity)
    }

    pub fn with_id(id: FlightId, seat_capacity: u32) -> Self {
        Self {
            id,
            seat_capacity,
            booking_list: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> FlightId {
        self.id
    }

    pub fn seat_capacity(&self) -> u32 {
        self.seat_capacity
    }

    /// Current bookings in insertion order.
    pub fn booking_list(&self) -> &[Booking] {
        &self.booking_list
    }

    pub fn remaining_number_of_seats(&self) -> u32 {
        let booked = booked_seats(&self.booking_list);
        // Bookings never exceed capacity, so the difference fits in u32.
        (u64::from(self.seat_capacity).saturating_sub(booked)) as u32
    }

    /// Reserve `number_of_seats` for a passenger.
    ///
    /// Each successful call appends a new booking, even when the passenger
    /// already holds one.
    pub fn book(
        &mut self,
        passenger_email: &str,
        number_of_seats: u32,
    ) -> Result<(), BookingError> {
        ensure_passenger_email(passenger_email)?;
        ensure_seat_count(number_of_seats)?;

        let remaining = self.remaining_number_of_seats();
        if number_of_seats > remaining {
            return Err(BookingError::Overbooking {
                requested: number_of_seats,
                remaining,
            });
        }

        self.booking_list
            .push(Booking::new(passenger_email, number_of_seats));
        self.version += 1;
        Ok(())
    }

    /// Release `number_of_seats` from the passenger's booking.
    ///
    /// The first booking (insertion order) made with exactly this email is the
    /// one reduced. It is removed once it holds no seats. Releasing more seats
    /// than that booking holds is rejected.
    pub fn cancel_booking(
        &mut self,
        passenger_email: &str,
        number_of_seats: u32,
    ) -> Result<(), BookingError> {
        let idx = self
            .booking_list
            .iter()
            .position(|b| b.passenger_email == passenger_email)
            .ok_or_else(|| BookingError::BookingNotFound {
                passenger_email: passenger_email.to_string(),
            })?;
        ensure_seat_count(number_of_seats)?;

        let booked = self.booking_list[idx].number_of_seats;
        if number_of_seats > booked {
            return Err(BookingError::CancellationExceedsBooking {
                booked,
                requested: number_of_seats,
            });
        }

        if number_of_seats == booked {
            self.booking_list.remove(idx);
        } else {
            self.booking_list[idx].number_of_seats = booked - number_of_seats;
        }
        self.version += 1;
        Ok(())
    }
}

impl AggregateRoot for Flight {
    type Id = FlightId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Deserialize)]
struct FlightSnapshot {
    id: FlightId,
    seat_capacity: u32,
    booking_list: Vec<Booking>,
    version: u64,
}

impl TryFrom<FlightSnapshot> for Flight {
    type Error = DomainError;

    fn try_from(snapshot: FlightSnapshot) -> Result<Self, Self::Error> {
        let booked = booked_seats(&snapshot.booking_list);
        if booked > u64::from(snapshot.seat_capacity) {
            return Err(DomainError::invariant(format!(
                "flight {} books {} seats but has only {}",
                snapshot.id, booked, snapshot.seat_capacity
            )));
        }

        Ok(Flight {
            id: snapshot.id,
            seat_capacity: snapshot.seat_capacity,
            booking_list: snapshot.booking_list,
            version: snapshot.version,
        })
    }
}

/// Sum in u64 so that no combination of u32 seat counts can overflow.
fn booked_seats(bookings: &[Booking]) -> u64 {
    bookings
        .iter()
        .map(|b| u64::from(b.number_of_seats))
        .sum()
}

fn ensure_passenger_email(passenger_email: &str) -> Result<(), BookingError> {
    if passenger_email.trim().is_empty() {
        return Err(BookingError::MissingPassengerEmail);
    }
    Ok(())
}

fn ensure_seat_count(number_of_seats: u32) -> Result<(), BookingError> {
    if number_of_seats == 0 {
        return Err(BookingError::InvalidSeatCount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = "jeal@mail.com";

    #[test]
    fn booking_reduces_the_number_of_seats() {
        let mut flight = Flight::new(3);
        flight.book(EMAIL, 2).unwrap();
        assert_eq!(flight.remaining_number_of_seats(), 1);
    }

    #[test]
    fn avoids_overbooking() {
        let mut flight = Flight::new(3);
        let err = flight.book(EMAIL, 4).unwrap_err();
        assert_eq!(
            err,
            BookingError::Overbooking {
                requested: 4,
                remaining: 3
            }
        );
        assert_eq!(flight.remaining_number_of_seats(), 3);
        assert!(flight.booking_list().is_empty());
        assert_eq!(flight.version(), 0);
    }

    #[test]
    fn books_flights_successfully() {
        let mut flight = Flight::new(3);
        assert!(flight.book(EMAIL, 1).is_ok());
        assert_eq!(flight.remaining_number_of_seats(), 2);
    }

    #[test]
    fn remembers_bookings() {
        let mut flight = Flight::new(150);
        flight.book(EMAIL, 4).unwrap();
        assert!(flight.booking_list().contains(&Booking::new(EMAIL, 4)));
    }

    #[test]
    fn booking_the_exact_remaining_capacity_is_allowed() {
        let mut flight = Flight::new(5);
        flight.book(EMAIL, 2).unwrap();
        flight.book("other@mail.com", 3).unwrap();
        assert_eq!(flight.remaining_number_of_seats(), 0);

        let err = flight.book("late@mail.com", 1).unwrap_err();
        assert!(matches!(err, BookingError::Overbooking { remaining: 0, .. }));
    }

    #[test]
    fn repeated_bookings_for_one_passenger_are_kept_apart() {
        let mut flight = Flight::new(10);
        flight.book(EMAIL, 2).unwrap();
        flight.book(EMAIL, 3).unwrap();
        assert_eq!(
            flight.booking_list(),
            &[Booking::new(EMAIL, 2), Booking::new(EMAIL, 3)]
        );
    }

    #[test]
    fn rejects_zero_seats_and_blank_emails() {
        let mut flight = Flight::new(3);
        assert_eq!(flight.book(EMAIL, 0), Err(BookingError::InvalidSeatCount));
        assert_eq!(
            flight.book("  ", 1),
            Err(BookingError::MissingPassengerEmail)
        );
        assert_eq!(flight.version(), 0);
    }

    #[test]
    fn canceling_bookings_frees_up_the_seats() {
        for (capacity, booked, cancelled, remaining) in [(3, 1, 1, 3), (4, 2, 2, 4), (7, 5, 4, 6)]
        {
            let mut flight = Flight::new(capacity);
            flight.book(EMAIL, booked).unwrap();
            flight.cancel_booking(EMAIL, cancelled).unwrap();
            assert_eq!(flight.remaining_number_of_seats(), remaining);
        }
    }

    #[test]
    fn doesnt_cancel_booking_for_passengers_who_have_not_booked() {
        let mut flight = Flight::new(3);
        let err = flight.cancel_booking(EMAIL, 2).unwrap_err();
        assert_eq!(
            err,
            BookingError::BookingNotFound {
                passenger_email: EMAIL.to_string()
            }
        );
        assert_eq!(flight.remaining_number_of_seats(), 3);
    }

    #[test]
    fn successful_cancellation_returns_ok() {
        let mut flight = Flight::new(3);
        flight.book(EMAIL, 1).unwrap();
        assert!(flight.cancel_booking(EMAIL, 1).is_ok());
        assert!(flight.booking_list().is_empty());
    }

    #[test]
    fn partial_cancellation_keeps_the_reduced_booking() {
        let mut flight = Flight::new(7);
        flight.book(EMAIL, 5).unwrap();
        flight.cancel_booking(EMAIL, 4).unwrap();
        assert_eq!(flight.booking_list(), &[Booking::new(EMAIL, 1)]);
    }

    #[test]
    fn over_cancellation_is_rejected_without_mutation() {
        let mut flight = Flight::new(7);
        flight.book(EMAIL, 2).unwrap();
        let before = flight.clone();

        let err = flight.cancel_booking(EMAIL, 3).unwrap_err();
        assert_eq!(
            err,
            BookingError::CancellationExceedsBooking {
                booked: 2,
                requested: 3
            }
        );
        assert_eq!(flight, before);
    }

    #[test]
    fn cancellation_targets_the_first_matching_booking() {
        let mut flight = Flight::new(10);
        flight.book(EMAIL, 2).unwrap();
        flight.book("other@mail.com", 1).unwrap();
        flight.book(EMAIL, 3).unwrap();

        flight.cancel_booking(EMAIL, 2).unwrap();
        assert_eq!(
            flight.booking_list(),
            &[Booking::new("other@mail.com", 1), Booking::new(EMAIL, 3)]
        );

        // Matching is on the first booking only, even if a later one could cover it.
        flight.book("group@mail.com", 1).unwrap();
        flight.book("group@mail.com", 3).unwrap();
        let err = flight.cancel_booking("group@mail.com", 2).unwrap_err();
        assert!(matches!(err, BookingError::CancellationExceedsBooking { booked: 1, .. }));
    }

    #[test]
    fn email_matching_is_exact() {
        let mut flight = Flight::new(3);
        flight.book(EMAIL, 1).unwrap();
        let err = flight.cancel_booking("JEAL@mail.com", 1).unwrap_err();
        assert!(matches!(err, BookingError::BookingNotFound { .. }));
    }

    #[test]
    fn version_tracks_successful_mutations_only() {
        let mut flight = Flight::new(3);
        flight.book(EMAIL, 2).unwrap();
        let _ = flight.book(EMAIL, 2);
        let _ = flight.cancel_booking("nobody@mail.com", 1);
        flight.cancel_booking(EMAIL, 1).unwrap();
        assert_eq!(flight.version(), 2);
    }

    #[test]
    fn snapshot_survives_serialization() {
        let mut flight = Flight::new(9);
        flight.book(EMAIL, 4).unwrap();

        let json = serde_json::to_value(&flight).unwrap();
        let restored: Flight = serde_json::from_value(json).unwrap();
        assert_eq!(restored, flight);
    }

    fn snapshot(seat_capacity: u32, bookings: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": FlightId::new(),
            "seat_capacity": seat_capacity,
            "booking_list": bookings,
            "version": 1,
        })
    }

    #[test]
    fn overbooked_snapshot_is_rejected() {
        let json = snapshot(
            3,
            serde_json::json!([{ "passenger_email": "a@mail.com", "number_of_seats": 10 }]),
        );

        let err = serde_json::from_value::<Flight>(json).unwrap_err();
        assert!(err.to_string().contains("invariant violated"));
    }

    #[test]
    fn overflowing_seat_counts_are_rejected_without_panicking() {
        let json = snapshot(
            3,
            serde_json::json!([
                { "passenger_email": "a@mail.com", "number_of_seats": u32::MAX },
                { "passenger_email": "b@mail.com", "number_of_seats": 2 }
            ]),
        );

        assert!(serde_json::from_value::<Flight>(json).is_err());
    }

    #[test]
    fn snapshot_with_invalid_booking_is_rejected() {
        let zero_seats = snapshot(
            3,
            serde_json::json!([{ "passenger_email": "a@mail.com", "number_of_seats": 0 }]),
        );
        let err = serde_json::from_value::<Flight>(zero_seats).unwrap_err();
        assert!(err.to_string().contains("number of seats must be positive"));

        let blank_email = snapshot(
            3,
            serde_json::json!([{ "passenger_email": " ", "number_of_seats": 1 }]),
        );
        let err = serde_json::from_value::<Flight>(blank_email).unwrap_err();
        assert!(err.to_string().contains("passenger email cannot be empty"));
    }

    #[test]
    fn full_snapshot_is_accepted() {
        let json = snapshot(
            3,
            serde_json::json!([{ "passenger_email": "a@mail.com", "number_of_seats": 3 }]),
        );

        let flight: Flight = serde_json::from_value(json).unwrap();
        assert_eq!(flight.remaining_number_of_seats(), 0);
        assert_eq!(flight.version(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Book(usize, u32),
            Cancel(usize, u32),
        }

        const PASSENGERS: [&str; 3] = ["a@mail.com", "b@mail.com", "c@mail.com"];

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..PASSENGERS.len(), 0u32..8).prop_map(|(p, n)| Op::Book(p, n)),
                (0..PASSENGERS.len(), 0u32..8).prop_map(|(p, n)| Op::Cancel(p, n)),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: remaining seats always equal capacity minus booked seats.
            #[test]
            fn remaining_seats_stay_within_capacity(
                capacity in 0u32..40,
                ops in prop::collection::vec(op(), 0..40)
            ) {
                let mut flight = Flight::new(capacity);

                for op in ops {
                    let before = flight.clone();
                    let result = match op {
                        Op::Book(p, n) => flight.book(PASSENGERS[p], n),
                        Op::Cancel(p, n) => flight.cancel_booking(PASSENGERS[p], n),
                    };
                    if result.is_err() {
                        prop_assert_eq!(&flight, &before);
                    }

                    let booked: u32 = flight.booking_list().iter().map(Booking::number_of_seats).sum();
                    prop_assert!(booked <= capacity);
                    prop_assert_eq!(flight.remaining_number_of_seats(), capacity - booked);
                }
            }

            /// Property: booking then cancelling the same amount restores remaining seats.
            #[test]
            fn book_then_cancel_round_trips(
                capacity in 1u32..200,
                seats in 1u32..200
            ) {
                prop_assume!(seats <= capacity);
                let mut flight = Flight::new(capacity);
                let before = flight.remaining_number_of_seats();

                flight.book("jeal@mail.com", seats).unwrap();
                flight.cancel_booking("jeal@mail.com", seats).unwrap();

                prop_assert_eq!(flight.remaining_number_of_seats(), before);
                prop_assert!(flight.booking_list().is_empty());
            }

            /// Property: overbooking never changes remaining seats.
            #[test]
            fn overbooking_leaves_remaining_unchanged(
                capacity in 0u32..50,
                extra in 1u32..50
            ) {
                let mut flight = Flight::new(capacity);
                let err = flight.book("jeal@mail.com", capacity + extra).unwrap_err();
                let is_overbooking = matches!(err, BookingError::Overbooking { .. });
                prop_assert!(is_overbooking);
                prop_assert_eq!(flight.remaining_number_of_seats(), capacity);
            }
        }
    }
}
