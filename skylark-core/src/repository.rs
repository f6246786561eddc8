use async_trait::async_trait;
use chrono::NaiveDate;

use crate::booking::{Booking, BookingChanges, NewBooking};
use crate::flight::{Flight, NewFlight};
use crate::user::{NewUser, User};
use crate::BoxError;

/// Repository trait for flight data access
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn insert(&self, flight: NewFlight) -> Result<Flight, BoxError>;

    /// All flights, in insertion order.
    async fn list(&self) -> Result<Vec<Flight>, BoxError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>, BoxError>;
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists the booking and assigns its id.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BoxError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, BoxError>;

    async fn find_all(&self) -> Result<Vec<Booking>, BoxError>;

    /// Bookings dated strictly after `date`, preserving creation order.
    async fn find_after(&self, date: NaiveDate) -> Result<Vec<Booking>, BoxError>;

    /// Applies `changes` and returns the merged record, or `None` when no
    /// booking has this id.
    async fn update(&self, id: i64, changes: BookingChanges) -> Result<Option<Booking>, BoxError>;

    /// Removes the booking permanently. `false` when no booking has this id.
    async fn delete(&self, id: i64) -> Result<bool, BoxError>;
}

/// Repository trait for user data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists the user. Usernames are unique; inserting a taken username
    /// is an error.
    async fn insert(&self, user: NewUser) -> Result<User, BoxError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, BoxError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, BoxError>;
}
