//! In-memory repository implementations. These back the unit and
//! integration test suites and keep the repository contracts honest
//! without a running database.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::booking::{Booking, BookingChanges, NewBooking};
use crate::flight::{Flight, NewFlight};
use crate::repository::{BookingRepository, FlightRepository, UserRepository};
use crate::user::{NewUser, User};
use crate::BoxError;

struct Table<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryFlightRepository {
    inner: RwLock<Table<Flight>>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn insert(&self, flight: NewFlight) -> Result<Flight, BoxError> {
        let mut inner = self.inner.write().unwrap();
        let flight = Flight {
            id: inner.assign_id(),
            destination: flight.destination,
            time: flight.time,
            price: flight.price,
            miles: flight.miles,
        };
        inner.rows.push(flight.clone());
        Ok(flight)
    }

    async fn list(&self) -> Result<Vec<Flight>, BoxError> {
        Ok(self.inner.read().unwrap().rows.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>, BoxError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.rows.iter().find(|f| f.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    inner: RwLock<Table<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BoxError> {
        let mut inner = self.inner.write().unwrap();
        let booking = Booking {
            id: inner.assign_id(),
            flight_id: booking.flight_id,
            user_id: booking.user_id,
            date: booking.date,
            passengers: booking.passengers,
        };
        inner.rows.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, BoxError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.rows.iter().find(|b| b.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Booking>, BoxError> {
        Ok(self.inner.read().unwrap().rows.clone())
    }

    async fn find_after(&self, date: NaiveDate) -> Result<Vec<Booking>, BoxError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .rows
            .iter()
            .filter(|b| b.date > date)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: BookingChanges) -> Result<Option<Booking>, BoxError> {
        let mut inner = self.inner.write().unwrap();
        match inner.rows.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.date = changes.date;
                booking.passengers = changes.passengers;
                Ok(Some(booking.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, BoxError> {
        let mut inner = self.inner.write().unwrap();
        let before = inner.rows.len();
        inner.rows.retain(|b| b.id != id);
        Ok(inner.rows.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, BoxError> {
        let mut inner = self.inner.write().unwrap();
        if inner.rows.iter().any(|u| u.username == user.username) {
            return Err(format!("username {} already exists", user.username).into());
        }
        let user = User {
            id: inner.assign_id(),
            username: user.username,
            password_hash: user.password_hash,
        };
        inner.rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, BoxError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, BoxError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.rows.iter().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_booking(date: &str) -> NewBooking {
        NewBooking {
            flight_id: 1,
            user_id: 1,
            date: date.parse().unwrap(),
            passengers: 2,
        }
    }

    #[tokio::test]
    async fn booking_ids_are_not_reused_after_delete() {
        let repo = InMemoryBookingRepository::new();
        let first = repo.insert(new_booking("2021-01-01")).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo.insert(new_booking("2021-01-01")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn find_after_filters_strictly_and_keeps_creation_order() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(new_booking("2018-01-01")).await.unwrap();
        repo.insert(new_booking("2021-01-01")).await.unwrap();
        repo.insert(new_booking("2019-01-01")).await.unwrap();
        repo.insert(new_booking("2021-01-01")).await.unwrap();

        let cutoff = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let after: Vec<i64> = repo
            .find_after(cutoff)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        // Strictly after: the booking dated exactly on the cutoff is out.
        assert_eq!(after, vec![2, 4]);
    }

    #[tokio::test]
    async fn delete_reports_missing_ids() {
        let repo = InMemoryBookingRepository::new();
        assert!(!repo.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(NewUser {
            username: "laila".to_string(),
            password_hash: "h1".to_string(),
        })
        .await
        .unwrap();
        let err = repo
            .insert(NewUser {
                username: "laila".to_string(),
                password_hash: "h2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("laila"));
    }
}
