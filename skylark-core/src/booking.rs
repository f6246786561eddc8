use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::repository::{BookingRepository, FlightRepository};
use crate::{ServiceError, ServiceResult};

/// A reservation binding one user, one flight, a travel date and a
/// passenger count. Lifecycle: created, updated any number of times,
/// cancelled (hard delete, terminal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub flight_id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub passengers: i32,
}

/// A booking the store has not yet assigned an id to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub flight_id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub passengers: i32,
}

/// The only fields an update may touch. Flight and owner are fixed at
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingChanges {
    pub date: NaiveDate,
    pub passengers: i32,
}

/// Orchestrates the booking lifecycle over injected repositories.
pub struct BookingService {
    flights: Arc<dyn FlightRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(flights: Arc<dyn FlightRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { flights, bookings }
    }

    /// Bookings dated strictly after today (server date, evaluated per
    /// call), in creation order. Past bookings stay reachable through
    /// `get_details`.
    pub async fn list_upcoming(&self) -> ServiceResult<Vec<Booking>> {
        let today = Utc::now().date_naive();
        Ok(self.bookings.find_after(today).await?)
    }

    /// Any booking by id, regardless of date or caller.
    pub async fn get_details(&self, id: i64) -> ServiceResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::BookingNotFound(id))
    }

    /// Books `flight_id` for `owner`. The flight must exist; passenger
    /// count must be positive. No capacity check against the flight.
    pub async fn create(
        &self,
        flight_id: i64,
        owner: i64,
        date: NaiveDate,
        passengers: i32,
    ) -> ServiceResult<Booking> {
        validate_passengers(passengers)?;
        self.flights
            .find_by_id(flight_id)
            .await?
            .ok_or(ServiceError::FlightNotFound(flight_id))?;

        let booking = self
            .bookings
            .insert(NewBooking {
                flight_id,
                user_id: owner,
                date,
                passengers,
            })
            .await?;
        info!(booking_id = booking.id, flight_id, "booking created");
        Ok(booking)
    }

    /// Replaces date and passenger count; flight and owner stay untouched.
    /// Only the owning user may update.
    pub async fn update(&self, id: i64, caller: i64, changes: BookingChanges) -> ServiceResult<Booking> {
        validate_passengers(changes.passengers)?;
        let existing = self.get_details(id).await?;
        if existing.user_id != caller {
            return Err(ServiceError::NotOwner(id));
        }
        self.bookings
            .update(id, changes)
            .await?
            .ok_or(ServiceError::BookingNotFound(id))
    }

    /// Hard delete. Only the owning user may cancel.
    pub async fn cancel(&self, id: i64, caller: i64) -> ServiceResult<()> {
        let existing = self.get_details(id).await?;
        if existing.user_id != caller {
            return Err(ServiceError::NotOwner(id));
        }
        if !self.bookings.delete(id).await? {
            return Err(ServiceError::BookingNotFound(id));
        }
        info!(booking_id = id, "booking cancelled");
        Ok(())
    }
}

fn validate_passengers(passengers: i32) -> ServiceResult<()> {
    if passengers < 1 {
        return Err(ServiceError::Validation(
            "passengers must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::NewFlight;
    use crate::memory::{InMemoryBookingRepository, InMemoryFlightRepository};
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    const LAILA: i64 = 1;
    const OTHER: i64 = 2;

    async fn service_with_flight() -> (BookingService, Arc<InMemoryBookingRepository>) {
        let flights = Arc::new(InMemoryFlightRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        flights
            .insert(NewFlight {
                destination: "Wakanda".to_string(),
                time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                price: Decimal::new(23000, 2),
                miles: 4000,
            })
            .await
            .unwrap();
        (BookingService::new(flights, bookings.clone()), bookings)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn booking_changes_deserialization() {
        let json = r#"
            {
                "date": "2019-05-05",
                "passengers": 4
            }
        "#;
        let changes: BookingChanges = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(changes.date, date("2019-05-05"));
        assert_eq!(changes.passengers, 4);
    }

    #[tokio::test]
    async fn booking_lifecycle() {
        let (service, _) = service_with_flight().await;

        // Create
        let booking = service
            .create(1, LAILA, date("2019-05-05"), 4)
            .await
            .unwrap();
        assert_eq!(booking.id, 1);
        assert_eq!(booking.flight_id, 1);
        assert_eq!(booking.user_id, LAILA);
        assert_eq!(booking.passengers, 4);

        // Update replaces date and passengers only
        let updated = service
            .update(
                booking.id,
                LAILA,
                BookingChanges {
                    date: date("2020-06-06"),
                    passengers: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, booking.id);
        assert_eq!(updated.flight_id, booking.flight_id);
        assert_eq!(updated.user_id, booking.user_id);
        assert_eq!(updated.date, date("2020-06-06"));
        assert_eq!(updated.passengers, 2);

        // Cancel is terminal
        service.cancel(booking.id, LAILA).await.unwrap();
        assert!(matches!(
            service.get_details(booking.id).await,
            Err(ServiceError::BookingNotFound(_))
        ));
        assert!(matches!(
            service.cancel(booking.id, LAILA).await,
            Err(ServiceError::BookingNotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_excludes_past_bookings() {
        let (service, _) = service_with_flight().await;

        let past = service.create(1, LAILA, date("2018-01-01"), 2).await.unwrap();
        let future = service.create(1, LAILA, date("2099-01-01"), 2).await.unwrap();

        let upcoming = service.list_upcoming().await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, future.id);

        // A past booking never lists but stays reachable by id.
        assert_eq!(service.get_details(past.id).await.unwrap().id, past.id);
    }

    #[tokio::test]
    async fn create_rejects_unknown_flight() {
        let (service, _) = service_with_flight().await;
        assert!(matches!(
            service.create(42, LAILA, date("2099-01-01"), 1).await,
            Err(ServiceError::FlightNotFound(42))
        ));
    }

    #[tokio::test]
    async fn create_rejects_non_positive_passengers() {
        let (service, bookings) = service_with_flight().await;
        assert!(matches!(
            service.create(1, LAILA, date("2099-01-01"), 0).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(bookings.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_the_owner_may_update_or_cancel() {
        let (service, _) = service_with_flight().await;
        let booking = service.create(1, LAILA, date("2099-01-01"), 2).await.unwrap();

        assert!(matches!(
            service
                .update(
                    booking.id,
                    OTHER,
                    BookingChanges {
                        date: date("2099-02-02"),
                        passengers: 3,
                    },
                )
                .await,
            Err(ServiceError::NotOwner(_))
        ));
        assert!(matches!(
            service.cancel(booking.id, OTHER).await,
            Err(ServiceError::NotOwner(_))
        ));

        // Untouched by the failed attempts.
        let current = service.get_details(booking.id).await.unwrap();
        assert_eq!(current, booking);
    }
}
