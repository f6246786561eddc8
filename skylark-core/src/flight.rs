use std::sync::Arc;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::FlightRepository;
use crate::{ServiceError, ServiceResult};

/// A bookable flight offering. Flights come from seed/admin data and are
/// never mutated or deleted by booking operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    pub destination: String,
    pub time: NaiveTime,
    pub price: Decimal,
    pub miles: i64,
}

/// A flight the store has not yet assigned an id to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlight {
    pub destination: String,
    pub time: NaiveTime,
    pub price: Decimal,
    pub miles: i64,
}

/// Read-only view over the flight offerings.
pub struct FlightCatalog {
    flights: Arc<dyn FlightRepository>,
}

impl FlightCatalog {
    pub fn new(flights: Arc<dyn FlightRepository>) -> Self {
        Self { flights }
    }

    /// All flights, in insertion order.
    pub async fn list(&self) -> ServiceResult<Vec<Flight>> {
        Ok(self.flights.list().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Flight> {
        self.flights
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::FlightNotFound(id))
    }
}
