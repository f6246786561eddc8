use async_trait::async_trait;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use sqlx::PgPool;

use skylark_core::flight::{Flight, NewFlight};
use skylark_core::repository::FlightRepository;
use skylark_core::BoxError;

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: i64,
    destination: String,
    departure_time: NaiveTime,
    price: Decimal,
    miles: i64,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            destination: row.destination,
            time: row.departure_time,
            price: row.price,
            miles: row.miles,
        }
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn insert(&self, flight: NewFlight) -> Result<Flight, BoxError> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            INSERT INTO flights (destination, departure_time, price, miles)
            VALUES ($1, $2, $3, $4)
            RETURNING id, destination, departure_time, price, miles
            "#,
        )
        .bind(&flight.destination)
        .bind(flight.time)
        .bind(flight.price)
        .bind(flight.miles)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Flight>, BoxError> {
        let rows = sqlx::query_as::<_, FlightRow>(
            "SELECT id, destination, departure_time, price, miles FROM flights ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>, BoxError> {
        let row = sqlx::query_as::<_, FlightRow>(
            "SELECT id, destination, departure_time, price, miles FROM flights WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Flight::from))
    }
}
