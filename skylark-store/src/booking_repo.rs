use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use skylark_core::booking::{Booking, BookingChanges, NewBooking};
use skylark_core::repository::BookingRepository;
use skylark_core::BoxError;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    flight_id: i64,
    user_id: i64,
    travel_date: NaiveDate,
    passengers: i32,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            flight_id: row.flight_id,
            user_id: row.user_id,
            date: row.travel_date,
            passengers: row.passengers,
        }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BoxError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (flight_id, user_id, travel_date, passengers)
            VALUES ($1, $2, $3, $4)
            RETURNING id, flight_id, user_id, travel_date, passengers
            "#,
        )
        .bind(booking.flight_id)
        .bind(booking.user_id)
        .bind(booking.date)
        .bind(booking.passengers)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, BoxError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "SELECT id, flight_id, user_id, travel_date, passengers FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Booking::from))
    }

    async fn find_all(&self) -> Result<Vec<Booking>, BoxError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT id, flight_id, user_id, travel_date, passengers FROM bookings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_after(&self, date: NaiveDate) -> Result<Vec<Booking>, BoxError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, flight_id, user_id, travel_date, passengers
            FROM bookings
            WHERE travel_date > $1
            ORDER BY id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn update(&self, id: i64, changes: BookingChanges) -> Result<Option<Booking>, BoxError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            UPDATE bookings SET travel_date = $1, passengers = $2
            WHERE id = $3
            RETURNING id, flight_id, user_id, travel_date, passengers
            "#,
        )
        .bind(changes.date)
        .bind(changes.passengers)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Booking::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, BoxError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
