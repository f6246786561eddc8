use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use skylark_core::flight::Flight;

use crate::bookings::BookingResponse;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Time and price are rendered as strings on the wire ("10:00:00",
/// "230.00"). Miles are internal and not exposed.
#[derive(Debug, Serialize)]
pub struct FlightResponse {
    pub id: i64,
    pub destination: String,
    pub time: String,
    pub price: String,
}

impl From<Flight> for FlightResponse {
    fn from(flight: Flight) -> Self {
        Self {
            id: flight.id,
            destination: flight.destination,
            time: flight.time.format("%H:%M:%S").to_string(),
            price: flight.price.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookFlightRequest {
    pub date: NaiveDate,
    pub passengers: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights))
        .route("/flights/{id}", get(get_flight))
}

/// Booking a flight requires a bearer token; `app()` layers the auth
/// middleware over these.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/flights/{id}/book", post(book_flight))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /flights
async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<FlightResponse>>, ApiError> {
    let flights = state.catalog.list().await?;
    Ok(Json(flights.into_iter().map(FlightResponse::from).collect()))
}

/// GET /flights/{id}
async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FlightResponse>, ApiError> {
    let flight = state.catalog.get(id).await?;
    Ok(Json(flight.into()))
}

/// POST /flights/{id}/book
async fn book_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<BookFlightRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state
        .bookings
        .create(id, caller.id, req.date, req.passengers)
        .await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}
