use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use skylark_core::booking::{Booking, BookingChanges};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// List entry shape: passengers are only exposed on the detail view.
#[derive(Debug, Serialize)]
pub struct BookingSummary {
    pub id: i64,
    pub flight: i64,
    pub date: String,
}

impl From<Booking> for BookingSummary {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            flight: booking.flight_id,
            date: booking.date.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: i64,
    pub flight: i64,
    pub date: String,
    pub passengers: i32,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            flight: booking.flight_id,
            date: booking.date.to_string(),
            passengers: booking.passengers,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub date: NaiveDate,
    pub passengers: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", get(booking_details))
}

/// Mutations require a bearer token; `app()` layers the auth middleware
/// over these.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/bookings/{id}", put(update_booking).delete(cancel_booking))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /bookings
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingSummary>>, ApiError> {
    let bookings = state.bookings.list_upcoming().await?;
    Ok(Json(bookings.into_iter().map(BookingSummary::from).collect()))
}

/// GET /bookings/{id}
async fn booking_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state.bookings.get_details(id).await?;
    Ok(Json(booking.into()))
}

/// PUT /bookings/{id}
async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let changes = BookingChanges {
        date: req.date,
        passengers: req.passengers,
    };
    let booking = state.bookings.update(id, caller.id, changes).await?;
    Ok(Json(booking.into()))
}

/// DELETE /bookings/{id}
async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    state.bookings.cancel(id, caller.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
