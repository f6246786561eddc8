use std::sync::Arc;

use skylark_core::booking::BookingService;
use skylark_core::flight::FlightCatalog;
use skylark_core::repository::UserRepository;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub access_ttl: u64,
    pub refresh_ttl: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<FlightCatalog>,
    pub bookings: Arc<BookingService>,
    pub users: Arc<dyn UserRepository>,
    pub auth: AuthConfig,
}
