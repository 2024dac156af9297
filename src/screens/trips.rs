//! Экран рейсов: список рейсов; вагоны и схема мест живут в trip_seatmap.

use std::sync::Arc;

use crate::models::{Listing, Trip};
use crate::screens::ScreenError;
use crate::AppState;

pub struct TripsScreen {
    state: Arc<AppState>,
}

impl TripsScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<Trip>, ScreenError> {
        let listing: Listing<Trip> = self.state.api.get("/trips").await?;
        Ok(listing.into_vec())
    }
}
