//! Экран маршрутов: список + create/update через модальную форму.

use std::sync::Arc;

use tracing::info;

use crate::models::route::RoutePayload;
use crate::models::{Listing, Route};
use crate::screens::ScreenError;
use crate::AppState;

pub struct RoutesScreen {
    state: Arc<AppState>,
}

impl RoutesScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<Route>, ScreenError> {
        let listing: Listing<Route> = self.state.api.get("/routes").await?;
        Ok(listing.into_vec())
    }

    pub async fn create(&self, payload: &RoutePayload) -> Result<(), ScreenError> {
        self.state.api.post_unit("/routes/create", payload).await?;
        info!("route created: {} → {}", payload.origin, payload.destination);
        Ok(())
    }

    pub async fn update(&self, id: i64, payload: &RoutePayload) -> Result<(), ScreenError> {
        self.state
            .api
            .post_unit(&format!("/routes/update/{id}"), payload)
            .await?;
        info!("route {} updated", id);
        Ok(())
    }
}
