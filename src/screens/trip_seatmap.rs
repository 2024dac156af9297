//! Экран схемы мест рейса: выбор вагона, параллельная загрузка геометрии
//! шаблона и продажного состояния, слияние в плотную сетку со сводкой.

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::seat::{SeatTemplateBundle, TripSeatmapResponse};
use crate::models::{Carriage, Listing};
use crate::screens::ScreenError;
use crate::seatmap::{self, GridLayout, GridSummary, SeatGrid};
use crate::AppState;

/// Готовая к рендеру схема одного вагона.
#[derive(Debug)]
pub struct CarriageSeatmap {
    pub carriage: Carriage,
    pub grid: SeatGrid,
    pub summary: GridSummary,
}

pub struct TripSeatmapScreen {
    state: Arc<AppState>,
}

impl TripSeatmapScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn carriages(&self, trip_id: i64) -> Result<Vec<Carriage>, ScreenError> {
        let listing: Listing<Carriage> = self
            .state
            .api
            .get(&format!("/carriages/trips/{trip_id}/carriages"))
            .await?;
        Ok(listing.into_vec())
    }

    /// Загружает и сливает схему вагона. Обе загрузки идут параллельно;
    /// ошибка любой из них отменяет слияние целиком, частичная схема
    /// не рендерится.
    pub async fn load_carriage(&self, carriage: &Carriage) -> Result<CarriageSeatmap, ScreenError> {
        let template_id = carriage
            .seat_template_id
            .ok_or(seatmap::LayoutError::NotConfigured)?;

        let template_path = format!("/seat-templates/{template_id}/seats");
        let seatmap_path = format!("/carriages/{}/seatmap", carriage.id);
        let (bundle, trip_state): (SeatTemplateBundle, TripSeatmapResponse) = tokio::try_join!(
            self.state.api.get(&template_path),
            self.state.api.get(&seatmap_path),
        )?;
        debug!(
            "carriage {}: {} template seats, {} trip records",
            carriage.id,
            bundle.seats.len(),
            trip_state.seats.len()
        );

        let layout = GridLayout::from_meta(bundle.template.meta_json.as_ref())?;
        let merged = seatmap::merge_trip_seats(&bundle.seats, &trip_state.seats);
        let summary = seatmap::summarize(&merged);
        let grid = SeatGrid::build(layout, &merged);
        info!(
            "carriage {} seatmap loaded: {}/{} sold",
            carriage.id, summary.sold, summary.total
        );

        Ok(CarriageSeatmap {
            carriage: carriage.clone(),
            grid,
            summary,
        })
    }
}
