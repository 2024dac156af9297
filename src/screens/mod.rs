pub mod dashboard;
pub mod orders;
pub mod routes;
pub mod schedules;
pub mod seat_templates;
pub mod support;
pub mod tickets;
pub mod trip_seatmap;
pub mod trips;
pub mod users;

use crate::api::ApiError;
use crate::seatmap::editor::SeatValidationError;
use crate::seatmap::LayoutError;
use crate::session::AuthError;

/// Общая ошибка экранов: сетевые и backend-ошибки пробрасываются как есть,
/// валидация и неполная конфигурация разрешаются локально.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Validation(#[from] SeatValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Editor(#[from] crate::seatmap::editor::EditorError),
}
