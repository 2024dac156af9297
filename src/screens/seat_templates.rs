//! Экран шаблонов мест: список/создание/переименование плюс редактор схемы.
//!
//! Редактор работает так: `open_editor` загружает шаблон и строит локальное
//! состояние `SeatMapEditor`; все правки живут в памяти до явного
//! `save_seats` (полный batch upsert) или `delete_seat`. Сетевые ошибки
//! оставляют локальное состояние нетронутым.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::models::seat::SeatTemplateBundle;
use crate::models::{Listing, SeatTemplate};
use crate::screens::ScreenError;
use crate::seatmap::editor::{EditorError, RemovalOutcome, SeatMapEditor};
use crate::AppState;

pub struct SeatTemplatesScreen {
    state: Arc<AppState>,
}

impl SeatTemplatesScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<SeatTemplate>, ScreenError> {
        let listing: Listing<SeatTemplate> = self.state.api.get("/seat-templates").await?;
        Ok(listing.into_vec())
    }

    pub async fn create(&self, name: &str) -> Result<(), ScreenError> {
        self.state
            .api
            .post_unit("/seat-templates", &json!({ "name": name }))
            .await?;
        info!("seat template \"{}\" created", name);
        Ok(())
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<(), ScreenError> {
        self.state
            .api
            .patch_unit(&format!("/seat-templates/{id}"), &json!({ "name": name }))
            .await?;
        Ok(())
    }

    pub async fn load_bundle(&self, id: i64) -> Result<SeatTemplateBundle, ScreenError> {
        Ok(self
            .state
            .api
            .get(&format!("/seat-templates/{id}/seats"))
            .await?)
    }

    /// Загружает шаблон и строит редактор. Ненастроенный layout - ошибка
    /// конфигурации, не частичный рендер.
    pub async fn open_editor(
        &self,
        id: i64,
    ) -> Result<(SeatTemplate, SeatMapEditor), ScreenError> {
        let bundle = self.load_bundle(id).await?;
        let editor =
            SeatMapEditor::from_bundle(&bundle, self.state.config.seatmap.default_base_price)?;
        Ok((bundle.template, editor))
    }

    /// PATCH meta_json: после изменения размеров экран перечитывает шаблон.
    pub async fn save_layout(&self, id: i64, rows: u32, cols: u32) -> Result<(), ScreenError> {
        self.state
            .api
            .patch_unit(
                &format!("/seat-templates/{id}"),
                &json!({ "meta_json": { "rows": rows, "cols": cols } }),
            )
            .await?;
        info!("template {} layout set to {}x{}", id, rows, cols);
        Ok(())
    }

    /// Полный batch upsert. Валидация "всё или ничего" выполняется до
    /// запроса; при любой ошибке на бэкенд не уходит ни одного места.
    pub async fn save_seats(
        &self,
        template_id: i64,
        editor: &SeatMapEditor,
    ) -> Result<usize, ScreenError> {
        let payload = editor.validate_for_save()?;
        self.state
            .api
            .post_unit(&format!("/seat-templates/{template_id}/seats"), &payload)
            .await?;
        info!("saved {} seats for template {}", payload.len(), template_id);
        Ok(payload.len())
    }

    /// Точечное обновление одного сохранённого места (PATCH). Несохранённые
    /// места попадают на бэкенд только через batch save.
    pub async fn update_seat(
        &self,
        template_id: i64,
        editor: &SeatMapEditor,
        local_id: Uuid,
    ) -> Result<(), ScreenError> {
        let seat = editor
            .seats()
            .iter()
            .find(|s| s.local_id == local_id)
            .ok_or(EditorError::UnknownSeat)?;
        let Some(id) = seat.id else {
            return Err(EditorError::NotPersisted {
                seat_code: seat.seat_code.clone(),
            }
            .into());
        };
        self.state
            .api
            .patch_unit(
                &format!("/seat-templates/{template_id}/seats/{id}"),
                &json!({
                    "seat_code": seat.seat_code,
                    "seat_class": seat.seat_class,
                    "base_price": seat.base_price,
                    "pos_row": seat.pos_row,
                    "pos_col": seat.pos_col,
                }),
            )
            .await?;
        Ok(())
    }

    /// Удаление места. Несохранённое исчезает локально без сети; сохранённое
    /// удаляется на бэкенде и только после успеха - из локального состояния.
    pub async fn delete_seat(
        &self,
        template_id: i64,
        editor: &mut SeatMapEditor,
        local_id: Uuid,
    ) -> Result<(), ScreenError> {
        match editor.remove_seat(local_id)? {
            RemovalOutcome::Dropped => Ok(()),
            RemovalOutcome::NeedsDelete { id } => {
                self.state
                    .api
                    .delete_unit(&format!("/seat-templates/{template_id}/seats/{id}"))
                    .await?;
                editor.confirm_removed(local_id);
                info!("seat {} deleted from template {}", id, template_id);
                Ok(())
            }
        }
    }
}
