//! Экран билетов: серверная пагинация с фильтрами, ручные операции
//! mark-used/refund, поиск по QR и валидация на рейсе.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::models::Ticket;
use crate::screens::ScreenError;
use crate::AppState;

/// Параметры GET /tickets. Пустые фильтры в query не попадают.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TicketPage {
    #[serde(default, alias = "tickets")]
    pub items: Vec<Ticket>,
    #[serde(default, alias = "count")]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct TicketEnvelope {
    ticket: Ticket,
}

/// Ответ POST /tickets/{id}/validate.
#[derive(Debug, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

pub struct TicketsScreen {
    state: Arc<AppState>,
}

impl TicketsScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self, query: &TicketQuery) -> Result<TicketPage, ScreenError> {
        Ok(self.state.api.get_query("/tickets", query).await?)
    }

    pub async fn detail(&self, id: i64) -> Result<Ticket, ScreenError> {
        let envelope: TicketEnvelope = self.state.api.get(&format!("/tickets/{id}")).await?;
        Ok(envelope.ticket)
    }

    pub async fn mark_used(&self, id: i64) -> Result<(), ScreenError> {
        self.state
            .api
            .post_empty_unit(&format!("/tickets/{id}/mark-used"))
            .await?;
        info!("ticket {} marked used", id);
        Ok(())
    }

    pub async fn refund(&self, id: i64) -> Result<(), ScreenError> {
        self.state
            .api
            .post_empty_unit(&format!("/tickets/{id}/refund"))
            .await?;
        info!("ticket {} refunded", id);
        Ok(())
    }

    /// Поиск билета по содержимому QR-кода.
    pub async fn by_qr(&self, qr_payload: &str) -> Result<Ticket, ScreenError> {
        let envelope: TicketEnvelope = self
            .state
            .api
            .post("/tickets/by-qr", &json!({ "qr_payload": qr_payload }))
            .await?;
        Ok(envelope.ticket)
    }

    /// Проверка билета контролёром; trip_id сверяет билет с конкретным рейсом.
    pub async fn validate(
        &self,
        id: i64,
        qr_payload: &str,
        trip_id: Option<i64>,
    ) -> Result<ValidationResult, ScreenError> {
        let mut body = json!({ "qr_payload": qr_payload });
        if let Some(trip_id) = trip_id {
            body["trip_id"] = json!(trip_id);
        }
        Ok(self
            .state
            .api
            .post(&format!("/tickets/{id}/validate"), &body)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_not_serialized() {
        let query = TicketQuery {
            page: Some(2),
            limit: Some(20),
            ..Default::default()
        };
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "page=2&limit=20");
    }

    #[test]
    fn ticket_page_accepts_count_alias() {
        let page: TicketPage =
            serde_json::from_str(r#"{"tickets":[],"count":42}"#).unwrap();
        assert_eq!(page.total, 42);
        assert!(page.items.is_empty());
    }
}
