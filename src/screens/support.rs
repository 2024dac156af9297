//! Экран обращений в поддержку: серверная пагинация с фильтрами
//! и смена статуса обращения.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::models::SupportRequest;
use crate::screens::ScreenError;
use crate::AppState;

/// Параметры GET /support-requests. Пустые фильтры в query не попадают.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SupportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Конверт списка: {"supReq": [...], "total": N} либо {"count": N}.
#[derive(Debug, Deserialize)]
pub struct SupportPage {
    #[serde(default, alias = "supReq")]
    pub items: Vec<SupportRequest>,
    #[serde(default, alias = "count")]
    pub total: u64,
}

pub struct SupportScreen {
    state: Arc<AppState>,
}

impl SupportScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self, query: &SupportQuery) -> Result<SupportPage, ScreenError> {
        Ok(self.state.api.get_query("/support-requests", query).await?)
    }

    pub async fn set_status(&self, id: i64, status: &str) -> Result<(), ScreenError> {
        self.state
            .api
            .patch_unit(
                &format!("/support-requests/{id}"),
                &json!({ "status": status }),
            )
            .await?;
        info!("support request {} set to {}", id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_not_serialized() {
        let query = SupportQuery {
            page: Some(1),
            limit: Some(10),
            status: Some("open".into()),
            ..Default::default()
        };
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "page=1&limit=10&status=open");
    }

    #[test]
    fn page_accepts_sup_req_envelope() {
        let page: SupportPage = serde_json::from_str(
            r#"{"supReq":[{"id":1,"subject":"refund","message":"help","status":"open",
                "user":{"full_name":"An","email":"an@rail.vn"}}],"total":1}"#,
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].author_name(), "An");
        assert_eq!(page.items[0].author_email(), "an@rail.vn");
    }
}
