use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    pub origin: String,
    pub destination: String,
    pub distance_km: Option<f64>,
    pub eta_minutes: Option<i64>,
    #[serde(default, alias = "isActive")]
    pub active: Option<bool>,
}

impl Route {
    /// "Origin → Destination" для выпадающих списков.
    pub fn label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

/// Тело create/update. Бэкенд ожидает camelCase `isActive`.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePayload {
    pub origin: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<i64>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}
