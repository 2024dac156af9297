use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ticket::Ticket;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: Option<i64>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub trip_id: Option<i64>,
    pub seat_code: Option<String>,
    pub passenger_id: Option<i64>,
    pub price: Option<f64>,
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub provider: Option<String>,
    pub provider_txn_id: Option<String>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    /// Сырой ответ провайдера; структура зависит от провайдера,
    /// поэтому храним как JSON.
    #[serde(default)]
    pub raw_payload: Option<serde_json::Value>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}
