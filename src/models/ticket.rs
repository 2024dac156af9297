use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Краткая форма позиции заказа, которую бэкенд вкладывает в билет.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketOrderItem {
    pub order_id: Option<i64>,
    pub trip_id: Option<i64>,
    pub seat_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub order_item_id: Option<i64>,
    pub trip_id: Option<i64>,
    pub seat_code: Option<String>,
    pub status: Option<String>,
    pub qr_payload: Option<String>,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_item: Option<TicketOrderItem>,
}

impl Ticket {
    /// trip_id может лежать на билете или внутри order_item.
    pub fn resolved_trip_id(&self) -> Option<i64> {
        self.trip_id
            .or_else(|| self.order_item.as_ref().and_then(|i| i.trip_id))
    }

    pub fn resolved_seat_code(&self) -> Option<&str> {
        self.seat_code
            .as_deref()
            .or_else(|| self.order_item.as_ref().and_then(|i| i.seat_code.as_deref()))
    }
}
