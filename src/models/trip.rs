use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub route_id: Option<i64>,
    pub vehicle_no: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub seat_template_id: Option<i64>,
}

/// Один вагон рейса; привязан к шаблону мест.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carriage {
    pub id: i64,
    pub name: Option<String>,
    pub carriage_no: Option<i32>,
    pub seat_template_id: Option<i64>,
}

impl Carriage {
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Carriage {}", index + 1))
    }
}
