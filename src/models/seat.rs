use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatClass {
    Standard,
    Vip,
}

impl SeatClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Standard => "standard",
            SeatClass::Vip => "vip",
        }
    }
}

/// Сетка шаблона: meta_json может отсутствовать или быть пустым.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateMeta {
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub cols: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatTemplate {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub meta_json: Option<TemplateMeta>,
}

/// Место, сохранённое в шаблоне: позиция, класс, базовая цена.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSeat {
    #[serde(default)]
    pub id: Option<i64>,
    pub seat_code: String,
    pub seat_class: SeatClass,
    pub base_price: f64,
    pub pos_row: u32,
    pub pos_col: u32,
}

/// GET /seat-templates/{id}/seats
#[derive(Debug, Clone, Deserialize)]
pub struct SeatTemplateBundle {
    pub template: SeatTemplate,
    #[serde(default)]
    pub seats: Vec<TemplateSeat>,
}

/// Поле статуса у TripSeat: одни эндпоинты шлют строку, другие числовой код.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Code(i64),
    Text(String),
}

/// Продажное состояние места на конкретном рейсе. Представление у бэкенда
/// неконсистентно между эндпоинтами, поэтому все сигналы опциональны;
/// интерпретирует их `seatmap::derive_sale_status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripSeatRecord {
    pub seat_code: String,
    #[serde(default)]
    pub sold: Option<bool>,
    #[serde(default)]
    pub status: Option<StatusValue>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub seat_status: Option<String>,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub order_item_id: Option<i64>,
    #[serde(default)]
    pub sold_at: Option<String>,
}

impl TripSeatRecord {
    /// Строковый статус: status, иначе state, иначе seat_status.
    pub fn status_text(&self) -> Option<&str> {
        if let Some(StatusValue::Text(s)) = &self.status {
            return Some(s);
        }
        self.state.as_deref().or(self.seat_status.as_deref())
    }

    /// Числовой код: числовой status, иначе status_id.
    pub fn status_code(&self) -> Option<i64> {
        if let Some(StatusValue::Code(code)) = self.status {
            return Some(code);
        }
        self.status_id
    }
}

/// GET /carriages/{id}/seatmap
#[derive(Debug, Clone, Deserialize)]
pub struct TripSeatmapResponse {
    #[serde(default)]
    pub seats: Vec<TripSeatRecord>,
}
