use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Active,
    Inactive,
}

/// Определение вагона внутри расписания (carriages_json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarriageDef {
    pub seat_template_id: Option<i64>,
    pub carriage_no: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Одна дополнительная дата из exceptions_json, с необязательным
/// переопределением времени отправления.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraRun {
    pub date: NaiveDate,
    #[serde(default)]
    pub depart_hm: Option<String>,
}

/// exceptions_json: {"skip_dates": [...], "extra": [...]}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleExceptions {
    #[serde(default)]
    pub skip_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub extra: Vec<ExtraRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSchedule {
    pub id: i64,
    pub route_id: i64,
    pub vehicle_no: String,
    pub freq: Frequency,
    // "1,2,3" (1=Mon..7=Sun); null для daily
    pub days_of_week: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub depart_hm: String,
    pub eta_minutes: i64,
    pub timezone: Option<String>,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub carriages_json: Option<Vec<CarriageDef>>,
    #[serde(default)]
    pub exceptions_json: Option<ScheduleExceptions>,
}

/// Тело create/update расписания: та же форма, что и у записи, но без id.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePayload {
    pub route_id: i64,
    pub vehicle_no: String,
    pub freq: Frequency,
    pub days_of_week: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub depart_hm: String,
    pub eta_minutes: i64,
    pub timezone: String,
    pub status: ScheduleStatus,
    pub carriages_json: Vec<CarriageDef>,
    pub exceptions_json: Option<ScheduleExceptions>,
}
