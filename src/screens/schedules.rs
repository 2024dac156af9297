//! Экран расписаний: CRUD, переключение статуса, серверная генерация рейсов
//! и локальное развёртывание повторений (daily/weekly с исключениями).

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;
use tracing::info;

use crate::models::schedule::SchedulePayload;
use crate::models::{Frequency, ScheduleStatus, TripSchedule};
use crate::screens::ScreenError;
use crate::table::matches_query;
use crate::AppState;

#[derive(Debug, serde::Deserialize)]
struct ScheduleListing {
    #[serde(default)]
    items: Vec<TripSchedule>,
}

pub struct SchedulesScreen {
    state: Arc<AppState>,
}

impl SchedulesScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<TripSchedule>, ScreenError> {
        let listing: ScheduleListing = self.state.api.get("/trip-schedules/").await?;
        Ok(listing.items)
    }

    pub async fn create(&self, payload: &SchedulePayload) -> Result<(), ScreenError> {
        self.state.api.post_unit("/trip-schedules", payload).await?;
        info!("schedule created for route {}", payload.route_id);
        Ok(())
    }

    pub async fn update(&self, id: i64, payload: &SchedulePayload) -> Result<(), ScreenError> {
        self.state
            .api
            .put_unit(&format!("/trip-schedules/{id}"), payload)
            .await?;
        info!("schedule {} updated", id);
        Ok(())
    }

    /// Переключение active/inactive частичным PUT.
    pub async fn set_status(&self, id: i64, status: ScheduleStatus) -> Result<(), ScreenError> {
        self.state
            .api
            .put_unit(&format!("/trip-schedules/{id}"), &json!({ "status": status }))
            .await?;
        Ok(())
    }

    /// Серверная генерация рейсов на N дней вперёд (идемпотентная на бэкенде).
    pub async fn generate(&self, id: i64, days: u32) -> Result<(), ScreenError> {
        self.state
            .api
            .post_query_unit(&format!("/trip-schedules/{id}/generate"), &[("days", days)])
            .await?;
        info!("requested trip generation for schedule {} ({} days)", id, days);
        Ok(())
    }
}

/// Клиентские фильтры списка расписаний.
#[derive(Debug, Default, Clone)]
pub struct ScheduleFilter {
    pub q: String,
    pub status: Option<ScheduleStatus>,
    pub freq: Option<Frequency>,
    /// Пересечение с периодом действия расписания.
    pub range: Option<(NaiveDate, NaiveDate)>,
}

impl ScheduleFilter {
    pub fn matches(&self, schedule: &TripSchedule) -> bool {
        if let Some(status) = self.status {
            if schedule.status != status {
                return false;
            }
        }
        if let Some(freq) = self.freq {
            if schedule.freq != freq {
                return false;
            }
        }
        let route_id = schedule.route_id.to_string();
        if !matches_query(
            &[&schedule.vehicle_no, &route_id, &schedule.depart_hm],
            &self.q,
        ) {
            return false;
        }
        if let Some((from, to)) = self.range {
            // Открытые границы расписания считаются бесконечными.
            let starts_before_to = schedule.start_date.map(|d| d <= to).unwrap_or(true);
            let ends_after_from = schedule.end_date.map(|d| d >= from).unwrap_or(true);
            if !(starts_before_to && ends_after_from) {
                return false;
            }
        }
        true
    }
}

/// Дни недели из "1,2,3" (1=Пн..7=Вс); None/мусор означает все дни,
/// как значение по умолчанию в форме.
fn parse_days_of_week(raw: Option<&str>) -> BTreeSet<u32> {
    let parsed: BTreeSet<u32> = raw
        .unwrap_or("")
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .filter(|d| (1..=7).contains(d))
        .collect();
    if parsed.is_empty() {
        (1..=7).collect()
    } else {
        parsed
    }
}

fn parse_depart(hm: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(hm.trim(), "%H:%M").ok()
}

/// Локальное развёртывание расписания в конкретные отправления на ближайшие
/// `days` дней начиная с `from`. Учитывает окно действия, дни недели,
/// skip_dates и дополнительные запуски с переопределённым временем.
pub fn preview_occurrences(
    schedule: &TripSchedule,
    from: NaiveDate,
    days: u32,
) -> Vec<NaiveDateTime> {
    let Some(depart) = parse_depart(&schedule.depart_hm) else {
        return Vec::new();
    };
    let window_end = from + Duration::days(days.saturating_sub(1) as i64);
    let exceptions = schedule.exceptions_json.clone().unwrap_or_default();
    let skip: BTreeSet<NaiveDate> = exceptions.skip_dates.iter().copied().collect();
    let weekdays = match schedule.freq {
        Frequency::Daily => (1..=7).collect(),
        Frequency::Weekly => parse_days_of_week(schedule.days_of_week.as_deref()),
    };

    let mut occurrences: BTreeSet<NaiveDateTime> = BTreeSet::new();
    let mut date = from;
    while date <= window_end {
        let in_window = schedule.start_date.map(|d| date >= d).unwrap_or(true)
            && schedule.end_date.map(|d| date <= d).unwrap_or(true);
        let weekday = date.weekday().number_from_monday();
        if in_window && weekdays.contains(&weekday) && !skip.contains(&date) {
            occurrences.insert(date.and_time(depart));
        }
        date += Duration::days(1);
    }

    // Дополнительные запуски добавляются поверх базового правила.
    for extra in &exceptions.extra {
        if extra.date < from || extra.date > window_end {
            continue;
        }
        let time = extra
            .depart_hm
            .as_deref()
            .and_then(parse_depart)
            .unwrap_or(depart);
        occurrences.insert(extra.date.and_time(time));
    }

    occurrences.into_iter().collect()
}
