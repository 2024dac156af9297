//! Экран сводки: KPI берутся с бэкенда, а при отсутствии эндпоинта
//! статистики считаются на клиенте из заказов и рейсов. Это единственный
//! экран с санкционированным fallback - остальные отдают ошибку как есть.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{Listing, Order, Trip};
use crate::screens::ScreenError;
use crate::AppState;

/// Откуда пришли цифры; UI помечает клиентский расчёт как приблизительный.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiSource {
    Backend,
    ClientComputed,
}

#[derive(Debug)]
pub struct DashboardKpis {
    pub revenue: f64,
    pub orders: usize,
    /// Бэкенд может не отдавать, клиентский расчёт не умеет.
    pub new_users: Option<usize>,
    pub upcoming_trips: usize,
    pub recent_orders: Vec<Order>,
    pub source: KpiSource,
}

/// GET /admin/stats
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    revenue: f64,
    #[serde(default)]
    orders: usize,
    #[serde(default)]
    new_users: Option<usize>,
    #[serde(default)]
    upcoming_trips: usize,
    #[serde(default)]
    recent_orders: Vec<Order>,
}

pub struct DashboardScreen {
    state: Arc<AppState>,
}

impl DashboardScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn load(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<DashboardKpis, ScreenError> {
        let query = [("from", from.to_rfc3339()), ("to", to.to_rfc3339())];
        match self
            .state
            .api
            .get_query::<StatsResponse, _>("/admin/stats", &query)
            .await
        {
            Ok(stats) => Ok(DashboardKpis {
                revenue: stats.revenue,
                orders: stats.orders,
                new_users: stats.new_users,
                upcoming_trips: stats.upcoming_trips,
                recent_orders: stats.recent_orders,
                source: KpiSource::Backend,
            }),
            Err(err) if err.is_not_found() => {
                warn!("stats endpoint missing, computing KPIs client-side");
                self.compute_fallback(from, to).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn compute_fallback(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<DashboardKpis, ScreenError> {
        let (orders, trips): (Listing<Order>, Listing<Trip>) =
            tokio::try_join!(self.state.api.get("/orders"), self.state.api.get("/trips"))?;
        let kpis = compute_kpis(orders.into_vec(), &trips.into_vec(), from, to, Utc::now());
        info!(
            "client-side KPIs: {} orders, revenue {:.2}",
            kpis.orders, kpis.revenue
        );
        Ok(kpis)
    }
}

/// Клиентский расчёт KPI: выручка по оплаченным заказам в периоде,
/// количество заказов периода, будущие рейсы, последние 5 заказов.
pub fn compute_kpis(
    mut orders: Vec<Order>,
    trips: &[Trip],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DashboardKpis {
    let in_range = |order: &Order| {
        order
            .created_at
            .map(|at| at >= from && at <= to)
            .unwrap_or(false)
    };

    let revenue = orders
        .iter()
        .filter(|o| o.is_paid() && in_range(o))
        .filter_map(|o| o.total_amount)
        .sum();
    let order_count = orders.iter().filter(|o| in_range(o)).count();
    let upcoming_trips = trips
        .iter()
        .filter(|t| t.departure_time.map(|d| d > now).unwrap_or(false))
        .count();

    // Последние пять заказов по дате создания.
    orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
    orders.truncate(5);

    DashboardKpis {
        revenue,
        orders: order_count,
        new_users: None,
        upcoming_trips,
        recent_orders: orders,
        source: KpiSource::ClientComputed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: i64, status: &str, amount: f64, created: &str) -> Order {
        Order {
            id,
            user_id: Some(1),
            total_amount: Some(amount),
            status: Some(status.into()),
            created_at: Some(created.parse().unwrap()),
            updated_at: None,
            items: vec![],
            payments: vec![],
        }
    }

    fn trip(id: i64, departure: Option<&str>) -> Trip {
        Trip {
            id,
            route_id: Some(1),
            vehicle_no: Some("SE1".into()),
            departure_time: departure.map(|d| d.parse().unwrap()),
            arrival_time: None,
            status: None,
            seat_template_id: None,
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn revenue_counts_only_paid_orders_in_range() {
        let orders = vec![
            order(1, "paid", 100.0, "2025-09-05T10:00:00Z"),
            order(2, "pending", 50.0, "2025-09-05T11:00:00Z"),
            order(3, "paid", 30.0, "2025-08-01T10:00:00Z"), // вне периода
        ];
        let kpis = compute_kpis(
            orders,
            &[],
            at("2025-09-01T00:00:00Z"),
            at("2025-09-30T23:59:59Z"),
            at("2025-09-10T00:00:00Z"),
        );
        assert_eq!(kpis.revenue, 100.0);
        assert_eq!(kpis.orders, 2);
        assert_eq!(kpis.source, KpiSource::ClientComputed);
    }

    #[test]
    fn upcoming_trips_require_future_departure() {
        let trips = vec![
            trip(1, Some("2025-09-20T08:00:00Z")),
            trip(2, Some("2025-09-01T08:00:00Z")),
            trip(3, None),
        ];
        let kpis = compute_kpis(
            vec![],
            &trips,
            at("2025-09-01T00:00:00Z"),
            at("2025-09-30T00:00:00Z"),
            at("2025-09-10T00:00:00Z"),
        );
        assert_eq!(kpis.upcoming_trips, 1);
    }

    #[test]
    fn recent_orders_keep_latest_five() {
        let orders: Vec<Order> = (1..=7)
            .map(|i| order(i, "paid", 10.0, &format!("2025-09-0{i}T10:00:00Z")))
            .collect();
        let kpis = compute_kpis(
            orders,
            &[],
            at("2025-09-01T00:00:00Z"),
            at("2025-09-30T00:00:00Z"),
            at("2025-09-10T00:00:00Z"),
        );
        assert_eq!(kpis.recent_orders.len(), 5);
        assert_eq!(kpis.recent_orders[0].id, 7);
    }
}
