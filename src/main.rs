use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rail_admin::{
    config::Config,
    screens::{
        dashboard::DashboardScreen,
        orders::{OrdersScreen, PaymentBreakdown},
        routes::RoutesScreen,
        schedules::{self, ScheduleFilter, SchedulesScreen},
        seat_templates::SeatTemplatesScreen,
        support::{SupportQuery, SupportScreen},
        tickets::{TicketQuery, TicketsScreen},
        trip_seatmap::TripSeatmapScreen,
        trips::TripsScreen,
        users::UsersScreen,
    },
    table, AppState,
};

#[derive(Parser)]
#[command(name = "rail-admin", about = "Admin console for the rail ticketing backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// KPI dashboard for the last N days
    Dashboard {
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
    /// List routes
    Routes,
    /// List trips
    Trips,
    /// List trip schedules, optionally with a local occurrence preview
    Schedules {
        /// Schedule id to expand into concrete departures
        #[arg(long)]
        preview: Option<i64>,
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Text filter over vehicle, route id and departure time
        #[arg(long, default_value_t = String::new())]
        q: String,
    },
    /// Render the seat template editor grid
    Seatmap { template_id: i64 },
    /// Render per-carriage seat maps for a trip
    TripSeatmap { trip_id: i64 },
    /// List orders, or show one order with its payment breakdown
    Orders {
        id: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// List tickets with server-side filters
    Tickets {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        trip_id: Option<i64>,
        #[arg(long)]
        q: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// List registered users
    Users,
    /// List support requests, or change the status of one
    Support {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        q: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Request id to update together with --set-status
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        set_status: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let state = AppState::new(config);

    login(&state).await?;

    match cli.command {
        Command::Dashboard { days } => {
            let to = Utc::now();
            let from = to - Duration::days(days);
            let kpis = DashboardScreen::new(state).load(from, to).await?;
            println!("Revenue:        {:.2}", kpis.revenue);
            println!("Orders:         {}", kpis.orders);
            if let Some(users) = kpis.new_users {
                println!("New users:      {users}");
            }
            println!("Upcoming trips: {}", kpis.upcoming_trips);
            println!("Recent orders:");
            for order in &kpis.recent_orders {
                println!(
                    "  #{} {} {:.2}",
                    order.id,
                    order.status.as_deref().unwrap_or("-"),
                    order.total_amount.unwrap_or(0.0)
                );
            }
        }
        Command::Routes => {
            for route in RoutesScreen::new(state).list().await? {
                println!(
                    "#{} {} [{}]",
                    route.id,
                    route.label(),
                    if route.active.unwrap_or(false) {
                        "active"
                    } else {
                        "inactive"
                    }
                );
            }
        }
        Command::Trips => {
            for trip in TripsScreen::new(state).list().await? {
                println!(
                    "#{} {} departs {}",
                    trip.id,
                    trip.vehicle_no.as_deref().unwrap_or("-"),
                    trip.departure_time
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_else(|| "-".into())
                );
            }
        }
        Command::Schedules { preview, days, q } => {
            let schedules_list = SchedulesScreen::new(state).list().await?;
            let filter = ScheduleFilter {
                q,
                ..Default::default()
            };
            for schedule in schedules_list.iter().filter(|s| filter.matches(s)) {
                println!(
                    "#{} route {} {} at {} [{:?}]",
                    schedule.id,
                    schedule.route_id,
                    schedule.vehicle_no,
                    schedule.depart_hm,
                    schedule.freq
                );
            }
            if let Some(id) = preview {
                let schedule = schedules_list
                    .iter()
                    .find(|s| s.id == id)
                    .context("schedule not found in listing")?;
                println!("Next departures:");
                for occurrence in
                    schedules::preview_occurrences(schedule, Utc::now().date_naive(), days)
                {
                    println!("  {occurrence}");
                }
            }
        }
        Command::Seatmap { template_id } => {
            let screen = SeatTemplatesScreen::new(state);
            let (template, editor) = screen.open_editor(template_id).await?;
            println!(
                "Template #{} {}",
                template.id,
                template.name.as_deref().unwrap_or("-")
            );
            print!("{}", editor.grid().render_text());
        }
        Command::TripSeatmap { trip_id } => {
            let screen = TripSeatmapScreen::new(state);
            let carriages = screen.carriages(trip_id).await?;
            if carriages.is_empty() {
                bail!("trip {trip_id} has no carriages");
            }
            for (index, carriage) in carriages.iter().enumerate() {
                let seatmap = screen.load_carriage(carriage).await?;
                println!(
                    "{}: {}/{} sold, {} vip",
                    carriage.display_name(index),
                    seatmap.summary.sold,
                    seatmap.summary.total,
                    seatmap.summary.vip
                );
                print!("{}", seatmap.grid.render_text());
            }
        }
        Command::Orders { id, page, limit } => {
            let screen = OrdersScreen::new(state);
            match id {
                Some(id) => {
                    let order = screen.detail(id).await?;
                    println!(
                        "Order #{} {} total {:.2}",
                        order.id,
                        order.status.as_deref().unwrap_or("-"),
                        order.total_amount.unwrap_or(0.0)
                    );
                    for item in &order.items {
                        println!(
                            "  item #{} trip {:?} seat {}",
                            item.id,
                            item.trip_id,
                            item.seat_code.as_deref().unwrap_or("-")
                        );
                    }
                    let breakdown = PaymentBreakdown::from_order(&order);
                    if let Some(capture) = &breakdown.capture_id {
                        println!(
                            "  capture {} gross {} fee {} net {}",
                            capture,
                            breakdown.gross.as_deref().unwrap_or("-"),
                            breakdown.fee.as_deref().unwrap_or("-"),
                            breakdown.net.as_deref().unwrap_or("-")
                        );
                    }
                }
                None => {
                    // Бэкенд отдаёт заказы целиком, страницы режем на клиенте.
                    let orders = screen.list().await?;
                    let current = table::paginate(&orders, page, limit);
                    println!(
                        "page {}/{} ({} orders)",
                        current.page,
                        current.page_count(),
                        current.total
                    );
                    for order in &current.items {
                        println!(
                            "#{} {} {:.2}",
                            order.id,
                            order.status.as_deref().unwrap_or("-"),
                            order.total_amount.unwrap_or(0.0)
                        );
                    }
                }
            }
        }
        Command::Tickets {
            status,
            trip_id,
            q,
            page,
            limit,
        } => {
            let query = TicketQuery {
                page: Some(page),
                limit: Some(limit),
                status,
                trip_id,
                q,
                ..Default::default()
            };
            let result = TicketsScreen::new(state).list(&query).await?;
            println!("{} tickets total", result.total);
            for ticket in &result.items {
                println!(
                    "#{} {} trip {:?} seat {}",
                    ticket.id,
                    ticket.status.as_deref().unwrap_or("-"),
                    ticket.resolved_trip_id(),
                    ticket.resolved_seat_code().unwrap_or("-")
                );
            }
        }
        Command::Support {
            status,
            email,
            q,
            page,
            limit,
            id,
            set_status,
        } => {
            let screen = SupportScreen::new(state);
            if let (Some(id), Some(new_status)) = (id, set_status.as_deref()) {
                screen.set_status(id, new_status).await?;
                println!("request #{id} set to {new_status}");
            } else {
                let query = SupportQuery {
                    page: Some(page),
                    limit: Some(limit),
                    status,
                    email,
                    q,
                    ..Default::default()
                };
                let result = screen.list(&query).await?;
                println!("{} requests total", result.total);
                for request in &result.items {
                    println!(
                        "#{} {} <{}> {} [{}]",
                        request.id,
                        request.author_name(),
                        request.author_email(),
                        request.subject.as_deref().unwrap_or("-"),
                        request.status.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Command::Users => {
            for user in UsersScreen::new(state).list().await? {
                println!(
                    "#{} {} <{}> {}",
                    user.id,
                    user.full_name.as_deref().unwrap_or("-"),
                    user.email,
                    user.role.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

async fn login(state: &Arc<AppState>) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        state.config.auth.email.clone(),
        state.config.auth.password.clone(),
    ) else {
        bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set");
    };
    let user = state
        .session
        .login(&email, &password)
        .await
        .context("login failed")?;
    state.session.require_role("admin")?;
    info!("session opened for {}", user.email);
    Ok(())
}
