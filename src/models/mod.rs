pub mod order;
pub mod route;
pub mod schedule;
pub mod seat;
pub mod support;
pub mod ticket;
pub mod trip;
pub mod user;

pub use order::{Order, OrderItem, Payment};
pub use route::Route;
pub use schedule::{Frequency, ScheduleExceptions, ScheduleStatus, TripSchedule};
pub use seat::{SeatClass, SeatTemplate, SeatTemplateBundle, TemplateMeta, TemplateSeat, TripSeatRecord};
pub use support::SupportRequest;
pub use ticket::Ticket;
pub use trip::{Carriage, Trip};
pub use user::User;

use serde::Deserialize;

/// Коллекции бэкенд отдаёт в разных конвертах: `{items: []}`, `{trips: []}`,
/// `{users: []}` или просто голый массив. Этот тип принимает любой из них.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Wrapped(ListingEnvelope<T>),
    Bare(Vec<T>),
}

#[derive(Debug, Deserialize)]
pub struct ListingEnvelope<T> {
    #[serde(
        alias = "trips",
        alias = "users",
        alias = "carriages",
        alias = "tickets",
        alias = "routes",
        alias = "seats"
    )]
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped(envelope) => envelope.items,
            Listing::Bare(items) => items,
        }
    }
}
