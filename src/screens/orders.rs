//! Экран заказов: список, детали заказа и разбор платёжной выписки PayPal
//! из сырого payload провайдера.

use std::sync::Arc;

use serde::Deserialize;

use crate::models::{Listing, Order, Payment};
use crate::screens::ScreenError;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct OrderDetailResponse {
    order: Order,
}

pub struct OrdersScreen {
    state: Arc<AppState>,
}

impl OrdersScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<Order>, ScreenError> {
        let listing: Listing<Order> = self.state.api.get("/orders").await?;
        Ok(listing.into_vec())
    }

    pub async fn detail(&self, id: i64) -> Result<Order, ScreenError> {
        let response: OrderDetailResponse =
            self.state.api.get(&format!("/orders/{id}")).await?;
        Ok(response.order)
    }
}

/// Разбор capture из сырого ответа PayPal. Все поля опциональны:
/// старые платежи и другие провайдеры этой структуры не имеют.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentBreakdown {
    pub capture_id: Option<String>,
    pub gross: Option<String>,
    pub fee: Option<String>,
    pub net: Option<String>,
}

impl PaymentBreakdown {
    pub fn from_payment(payment: &Payment) -> Self {
        let Some(raw) = &payment.raw_payload else {
            return Self::default();
        };
        let capture = raw.pointer("/purchase_units/0/payments/captures/0");
        let amount = |path: &str| -> Option<String> {
            capture?
                .pointer(path)?
                .as_str()
                .map(str::to_string)
        };
        Self {
            capture_id: capture
                .and_then(|c| c.get("id"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            gross: amount("/seller_receivable_breakdown/gross_amount/value"),
            fee: amount("/seller_receivable_breakdown/paypal_fee/value"),
            net: amount("/seller_receivable_breakdown/net_amount/value"),
        }
    }

    /// Выписка первого платежа заказа, у которого есть raw payload.
    pub fn from_order(order: &Order) -> Self {
        order
            .payments
            .iter()
            .find(|p| p.raw_payload.is_some())
            .map(Self::from_payment)
            .unwrap_or_default()
    }
}
