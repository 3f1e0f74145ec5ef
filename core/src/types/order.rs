use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{null_as_default, Metadata, User};

/// Response to `GET /projects/{id}/orders` and `GET /users/{id}/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListOrderResponse {
    pub meta: Option<Metadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
}

/// An order placed by a supporter on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(rename = "absolute_url")]
    pub url: Option<String>,
    #[serde(rename = "order_subtotal")]
    pub subtotal: Option<f64>,
    #[serde(rename = "order_total")]
    pub total: Option<f64>,
    #[serde(rename = "order_shipping_total")]
    pub shipping_total: Option<f64>,
    pub payment_method: Option<String>,
    pub status: Option<OrderStatus>,
    pub status_display: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    pub user: Option<User>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub project_id: Option<u64>,
}

/// One line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub unit_price: Option<f64>,
    pub quantity: Option<u32>,
    pub reward_id: Option<u64>,
    pub line_total: Option<f64>,
    pub line_subtotal: Option<f64>,
    pub line_shipping_total: Option<f64>,
}

/// A postal address attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: u64,
    pub user_id: Option<u64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub phone_number: Option<String>,
    pub entity_name: Option<String>,
}

/// Order status, sent on the wire as an integer code.
///
/// Codes outside the documented set decode to `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum OrderStatus {
    Processing,
    SelectingPayment,
    Awaiting,
    Completed,
    Shipped,
    Cancelled,
    PaymentDone,
    PaymentAborted,
    Invalid,
    PaymentReimbursedToWallet,
    PaymentReimbursed,
    Error,
    Unknown(i64),
}

impl OrderStatus {
    pub fn code(&self) -> i64 {
        match self {
            OrderStatus::Processing => 1,
            OrderStatus::SelectingPayment => 2,
            OrderStatus::Awaiting => 3,
            OrderStatus::Completed => 4,
            OrderStatus::Shipped => 5,
            OrderStatus::Cancelled => 6,
            OrderStatus::PaymentDone => 7,
            OrderStatus::PaymentAborted => 8,
            OrderStatus::Invalid => 9,
            OrderStatus::PaymentReimbursedToWallet => 10,
            OrderStatus::PaymentReimbursed => 11,
            OrderStatus::Error => 12,
            OrderStatus::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::SelectingPayment => "selecting-payment",
            OrderStatus::Awaiting => "awaiting",
            OrderStatus::Completed => "completed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::PaymentDone => "payment-done",
            OrderStatus::PaymentAborted => "payment-aborted",
            OrderStatus::Invalid => "invalid",
            OrderStatus::PaymentReimbursedToWallet => "reimbursed-to-wallet",
            OrderStatus::PaymentReimbursed => "reimbursed",
            OrderStatus::Error => "error",
            OrderStatus::Unknown(_) => "unknown",
        }
    }
}

impl From<i64> for OrderStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => OrderStatus::Processing,
            2 => OrderStatus::SelectingPayment,
            3 => OrderStatus::Awaiting,
            4 => OrderStatus::Completed,
            5 => OrderStatus::Shipped,
            6 => OrderStatus::Cancelled,
            7 => OrderStatus::PaymentDone,
            8 => OrderStatus::PaymentAborted,
            9 => OrderStatus::Invalid,
            10 => OrderStatus::PaymentReimbursedToWallet,
            11 => OrderStatus::PaymentReimbursed,
            12 => OrderStatus::Error,
            other => OrderStatus::Unknown(other),
        }
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}
