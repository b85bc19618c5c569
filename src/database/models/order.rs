use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::coerce::loose_i32;

/// Status assigned by the schema default when an order is inserted
pub const DEFAULT_ORDER_STATUS: &str = "pending";

/// Order row joined with the name and price of its privilege
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderSummary {
    pub id: i32,
    pub nickname: String,
    pub email: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub privilege_name: String,
    pub price: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    #[serde(default, deserialize_with = "loose_i32")]
    pub privilege_id: Option<i32>,
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: String,
}

/// Body of `PUT ?action=order_status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderStatusUpdate {
    #[serde(default, deserialize_with = "loose_i32")]
    pub order_id: Option<i32>,
    pub status: Option<String>,
}
