use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::coerce::loose_i32;

/// A purchasable tier, listed publicly by ascending price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Privilege {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub features: Vec<String>,
    pub duration: Option<String>,
}

/// Body of `POST ?action=privilege`. Missing fields are inserted as NULL
/// and left for the schema to accept or reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPrivilege {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Fractional prices round to the nearest integer, as the column cast does
    #[serde(default, deserialize_with = "loose_i32")]
    pub price: Option<i32>,
    #[serde(default)]
    pub features: Vec<String>,
    pub duration: Option<String>,
}
