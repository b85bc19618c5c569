use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Admin as exposed by listings and login; the password never leaves the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AdminSummary {
    pub id: i32,
    pub username: String,
}

/// Username/password pair, used both for `POST ?action=admin` and login.
/// Passwords are stored and compared as plain text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}
