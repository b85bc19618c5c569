//! Admin tokens.
//!
//! A token is the string `"<admin_id>:<username>"`. It is not signed and does
//! not expire: every protected request looks the pair up in `admins` again.

use crate::api::{HttpEvent, AUTH_TOKEN_HEADER};
use crate::database::models::AdminSummary;
use crate::database::{DatabaseError, StoreConnection};

const SEPARATOR: char = ':';

/// Token handed out by a successful login
pub fn issue_token(admin: &AdminSummary) -> String {
    format!("{}{}{}", admin.id, SEPARATOR, admin.username)
}

/// Split a token into `(id, username)`.
///
/// Exactly one separator is accepted and the id must be an integer;
/// anything else is malformed.
pub fn parse_token(token: &str) -> Option<(i32, &str)> {
    let (id, username) = token.split_once(SEPARATOR)?;
    if username.contains(SEPARATOR) {
        return None;
    }
    let id = id.parse::<i32>().ok()?;
    Some((id, username))
}

/// True when the event carries a token matching an existing admin
pub async fn check_auth(conn: &mut dyn StoreConnection, event: &HttpEvent) -> Result<bool, DatabaseError> {
    let Some(token) = event.header(AUTH_TOKEN_HEADER) else {
        tracing::debug!("Auth check failed: no token");
        return Ok(false);
    };

    let Some((id, username)) = parse_token(token) else {
        tracing::debug!("Auth check failed: malformed token");
        return Ok(false);
    };

    let known = conn.admin_exists(id, username).await?;
    if !known {
        tracing::warn!("Auth check failed: no admin {} with username '{}'", id, username);
    }
    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Store;
    use crate::testing::MemoryStore;

    #[test]
    fn token_round_trips_through_parse() {
        let admin = AdminSummary { id: 12, username: "moder".to_string() };
        let token = issue_token(&admin);
        assert_eq!(token, "12:moder");
        assert_eq!(parse_token(&token), Some((12, "moder")));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(parse_token(""), None);
        assert_eq!(parse_token("12moder"), None);
        assert_eq!(parse_token("abc:moder"), None);
        assert_eq!(parse_token("1:moder:extra"), None);
        assert_eq!(parse_token(":moder"), None);
    }

    #[tokio::test]
    async fn check_auth_requires_matching_admin_row() {
        let store = MemoryStore::new();
        let id = store.seed_admin("root", "hunter2");
        let mut conn = store.connect().await.unwrap();

        let valid = HttpEvent::new("GET", "orders").with_header("x-auth-token", &format!("{}:root", id));
        assert!(check_auth(conn.as_mut(), &valid).await.unwrap());

        let upper = HttpEvent::new("GET", "orders").with_header("X-AUTH-TOKEN", &format!("{}:root", id));
        assert!(check_auth(conn.as_mut(), &upper).await.unwrap());

        let wrong_name = HttpEvent::new("GET", "orders").with_header("X-Auth-Token", &format!("{}:admin", id));
        assert!(!check_auth(conn.as_mut(), &wrong_name).await.unwrap());

        let wrong_id = HttpEvent::new("GET", "orders").with_header("X-Auth-Token", &format!("{}:root", id + 100));
        assert!(!check_auth(conn.as_mut(), &wrong_id).await.unwrap());

        let missing = HttpEvent::new("GET", "orders");
        assert!(!check_auth(conn.as_mut(), &missing).await.unwrap());

        let empty = HttpEvent::new("GET", "orders").with_header("X-Auth-Token", "");
        assert!(!check_auth(conn.as_mut(), &empty).await.unwrap());
    }
}
