// handlers/public.rs - actions open to any caller
//
// GET  ?action=privileges  catalogue, cheapest first
// POST ?action=login       exchange username/password for a token
// POST ?action=order       place an order against a privilege

use serde_json::json;

use crate::api::HttpResponse;
use crate::auth;
use crate::database::models::{AdminCredentials, NewOrder};
use crate::database::StoreConnection;
use crate::error::ApiError;

pub async fn privileges_get(conn: &mut dyn StoreConnection) -> Result<HttpResponse, ApiError> {
    let privileges = conn.list_privileges().await?;
    Ok(HttpResponse::json(200, &json!({ "privileges": privileges })))
}

pub async fn login_post(conn: &mut dyn StoreConnection, credentials: AdminCredentials) -> Result<HttpResponse, ApiError> {
    let Some(admin) = conn.find_admin(&credentials).await? else {
        tracing::warn!("Login failed for username {:?}", credentials.username);
        return Err(ApiError::InvalidCredentials);
    };

    tracing::info!("Admin '{}' logged in", admin.username);
    Ok(HttpResponse::json(
        200,
        &json!({
            "token": auth::issue_token(&admin),
            "username": admin.username,
        }),
    ))
}

/// No existence check on `privilege_id`; the foreign key decides
pub async fn order_post(conn: &mut dyn StoreConnection, order: NewOrder) -> Result<HttpResponse, ApiError> {
    let order_id = conn.create_order(&order).await?;
    tracing::info!("Order {} created for privilege {:?}", order_id, order.privilege_id);
    Ok(HttpResponse::json(
        201,
        &json!({
            "order_id": order_id,
            "message": "Order created",
        }),
    ))
}
