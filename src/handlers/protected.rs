// handlers/protected.rs - actions behind a valid X-Auth-Token
//
// The router runs the token check before any of these are called.

use serde_json::json;

use crate::api::HttpResponse;
use crate::database::models::{AdminCredentials, NewPrivilege, OrderStatusUpdate};
use crate::database::StoreConnection;
use crate::error::ApiError;

pub async fn orders_get(conn: &mut dyn StoreConnection) -> Result<HttpResponse, ApiError> {
    let orders = conn.list_orders().await?;
    Ok(HttpResponse::json(200, &json!({ "orders": orders })))
}

pub async fn admins_get(conn: &mut dyn StoreConnection) -> Result<HttpResponse, ApiError> {
    let admins = conn.list_admins().await?;
    Ok(HttpResponse::json(200, &json!({ "admins": admins })))
}

pub async fn privilege_post(conn: &mut dyn StoreConnection, privilege: NewPrivilege) -> Result<HttpResponse, ApiError> {
    let id = conn.create_privilege(&privilege).await?;
    tracing::info!("Privilege {} created: {:?}", id, privilege.name);
    Ok(HttpResponse::json(201, &json!({ "id": id })))
}

pub async fn admin_post(conn: &mut dyn StoreConnection, admin: AdminCredentials) -> Result<HttpResponse, ApiError> {
    let id = conn.create_admin(&admin).await?;
    tracing::info!("Admin {} created: {:?}", id, admin.username);
    Ok(HttpResponse::json(201, &json!({ "id": id })))
}

/// Updating an unknown order id is not an error; nothing changes
pub async fn order_status_put(conn: &mut dyn StoreConnection, update: OrderStatusUpdate) -> Result<HttpResponse, ApiError> {
    let touched = conn.update_order_status(&update).await?;
    if touched == 0 {
        tracing::debug!("Status update matched no order: {:?}", update.order_id);
    }
    Ok(HttpResponse::json(200, &json!({ "message": "Status updated" })))
}
