// handlers/mod.rs - request dispatch
//
// Two tiers, selected by (method, action):
// Public (no auth) → Protected (X-Auth-Token checked against admins)

pub mod protected;
pub mod public;

use crate::api::{HttpEvent, HttpResponse};
use crate::auth;
use crate::database::{Store, StoreConnection};
use crate::error::ApiError;

/// Every (method, action) pair the function answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    ListPrivileges,
    ListOrders,
    ListAdmins,
    Login,
    CreateOrder,
    CreatePrivilege,
    CreateAdmin,
    UpdateOrderStatus,
}

impl Route {
    pub fn resolve(method: &str, action: &str) -> Option<Self> {
        let route = match (method, action) {
            ("OPTIONS", _) => Route::Preflight,
            ("GET", "privileges") => Route::ListPrivileges,
            ("GET", "orders") => Route::ListOrders,
            ("GET", "admins") => Route::ListAdmins,
            ("POST", "login") => Route::Login,
            ("POST", "order") => Route::CreateOrder,
            ("POST", "privilege") => Route::CreatePrivilege,
            ("POST", "admin") => Route::CreateAdmin,
            ("PUT", "order_status") => Route::UpdateOrderStatus,
            _ => return None,
        };
        Some(route)
    }

    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Route::ListOrders
                | Route::ListAdmins
                | Route::CreatePrivilege
                | Route::CreateAdmin
                | Route::UpdateOrderStatus
        )
    }
}

/// Run one invocation. Never fails: every error becomes a JSON response.
pub async fn handle(store: &dyn Store, event: HttpEvent) -> HttpResponse {
    let method = event.method();
    let action = event.action().to_string();

    let response = match dispatch(store, &method, &event).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };

    tracing::info!(
        method = %method,
        action = %action,
        status = response.status_code,
        "handled invocation"
    );
    response
}

async fn dispatch(store: &dyn Store, method: &str, event: &HttpEvent) -> Result<HttpResponse, ApiError> {
    let route = Route::resolve(method, event.action()).ok_or(ApiError::NotFound)?;

    // Preflight never touches the store
    if route == Route::Preflight {
        return Ok(HttpResponse::preflight());
    }

    // One connection per invocation; released when `conn` drops on any path
    let mut conn = store.connect().await?;
    run(conn.as_mut(), route, event).await
}

async fn run(conn: &mut dyn StoreConnection, route: Route, event: &HttpEvent) -> Result<HttpResponse, ApiError> {
    if route.requires_auth() && !auth::check_auth(conn, event).await? {
        return Err(ApiError::Unauthorized);
    }

    match route {
        Route::Preflight => Ok(HttpResponse::preflight()),
        Route::ListPrivileges => public::privileges_get(conn).await,
        Route::Login => public::login_post(conn, parse_body(event)?).await,
        Route::CreateOrder => public::order_post(conn, parse_body(event)?).await,
        Route::ListOrders => protected::orders_get(conn).await,
        Route::ListAdmins => protected::admins_get(conn).await,
        Route::CreatePrivilege => protected::privilege_post(conn, parse_body(event)?).await,
        Route::CreateAdmin => protected::admin_post(conn, parse_body(event)?).await,
        Route::UpdateOrderStatus => protected::order_status_put(conn, parse_body(event)?).await,
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(event: &HttpEvent) -> Result<T, ApiError> {
    Ok(serde_json::from_str(event.body_text())?)
}
