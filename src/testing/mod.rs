//! In-memory store used by unit and integration tests, and by `invoke --memory`.
//!
//! It keeps the same ordering rules and constraints as `sql/schema.sql` so the
//! router behaves identically against it.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::database::models::{
    AdminCredentials, AdminSummary, NewOrder, NewPrivilege, OrderStatusUpdate, OrderSummary, Privilege,
    DEFAULT_ORDER_STATUS,
};
use crate::database::{DatabaseError, Store, StoreConnection};

#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: i32,
    pub privilege_id: i32,
    pub nickname: String,
    pub email: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: i32,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
struct Tables {
    privileges: Vec<Privilege>,
    orders: Vec<OrderRow>,
    admins: Vec<AdminRow>,
    next_id: i32,
}

impl Tables {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared handle; clones see the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panicking test can poison the lock; the tables stay usable.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn seed_admin(&self, username: &str, password: &str) -> i32 {
        let mut tables = self.lock();
        let id = tables.allocate_id();
        tables.admins.push(AdminRow {
            id,
            username: username.to_string(),
            password: password.to_string(),
        });
        id
    }

    pub fn seed_privilege(&self, name: &str, price: i32, features: &[&str]) -> i32 {
        let mut tables = self.lock();
        let id = tables.allocate_id();
        tables.privileges.push(Privilege {
            id,
            name: name.to_string(),
            description: Some(format!("{} tier", name)),
            price,
            features: features.iter().map(|f| f.to_string()).collect(),
            duration: Some("30 days".to_string()),
        });
        id
    }

    /// Insert an order with an explicit creation time
    pub fn seed_order(&self, privilege_id: i32, nickname: &str, created_at: NaiveDateTime) -> i32 {
        let mut tables = self.lock();
        let id = tables.allocate_id();
        tables.orders.push(OrderRow {
            id,
            privilege_id,
            nickname: nickname.to_string(),
            email: String::new(),
            status: DEFAULT_ORDER_STATUS.to_string(),
            created_at,
        });
        id
    }

    pub fn order(&self, id: i32) -> Option<OrderRow> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn connect(&self) -> Result<Box<dyn StoreConnection>, DatabaseError> {
        Ok(Box::new(self.clone()))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

fn required<'a, T>(value: &'a Option<T>, column: &str) -> Result<&'a T, DatabaseError> {
    value
        .as_ref()
        .ok_or_else(|| DatabaseError::Constraint(format!("null value in column \"{}\"", column)))
}

#[async_trait]
impl StoreConnection for MemoryStore {
    async fn list_privileges(&mut self) -> Result<Vec<Privilege>, DatabaseError> {
        let mut privileges = self.lock().privileges.clone();
        privileges.sort_by_key(|p| (p.price, p.id));
        Ok(privileges)
    }

    async fn list_orders(&mut self) -> Result<Vec<OrderSummary>, DatabaseError> {
        let tables = self.lock();
        let mut orders: Vec<OrderSummary> = tables
            .orders
            .iter()
            .filter_map(|o| {
                let privilege = tables.privileges.iter().find(|p| p.id == o.privilege_id)?;
                Some(OrderSummary {
                    id: o.id,
                    nickname: o.nickname.clone(),
                    email: o.email.clone(),
                    status: o.status.clone(),
                    created_at: o.created_at,
                    privilege_name: privilege.name.clone(),
                    price: privilege.price,
                })
            })
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn list_admins(&mut self) -> Result<Vec<AdminSummary>, DatabaseError> {
        let mut admins: Vec<AdminSummary> = self
            .lock()
            .admins
            .iter()
            .map(|a| AdminSummary { id: a.id, username: a.username.clone() })
            .collect();
        admins.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(admins)
    }

    async fn find_admin(&mut self, credentials: &AdminCredentials) -> Result<Option<AdminSummary>, DatabaseError> {
        let (Some(username), Some(password)) = (&credentials.username, &credentials.password) else {
            return Ok(None);
        };
        Ok(self
            .lock()
            .admins
            .iter()
            .find(|a| &a.username == username && &a.password == password)
            .map(|a| AdminSummary { id: a.id, username: a.username.clone() }))
    }

    async fn admin_exists(&mut self, id: i32, username: &str) -> Result<bool, DatabaseError> {
        Ok(self.lock().admins.iter().any(|a| a.id == id && a.username == username))
    }

    async fn create_order(&mut self, order: &NewOrder) -> Result<i32, DatabaseError> {
        let privilege_id = *required(&order.privilege_id, "privilege_id")?;
        let nickname = required(&order.nickname, "nickname")?.clone();

        let mut tables = self.lock();
        if !tables.privileges.iter().any(|p| p.id == privilege_id) {
            return Err(DatabaseError::Constraint(format!(
                "privilege {} referenced by order does not exist",
                privilege_id
            )));
        }
        let id = tables.allocate_id();
        tables.orders.push(OrderRow {
            id,
            privilege_id,
            nickname,
            email: order.email.clone(),
            status: DEFAULT_ORDER_STATUS.to_string(),
            created_at: Utc::now().naive_utc(),
        });
        Ok(id)
    }

    async fn create_privilege(&mut self, privilege: &NewPrivilege) -> Result<i32, DatabaseError> {
        let name = required(&privilege.name, "name")?.clone();
        let price = *required(&privilege.price, "price")?;

        let mut tables = self.lock();
        let id = tables.allocate_id();
        tables.privileges.push(Privilege {
            id,
            name,
            description: privilege.description.clone(),
            price,
            features: privilege.features.clone(),
            duration: privilege.duration.clone(),
        });
        Ok(id)
    }

    async fn create_admin(&mut self, admin: &AdminCredentials) -> Result<i32, DatabaseError> {
        let username = required(&admin.username, "username")?.clone();
        let password = required(&admin.password, "password")?.clone();

        let mut tables = self.lock();
        if tables.admins.iter().any(|a| a.username == username) {
            return Err(DatabaseError::Constraint(format!("admin \"{}\" already exists", username)));
        }
        let id = tables.allocate_id();
        tables.admins.push(AdminRow { id, username, password });
        Ok(id)
    }

    async fn update_order_status(&mut self, update: &OrderStatusUpdate) -> Result<u64, DatabaseError> {
        let Some(order_id) = update.order_id else {
            return Ok(0);
        };

        // NOT NULL only fires on a row that actually matches
        let mut tables = self.lock();
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == order_id) else {
            return Ok(0);
        };
        order.status = required(&update.status, "status")?.clone();
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_update_without_status_only_fails_on_matching_row() {
        let store = MemoryStore::new();
        let privilege = store.seed_privilege("Vip", 290, &[]);
        let order = store.seed_order(privilege, "Jeb", Utc::now().naive_utc());
        let mut conn = store.connect().await.unwrap();

        let unknown = OrderStatusUpdate { order_id: Some(order + 100), status: None };
        assert_eq!(conn.update_order_status(&unknown).await.unwrap(), 0);

        let known = OrderStatusUpdate { order_id: Some(order), status: None };
        assert!(matches!(
            conn.update_order_status(&known).await,
            Err(DatabaseError::Constraint(_))
        ));
        assert_eq!(store.order(order).unwrap().status, DEFAULT_ORDER_STATUS);
    }
}
