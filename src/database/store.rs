use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Postgres, Row};

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    AdminCredentials, AdminSummary, NewOrder, NewPrivilege, OrderStatusUpdate, OrderSummary, Privilege,
};

/// Source of per-invocation connections
#[async_trait]
pub trait Store: Send + Sync {
    /// Acquire the single connection an invocation runs its statement on.
    /// Dropping the returned handle releases it.
    async fn connect(&self) -> Result<Box<dyn StoreConnection>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// One statement per call, each committed on its own
#[async_trait]
pub trait StoreConnection: Send {
    async fn list_privileges(&mut self) -> Result<Vec<Privilege>, DatabaseError>;

    async fn list_orders(&mut self) -> Result<Vec<OrderSummary>, DatabaseError>;

    async fn list_admins(&mut self) -> Result<Vec<AdminSummary>, DatabaseError>;

    /// Exact username and password match
    async fn find_admin(&mut self, credentials: &AdminCredentials) -> Result<Option<AdminSummary>, DatabaseError>;

    async fn admin_exists(&mut self, id: i32, username: &str) -> Result<bool, DatabaseError>;

    async fn create_order(&mut self, order: &NewOrder) -> Result<i32, DatabaseError>;

    async fn create_privilege(&mut self, privilege: &NewPrivilege) -> Result<i32, DatabaseError>;

    async fn create_admin(&mut self, admin: &AdminCredentials) -> Result<i32, DatabaseError>;

    /// Returns the number of rows touched
    async fn update_order_status(&mut self, update: &OrderStatusUpdate) -> Result<u64, DatabaseError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    manager: DatabaseManager,
}

impl PgStore {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn connect(&self) -> Result<Box<dyn StoreConnection>, DatabaseError> {
        let conn = self.manager.pool().acquire().await?;
        Ok(Box::new(PgStoreConnection { conn }))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }
}

pub struct PgStoreConnection {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreConnection for PgStoreConnection {
    async fn list_privileges(&mut self) -> Result<Vec<Privilege>, DatabaseError> {
        let rows = sqlx::query_as::<_, Privilege>(
            "SELECT id, name, description, price, features, duration FROM privileges ORDER BY price, id",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    async fn list_orders(&mut self) -> Result<Vec<OrderSummary>, DatabaseError> {
        let query = r#"
            SELECT o.id, o.nickname, o.email, o.status, o.created_at,
                   p.name AS privilege_name, p.price
            FROM orders o
            JOIN privileges p ON o.privilege_id = p.id
            ORDER BY o.created_at DESC, o.id DESC
        "#;

        let rows = sqlx::query_as::<_, OrderSummary>(query)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows)
    }

    async fn list_admins(&mut self) -> Result<Vec<AdminSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, AdminSummary>("SELECT id, username FROM admins ORDER BY username")
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows)
    }

    async fn find_admin(&mut self, credentials: &AdminCredentials) -> Result<Option<AdminSummary>, DatabaseError> {
        let row = sqlx::query_as::<_, AdminSummary>(
            "SELECT id, username FROM admins WHERE username = $1 AND password = $2",
        )
        .bind(credentials.username.as_deref())
        .bind(credentials.password.as_deref())
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn admin_exists(&mut self, id: i32, username: &str) -> Result<bool, DatabaseError> {
        let row = sqlx::query("SELECT id FROM admins WHERE id = $1 AND username = $2")
            .bind(id)
            .bind(username)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.is_some())
    }

    async fn create_order(&mut self, order: &NewOrder) -> Result<i32, DatabaseError> {
        let row = sqlx::query("INSERT INTO orders (privilege_id, nickname, email) VALUES ($1, $2, $3) RETURNING id")
            .bind(order.privilege_id)
            .bind(order.nickname.as_deref())
            .bind(&order.email)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(row.try_get("id")?)
    }

    async fn create_privilege(&mut self, privilege: &NewPrivilege) -> Result<i32, DatabaseError> {
        let query = r#"
            INSERT INTO privileges (name, description, price, features, duration)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(privilege.name.as_deref())
            .bind(privilege.description.as_deref())
            .bind(privilege.price)
            .bind(&privilege.features)
            .bind(privilege.duration.as_deref())
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(row.try_get("id")?)
    }

    async fn create_admin(&mut self, admin: &AdminCredentials) -> Result<i32, DatabaseError> {
        let row = sqlx::query("INSERT INTO admins (username, password) VALUES ($1, $2) RETURNING id")
            .bind(admin.username.as_deref())
            .bind(admin.password.as_deref())
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(row.try_get("id")?)
    }

    async fn update_order_status(&mut self, update: &OrderStatusUpdate) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(update.status.as_deref())
            .bind(update.order_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected())
    }
}
