pub mod admin;
pub mod coerce;
pub mod order;
pub mod privilege;

pub use admin::{AdminCredentials, AdminSummary};
pub use order::{NewOrder, OrderStatusUpdate, OrderSummary, DEFAULT_ORDER_STATUS};
pub use privilege::{NewPrivilege, Privilege};
