pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod server;
pub mod testing;

pub use api::{HttpEvent, HttpResponse};
pub use handlers::handle;
