pub mod event;

pub use event::{HttpEvent, HttpResponse, AUTH_TOKEN_HEADER};
