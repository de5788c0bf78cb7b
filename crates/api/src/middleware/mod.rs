//! Request middleware, extractors and error plumbing.

pub mod async_handler;
pub mod auth;
pub mod error_handler;

pub use async_handler::forward_errors;
pub use auth::{AdminUser, AuthUser};
pub use error_handler::error_handler;
