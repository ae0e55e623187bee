//! Query-translation facade for afiliado records.
//!
//! Accepts paginated, filtered, sorted HTTP list requests and translates
//! them into the filter dialect of a PostgREST backing store, then reshapes
//! the store's response (rows plus a `Content-Range` total) into a stable
//! JSON envelope or a streamed CSV export.

pub mod config;
pub mod errors;
pub mod export;
pub mod filtering;
pub mod models;
pub mod routes;
pub mod store;

pub use config::AppConfig;
pub use errors::ApiError;
pub use routes::{AppState, build_state, router};
