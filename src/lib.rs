//! Recency Cache - An in-process LRU cache with lazy TTL expiry
//!
//! The [`cache`] module holds the cache itself; [`api`] is a thin HTTP
//! layer exposing add/fetch/rm/dump over it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
