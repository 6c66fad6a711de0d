//! Eqtrack equipment tracker
//!
//! A REST JSON server for checking equipment out and back in, with the
//! current holder of every item derived from its transaction history.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod holder;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
