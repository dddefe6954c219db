//! Shelfmark Library Server
//!
//! A REST JSON API for managing a small library: shelves, the racks
//! they hold and the books on those racks, plus the borrow / return /
//! reissue lifecycle for member accounts. Each shelf gets a QR code
//! image pointing at its public detail page.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
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
