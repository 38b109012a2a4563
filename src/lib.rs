//! Local Library catalog server
//!
//! Manages authors, genres and book copies through server-rendered form
//! workflows: list, detail, validated create and update, and guarded delete.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub renderer: Arc<dyn render::Renderer>,
}
