//src/lib.rs

pub mod common;
pub mod config;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use config::{AppConfig, AppState};
