//! Shared types, errors, and configuration for the sales YTD engine.
//!
//! This crate provides common pieces used across all other crates:
//! - Window shifting and category policies
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
