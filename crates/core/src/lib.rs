//! Core business logic for the fiscal YTD sales metrics engine.
//!
//! This crate contains pure calculation logic with ZERO file, network or terminal dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `fiscal` - Fiscal year calendar and YTD / PYTD / P1YTD windows
//! - `sales` - Sales records and raw-row validation
//! - `metrics` - Per-product aggregation, outer join, deltas and growth
//! - `trends` - Monthly trends and category rollup

pub mod fiscal;
pub mod metrics;
pub mod sales;
pub mod trends;
