//! Common types used across the application.

pub mod policy;

pub use policy::{ShiftPolicy, UNCATEGORIZED_LABEL, UnmappedCategoryPolicy};
