//! Command-line driver for the sales YTD metrics engine.
//!
//! Loads CSV input, runs the `ytd-core` pipelines, prints tables and
//! optionally exports results for downstream presentation.

pub mod app;
pub mod cli;
pub mod io;
pub mod output;

pub use app::run;
pub use cli::Cli;
