//! Shared building blocks for the Enron event summary.
//!
//! Holds the error type, command-line settings, data models, calendar
//! helpers and number formatting used by the data, report and runtime crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, SummaryError};
