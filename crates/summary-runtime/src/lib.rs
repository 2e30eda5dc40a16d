//! Runtime layer for the Enron event summary.
//!
//! Drives a single batch run: loads the event file, aggregates it, and hands
//! the results to the report layer.

pub mod pipeline;

pub use summary_core as core;
pub use summary_data as data;
