//! Data ingestion layer for the Enron event summary.
//!
//! Responsible for reading the event-history CSV into expanded events and
//! for grouping them into per-person totals and monthly series.

pub mod aggregator;
pub mod reader;

pub use summary_core as core;
