//! Report layer for the Enron event summary.
//!
//! Writes the per-person counts table as CSV and renders the monthly
//! distribution line charts as PNG images with [`plotters`], naming every
//! file after the run timestamp.

pub mod chart;
pub mod output;
pub mod table;
pub mod themes;

pub use summary_core as core;
