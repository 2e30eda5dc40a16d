use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How sent and received volumes are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    /// Every expanded (sender, recipient) event counts once.
    #[default]
    Events,
    /// Distinct message ids are counted, so a message with many recipients
    /// counts once for its sender.
    Messages,
}

/// Scale of the monthly unique-contact chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContactScale {
    /// Raw distinct-recipient counts.
    #[default]
    Absolute,
    /// Each sender's share of the month's total across the charted senders.
    Relative,
}

/// A single email delivery: one sender, one recipient, one point in time.
///
/// A raw row with several recipients expands into one `Event` per recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// UTC time the message was sent.
    pub timestamp: DateTime<Utc>,
    /// Identifier of the message the event belongs to.
    pub message_id: String,
    /// Sender identifier, compared exactly.
    pub sender: String,
    /// Recipient identifier, compared exactly.
    pub recipient: String,
}

/// Per-person totals written to the counts table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonStats {
    pub person: String,
    pub sent: u64,
    pub received: u64,
}

/// One month bucket of a [`MonthlySeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCount {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub count: u64,
}

/// A per-person time series over consecutive calendar months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySeries {
    pub person: String,
    pub counts: Vec<MonthlyCount>,
}

impl MonthlySeries {
    /// Sum of all monthly counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}
