//! Batch summary pipeline.
//!
//! Runs load → aggregate → report once, start to finish, over a single input
//! file. Every step is recomputed from scratch; the only state left behind is
//! the set of timestamped output files.

use std::path::PathBuf;

use chrono::Local;
use summary_core::models::{ContactScale, Event, MonthlySeries, PersonStats};
use summary_core::settings::SummaryConfig;
use summary_core::time_utils::format_run_timestamp;
use summary_core::{Result, SummaryError};
use summary_data::aggregator::{CountTotals, EventAggregator};
use summary_data::reader::load_events;
use summary_report::chart::{
    relative_contact_chart, render_line_chart, sent_volume_chart, unique_contact_chart, LineChart,
};
use summary_report::output::{ensure_results_dir, OutputPaths};
use summary_report::table::write_person_stats;
use summary_report::themes::ChartTheme;
use tracing::{debug, info, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// Aggregated view of one event set, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of expanded events the summary was built from.
    pub event_count: usize,
    /// Counts table rows, sent descending then identifier ascending.
    pub stats: Vec<PersonStats>,
    pub totals: CountTotals,
    /// Top-N non-excluded senders in rank order.
    pub prolific_senders: Vec<String>,
    /// Monthly sent volume per prolific sender.
    pub monthly_sent: Vec<MonthlySeries>,
    /// Monthly distinct-recipient count per prolific sender.
    pub monthly_contacts: Vec<MonthlySeries>,
}

/// Files written by a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReports {
    pub count_stats: PathBuf,
    /// `None` when there was no prolific sender to chart.
    pub sent_plot: Option<PathBuf>,
    /// `None` when there was no prolific sender to chart.
    pub contact_plot: Option<PathBuf>,
}

/// Result of [`SummaryPipeline::run`].
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summary: Summary,
    pub reports: WrittenReports,
}

// ── SummaryPipeline ───────────────────────────────────────────────────────────

/// Sequential driver for one summary run.
pub struct SummaryPipeline {
    config: SummaryConfig,
    theme: ChartTheme,
}

impl SummaryPipeline {
    pub fn new(config: SummaryConfig) -> Self {
        Self {
            config,
            theme: ChartTheme::default(),
        }
    }

    /// Run the whole pipeline, stamping outputs with the current local time.
    pub fn run(&self) -> Result<SummaryOutcome> {
        let run_timestamp = format_run_timestamp(&Local::now());
        self.run_at(&run_timestamp)
    }

    /// Run the whole pipeline with an explicit filename timestamp.
    pub fn run_at(&self, run_timestamp: &str) -> Result<SummaryOutcome> {
        info!("Enron data summarisation: begin");
        if self.config.top_n == 0 {
            return Err(SummaryError::Config("top_n must be at least 1".to_string()));
        }

        debug!("Loading events from {}", self.config.input.display());
        let events = load_events(&self.config.input, self.config.has_headers)?;
        debug!("Loaded {} events", events.len());

        let summary = self.summarise(&events);

        ensure_results_dir(&self.config.results_dir)?;
        let paths = OutputPaths::new(&self.config.results_dir, run_timestamp);
        let reports = self.write_reports(&summary, &paths)?;

        info!("Enron data summarisation: end");
        Ok(SummaryOutcome { summary, reports })
    }

    /// Aggregate `events` into the counts table and monthly series.
    pub fn summarise(&self, events: &[Event]) -> Summary {
        debug!("Generating email count stats: begin");
        let stats = EventAggregator::person_stats(events, self.config.count_mode);
        let totals = EventAggregator::calculate_totals(&stats);
        debug!(
            "Counted {} people, {} sent, {} received",
            totals.people, totals.sent, totals.received
        );

        let prolific_senders = EventAggregator::prolific_senders(&stats, self.config.top_n, |p| {
            self.config.is_excluded(p)
        });
        debug!("Prolific senders: {:?}", prolific_senders);

        let monthly_sent =
            EventAggregator::monthly_sent(events, &prolific_senders, self.config.count_mode);
        for series in &monthly_sent {
            debug!(
                "{}: {} sent over {} months",
                series.person,
                series.total(),
                series.counts.len()
            );
        }
        let monthly_contacts = EventAggregator::monthly_unique_recipients(events, &prolific_senders);
        debug!("Generating email count stats: end");

        Summary {
            event_count: events.len(),
            stats,
            totals,
            prolific_senders,
            monthly_sent,
            monthly_contacts,
        }
    }

    /// Write the table and, when there is someone to chart, both charts.
    pub fn write_reports(&self, summary: &Summary, paths: &OutputPaths) -> Result<WrittenReports> {
        info!("Saving email count stats to the file: {}", paths.count_stats.display());
        write_person_stats(&paths.count_stats, &summary.stats)?;

        if summary.prolific_senders.is_empty() {
            warn!("No prolific senders after exclusions; skipping distribution charts");
            return Ok(WrittenReports {
                count_stats: paths.count_stats.clone(),
                sent_plot: None,
                contact_plot: None,
            });
        }

        let sent_chart = sent_volume_chart(&summary.monthly_sent);
        info!(
            "Saving sent email count distribution plot to the file: {}",
            paths.sent_plot.display()
        );
        render_line_chart(&paths.sent_plot, &sent_chart, &self.theme)?;

        let contact_chart = self.contact_chart(&summary.monthly_contacts);
        info!(
            "Saving unique contact count distribution plot to the file: {}",
            paths.contact_plot.display()
        );
        render_line_chart(&paths.contact_plot, &contact_chart, &self.theme)?;

        Ok(WrittenReports {
            count_stats: paths.count_stats.clone(),
            sent_plot: Some(paths.sent_plot.clone()),
            contact_plot: Some(paths.contact_plot.clone()),
        })
    }

    fn contact_chart(&self, series: &[MonthlySeries]) -> LineChart {
        match self.config.contact_scale {
            ContactScale::Absolute => unique_contact_chart(series),
            ContactScale::Relative => {
                relative_contact_chart(series, EventAggregator::relative_shares(series))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
