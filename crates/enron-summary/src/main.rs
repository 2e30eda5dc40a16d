mod bootstrap;

use anyhow::Result;
use summary_core::formatting::{format_count, percentage};
use summary_core::settings::Settings;
use summary_runtime::pipeline::{SummaryOutcome, SummaryPipeline};

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::ensure_directories(&settings.results_dir, &settings.log_file)?;
    bootstrap::setup_logging(&settings.log_level, &settings.log_file)?;

    tracing::info!("Enron summary v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Top N: {}, Count by: {:?}, Contact scale: {:?}",
        settings.input.display(),
        settings.top_n,
        settings.count_by,
        settings.contact_scale
    );

    let pipeline = SummaryPipeline::new(settings.summary_config());
    let outcome = match pipeline.run() {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Summary run failed: {}", e);
            return Err(e.into());
        }
    };

    print_run_summary(&outcome);
    Ok(())
}

fn print_run_summary(outcome: &SummaryOutcome) {
    let summary = &outcome.summary;
    let totals = &summary.totals;

    println!(
        "{} events, {} people, {} sent, {} received",
        format_count(summary.event_count as u64),
        format_count(totals.people as u64),
        format_count(totals.sent),
        format_count(totals.received)
    );

    if !summary.prolific_senders.is_empty() {
        println!("Most prolific senders:");
        for person in &summary.prolific_senders {
            let sent = summary
                .stats
                .iter()
                .find(|s| &s.person == person)
                .map_or(0, |s| s.sent);
            println!(
                "  {:<40} {:>10}  ({:.1}%)",
                person,
                format_count(sent),
                percentage(sent, totals.sent, 1)
            );
        }
    }

    println!("Wrote {}", outcome.reports.count_stats.display());
    match (&outcome.reports.sent_plot, &outcome.reports.contact_plot) {
        (Some(sent), Some(contact)) => {
            println!("Wrote {}", sent.display());
            println!("Wrote {}", contact.display());
        }
        _ => println!("No prolific senders after exclusions; charts skipped"),
    }
}
