//! Per-person totals, prolific-sender ranking and monthly series.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;
use summary_core::models::{CountMode, Event, MonthlyCount, MonthlySeries, PersonStats};
use summary_core::time_utils::{month_range, month_start};

// ── CountUnit ─────────────────────────────────────────────────────────────────

/// What one "count" stands for under a [`CountMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CountUnit<'a> {
    /// Position of the event in the input slice.
    Event(usize),
    /// Message identifier shared by all recipients of one message.
    Message(&'a str),
}

impl<'a> CountUnit<'a> {
    fn of(idx: usize, event: &'a Event, mode: CountMode) -> Self {
        match mode {
            CountMode::Events => CountUnit::Event(idx),
            CountMode::Messages => CountUnit::Message(event.message_id.as_str()),
        }
    }
}

// ── CountTotals ───────────────────────────────────────────────────────────────

/// Column sums over the counts table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountTotals {
    pub people: usize,
    pub sent: u64,
    pub received: u64,
}

// ── EventAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups events by person and by calendar month.
pub struct EventAggregator;

impl EventAggregator {
    /// Sent and received counts for every identifier seen as sender or
    /// recipient.
    ///
    /// Rows are ordered by `sent` descending, then identifier ascending, so the
    /// output is identical across runs over the same input.
    pub fn person_stats(events: &[Event], mode: CountMode) -> Vec<PersonStats> {
        let mut sent: HashMap<&str, HashSet<CountUnit>> = HashMap::new();
        let mut received: HashMap<&str, HashSet<CountUnit>> = HashMap::new();

        for (idx, event) in events.iter().enumerate() {
            let unit = CountUnit::of(idx, event, mode);
            sent.entry(event.sender.as_str()).or_default().insert(unit);
            received
                .entry(event.recipient.as_str())
                .or_default()
                .insert(unit);
        }

        // Outer join of both sides; a missing side counts as zero.
        let mut people: BTreeMap<&str, PersonStats> = BTreeMap::new();
        for (&person, units) in &sent {
            people
                .entry(person)
                .or_insert_with(|| empty_stats(person))
                .sent = units.len() as u64;
        }
        for (&person, units) in &received {
            people
                .entry(person)
                .or_insert_with(|| empty_stats(person))
                .received = units.len() as u64;
        }

        let mut stats: Vec<PersonStats> = people.into_values().collect();
        stats.sort_by(|a, b| b.sent.cmp(&a.sent).then_with(|| a.person.cmp(&b.person)));
        stats
    }

    /// The `top_n` senders by sent count after dropping excluded identifiers.
    ///
    /// Only persons that sent at least once qualify. Ties are broken by
    /// identifier ascending.
    pub fn prolific_senders(
        stats: &[PersonStats],
        top_n: usize,
        is_excluded: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let mut candidates: Vec<&PersonStats> = stats
            .iter()
            .filter(|s| s.sent > 0 && !is_excluded(&s.person))
            .collect();
        candidates.sort_by(|a, b| b.sent.cmp(&a.sent).then_with(|| a.person.cmp(&b.person)));
        candidates
            .into_iter()
            .take(top_n)
            .map(|s| s.person.clone())
            .collect()
    }

    /// Monthly sent volume for each of `senders`, in the given order.
    pub fn monthly_sent(events: &[Event], senders: &[String], mode: CountMode) -> Vec<MonthlySeries> {
        Self::monthly_distinct(events, senders, |idx, event| CountUnit::of(idx, event, mode))
    }

    /// Number of distinct recipients each of `senders` wrote to, per month.
    pub fn monthly_unique_recipients(events: &[Event], senders: &[String]) -> Vec<MonthlySeries> {
        Self::monthly_distinct(events, senders, |_, event| event.recipient.as_str())
    }

    /// Each series' share of the month's total across all `series`.
    ///
    /// All series must share one month axis, as produced by this aggregator.
    /// A month where every series is zero yields `0.0` for all of them.
    pub fn relative_shares(series: &[MonthlySeries]) -> Vec<Vec<f64>> {
        let months = series.first().map(|s| s.counts.len()).unwrap_or(0);
        let month_totals: Vec<u64> = (0..months)
            .map(|i| {
                series
                    .iter()
                    .filter_map(|s| s.counts.get(i))
                    .map(|c| c.count)
                    .sum()
            })
            .collect();

        series
            .iter()
            .map(|s| {
                s.counts
                    .iter()
                    .zip(&month_totals)
                    .map(|(c, &total)| {
                        if total == 0 {
                            0.0
                        } else {
                            c.count as f64 / total as f64
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Sum up the columns of the counts table.
    pub fn calculate_totals(stats: &[PersonStats]) -> CountTotals {
        stats.iter().fold(
            CountTotals {
                people: stats.len(),
                ..CountTotals::default()
            },
            |mut totals, s| {
                totals.sent += s.sent;
                totals.received += s.received;
                totals
            },
        )
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic monthly driver.
    ///
    /// `key_fn` maps an event to the value counted distinctly per
    /// sender-month. Every returned series spans the same dense month range,
    /// from the first to the last month any of `senders` sent in.
    fn monthly_distinct<'a, K, F>(events: &'a [Event], senders: &[String], key_fn: F) -> Vec<MonthlySeries>
    where
        K: Eq + Hash,
        F: Fn(usize, &'a Event) -> K,
    {
        let wanted: HashSet<&str> = senders.iter().map(String::as_str).collect();
        let mut buckets: HashMap<&str, BTreeMap<NaiveDate, HashSet<K>>> = HashMap::new();
        let mut first: Option<NaiveDate> = None;
        let mut last: Option<NaiveDate> = None;

        for (idx, event) in events.iter().enumerate() {
            if !wanted.contains(event.sender.as_str()) {
                continue;
            }
            let month = month_start(event.timestamp);
            first = Some(first.map_or(month, |f| f.min(month)));
            last = Some(last.map_or(month, |l| l.max(month)));
            buckets
                .entry(event.sender.as_str())
                .or_default()
                .entry(month)
                .or_default()
                .insert(key_fn(idx, event));
        }

        let months = match (first, last) {
            (Some(f), Some(l)) => month_range(f, l),
            _ => Vec::new(),
        };

        senders
            .iter()
            .map(|sender| {
                let per_month = buckets.get(sender.as_str());
                let counts = months
                    .iter()
                    .map(|&month| MonthlyCount {
                        month,
                        count: per_month
                            .and_then(|m| m.get(&month))
                            .map(|set| set.len() as u64)
                            .unwrap_or(0),
                    })
                    .collect();
                MonthlySeries {
                    person: sender.clone(),
                    counts,
                }
            })
            .collect()
    }
}

fn empty_stats(person: &str) -> PersonStats {
    PersonStats {
        person: person.to_string(),
        sent: 0,
        received: 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
