use clap::{CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SummaryError};
use crate::models::{ContactScale, CountMode};

/// Broadcast and system mailboxes that are not people.
///
/// They stay in the counts table but never rank as prolific senders.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "announcements",
    "enron announcements",
    "enron general announcements",
    "all enron worldwide",
    "outlook team",
    "chairman of the board",
    "office of the chairman",
    "technology",
];

/// Largest accepted number of prolific senders.
pub const MAX_TOP_N: u32 = 50;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise Enron email event history
#[derive(Parser, Debug, Clone)]
#[command(
    name = "enron-summary",
    about = "Summarise Enron email event history into count tables and monthly charts",
    version
)]
pub struct Settings {
    /// Location of the input event history CSV file
    #[arg(value_name = "ENRON_DATA_FILE")]
    pub input: PathBuf,

    /// Number of prolific senders to chart (1-50)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TOP_N)))]
    pub top_n: u32,

    /// Additional identifier to leave out of the prolific-sender ranking
    #[arg(long = "exclude", value_name = "ID")]
    pub exclude: Vec<String>,

    /// Do not apply the built-in list of broadcast mailboxes
    #[arg(long)]
    pub no_default_exclusions: bool,

    /// Directory receiving the table and chart files
    #[arg(long, default_value = "./results")]
    pub results_dir: PathBuf,

    /// Unit counted for sent and received volumes
    #[arg(long, value_enum, default_value_t = CountMode::Events)]
    pub count_by: CountMode,

    /// Scale of the unique-contact chart
    #[arg(long, value_enum, default_value_t = ContactScale::Absolute)]
    pub contact_scale: ContactScale,

    /// Treat the first CSV row as a header
    #[arg(long)]
    pub has_headers: bool,

    /// JSON profile with default values for the options above
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, default_value = "./logs/processing_log.log")]
    pub log_file: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Exclusion list taken from the profile, replacing the built-in one.
    #[arg(skip)]
    pub profile_exclusions: Option<Vec<String>>,
}

// ── SummaryProfile ─────────────────────────────────────────────────────────────

/// Static defaults read from a JSON profile passed with `--profile`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct SummaryProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_by: Option<CountMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_scale: Option<ContactScale>,
}

impl SummaryProfile {
    /// Load a profile from an explicit path.
    ///
    /// Unlike an implicit settings file, a profile the user named must exist
    /// and parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SummaryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Self =
            serde_json::from_str(&content).map_err(|source| SummaryError::Profile {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(top_n) = profile.top_n.filter(|v| !(1..=MAX_TOP_N).contains(v)) {
            return Err(SummaryError::Config(format!(
                "top_n in {} must be between 1 and {}, got {}",
                path.display(),
                MAX_TOP_N,
                top_n
            )));
        }
        Ok(profile)
    }
}

// ── SummaryConfig ──────────────────────────────────────────────────────────────

/// Resolved, immutable parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    pub input: PathBuf,
    pub top_n: usize,
    pub exclusions: BTreeSet<String>,
    pub results_dir: PathBuf,
    pub count_mode: CountMode,
    pub contact_scale: ContactScale,
    pub has_headers: bool,
}

impl SummaryConfig {
    /// Configuration with the built-in defaults for `input`.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            top_n: 5,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            results_dir: PathBuf::from("./results"),
            count_mode: CountMode::Events,
            contact_scale: ContactScale::Absolute,
            has_headers: false,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn with_count_mode(mut self, mode: CountMode) -> Self {
        self.count_mode = mode;
        self
    }

    pub fn with_contact_scale(mut self, scale: ContactScale) -> Self {
        self.contact_scale = scale;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// `true` when `person` is left out of the prolific-sender ranking.
    pub fn is_excluded(&self, person: &str) -> bool {
        self.exclusions.contains(person)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and merge the optional profile.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    ///
    /// Invalid arguments print clap's usage message and exit, as `parse` does.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        let matches = Settings::command().get_matches_from(args);
        let mut settings = Settings::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

        if let Some(path) = settings.profile.clone() {
            let profile = SummaryProfile::load_from(&path)?;
            settings.apply_profile(profile, &matches);
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Fill fields that were NOT set on the command line from `profile`.
    /// The command line always wins.
    fn apply_profile(&mut self, profile: SummaryProfile, matches: &clap::ArgMatches) {
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(matches, "top_n") {
            if let Some(v) = profile.top_n {
                self.top_n = v;
            }
        }
        if !is_arg_explicitly_set(matches, "results_dir") {
            if let Some(v) = profile.results_dir {
                self.results_dir = v;
            }
        }
        if !is_arg_explicitly_set(matches, "count_by") {
            if let Some(v) = profile.count_by {
                self.count_by = v;
            }
        }
        if !is_arg_explicitly_set(matches, "contact_scale") {
            if let Some(v) = profile.contact_scale {
                self.contact_scale = v;
            }
        }
        self.profile_exclusions = profile.exclusions;
    }

    /// Resolve the exclusion list: profile list or the built-in one (unless
    /// disabled), plus every `--exclude` value.
    pub fn exclusions(&self) -> BTreeSet<String> {
        let mut set: BTreeSet<String> = match &self.profile_exclusions {
            Some(list) => list.iter().cloned().collect(),
            None if self.no_default_exclusions => BTreeSet::new(),
            None => DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        };
        set.extend(self.exclude.iter().cloned());
        set
    }

    /// Build the immutable run configuration.
    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig::new(self.input.clone())
            .with_top_n(self.top_n as usize)
            .with_exclusions(self.exclusions())
            .with_results_dir(self.results_dir.clone())
            .with_count_mode(self.count_by)
            .with_contact_scale(self.contact_scale)
            .with_headers(self.has_headers)
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
