//! Stand-up statistics.
//!
//! Stored at `<data dir>/stats.json`:
//!
//! ```json
//! {
//!   "streak": 2,
//!   "best_streak": 5,
//!   "days": {
//!     "2026-10-16": { "prompts": 4, "completed": 2, "snoozed": 1, "best_streak": 2 }
//!   }
//! }
//! ```
//!
//! Each recorded event is a full read-modify-write of the document keyed by
//! the current local date. Calls are expected to be strictly sequential.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::store::{lenient, JsonStore, Result};

/// File name of the statistics document.
pub const STATS_FILE: &str = "stats.json";

/// Date format of the `days` keys.
const DAY_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Records
// ============================================================================

/// Counters for a single calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayTally {
    /// Stand prompts shown
    #[serde(deserialize_with = "lenient::count")]
    pub prompts: u32,
    /// Prompts acknowledged with "I moved"
    #[serde(deserialize_with = "lenient::count")]
    pub completed: u32,
    /// Snoozes
    #[serde(deserialize_with = "lenient::count")]
    pub snoozed: u32,
    /// Highest streak reached on this day
    #[serde(deserialize_with = "lenient::count")]
    pub best_streak: u32,
}

/// The whole statistics document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    /// Current run of acknowledged prompts
    #[serde(deserialize_with = "lenient::count")]
    pub streak: u32,
    /// Highest streak ever reached
    #[serde(deserialize_with = "lenient::count")]
    pub best_streak: u32,
    /// Per-day counters keyed by local `YYYY-MM-DD`; malformed days are skipped
    #[serde(deserialize_with = "lenient::entries")]
    pub days: BTreeMap<String, DayTally>,
}

impl StatsRecord {
    /// Returns the tally for `day`, or zeros.
    pub fn day(&self, day: NaiveDate) -> DayTally {
        self.days.get(&day_key(day)).copied().unwrap_or_default()
    }

    fn day_mut(&mut self, day: NaiveDate) -> &mut DayTally {
        self.days.entry(day_key(day)).or_default()
    }

    /// Sums every day into an all-time tally.
    pub fn totals(&self) -> DayTally {
        self.days.values().fold(
            DayTally {
                best_streak: self.best_streak,
                ..DayTally::default()
            },
            |mut acc, day| {
                acc.prompts += day.prompts;
                acc.completed += day.completed;
                acc.snoozed += day.snoozed;
                acc
            },
        )
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

// ============================================================================
// StatsSummary
// ============================================================================

/// Derived view used by the menu and the `stats` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    /// Today's counters
    pub today: DayTally,
    /// All-time counters
    pub all_time: DayTally,
    /// Current streak
    pub streak: u32,
    /// Best streak ever
    pub best_streak: u32,
    /// Number of distinct days with data
    pub days_tracked: usize,
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Today:    {} prompts, {} stood up, {} snoozed",
            self.today.prompts, self.today.completed, self.today.snoozed
        )?;
        writeln!(
            f,
            "All time: {} prompts, {} stood up, {} snoozed over {} day(s)",
            self.all_time.prompts, self.all_time.completed, self.all_time.snoozed, self.days_tracked
        )?;
        write!(f, "Streak:   {} (best {})", self.streak, self.best_streak)
    }
}

// ============================================================================
// StatsTracker
// ============================================================================

type DateSource = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Records stand-up events into the statistics document.
pub struct StatsTracker {
    store: JsonStore,
    today: DateSource,
}

impl StatsTracker {
    /// Creates a tracker for the document at `path`, dated by the local clock.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_date_source(path, || Local::now().date_naive())
    }

    /// Opens `stats.json` inside the data directory.
    pub fn open_in(dir: impl Into<PathBuf>) -> Self {
        Self::open(dir.into().join(STATS_FILE))
    }

    /// Creates a tracker with a custom notion of "today".
    pub fn with_date_source(
        path: impl Into<PathBuf>,
        today: impl Fn() -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        Self {
            store: JsonStore::new(path),
            today: Box::new(today),
        }
    }

    /// Loads the current document.
    pub fn snapshot(&self) -> StatsRecord {
        self.store.load()
    }

    /// Builds the summary for today.
    pub fn summary(&self) -> StatsSummary {
        let record = self.snapshot();
        StatsSummary {
            today: record.day((self.today)()),
            all_time: record.totals(),
            streak: record.streak,
            best_streak: record.best_streak,
            days_tracked: record.days.len(),
        }
    }

    /// Counts a stand prompt.
    pub fn record_prompt(&self) -> Result<StatsRecord> {
        self.modify(|record, today| record.day_mut(today).prompts += 1)
    }

    /// Counts an acknowledged prompt and extends the streak.
    ///
    /// Returns the new streak.
    pub fn record_completed(&self) -> Result<u32> {
        let record = self.modify(|record, today| {
            record.streak += 1;
            let streak = record.streak;
            record.best_streak = record.best_streak.max(streak);

            let day = record.day_mut(today);
            day.completed += 1;
            day.best_streak = day.best_streak.max(streak);
        })?;
        tracing::info!(streak = record.streak, best = record.best_streak, "Stand-up completed");
        Ok(record.streak)
    }

    /// Counts a snooze. The streak is left alone.
    pub fn record_snoozed(&self) -> Result<StatsRecord> {
        self.modify(|record, today| record.day_mut(today).snoozed += 1)
    }

    /// Resets the current streak to zero.
    pub fn clear_streak(&self) -> Result<StatsRecord> {
        let record = self.modify(|record, _| record.streak = 0)?;
        tracing::info!("Streak cleared");
        Ok(record)
    }

    fn modify(&self, change: impl FnOnce(&mut StatsRecord, NaiveDate)) -> Result<StatsRecord> {
        let mut record: StatsRecord = self.store.load();
        change(&mut record, (self.today)());
        self.store.save(&record)?;
        Ok(record)
    }
}

impl fmt::Debug for StatsTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsTracker")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
