use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tt::DEFAULT_TT_MB;

/// Search tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    /// Null-move depth reduction R; the null search runs at `depth - R - 1`
    pub null_reduction: u32,
    pub null_min_depth: u32,
    /// LMR only above this remaining depth
    pub lmr_min_depth: u32,
    pub delta_margin: i32,
    /// Half-width of the aspiration window around the previous score
    pub aspiration_window: i32,
    /// Aspiration windows are used once the completed depth exceeds this
    pub aspiration_min_depth: u32,
    /// Deadline and stop flag are honoured from this iteration on
    pub interrupt_min_depth: u32,
    /// Total search threads, main thread included
    pub threads: usize,
    pub tt_mb: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_reduction: 2,
            null_min_depth: 3,
            lmr_min_depth: 3,
            delta_margin: 200,
            aspiration_window: 25,
            aspiration_min_depth: 3,
            interrupt_min_depth: 4,
            threads: 1,
            tt_mb: DEFAULT_TT_MB,
        }
    }
}

/// Limits for one search call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum depth to search (None = unlimited, capped at 64)
    pub max_depth: Option<u32>,
    /// Time budget; `None` searches until the depth limit or an external stop
    pub time_limit: Option<Duration>,
    /// Overrides `SearchParams::threads` when set
    pub threads: Option<usize>,
}

impl SearchConfig {
    /// Upper bound on iterative deepening depth
    pub const MAX_DEPTH: u32 = 64;

    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Create a time-limited search config
    #[must_use]
    pub fn time(time_limit: Duration) -> Self {
        SearchConfig {
            time_limit: Some(time_limit),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    #[must_use]
    pub fn with_time(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub(crate) fn depth_limit(&self) -> u32 {
        self.max_depth
            .unwrap_or(Self::MAX_DEPTH)
            .clamp(1, Self::MAX_DEPTH)
    }
}
