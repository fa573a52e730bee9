//! Time control for a single `go`.

use std::time::Duration;

use crate::board::{Color, SearchConfig};

/// Fraction of the remaining clock spent on one move
pub const MOVES_TO_GO: u32 = 40;

/// Time control settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// Infinite search - no time limit, runs until stopped
    #[default]
    Infinite,
    /// Fixed depth search - no time limit
    Depth(u32),
    /// Fixed time per move
    MoveTime(Duration),
    /// Remaining clock and increment for both sides
    Incremental {
        white_time: Duration,
        black_time: Duration,
        white_inc: Duration,
        black_inc: Duration,
    },
}

impl TimeControl {
    /// Create a fixed move time control from milliseconds.
    #[must_use]
    pub fn move_time_ms(time_ms: u64) -> Self {
        TimeControl::MoveTime(Duration::from_millis(time_ms))
    }

    /// Clock and increment in milliseconds, as sent by `go wtime ... binc ...`.
    #[must_use]
    pub fn incremental_ms(white_time: u64, black_time: u64, white_inc: u64, black_inc: u64) -> Self {
        TimeControl::Incremental {
            white_time: Duration::from_millis(white_time),
            black_time: Duration::from_millis(black_time),
            white_inc: Duration::from_millis(white_inc),
            black_inc: Duration::from_millis(black_inc),
        }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite | TimeControl::Depth(_))
    }

    /// Thinking time for `side`: the fixed move time, or a fortieth of the remaining
    /// clock plus half the increment. `None` when the search is not timed.
    #[must_use]
    pub fn budget(&self, side: Color) -> Option<Duration> {
        match *self {
            TimeControl::Infinite | TimeControl::Depth(_) => None,
            TimeControl::MoveTime(time) => Some(time),
            TimeControl::Incremental {
                white_time,
                black_time,
                white_inc,
                black_inc,
            } => {
                let (remaining, inc) = match side {
                    Color::White => (white_time, white_inc),
                    Color::Black => (black_time, black_inc),
                };
                Some(remaining / MOVES_TO_GO + inc / 2)
            }
        }
    }

    /// Search limits for `side` to move under this time control.
    #[must_use]
    pub fn search_config(&self, side: Color) -> SearchConfig {
        let config = match *self {
            TimeControl::Depth(depth) => SearchConfig::depth(depth),
            _ => SearchConfig::default(),
        };
        match self.budget(side) {
            Some(budget) => config.with_time(budget),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_control_infinite_is_unlimited() {
        assert!(TimeControl::Infinite.is_unlimited());
        assert!(TimeControl::Depth(6).is_unlimited());
        assert_eq!(TimeControl::Infinite.budget(Color::White), None);
        assert_eq!(TimeControl::default(), TimeControl::Infinite);
    }

    #[test]
    fn movetime_budget_is_exact() {
        let tc = TimeControl::move_time_ms(1500);
        assert!(!tc.is_unlimited());
        assert_eq!(tc.budget(Color::Black), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn incremental_budget_uses_own_clock() {
        let tc = TimeControl::incremental_ms(60_000, 20_000, 2_000, 0);
        assert_eq!(tc.budget(Color::White), Some(Duration::from_millis(1_500 + 1_000)));
        assert_eq!(tc.budget(Color::Black), Some(Duration::from_millis(500)));
    }

    #[test]
    fn search_config_carries_depth_and_budget() {
        let depth = TimeControl::Depth(7).search_config(Color::White);
        assert_eq!(depth.max_depth, Some(7));
        assert_eq!(depth.time_limit, None);

        let timed = TimeControl::move_time_ms(250).search_config(Color::White);
        assert_eq!(timed.max_depth, None);
        assert_eq!(timed.time_limit, Some(Duration::from_millis(250)));
    }
}
