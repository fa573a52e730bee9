//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Negamax alpha-beta with null move pruning, LMR and check extensions
//! - Quiescence search with delta and SEE pruning
//! - Move ordering (forced move, TT move, capture/promotion scores, killers, history)
//! - Shared lockless transposition table
//! - Lazy SMP parallel search

mod constants;
mod iterative;
mod move_order;
mod negamax;
mod params;
mod quiescence;
mod smp;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::tt::TranspositionTable;

use super::{Move, MAX_PLY};
use constants::{CLOCK_CHECK_INTERVAL, HISTORY_MAX, KILLER1_SCORE, KILLER2_SCORE};

pub use constants::{HASH_MOVE_SCORE, INFINITY, MATE_SCORE, MATE_THRESHOLD};
pub use move_order::{order_moves, score_move, shuffle_moves};
pub use params::{SearchConfig, SearchParams};
pub use smp::search;

/// Result of a search.
///
/// `best_move == None` together with `depth == 0` means the root had no legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    /// Score from the side to move's point of view
    pub evaluation: i32,
    /// Deepest iteration whose result was accepted
    pub depth: u32,
}

impl SearchOutcome {
    #[must_use]
    pub(crate) fn no_move(evaluation: i32) -> Self {
        SearchOutcome {
            best_move: None,
            evaluation,
            depth: 0,
        }
    }

    #[must_use]
    pub fn is_mate_score(&self) -> bool {
        self.evaluation.abs() >= MATE_THRESHOLD
    }
}

/// Statistics tracked during search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub seldepth: u32,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }
}

/// Two quiet moves per ply that recently caused a beta cutoff.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    /// Shift `mv` in as the first killer unless it already is one.
    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row.contains(&Some(mv)) {
            return;
        }
        row[1] = row[0];
        row[0] = Some(mv);
    }

    #[must_use]
    pub fn score(&self, ply: usize, mv: Move) -> i32 {
        match self.slots.get(ply) {
            Some(row) if row[0] == Some(mv) => KILLER1_SCORE,
            Some(row) if row[1] == Some(mv) => KILLER2_SCORE,
            _ => 0,
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[None; 2]; MAX_PLY];
    }
}

/// From-to table of quiet moves that caused cutoffs, weighted by depth squared.
pub struct HistoryTable {
    entries: [i32; 4096],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable { entries: [0; 4096] }
    }

    #[inline]
    fn index(mv: Move) -> usize {
        mv.from().index() * 64 + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, mv: Move) -> i32 {
        self.entries[Self::index(mv)]
    }

    /// Update history score for a move that caused a beta cutoff
    pub fn update(&mut self, mv: Move, depth: u32) {
        let bonus = i32::try_from(depth * depth).unwrap_or(HISTORY_MAX);
        let entry = &mut self.entries[Self::index(mv)];
        *entry = entry.saturating_add(bonus).min(HISTORY_MAX);
    }

    pub fn reset(&mut self) {
        self.entries = [0; 4096];
    }
}

/// One search thread's private state.
///
/// Killers, history and statistics belong to the worker; the transposition table, the
/// parameters and the stop flag are borrowed and may be shared with other workers.
pub struct SearchWorker<'a> {
    tt: &'a TranspositionTable,
    params: &'a SearchParams,
    stop: &'a AtomicBool,
    deadline: Option<Instant>,
    killers: KillerTable,
    history: HistoryTable,
    stats: SearchStats,
    // set for helper threads, which randomise the root move order
    root_rng: Option<StdRng>,
    // stop flag and deadline are only honoured once this is set
    enforce_limits: bool,
    aborted: bool,
}

impl<'a> SearchWorker<'a> {
    #[must_use]
    pub fn new(tt: &'a TranspositionTable, params: &'a SearchParams, stop: &'a AtomicBool) -> Self {
        SearchWorker {
            tt,
            params,
            stop,
            deadline: None,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            stats: SearchStats::default(),
            root_rng: None,
            enforce_limits: false,
            aborted: false,
        }
    }

    /// Shuffle the root moves with a generator seeded from `seed`.
    #[must_use]
    pub fn with_root_shuffle(mut self, seed: u64) -> Self {
        self.root_rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Whether the current search must unwind. Sticky once it returns true.
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if !self.enforce_limits {
            return false;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.aborted = true;
        } else if self.stats.nodes % CLOCK_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                self.aborted = Instant::now() >= deadline;
            }
        }
        self.aborted
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn note_ply(&mut self, ply: usize) {
        self.stats.seldepth = self.stats.seldepth.max(ply as u32);
    }
}
