//! Search constants.

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Larger than any reachable score; the initial window bound
pub const INFINITY: i32 = 32_000;

/// Score for being checkmated at the root; a mate found at ply `p` scores `MATE_SCORE - p`
pub const MATE_SCORE: i32 = 30_000;

/// Scores with absolute value >= this are considered checkmate scores
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. Ordered: forced > hash move > captures/killers > quiet

/// Hash move (from transposition table) - highest priority
pub const HASH_MOVE_SCORE: i32 = i32::MAX - 1;

/// Move handed down from the previous iteration at the root
pub const FORCED_MOVE_SCORE: i32 = i32::MAX;

/// First killer move (quiet that caused beta cutoff at same ply)
pub const KILLER1_SCORE: i32 = 2000;

/// Second killer move
pub const KILLER2_SCORE: i32 = 1900;

/// History scores saturate here so they never outrank killers
pub const HISTORY_MAX: i32 = 1000;

// ============================================================================
// EXTENSIONS AND REDUCTIONS
// ============================================================================

/// Check extensions allowed along one line
pub const MAX_EXTENSIONS: u32 = 10;

/// Moves searched at full depth before LMR starts reducing (by one ply)
pub const LMR_FIRST_INDEX: usize = 4;

/// Beyond this move index LMR reduces by two plies
pub const LMR_DEEP_INDEX: usize = 15;

/// Check the clock every this many nodes (power of two)
pub const CLOCK_CHECK_INTERVAL: u64 = 2048;

/// Convert a root-relative mate score to the node-relative form kept in the TT.
#[inline]
#[must_use]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`] for a probe at `ply`.
#[inline]
#[must_use]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}
