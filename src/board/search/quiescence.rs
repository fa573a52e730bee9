//! Quiescence search: captures only, until the position is quiet.

use super::move_order::order_moves;
use super::SearchWorker;
use crate::board::{Move, MoveGuard, MoveList, Position};

impl SearchWorker<'_> {
    /// Fail-hard capture search with stand pat, delta pruning and SEE pruning.
    pub(super) fn quiescence(
        &mut self,
        pos: &mut Position,
        mut alpha: i32,
        beta: i32,
        ply: usize,
    ) -> (i32, Option<Move>) {
        self.stats.qnodes += 1;
        self.note_ply(ply);
        if self.should_stop() {
            return (alpha, None);
        }

        let stand_pat = pos.evaluate();
        if stand_pat >= beta {
            return (beta, None);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = MoveList::new();
        pos.legal_captures_into(&mut captures);
        if captures.is_empty() {
            return (stand_pat, None);
        }
        order_moves(&mut captures, pos, None);

        let mut best_move = None;
        for &mv in &captures {
            if !mv.is_promotion() {
                let gain = mv.captured().map_or(0, |p| p.value());
                if stand_pat + gain + self.params.delta_margin < alpha {
                    continue;
                }
            }
            if pos.see(mv) < 0 {
                continue;
            }

            let score = {
                let mut child = MoveGuard::new(pos, mv);
                -self.quiescence(&mut child, -beta, -alpha, ply + 1).0
            };
            if self.should_stop() {
                return (alpha, best_move);
            }

            if score >= beta {
                return (beta, Some(mv));
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
            }
        }

        (alpha, best_move)
    }
}
