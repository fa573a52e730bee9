//! The main alpha-beta node.

use super::constants::{
    score_from_tt, score_to_tt, FORCED_MOVE_SCORE, HASH_MOVE_SCORE, LMR_DEEP_INDEX,
    LMR_FIRST_INDEX, MATE_SCORE, MAX_EXTENSIONS,
};
use super::move_order::{score_move, shuffle_moves};
use super::SearchWorker;
use crate::board::{
    Move, MoveGuard, MoveList, NullMoveGuard, PackedMove, Position, ScoredMoveList, MAX_PLY,
};
use crate::tt::NodeType;

/// Per-node search arguments besides the window.
#[derive(Clone, Copy, Debug)]
pub(super) struct Node {
    pub depth: u32,
    pub ply: usize,
    /// Check extensions granted along the path to this node
    pub extensions: u32,
    /// Searched first at the root; the previous iteration's best move
    pub forced: Option<Move>,
    /// The move leading here was a null move
    pub after_null: bool,
}

impl Node {
    pub(super) fn root(depth: u32, forced: Option<Move>) -> Self {
        Node {
            depth,
            ply: 0,
            extensions: 0,
            forced,
            after_null: false,
        }
    }

    fn child(self, depth: u32, extension: u32) -> Self {
        Node {
            depth,
            ply: self.ply + 1,
            extensions: self.extensions + extension,
            forced: None,
            after_null: false,
        }
    }
}

#[inline]
fn lmr_reduction(index: usize) -> u32 {
    if index > LMR_DEEP_INDEX {
        2
    } else if index > LMR_FIRST_INDEX {
        1
    } else {
        0
    }
}

impl SearchWorker<'_> {
    /// Negamax with a fail-hard window. Returns the score and the move that raised alpha
    /// (or caused the cutoff), if any.
    pub(super) fn negamax(
        &mut self,
        pos: &mut Position,
        node: Node,
        mut alpha: i32,
        beta: i32,
    ) -> (i32, Option<Move>) {
        self.stats.nodes += 1;
        self.note_ply(node.ply);
        if self.should_stop() {
            return (alpha, None);
        }
        let root = node.ply == 0;

        let entry = self.tt.probe(pos.hash());
        if let Some(entry) = entry {
            self.stats.tt_hits += 1;
            if !root && entry.node_type == NodeType::Pv && entry.depth >= node.depth {
                return (score_from_tt(entry.score, node.ply), None);
            }
        }

        if !root && pos.is_repetition_draw() {
            return (0, None);
        }
        if node.depth == 0 {
            return self.quiescence(pos, alpha, beta, node.ply);
        }
        if node.ply >= MAX_PLY - 1 {
            return (pos.evaluate(), None);
        }

        let mut moves = MoveList::new();
        pos.legal_moves_into(&mut moves);
        let side = pos.side_to_move();
        let in_check = pos.is_in_check(side);
        if moves.is_empty() {
            let score = if in_check {
                -MATE_SCORE + node.ply as i32
            } else {
                0
            };
            return (score, None);
        }

        let hash_move = entry
            .and_then(|e| e.best_move())
            .and_then(|packed| moves.iter().copied().find(|&m| packed.matches(m)));
        let mut ordered = self.order_node_moves(pos, &mut moves, node, hash_move);

        if !in_check
            && !root
            && !node.after_null
            && node.depth >= self.params.null_min_depth
            && pos.has_non_pawn_material(side)
        {
            let reduced = Node {
                depth: node.depth.saturating_sub(self.params.null_reduction + 1),
                after_null: true,
                ..node.child(0, 0)
            };
            let score = {
                let mut passed = NullMoveGuard::new(pos);
                -self.negamax(&mut passed, reduced, -beta, -beta + 1).0
            };
            if self.should_stop() {
                return (alpha, None);
            }
            if score >= beta {
                return (beta, None);
            }
        }

        let mut best_move = None;
        let mut node_type = NodeType::All;
        for index in 0..ordered.len() {
            let Some(scored) = ordered.pick_best(index) else {
                break;
            };
            let mv = scored.mv;

            let score = {
                let mut child = MoveGuard::new(pos, mv);
                let gives_check = child.is_in_check(child.side_to_move());
                let extension = u32::from(gives_check && node.extensions < MAX_EXTENSIONS);
                let reduction = if node.depth > self.params.lmr_min_depth
                    && !mv.is_tactical()
                    && !in_check
                    && !gives_check
                    && extension == 0
                {
                    lmr_reduction(index)
                } else {
                    0
                };

                let full_depth = node.depth - 1 + extension;
                let reduced = node.child(full_depth.saturating_sub(reduction), extension);
                let mut score = -self.negamax(&mut child, reduced, -beta, -alpha).0;
                if reduction > 0 && score > alpha {
                    let full = node.child(full_depth, extension);
                    score = -self.negamax(&mut child, full, -beta, -alpha).0;
                }
                score
            };
            if self.should_stop() {
                return (alpha, best_move);
            }

            if score >= beta {
                self.tt.store(
                    pos.hash(),
                    score_to_tt(beta, node.ply),
                    node.depth,
                    pos.move_count(),
                    mv.packed(),
                    NodeType::Cut,
                );
                if !mv.is_tactical() {
                    self.killers.update(node.ply, mv);
                    self.history.update(mv, node.depth);
                }
                return (beta, Some(mv));
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
                node_type = NodeType::Pv;
            }
        }

        self.tt.store(
            pos.hash(),
            score_to_tt(alpha, node.ply),
            node.depth,
            pos.move_count(),
            best_move.map_or(PackedMove::NONE, Move::packed),
            node_type,
        );
        (alpha, best_move)
    }

    /// Score this node's moves for `pick_best`.
    ///
    /// Helper threads shuffle the root and keep that order. Everywhere else: the forced
    /// move, then the hash move, then heuristic scores with killer and history bonuses for
    /// quiet moves.
    fn order_node_moves(
        &mut self,
        pos: &Position,
        moves: &mut MoveList,
        node: Node,
        hash_move: Option<Move>,
    ) -> ScoredMoveList {
        let mut ordered = ScoredMoveList::new();
        if node.ply == 0 {
            if let Some(rng) = self.root_rng.as_mut() {
                shuffle_moves(moves, rng);
                for &mv in &*moves {
                    ordered.push(mv, 0);
                }
                return ordered;
            }
        }

        for &mv in &*moves {
            let score = if node.forced == Some(mv) {
                FORCED_MOVE_SCORE
            } else {
                let base = score_move(pos, mv, hash_move);
                if base < HASH_MOVE_SCORE && !mv.is_tactical() {
                    base + self.killers.score(node.ply, mv) + self.history.score(mv)
                } else {
                    base
                }
            };
            ordered.push(mv, score);
        }
        ordered
    }
}
