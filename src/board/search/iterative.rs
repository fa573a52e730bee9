//! Iterative deepening with aspiration windows.

use std::time::Instant;

use super::constants::{INFINITY, MATE_SCORE};
use super::negamax::Node;
use super::{SearchConfig, SearchOutcome, SearchWorker};
use crate::board::Position;

impl SearchWorker<'_> {
    /// Search depth 1, 2, ... until the depth limit, the deadline or a stop.
    ///
    /// Each iteration starts with the previous best move. From
    /// `interrupt_min_depth` on, the deadline and stop flag can cut an iteration short;
    /// its result is kept only if a root move raised alpha before the cut.
    pub fn iterative_deepening(
        &mut self,
        pos: &mut Position,
        config: &SearchConfig,
    ) -> SearchOutcome {
        let start = Instant::now();
        self.deadline = config.time_limit.map(|limit| start + limit);
        self.stats.reset();
        self.aborted = false;
        self.enforce_limits = false;

        let side = pos.side_to_move();
        if pos.generate_legal_moves().is_empty() {
            let score = if pos.is_in_check(side) { -MATE_SCORE } else { 0 };
            return SearchOutcome::no_move(score);
        }

        let mut outcome = SearchOutcome::no_move(0);
        let mut alpha = -INFINITY;
        let mut beta = INFINITY;

        for depth in 1..=config.depth_limit() {
            self.enforce_limits = depth >= self.params.interrupt_min_depth;
            let forced = if depth > 1 { outcome.best_move } else { None };

            let (score, best) = loop {
                self.killers.reset();
                self.history.reset();
                let (score, best) = self.negamax(pos, Node::root(depth, forced), alpha, beta);

                if best.is_none() {
                    if self.aborted || alpha <= -INFINITY {
                        break (score, None);
                    }
                    // fail low: double the lower margin
                    alpha = (alpha - (outcome.evaluation - alpha)).max(-INFINITY);
                    log::debug!("depth {depth}: fail low, widening alpha to {alpha}");
                    continue;
                }
                if score >= beta && beta < INFINITY && !self.aborted {
                    beta = (beta + (beta - outcome.evaluation)).min(INFINITY);
                    log::debug!("depth {depth}: fail high, widening beta to {beta}");
                    continue;
                }
                break (score, best);
            };

            let Some(best) = best else {
                break;
            };
            outcome = SearchOutcome {
                best_move: Some(best),
                evaluation: score,
                depth,
            };

            let elapsed = start.elapsed();
            log::info!(
                "depth {} seldepth {} score {} nodes {} qnodes {} tt hits {} hashfull {} time {}ms best {}",
                depth,
                self.stats.seldepth,
                score,
                self.stats.nodes,
                self.stats.qnodes,
                self.stats.tt_hits,
                self.tt.hashfull_per_mille(),
                elapsed.as_millis(),
                best
            );

            if self.aborted {
                break;
            }
            if depth > self.params.aspiration_min_depth {
                alpha = score - self.params.aspiration_window;
                beta = score + self.params.aspiration_window;
            }
            if self.enforce_limits && self.deadline_passed() {
                break;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use super::*;
    use crate::board::search::{SearchParams, MATE_THRESHOLD};
    use crate::tt::TranspositionTable;

    fn run(fen: &str, config: &SearchConfig) -> SearchOutcome {
        let tt = TranspositionTable::new(8);
        let params = SearchParams::default();
        let stop = AtomicBool::new(false);
        let mut worker = SearchWorker::new(&tt, &params, &stop);
        let mut pos = Position::from_fen(fen).unwrap();
        let before = pos.clone();
        let outcome = worker.iterative_deepening(&mut pos, config);
        assert_eq!(pos, before);
        outcome
    }

    #[test]
    fn test_reaches_requested_depth() {
        let outcome = run(crate::board::STARTPOS_FEN, &SearchConfig::depth(4));
        assert_eq!(outcome.depth, 4);
        assert!(outcome.best_move.is_some());
        assert!(outcome.evaluation.abs() < 200);
    }

    #[test]
    fn test_no_legal_moves_returns_sentinel() {
        let mated = run("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", &SearchConfig::depth(3));
        assert_eq!(mated.best_move, None);
        assert_eq!(mated.depth, 0);
        assert!(mated.evaluation <= -MATE_THRESHOLD);

        let stalemate = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &SearchConfig::depth(3));
        assert_eq!(stalemate, SearchOutcome::no_move(0));
    }

    #[test]
    fn test_mate_found() {
        // Qh8 mates
        let outcome = run("5k2/8/5K2/8/8/8/8/7Q w - - 0 1", &SearchConfig::depth(5));
        assert!(outcome.evaluation >= MATE_THRESHOLD, "{outcome:?}");
    }

    #[test]
    fn test_stop_before_enforcement_depth_still_completes_shallow_iterations() {
        let tt = TranspositionTable::new(1);
        let params = SearchParams::default();
        let stop = AtomicBool::new(true);
        let mut worker = SearchWorker::new(&tt, &params, &stop);
        let mut pos = Position::startpos();
        let outcome = worker.iterative_deepening(&mut pos, &SearchConfig::depth(10));
        assert_eq!(outcome.depth, params.interrupt_min_depth - 1);
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn test_deadline_bounds_search_time() {
        let config = SearchConfig::time(Duration::from_millis(200));
        let start = Instant::now();
        let outcome = run(crate::board::STARTPOS_FEN, &config);
        assert!(outcome.best_move.is_some());
        assert!(outcome.depth >= 3);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
