//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! Every thread runs the same iterative deepening on its own copy of the position. They
//! coordinate only through the shared transposition table. Helpers shuffle their root
//! moves so they explore different subtrees first, have no deadline, and are stopped as
//! soon as the main thread returns. Only the main thread's result is reported.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::board::Position;
use crate::tt::TranspositionTable;

use super::{SearchConfig, SearchOutcome, SearchParams, SearchWorker};

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Base seed for helper root shuffles; helper `i` uses `HELPER_SEED + i`
const HELPER_SEED: u64 = 0x5EED_0F_5A17;

/// Search `pos` with `threads - 1` helpers sharing `tt`.
///
/// `stop` interrupts the main search (from `interrupt_min_depth` on); helpers are
/// joined before this returns.
#[must_use]
pub fn search(
    pos: &Position,
    tt: &TranspositionTable,
    params: &SearchParams,
    config: &SearchConfig,
    stop: &AtomicBool,
) -> SearchOutcome {
    let threads = config.threads.unwrap_or(params.threads).max(1);
    let helpers_stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let helpers_stop = &helpers_stop;
        let mut handles = Vec::with_capacity(threads - 1);
        for helper_id in 1..threads {
            let mut helper_pos = pos.clone();
            let helper_config = SearchConfig {
                time_limit: None,
                ..config.clone()
            };
            let spawned = thread::Builder::new()
                .name(format!("search-helper-{helper_id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    let mut worker = SearchWorker::new(tt, params, helpers_stop)
                        .with_root_shuffle(HELPER_SEED + helper_id as u64);
                    worker.iterative_deepening(&mut helper_pos, &helper_config);
                    worker.stats().nodes
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => log::warn!("could not spawn search helper {helper_id}: {err}"),
            }
        }
        log::debug!("lazy smp: {} helper threads running", handles.len());

        let mut main_pos = pos.clone();
        let mut main = SearchWorker::new(tt, params, stop);
        let outcome = main.iterative_deepening(&mut main_pos, config);

        helpers_stop.store(true, Ordering::Relaxed);
        let helper_nodes: u64 = handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .sum();
        log::debug!(
            "search done: main nodes {}, helper nodes {}",
            main.stats().nodes,
            helper_nodes
        );
        outcome
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::search::MATE_THRESHOLD;

    #[test]
    fn test_single_thread_search_is_deterministic() {
        let pos = Position::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        )
        .unwrap();
        let params = SearchParams::default();
        let config = SearchConfig::depth(5).with_threads(1);
        let stop = AtomicBool::new(false);

        let first = search(&pos, &TranspositionTable::new(8), &params, &config, &stop);
        let second = search(&pos, &TranspositionTable::new(8), &params, &config, &stop);
        assert_eq!(first, second);
        assert_eq!(first.depth, 5);
    }

    #[test]
    fn test_helpers_share_table_and_main_result_is_returned() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let tt = TranspositionTable::new(8);
        let params = SearchParams::default();
        let config = SearchConfig::depth(4).with_threads(4);
        let stop = AtomicBool::new(false);

        let outcome = search(&pos, &tt, &params, &config, &stop);
        assert_eq!(outcome.best_move.map(|m| m.to_string()), Some("a1a8".to_string()));
        assert!(outcome.evaluation >= MATE_THRESHOLD);
        assert!(tt.probe(pos.hash()).is_some());
    }

    #[test]
    fn test_no_legal_move_sentinel_with_helpers() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let tt = TranspositionTable::new(1);
        let outcome = search(
            &pos,
            &tt,
            &SearchParams::default(),
            &SearchConfig::depth(3).with_threads(2),
            &AtomicBool::new(false),
        );
        assert_eq!(outcome, SearchOutcome::no_move(0));
    }
}
