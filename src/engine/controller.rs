//! Engine controller: game state, shared hash table and search jobs.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::time::TimeControl;
use crate::board::{attack_tables, search, FenError, MoveParseError, Position, SearchOutcome, SearchParams};
use crate::tt::TranspositionTable;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Where a `position` command starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSpec {
    StartPos,
    Fen(String),
}

/// Error returned when a position cannot be set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The FEN did not parse
    Fen(FenError),
    /// A move in the move list was malformed or illegal
    Move(MoveParseError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Fen(err) => write!(f, "invalid position: {err}"),
            EngineError::Move(err) => write!(f, "invalid move list: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Fen(err) => Some(err),
            EngineError::Move(err) => Some(err),
        }
    }
}

impl From<FenError> for EngineError {
    fn from(err: FenError) -> Self {
        EngineError::Fen(err)
    }
}

impl From<MoveParseError> for EngineError {
    fn from(err: MoveParseError) -> Self {
        EngineError::Move(err)
    }
}

/// Engine controller managing search and game state.
///
/// `go` searches on the calling thread; `start_search` runs the same search on a
/// background thread. Either can be interrupted through [`Engine::stop_handle`].
pub struct Engine {
    position: Position,
    tt: Arc<TranspositionTable>,
    params: SearchParams,
    stop: Arc<AtomicBool>,
    last_outcome: Arc<Mutex<Option<SearchOutcome>>>,
    job: Option<JoinHandle<()>>,
}

impl Engine {
    #[must_use]
    pub fn new(params: SearchParams) -> Self {
        attack_tables::init();
        Engine {
            position: Position::startpos(),
            tt: Arc::new(TranspositionTable::new(params.tt_mb)),
            params,
            stop: Arc::new(AtomicBool::new(false)),
            last_outcome: Arc::new(Mutex::new(None)),
            job: None,
        }
    }

    /// Get a reference to the current position
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    #[must_use]
    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Reset to the starting position with an empty hash table.
    pub fn new_game(&mut self) {
        self.stop();
        self.tt.clear();
        self.position = Position::startpos();
        *self.last_outcome.lock() = None;
        log::debug!("new game");
    }

    /// Set up `spec` and play `moves` (coordinate notation) on it.
    ///
    /// The current position is left untouched on error.
    pub fn set_position<S: AsRef<str>>(
        &mut self,
        spec: PositionSpec,
        moves: &[S],
    ) -> Result<(), EngineError> {
        self.stop();
        let mut position = match spec {
            PositionSpec::StartPos => Position::startpos(),
            PositionSpec::Fen(fen) => Position::from_fen(&fen)?,
        };
        for text in moves {
            position.play_coordinate(text.as_ref())?;
        }
        self.position = position;
        Ok(())
    }

    /// Search the current position on this thread.
    pub fn go(&mut self, time_control: TimeControl) -> SearchOutcome {
        self.stop();
        self.stop.store(false, Ordering::Relaxed);
        let config = time_control.search_config(self.position.side_to_move());
        let outcome = search(&self.position, &self.tt, &self.params, &config, &self.stop);
        *self.last_outcome.lock() = Some(outcome);
        outcome
    }

    /// Start a search on a background thread; collect it with [`Engine::wait`].
    pub fn start_search(&mut self, time_control: TimeControl) -> io::Result<()> {
        self.stop();
        self.stop.store(false, Ordering::Relaxed);
        *self.last_outcome.lock() = None;

        let config = time_control.search_config(self.position.side_to_move());
        let position = self.position.clone();
        let tt = Arc::clone(&self.tt);
        let params = self.params.clone();
        let stop = Arc::clone(&self.stop);
        let last_outcome = Arc::clone(&self.last_outcome);

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let outcome = search(&position, &tt, &params, &config, &stop);
                *last_outcome.lock() = Some(outcome);
            })?;
        self.job = Some(handle);
        Ok(())
    }

    /// Wait for the background search and return its outcome.
    pub fn wait(&mut self) -> Option<SearchOutcome> {
        if let Some(handle) = self.job.take() {
            if handle.join().is_err() {
                log::warn!("search thread panicked");
            }
        }
        *self.last_outcome.lock()
    }

    /// Stop any active search and wait for it to finish.
    pub fn stop(&mut self) {
        if self.job.is_some() {
            self.stop.store(true, Ordering::Relaxed);
            self.wait();
        }
    }

    /// Flag another thread can set to interrupt a running `go`.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// True when no background search is running.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.job.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Check if there's an active search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        !self.is_ready()
    }

    /// Outcome of the most recent finished search.
    #[must_use]
    pub fn last_outcome(&self) -> Option<SearchOutcome> {
        *self.last_outcome.lock()
    }

    /// Set the number of search threads for SMP
    pub fn set_threads(&mut self, threads: usize) {
        self.params.threads = threads.max(1);
    }

    /// Resize the transposition table
    pub fn resize_hash(&mut self, mb: usize) {
        self.stop();
        self.params.tt_mb = mb;
        self.tt = Arc::new(TranspositionTable::new(mb));
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(SearchParams::default())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn small_engine() -> Engine {
        Engine::new(SearchParams {
            tt_mb: 4,
            ..SearchParams::default()
        })
    }

    #[test]
    fn test_set_position_with_moves() {
        let mut engine = small_engine();
        engine
            .set_position(PositionSpec::StartPos, &["e2e4", "e7e5", "g1f3"])
            .unwrap();
        assert_eq!(
            engine.position().to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 0 2"
        );
    }

    #[test]
    fn test_set_position_errors_keep_previous_position() {
        let mut engine = small_engine();
        engine.set_position(PositionSpec::StartPos, &["d2d4"]).unwrap();
        let before = engine.position().clone();

        let bad_fen = engine.set_position::<&str>(PositionSpec::Fen("not a fen".into()), &[]);
        assert!(matches!(bad_fen, Err(EngineError::Fen(_))));
        let bad_move = engine.set_position(PositionSpec::StartPos, &["e2e4", "e2e4"]);
        assert!(matches!(bad_move, Err(EngineError::Move(_))));
        assert_eq!(engine.position(), &before);
    }

    #[test]
    fn test_go_depth_finds_mate() {
        let mut engine = small_engine();
        engine
            .set_position::<&str>(PositionSpec::Fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".into()), &[])
            .unwrap();
        let outcome = engine.go(TimeControl::Depth(3));
        assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("a1a8"));
        assert_eq!(engine.last_outcome(), Some(outcome));
    }

    #[test]
    fn test_new_game_clears_state() {
        let mut engine = small_engine();
        engine.set_position(PositionSpec::StartPos, &["e2e4"]).unwrap();
        engine.go(TimeControl::Depth(2));
        engine.new_game();
        assert_eq!(engine.position(), &Position::startpos());
        assert_eq!(engine.last_outcome(), None);
        assert_eq!(engine.tt().hashfull_per_mille(), 0);
    }

    #[test]
    fn test_background_search_can_be_stopped() {
        let mut engine = small_engine();
        engine.start_search(TimeControl::Infinite).unwrap();
        thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        engine.stop();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(engine.is_ready());
        let outcome = engine.last_outcome().unwrap();
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn test_stop_handle_interrupts_from_another_thread() {
        let mut engine = small_engine();
        let stop = engine.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            stop.store(true, Ordering::Relaxed);
        });
        let outcome = engine.go(TimeControl::Infinite);
        stopper.join().unwrap();
        assert!(outcome.best_move.is_some());
        assert!(outcome.depth >= 3);
    }

    #[test]
    fn test_movetime_is_respected() {
        let mut engine = small_engine();
        let start = Instant::now();
        let outcome = engine.go(TimeControl::move_time_ms(100));
        assert!(outcome.best_move.is_some());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_threads_and_hash_settings() {
        let mut engine = small_engine();
        engine.set_threads(0);
        assert_eq!(engine.params().threads, 1);
        engine.set_threads(3);
        assert_eq!(engine.params().threads, 3);
        engine.resize_hash(1);
        assert_eq!(engine.params().tt_mb, 1);
        assert!(engine.is_ready());
        assert!(!engine.is_searching());
    }
}
