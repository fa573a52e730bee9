//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation node counts
//! - `draw.rs` - Repetition detection
//! - `make_unmake.rs` - Make/unmake move correctness and incremental state
//! - `eval.rs` - Evaluation symmetry and sanity
//! - `search.rs` - Search results, hash table soundness and determinism
//! - `proptest.rs` - Property-based tests

mod eval;
mod make_unmake;
mod proptest;
