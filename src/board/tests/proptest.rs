//! Property-based tests using proptest.

use crate::board::search::{HistoryTable, KillerTable, MATE_THRESHOLD};
use crate::board::{Move, Piece, Position, Square, UndoToken};
use crate::tt::{NodeType, TranspositionTable};
use proptest::prelude::*;
use rand::prelude::*;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn square_strategy() -> impl Strategy<Value = Square> {
    (0..8u8, 0..8u8).prop_map(|(rank, file)| Square::new(rank, file).unwrap())
}

/// Play up to `plies` random legal moves from the start position
fn random_position(seed: u64, plies: usize) -> Position {
    let mut pos = Position::startpos();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..plies {
        let moves = pos.generate_legal_moves();
        let Some(&mv) = moves.as_slice().choose(&mut rng) else {
            break;
        };
        pos.play(mv);
    }
    pos
}

proptest! {
    /// Property: make_move followed by unmake_move restores the position exactly
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(seed);
        let initial = pos.clone();
        let mut history: Vec<(Move, UndoToken)> = Vec::new();

        for _ in 0..num_moves {
            let moves = pos.generate_legal_moves();
            let Some(&mv) = moves.as_slice().choose(&mut rng) else {
                break;
            };
            let token = pos.make_move(mv);
            history.push((mv, token));
        }
        while let Some((mv, token)) = history.pop() {
            pos.unmake_move(mv, token);
        }

        prop_assert_eq!(pos, initial);
    }

    /// Property: incremental hash and piece-square sums match a recomputation
    #[test]
    fn prop_incremental_state_consistency(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = pos.generate_legal_moves();
            let Some(&mv) = moves.as_slice().choose(&mut rng) else {
                break;
            };
            pos.play(mv);
            prop_assert_eq!(pos.hash(), pos.compute_hash());
            prop_assert_eq!(pos.pst_scores(), pos.compute_pst());
        }
    }

    /// Property: FEN round-trip preserves the position
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let pos = random_position(seed, num_moves);
        let restored = Position::from_fen(&pos.to_fen()).unwrap();

        prop_assert_eq!(restored.hash(), pos.hash());
        prop_assert_eq!(restored.to_fen(), pos.to_fen());
        prop_assert_eq!(restored.pst_scores(), pos.pst_scores());
    }

    /// Property: legal moves never leave the mover in check, and asking twice gives the same list
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut pos = random_position(seed, num_moves);
        let mover = pos.side_to_move();
        let moves = pos.generate_legal_moves();
        let again = pos.generate_legal_moves();
        prop_assert_eq!(again.as_slice(), moves.as_slice());

        for &mv in &moves {
            prop_assert!(pos.is_legal(mv));
            prop_assert!(pos.is_legal(mv));
            let token = pos.make_move(mv);
            prop_assert!(!pos.is_in_check(mover), "legal move {} left king in check", mv);
            pos.unmake_move(mv, token);
        }

        let mut pseudo = crate::board::MoveList::new();
        pos.generate_pseudo_moves(&mut pseudo);
        for &mv in &pseudo {
            prop_assert_eq!(pos.is_legal(mv), moves.contains(mv));
        }
    }

    /// Property: mirroring negates the white-relative score
    #[test]
    fn prop_eval_symmetry(seed in seed_strategy(), num_moves in 0..40usize) {
        let pos = random_position(seed, num_moves);
        let mirror = pos.mirrored();
        prop_assert_eq!(pos.evaluate_white(), -mirror.evaluate_white());
        prop_assert!(pos.evaluate().abs() < MATE_THRESHOLD);
    }

    /// Property: SEE for captures never exceeds the victim's value
    #[test]
    fn prop_see_bounded_by_victim(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut pos = random_position(seed, num_moves);
        let moves = pos.generate_legal_moves();
        for &mv in &moves {
            let see = pos.see(mv);
            match mv.captured() {
                Some(victim) => prop_assert!(
                    see <= victim.value() + mv.promoted().map_or(0, |p| p.value() - Piece::Pawn.value()),
                    "SEE {} exceeds victim value for {}", see, mv
                ),
                None if !mv.is_promotion() => prop_assert_eq!(see, 0),
                None => {}
            }
        }
    }

    /// Property: killer moves are preserved after update
    #[test]
    fn prop_killer_preserves_moves(
        ply in 0..100usize,
        a in (square_strategy(), square_strategy()),
        b in (square_strategy(), square_strategy()),
    ) {
        let mut table = KillerTable::new();
        let mv1 = Move::normal(a.0, a.1, Piece::Knight, None);
        let mv2 = Move::normal(b.0, b.1, Piece::Knight, None);

        table.update(ply, mv1);
        prop_assert!(table.score(ply, mv1) > 0);

        if mv1 != mv2 {
            table.update(ply, mv2);
            prop_assert!(table.score(ply, mv2) > table.score(ply, mv1));
            prop_assert!(table.score(ply, mv1) > 0);
        }
    }

    /// Property: history scores stay within bounds after updates
    #[test]
    fn prop_history_bounded(
        from in square_strategy(),
        to in square_strategy(),
        depth in 1..64u32,
        num_updates in 1..20usize
    ) {
        let mut table = HistoryTable::new();
        let mv = Move::normal(from, to, Piece::Rook, None);
        for _ in 0..num_updates {
            table.update(mv, depth);
        }
        let score = table.score(mv);
        prop_assert!(score > 0);
        prop_assert!(score <= 1000);
    }

    /// Property: TT stores and retrieves the same data
    #[test]
    fn prop_tt_store_retrieve(
        hash in any::<u64>(),
        depth in 0..=255u32,
        score in -30000..30000i32
    ) {
        let tt = TranspositionTable::new(1);
        tt.store(hash, score, depth, 1, crate::board::PackedMove::NONE, NodeType::Pv);

        let entry = tt.probe(hash).unwrap();
        prop_assert_eq!(entry.key, hash);
        prop_assert_eq!(entry.depth, depth);
        prop_assert_eq!(entry.score, score);
        prop_assert_eq!(entry.node_type, NodeType::Pv);
        prop_assert_eq!(entry.best_move(), None);
    }
}
