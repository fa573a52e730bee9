//! Make/unmake move tests.

use crate::board::{
    parse_move, Color, Move, MoveGuard, NullMoveGuard, Piece, Position, Square, UndoToken,
};
use rand::prelude::*;

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn find_move(pos: &mut Position, text: &str) -> Move {
    parse_move(pos, text).expect("move not legal")
}

/// Incremental state must match a from-scratch computation
fn assert_incremental_state(pos: &Position) {
    assert_eq!(pos.hash(), pos.compute_hash(), "hash drift at {}", pos.to_fen());
    assert_eq!(pos.pst_scores(), pos.compute_pst(), "pst drift at {}", pos.to_fen());
    let mut fresh = pos.clone();
    fresh.refresh_all_attacks();
    assert_eq!(pos.attacks, fresh.attacks, "attack drift at {}", pos.to_fen());
}

#[test]
fn test_en_passant_make_unmake() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
    let before = pos.clone();
    let mv = find_move(&mut pos, "e5f6");
    assert!(mv.is_en_passant());

    let token = pos.make_move(mv);
    assert_eq!(pos.piece_at(sq("f5")), None);
    assert_eq!(pos.piece_at(sq("f6")), Some((Color::White, Piece::Pawn)));
    assert_eq!(pos.en_passant_file(), None);
    assert_incremental_state(&pos);

    pos.unmake_move(mv, token);
    assert_eq!(pos, before);
}

#[test]
fn test_promotion_make_unmake() {
    let mut pos = Position::from_fen("1n6/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let before = pos.clone();
    for text in ["a7a8q", "a7b8n"] {
        let mv = find_move(&mut pos, text);
        let token = pos.make_move(mv);
        assert_eq!(pos.piece_at(mv.to()).map(|(_, p)| p), mv.promoted());
        assert!(pos.pieces(Color::White, Piece::Pawn).is_empty());
        assert_incremental_state(&pos);
        pos.unmake_move(mv, token);
        assert_eq!(pos, before);
    }
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = pos.clone();
    let mv = find_move(&mut pos, "e1c1");
    let token = pos.make_move(mv);
    assert_eq!(pos.piece_at(sq("d1")), Some((Color::White, Piece::Rook)));
    assert_eq!(pos.piece_at(sq("a1")), None);
    assert_eq!(pos.king_square(Color::White), Some(sq("c1")));
    assert!(!pos.castling_rights().has(Color::White, crate::board::CastleSide::King));
    assert!(pos.castling_rights().has(Color::Black, crate::board::CastleSide::Queen));
    assert_incremental_state(&pos);
    pos.unmake_move(mv, token);
    assert_eq!(pos, before);
}

#[test]
fn test_rook_capture_removes_opponent_castling_right() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = find_move(&mut pos, "h1h8");
    pos.play(mv);
    let rights = pos.castling_rights();
    assert!(!rights.has(Color::White, crate::board::CastleSide::King));
    assert!(!rights.has(Color::Black, crate::board::CastleSide::King));
    assert!(rights.has(Color::Black, crate::board::CastleSide::Queen));
}

#[test]
fn test_null_move_make_unmake_restores_hash_and_ep() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
    let before = pos.clone();

    let token = pos.make_null_move();
    assert_eq!(pos.en_passant_file(), None);
    assert_ne!(pos.hash(), before.hash());
    assert_eq!(pos.side_to_move(), Color::Black);
    assert_eq!(pos.castling_rights(), before.castling_rights());
    assert_eq!(pos.move_count(), before.move_count());
    assert_eq!(pos.hash(), pos.compute_hash());

    pos.unmake_null_move(token);
    assert_eq!(pos, before);
}

#[test]
fn test_guards_unmake_on_drop() {
    let mut pos = Position::startpos();
    let before = pos.clone();
    let mv = find_move(&mut pos, "e2e4");
    {
        let mut child = MoveGuard::new(&mut pos, mv);
        assert_eq!(child.mv(), mv);
        assert_eq!(child.side_to_move(), Color::Black);
        let reply = find_move(&mut child, "c7c5");
        let grandchild = MoveGuard::new(&mut child, reply);
        assert_eq!(grandchild.move_count(), 2);
    }
    assert_eq!(pos, before);
    {
        let null = NullMoveGuard::new(&mut pos);
        assert_eq!(null.side_to_move(), Color::Black);
    }
    assert_eq!(pos, before);
}

#[test]
fn test_legal_moves_stable_after_make_unmake() {
    let mut pos = Position::startpos();
    let initial = pos.generate_legal_moves();
    for &mv in &initial {
        let token = pos.make_move(mv);
        pos.unmake_move(mv, token);
    }
    assert_eq!(pos.generate_legal_moves().as_slice(), initial.as_slice());
}

#[test]
fn test_random_playout_round_trip_state() {
    let mut pos = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let before = pos.clone();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut history: Vec<(Move, UndoToken)> = Vec::new();

    for _ in 0..200 {
        let moves = pos.generate_legal_moves();
        let Some(&mv) = moves.as_slice().choose(&mut rng) else {
            break;
        };
        let token = pos.make_move(mv);
        history.push((mv, token));
        assert_incremental_state(&pos);
    }

    while let Some((mv, token)) = history.pop() {
        pos.unmake_move(mv, token);
        assert_incremental_state(&pos);
    }
    assert_eq!(pos, before);
}
