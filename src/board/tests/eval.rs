//! Evaluation symmetry and sanity tests.

use crate::board::Position;

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "4k3/8/8/4P3/8/8/8/4K3 w - - 0 60",
    "6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1",
];

#[test]
fn test_mirrored_position_negates_white_score() {
    for fen in POSITIONS {
        let pos = Position::from_fen(fen).unwrap();
        let mirror = pos.mirrored();
        assert_eq!(pos.evaluate_white(), -mirror.evaluate_white(), "{fen}");
        assert_eq!(pos.evaluate(), mirror.evaluate(), "{fen}");
    }
}

#[test]
fn test_mirror_is_an_involution() {
    for fen in POSITIONS {
        let pos = Position::from_fen(fen).unwrap();
        let back = pos.mirrored().mirrored();
        assert_eq!(back.to_fen(), pos.to_fen());
        assert_eq!(back.hash(), pos.hash());
    }
}

#[test]
fn test_symmetry_holds_after_castling() {
    let mut pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let before = pos.evaluate_white();
    pos.play_coordinate("e1g1").unwrap();
    assert!(pos.evaluate_white() > before, "castling bonus missing");
    let mirror = pos.mirrored();
    assert_eq!(pos.evaluate_white(), -mirror.evaluate_white());
}

#[test]
fn test_side_to_move_flips_sign() {
    let white = Position::from_fen("4k3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
    let black = Position::from_fen("4k3/8/8/8/8/8/8/3RK3 b - - 0 1").unwrap();
    assert_eq!(white.evaluate(), white.evaluate_white());
    assert_eq!(black.evaluate(), -black.evaluate_white());
    assert!(white.evaluate() > 400);
}

#[test]
fn test_king_under_attack_scores_worse() {
    let attacked = Position::from_fen("4k3/8/8/8/8/5q2/5PPP/6K1 w - - 0 1").unwrap();
    let quiet = Position::from_fen("4k3/8/8/q7/8/8/5PPP/6K1 w - - 0 1").unwrap();
    assert!(attacked.evaluate_white() < quiet.evaluate_white());
}
