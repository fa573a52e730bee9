//! Static move ordering.
//!
//! Killers and history are layered on top of these scores by the search itself.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use super::constants::HASH_MOVE_SCORE;
use crate::board::{Move, MoveList, Piece, Position};

/// Heuristic score of `mv`; higher is searched earlier.
///
/// The hash move outranks everything. Captures score victim minus attacker value,
/// promotions add the promoted piece's value, and a destination covered by an enemy
/// pawn costs the mover's value.
#[must_use]
pub fn score_move(pos: &Position, mv: Move, hash_move: Option<Move>) -> i32 {
    if hash_move == Some(mv) {
        return HASH_MOVE_SCORE;
    }
    let mover = mv.piece().value();
    let mut score = 0;
    if let Some(captured) = mv.captured() {
        score += captured.value() - mover;
    }
    if let Some(promoted) = mv.promoted() {
        score += promoted.value();
    }
    let enemy = pos.side_to_move().opponent();
    if pos.attacks_by(enemy, Piece::Pawn).contains(mv.to()) {
        score -= mover;
    }
    score
}

/// Reorder `moves` in place by descending score; ties keep generation order.
pub fn order_moves(moves: &mut MoveList, pos: &Position, hash_move: Option<Move>) {
    moves
        .as_mut_slice()
        .sort_by_cached_key(|&mv| Reverse(score_move(pos, mv, hash_move)));
}

/// Random root order for helper threads.
pub fn shuffle_moves<R: Rng + ?Sized>(moves: &mut MoveList, rng: &mut R) {
    moves.as_mut_slice().shuffle(rng);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::board::Square;

    fn find(moves: &MoveList, from: &str, to: &str) -> Move {
        let from: Square = from.parse().unwrap();
        let to: Square = to.parse().unwrap();
        moves
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to)
            .unwrap()
    }

    #[test]
    fn test_capture_and_pawn_guard_scores() {
        let mut pos =
            Position::from_fen("r3k3/8/4p3/3p4/8/2N5/8/3QK3 w - - 0 1").unwrap();
        let moves = pos.generate_legal_moves();
        let nxd5 = find(&moves, "c3", "d5");
        // takes a pawn, lands on a square the e6 pawn covers
        assert_eq!(score_move(&pos, nxd5, None), 100 - 320 - 320);
        let nb5 = find(&moves, "c3", "b5");
        assert_eq!(score_move(&pos, nb5, None), 0);
        assert_eq!(score_move(&pos, nb5, Some(nb5)), HASH_MOVE_SCORE);
    }

    #[test]
    fn test_promotion_scores_promoted_value() {
        let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = pos.generate_legal_moves();
        let best = moves
            .iter()
            .copied()
            .max_by_key(|&m| score_move(&pos, m, None))
            .unwrap();
        assert_eq!(best.promoted(), Some(Piece::Queen));
        assert_eq!(score_move(&pos, best, None), 900);
    }

    #[test]
    fn test_order_moves_puts_hash_move_first_then_best_capture() {
        let mut pos =
            Position::from_fen("4k3/8/8/3q4/4P3/8/8/R3K3 w - - 0 1").unwrap();
        let mut moves = pos.generate_legal_moves();
        let rook_lift = find(&moves, "a1", "a2");
        order_moves(&mut moves, &pos, Some(rook_lift));
        assert_eq!(moves[0], rook_lift);
        let exd5 = moves[1];
        assert_eq!(exd5.captured(), Some(Piece::Queen));
        let scores: Vec<i32> = moves
            .iter()
            .skip(1)
            .map(|&m| score_move(&pos, m, None))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_shuffle_is_a_permutation_and_seeded() {
        let mut pos = Position::startpos();
        let original = pos.generate_legal_moves();
        let mut a = original.clone();
        let mut b = original.clone();
        shuffle_moves(&mut a, &mut StdRng::seed_from_u64(7));
        shuffle_moves(&mut b, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.as_slice(), b.as_slice());
        let mut sorted_a: Vec<String> = a.iter().map(ToString::to_string).collect();
        let mut sorted_o: Vec<String> = original.iter().map(ToString::to_string).collect();
        sorted_a.sort();
        sorted_o.sort();
        assert_eq!(sorted_a, sorted_o);
    }
}
