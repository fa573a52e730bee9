//! Applying and reverting moves.
//!
//! `make_move` updates the board bits together with the Zobrist hash, the piece-square
//! sums, castling rights, the en passant file and the attack sets. `unmake_move` restores
//! the snapshot kept in the [`UndoToken`] and XORs the same bits back. Search code pairs
//! the two through [`MoveGuard`], which reverts when it goes out of scope.

use std::ops::{Deref, DerefMut};

use crate::zobrist::ZOBRIST;

use super::pst::pst_terms;
use super::types::{
    castling_path, Bitboard, CastleSide, Color, Move, MoveKind, Piece, Square,
    CASTLING_SPOILERS,
};
use super::{NullUndoToken, Position, UndoToken};

/// Bonus for having castled, white-relative
const KINGSIDE_CASTLE_BONUS: i32 = 35;
const QUEENSIDE_CASTLE_BONUS: i32 = 15;

impl Position {
    /// Flip one piece's bit in the piece, color and combined boards.
    #[inline]
    fn xor_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] ^= bit;
        self.occupied[color.index()] ^= bit;
        self.all_occupied ^= bit;
    }

    /// Add or remove a piece, keeping hash and piece-square sums in step.
    #[inline]
    fn toggle_tracked(&mut self, color: Color, piece: Piece, sq: Square, adding: bool) {
        self.xor_piece(color, piece, sq);
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        let (opening, endgame) = pst_terms(color, piece, sq);
        if adding {
            self.pst_opening += opening;
            self.pst_endgame += endgame;
        } else {
            self.pst_opening -= opening;
            self.pst_endgame -= endgame;
        }
    }

    /// Recompute the attack sets a move can have changed: the pieces that moved,
    /// appeared or disappeared, and every slider on both sides.
    fn refresh_attacks_after(&mut self, mv: Move, mover: Color) {
        self.refresh_attacks(mover, mv.piece());
        if let Some(promoted) = mv.promoted() {
            self.refresh_attacks(mover, promoted);
        }
        if let Some(captured) = mv.captured() {
            self.refresh_attacks(mover.opponent(), captured);
        }
        for color in Color::BOTH {
            for piece in Piece::SLIDERS {
                self.refresh_attacks(color, piece);
            }
        }
    }

    /// Square of the pawn removed by an en passant capture: the target's file on the
    /// capturing pawn's rank
    #[inline]
    fn en_passant_victim(mv: Move) -> Square {
        Square::at(mv.from().rank(), mv.to().file())
    }

    /// Apply `mv` and return the token that undoes it.
    pub fn make_move(&mut self, mv: Move) -> UndoToken {
        let token = UndoToken {
            en_passant_file: self.en_passant_file,
            castling_rights: self.castling_rights,
            hash: self.hash,
            pst_opening: self.pst_opening,
            pst_endgame: self.pst_endgame,
            castle_bonus: self.castle_bonus,
            reversible_plies: self.reversible_plies,
        };

        let color = self.side_to_move;
        let opp = color.opponent();

        match mv.kind() {
            MoveKind::Castle(side) => {
                let path = castling_path(color, side);
                self.pieces[color.index()][Piece::King.index()] ^= path.king_mask;
                self.pieces[color.index()][Piece::Rook.index()] ^= path.rook_mask;
                self.occupied[color.index()] ^= path.king_mask | path.rook_mask;
                self.all_occupied ^= path.king_mask | path.rook_mask;

                for (piece, from, to) in [
                    (Piece::King, path.king_from, path.king_to),
                    (Piece::Rook, path.rook_from, path.rook_to),
                ] {
                    self.hash ^= ZOBRIST.piece(color, piece, from) ^ ZOBRIST.piece(color, piece, to);
                    let (from_o, from_e) = pst_terms(color, piece, from);
                    let (to_o, to_e) = pst_terms(color, piece, to);
                    self.pst_opening += to_o - from_o;
                    self.pst_endgame += to_e - from_e;
                }

                let bonus = match side {
                    CastleSide::King => KINGSIDE_CASTLE_BONUS,
                    CastleSide::Queen => QUEENSIDE_CASTLE_BONUS,
                };
                self.castle_bonus += color.sign() * bonus;
            }
            MoveKind::EnPassant => {
                self.toggle_tracked(opp, Piece::Pawn, Self::en_passant_victim(mv), false);
                self.toggle_tracked(color, Piece::Pawn, mv.from(), false);
                self.toggle_tracked(color, Piece::Pawn, mv.to(), true);
            }
            MoveKind::Normal | MoveKind::DoublePawnPush => {
                if let Some(captured) = mv.captured() {
                    self.toggle_tracked(opp, captured, mv.to(), false);
                }
                self.toggle_tracked(color, mv.piece(), mv.from(), false);
                let placed = mv.promoted().unwrap_or(mv.piece());
                self.toggle_tracked(color, placed, mv.to(), true);
            }
        }

        // en passant file
        self.hash ^= ZOBRIST.en_passant(self.en_passant_file);
        self.en_passant_file = mv.is_double_pawn_push().then(|| mv.from().file());
        self.hash ^= ZOBRIST.en_passant(self.en_passant_file);

        // castling rights lost by moving from or capturing on a home square
        let spoiled = CASTLING_SPOILERS[mv.from().index()] | CASTLING_SPOILERS[mv.to().index()];
        if spoiled & self.castling_rights.as_u8() != 0 {
            self.hash ^= ZOBRIST.castling(self.castling_rights);
            self.castling_rights.clear_mask(spoiled);
            self.hash ^= ZOBRIST.castling(self.castling_rights);
        }

        self.refresh_attacks_after(mv, color);

        self.side_to_move = opp;
        self.hash ^= ZOBRIST.black_to_move_key;
        self.move_count += 1;
        self.reversible_plies = if mv.piece() == Piece::Pawn || mv.is_capture() {
            0
        } else {
            self.reversible_plies + 1
        };
        self.history.push(self.hash);

        token
    }

    /// Revert `mv`, which must be the last move made, using its token.
    pub fn unmake_move(&mut self, mv: Move, token: UndoToken) {
        self.history.pop();
        self.side_to_move = self.side_to_move.opponent();
        self.move_count -= 1;
        self.en_passant_file = token.en_passant_file;
        self.castling_rights = token.castling_rights;
        self.hash = token.hash;
        self.pst_opening = token.pst_opening;
        self.pst_endgame = token.pst_endgame;
        self.castle_bonus = token.castle_bonus;
        self.reversible_plies = token.reversible_plies;

        let color = self.side_to_move;
        let opp = color.opponent();

        match mv.kind() {
            MoveKind::Castle(side) => {
                let path = castling_path(color, side);
                self.pieces[color.index()][Piece::King.index()] ^= path.king_mask;
                self.pieces[color.index()][Piece::Rook.index()] ^= path.rook_mask;
                self.occupied[color.index()] ^= path.king_mask | path.rook_mask;
                self.all_occupied ^= path.king_mask | path.rook_mask;
            }
            MoveKind::EnPassant => {
                self.xor_piece(color, Piece::Pawn, mv.to());
                self.xor_piece(color, Piece::Pawn, mv.from());
                self.xor_piece(opp, Piece::Pawn, Self::en_passant_victim(mv));
            }
            MoveKind::Normal | MoveKind::DoublePawnPush => {
                let placed = mv.promoted().unwrap_or(mv.piece());
                self.xor_piece(color, placed, mv.to());
                self.xor_piece(color, mv.piece(), mv.from());
                if let Some(captured) = mv.captured() {
                    self.xor_piece(opp, captured, mv.to());
                }
            }
        }

        self.refresh_attacks_after(mv, color);
    }

    /// Pass the turn without moving.
    pub fn make_null_move(&mut self) -> NullUndoToken {
        let token = NullUndoToken {
            en_passant_file: self.en_passant_file,
            hash: self.hash,
            reversible_plies: self.reversible_plies,
        };
        self.hash ^= ZOBRIST.en_passant(self.en_passant_file);
        self.en_passant_file = None;
        self.side_to_move = self.side_to_move.opponent();
        self.hash ^= ZOBRIST.black_to_move_key;
        self.reversible_plies = 0;
        self.history.push(self.hash);
        token
    }

    pub fn unmake_null_move(&mut self, token: NullUndoToken) {
        self.history.pop();
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant_file = token.en_passant_file;
        self.hash = token.hash;
        self.reversible_plies = token.reversible_plies;
    }

    /// Apply a move for good, e.g. when replaying a game's move list.
    pub fn play(&mut self, mv: Move) {
        let _ = self.make_move(mv);
    }
}

/// A move applied to a position for as long as the guard lives.
///
/// Dereferences to the position after the move; dropping the guard unmakes it, on every
/// exit path.
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
    mv: Move,
    token: UndoToken,
}

impl<'a> MoveGuard<'a> {
    pub fn new(pos: &'a mut Position, mv: Move) -> Self {
        let token = pos.make_move(mv);
        MoveGuard { pos, mv, token }
    }

    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        self.pos
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pos
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.pos.unmake_move(self.mv, self.token);
    }
}

/// A passed turn, undone on drop.
pub struct NullMoveGuard<'a> {
    pos: &'a mut Position,
    token: NullUndoToken,
}

impl<'a> NullMoveGuard<'a> {
    pub fn new(pos: &'a mut Position) -> Self {
        let token = pos.make_null_move();
        NullMoveGuard { pos, token }
    }
}

impl Deref for NullMoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        self.pos
    }
}

impl DerefMut for NullMoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pos
    }
}

impl Drop for NullMoveGuard<'_> {
    fn drop(&mut self) {
        self.pos.unmake_null_move(self.token);
    }
}
