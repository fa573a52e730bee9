use crate::zobrist::ZOBRIST;

use super::attack_tables::piece_attacks;
use super::pst::pst_terms;
use super::types::{Bitboard, CastlingRights, Color, Piece, Square};

/// Everything `unmake_move` needs to restore besides the board bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoToken {
    pub(crate) en_passant_file: Option<u8>,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) hash: u64,
    pub(crate) pst_opening: i32,
    pub(crate) pst_endgame: i32,
    pub(crate) castle_bonus: i32,
    pub(crate) reversible_plies: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullUndoToken {
    pub(crate) en_passant_file: Option<u8>,
    pub(crate) hash: u64,
    pub(crate) reversible_plies: u32,
}

/// A chess position with incrementally maintained hash, piece-square sums and
/// attack sets.
///
/// One owner mutates it through make/unmake; parallel search workers each get a clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_file: Option<u8>,
    pub(crate) hash: u64,
    // white-relative piece-square sums
    pub(crate) pst_opening: i32,
    pub(crate) pst_endgame: i32,
    // white-relative bonus collected by castling
    pub(crate) castle_bonus: i32,
    // squares attacked by each (color, piece type), own pieces not masked out
    pub(crate) attacks: [[Bitboard; 6]; 2],
    // hash of every position since construction, current one last
    pub(crate) history: Vec<u64>,
    // plies since the last capture, pawn move or null move
    pub(crate) reversible_plies: u32,
    pub(crate) move_count: u32,
}

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn startpos() -> Self {
        let mut pos = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            let file = file as u8;
            pos.set_piece(Square::at(0, file), Color::White, *piece);
            pos.set_piece(Square::at(7, file), Color::Black, *piece);
            pos.set_piece(Square::at(1, file), Color::White, Piece::Pawn);
            pos.set_piece(Square::at(6, file), Color::Black, Piece::Pawn);
        }
        pos.castling_rights = CastlingRights::all();
        pos.finish_setup();
        pos
    }

    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_file: None,
            hash: 0,
            pst_opening: 0,
            pst_endgame: 0,
            castle_bonus: 0,
            attacks: [[Bitboard::EMPTY; 6]; 2],
            history: Vec::with_capacity(256),
            reversible_plies: 0,
            move_count: 0,
        }
    }

    /// Derive hash, piece-square sums, attack sets and history from the placed pieces.
    pub(crate) fn finish_setup(&mut self) {
        self.hash = self.compute_hash();
        let (opening, endgame) = self.compute_pst();
        self.pst_opening = opening;
        self.pst_endgame = endgame;
        self.refresh_all_attacks();
        self.history.clear();
        self.history.push(self.hash);
        self.reversible_plies = 0;
    }

    #[inline]
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
    }

    /// Piece and color on `sq`, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        if !self.all_occupied.contains(sq) {
            return None;
        }
        let color = if self.occupied[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        self.piece_of(color, sq).map(|piece| (color, piece))
    }

    /// Piece type of `color` standing on `sq`, by scanning that side's boards
    #[inline]
    pub(crate) fn piece_of(&self, color: Color, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[color.index()][p.index()].contains(sq))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        !self.all_occupied.contains(sq)
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn all_occupancy(&self) -> Bitboard {
        self.all_occupied
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).lsb()
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// File of the pawn that just made a double push, if any
    #[inline]
    #[must_use]
    pub fn en_passant_file(&self) -> Option<u8> {
        self.en_passant_file
    }

    /// The square a capturing pawn would land on for en passant
    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        let rank = match self.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        self.en_passant_file.map(|file| Square::at(rank, file))
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Plies played, seeded from the FEN fullmove number
    #[inline]
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Incremental (opening, endgame) piece-square sums, white-relative
    #[must_use]
    pub fn pst_scores(&self) -> (i32, i32) {
        (self.pst_opening, self.pst_endgame)
    }

    /// Squares attacked by `color`'s pieces of type `piece`
    #[inline]
    #[must_use]
    pub fn attacks_by(&self, color: Color, piece: Piece) -> Bitboard {
        self.attacks[color.index()][piece.index()]
    }

    /// Zobrist hash derived from scratch
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece) {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }
        hash ^= ZOBRIST.castling(self.castling_rights);
        hash ^= ZOBRIST.en_passant(self.en_passant_file);
        hash
    }

    /// Piece-square sums derived from scratch
    #[must_use]
    pub fn compute_pst(&self) -> (i32, i32) {
        let mut opening = 0;
        let mut endgame = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece) {
                    let (o, e) = pst_terms(color, piece, sq);
                    opening += o;
                    endgame += e;
                }
            }
        }
        (opening, endgame)
    }

    #[inline]
    pub(crate) fn refresh_attacks(&mut self, color: Color, piece: Piece) {
        let mut attacked = Bitboard::EMPTY;
        for sq in self.pieces(color, piece) {
            attacked |= piece_attacks(piece, color, sq, self.all_occupied);
        }
        self.attacks[color.index()][piece.index()] = attacked;
    }

    pub(crate) fn refresh_all_attacks(&mut self) {
        for color in Color::BOTH {
            for piece in Piece::ALL {
                self.refresh_attacks(color, piece);
            }
        }
    }

    /// The same position flipped top to bottom with colors swapped.
    #[must_use]
    pub fn mirrored(&self) -> Position {
        let mut pos = Position::empty();
        for color in Color::BOTH {
            for piece in Piece::ALL {
                pos.pieces[color.opponent().index()][piece.index()] =
                    self.pieces(color, piece).flip_vertical();
            }
            pos.occupied[color.opponent().index()] = self.occupancy(color).flip_vertical();
        }
        pos.all_occupied = self.all_occupied.flip_vertical();
        pos.side_to_move = self.side_to_move.opponent();
        pos.castling_rights = self.castling_rights.swap_colors();
        pos.en_passant_file = self.en_passant_file;
        pos.castle_bonus = -self.castle_bonus;
        pos.move_count = self.move_count;
        pos.finish_setup();
        pos
    }

    /// True if `color` has a piece other than pawns and king
    #[must_use]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .any(|&p| self.pieces(color, p).any())
    }

    /// How often the current position occurred since the last irreversible move,
    /// counting the current occurrence.
    #[must_use]
    pub fn repetition_count(&self) -> u32 {
        let Some(last) = self.history.len().checked_sub(1) else {
            return 0;
        };
        let window = (self.reversible_plies as usize).min(last);
        self.history[last - window..]
            .iter()
            .rev()
            .step_by(2)
            .filter(|&&h| h == self.hash)
            .count() as u32
    }

    #[must_use]
    pub fn is_repetition_draw(&self) -> bool {
        self.repetition_count() >= 3
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}
