use std::str::FromStr;

use super::error::{FenError, PositionError};
use super::types::{CastleSide, Color, Piece, Square};
use super::Position;

/// FEN of the standard starting position
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn piece_from_fen_char(c: char) -> Option<(Color, Piece)> {
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    Piece::from_char(c).map(|piece| (color, piece))
}

impl Position {
    /// Build a position from 64 square contents, rank 8 to rank 1 and file a to h.
    ///
    /// Each entry is one of `RNBQKPrnbqkp`, or a blank (`' '`, `'.'`) for an empty
    /// square. Castling rights are granted wherever king and rook still stand on their
    /// home squares; there is no en passant square and the move counter starts at 0.
    pub fn from_squares(squares: &[char; 64], side_to_move: Color) -> Result<Self, PositionError> {
        let mut pos = Position::empty();
        for (index, &c) in squares.iter().enumerate() {
            if c == ' ' || c == '.' {
                continue;
            }
            let (color, piece) =
                piece_from_fen_char(c).ok_or(PositionError::InvalidPiece { index, char: c })?;
            let rank = 7 - (index / 8) as u8;
            let file = (index % 8) as u8;
            pos.set_piece(Square::at(rank, file), color, piece);
        }
        pos.side_to_move = side_to_move;
        pos.check_kings()?;

        for color in Color::BOTH {
            for side in [CastleSide::King, CastleSide::Queen] {
                let path = super::types::castling_path(color, side);
                if pos.pieces(color, Piece::King).contains(path.king_from)
                    && pos.pieces(color, Piece::Rook).contains(path.rook_from)
                {
                    pos.castling_rights.set(color, side);
                }
            }
        }

        pos.finish_setup();
        Ok(pos)
    }

    /// Parse a position from FEN.
    ///
    /// The halfmove clock is checked but not kept; the fullmove number seeds the ply
    /// counter. Missing clock fields default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let (color, piece) =
                    piece_from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file + 1,
                    });
                }
                pos.set_piece(Square::at(7 - rank_idx as u8, file as u8), color, piece);
                file += 1;
            }
            if file > 8 {
                return Err(FenError::TooManyFiles {
                    rank: rank_idx,
                    files: file,
                });
            }
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in parts[2].chars() {
            match c {
                'K' => pos.castling_rights.set(Color::White, CastleSide::King),
                'Q' => pos.castling_rights.set(Color::White, CastleSide::Queen),
                'k' => pos.castling_rights.set(Color::Black, CastleSide::King),
                'q' => pos.castling_rights.set(Color::Black, CastleSide::Queen),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        pos.en_passant_file = if parts[3] == "-" {
            None
        } else {
            let sq = Square::from_str(parts[3]).map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            let expected_rank = match pos.side_to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if sq.rank() != expected_rank {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            Some(sq.file())
        };

        let number = |field: Option<&&str>, default: u32| -> Result<u32, FenError> {
            field.map_or(Ok(default), |s| {
                s.parse().map_err(|_| FenError::InvalidMoveNumber {
                    found: (*s).to_string(),
                })
            })
        };
        let _halfmove_clock = number(parts.get(4), 0)?;
        let fullmove = number(parts.get(5), 1)?.max(1);
        pos.move_count = (fullmove - 1)
            .checked_mul(2)
            .and_then(|plies| plies.checked_add(u32::from(pos.side_to_move == Color::Black)))
            .ok_or_else(|| FenError::InvalidMoveNumber {
                found: fullmove.to_string(),
            })?;

        pos.check_kings()?;
        pos.finish_setup();
        Ok(pos)
    }

    fn check_kings(&self) -> Result<(), PositionError> {
        for color in Color::BOTH {
            let count = self.pieces(color, Piece::King).popcount();
            if count != 1 {
                return Err(PositionError::InvalidKingCount { color, count });
            }
        }
        Ok(())
    }

    /// Write the position as FEN. The halfmove clock is not tracked and written as 0.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square::at(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let mut castling = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ] {
            if self.castling_rights.has(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant_square()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} 0 {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.move_count / 2 + 1
        )
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl TryFrom<[char; 64]> for Position {
    type Error = PositionError;

    /// White to move
    fn try_from(squares: [char; 64]) -> Result<Self, Self::Error> {
        Position::from_squares(&squares, Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{CastlingRights, CASTLE_BLACK_Q, CASTLE_WHITE_K};

    #[rustfmt::skip]
    const START_SQUARES: [char; 64] = [
        'r', 'n', 'b', 'q', 'k', 'b', 'n', 'r',
        'p', 'p', 'p', 'p', 'p', 'p', 'p', 'p',
        ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
        ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
        ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
        ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
        'P', 'P', 'P', 'P', 'P', 'P', 'P', 'P',
        'R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R',
    ];

    #[test]
    fn test_fen_round_trip() {
        let pos = Position::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(pos.to_fen(), STARTPOS_FEN);
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn test_square_array_matches_startpos() {
        let pos = Position::from_squares(&START_SQUARES, Color::White).unwrap();
        assert_eq!(pos, Position::startpos());
        assert_eq!(pos.move_count(), 0);
    }

    #[test]
    fn test_square_array_infers_castling_from_home_squares() {
        let mut squares = START_SQUARES;
        squares[63] = ' '; // no rook on h1
        squares[0] = '.'; // no rook on a8
        let pos = Position::from_squares(&squares, Color::Black).unwrap();
        let rights = pos.castling_rights();
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::King));
        assert!(!rights.has(Color::Black, CastleSide::Queen));
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.en_passant_file(), None);
    }

    #[test]
    fn test_square_array_rejects_unknown_piece() {
        let mut squares = START_SQUARES;
        squares[20] = 'x';
        assert_eq!(
            Position::from_squares(&squares, Color::White),
            Err(PositionError::InvalidPiece {
                index: 20,
                char: 'x'
            })
        );
    }

    #[test]
    fn test_fen_black_to_move_with_en_passant() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.en_passant_file(), Some(4));
        assert_eq!(pos.move_count(), 1);
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn test_fullmove_seeds_move_counter() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 12 30").unwrap();
        assert_eq!(pos.move_count(), 58);
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 30").unwrap();
        assert_eq!(pos.move_count(), 59);
    }

    #[test]
    fn test_huge_fullmove_is_rejected() {
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 4294967295"),
            Err(FenError::InvalidMoveNumber { .. })
        ));
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 2147483648").unwrap();
        assert_eq!(pos.move_count(), u32::MAX);
    }

    #[test]
    fn test_fen_errors() {
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
            Err(FenError::TooFewParts { found: 2 })
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiece { char: 'x' })
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1"),
            Err(FenError::InvalidCastling { char: 'X' })
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"),
            Err(FenError::InvalidMoveNumber { .. })
        ));
        assert!(matches!(
            Position::from_fen("rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1"),
            Err(FenError::InvalidKingCount {
                color: Color::Black,
                count: 0
            })
        ));
    }

    #[test]
    fn test_from_str_trait() {
        let pos: Position = STARTPOS_FEN.parse().unwrap();
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn test_castling_rights_parse() {
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
        assert_eq!(
            pos.castling_rights(),
            CastlingRights::from_u8(CASTLE_WHITE_K | CASTLE_BLACK_Q)
        );
    }
}
