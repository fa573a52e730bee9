//! Coordinate move notation (`e2e4`, `e7e8q`, `e1g1`).

use super::error::MoveParseError;
use super::types::{Move, Piece, Square};
use super::Position;

/// Coordinate text for `mv`. Castling is written as the king's move.
#[must_use]
pub fn format_move(_pos: &Position, mv: Move) -> String {
    mv.to_string()
}

/// Resolve coordinate text against the legal moves of `pos`.
///
/// # Example
/// ```
/// use chess_core::board::{parse_move, Position};
///
/// let mut pos = Position::startpos();
/// let mv = parse_move(&mut pos, "e2e4").unwrap();
/// assert!(mv.is_double_pawn_push());
/// ```
pub fn parse_move(pos: &mut Position, text: &str) -> Result<Move, MoveParseError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 4 || chars.len() > 5 {
        return Err(MoveParseError::InvalidLength { len: chars.len() });
    }

    let square = |file: char, rank: char| -> Option<Square> {
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Square::new(rank as u8 - b'1', file as u8 - b'a')
    };
    let (Some(from), Some(to)) = (square(chars[0], chars[1]), square(chars[2], chars[3])) else {
        return Err(MoveParseError::InvalidSquare {
            notation: text.to_string(),
        });
    };

    let promotion = match chars.get(4) {
        None => None,
        Some(&c) => match Piece::from_char(c) {
            Some(piece) if !matches!(piece, Piece::Pawn | Piece::King) => Some(piece),
            _ => return Err(MoveParseError::InvalidPromotion { char: c }),
        },
    };

    pos.generate_legal_moves()
        .iter()
        .copied()
        .find(|mv| mv.from() == from && mv.to() == to && mv.promoted() == promotion)
        .ok_or_else(|| MoveParseError::IllegalMove {
            notation: text.to_string(),
        })
}

impl Position {
    /// Parse a coordinate move and play it.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let mut pos = Position::startpos();
    /// pos.play_coordinate("e2e4").unwrap();
    /// pos.play_coordinate("e7e5").unwrap();
    /// ```
    pub fn play_coordinate(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = parse_move(self, text)?;
        self.play(mv);
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip_over_legal_moves() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for mv in pos.generate_legal_moves().iter().copied() {
            let text = format_move(&pos, mv);
            assert_eq!(parse_move(&mut pos, &text), Ok(mv));
        }
    }

    #[test]
    fn test_castling_and_promotion_text() {
        let mut pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = parse_move(&mut pos, "e1g1").unwrap();
        assert!(castle.is_castling());
        let promo = parse_move(&mut pos, "b7b8n").unwrap();
        assert_eq!(promo.promoted(), Some(Piece::Knight));
        assert_eq!(format_move(&pos, promo), "b7b8n");
    }

    #[test]
    fn test_parse_errors() {
        let mut pos = Position::startpos();
        assert_eq!(
            parse_move(&mut pos, "e2"),
            Err(MoveParseError::InvalidLength { len: 2 })
        );
        assert!(matches!(
            parse_move(&mut pos, "i2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert_eq!(
            parse_move(&mut pos, "e2e4k"),
            Err(MoveParseError::InvalidPromotion { char: 'k' })
        );
        assert!(matches!(
            parse_move(&mut pos, "e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        // a promotion suffix on a non-promoting move does not match
        assert!(parse_move(&mut pos, "e2e4q").is_err());
    }

    #[test]
    fn test_play_coordinate_applies_move() {
        let mut pos = Position::startpos();
        pos.play_coordinate("g1f3").unwrap();
        assert_eq!(pos.side_to_move(), crate::board::Color::Black);
        assert!(pos.play_coordinate("g1f3").is_err());
    }
}
