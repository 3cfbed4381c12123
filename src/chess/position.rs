//! Provides fully-specified [Chess Position] implementation: stores the board,
//! castling rights, en passant target, side to move and the outcome of the
//! game, if it has already ended.
//!
//! Move generation and move making extend [`Position`] in
//! [`crate::chess::movegen`] and [`crate::chess::apply`].
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;

use anyhow::bail;

use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    File,
    Outcome,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
};

/// State of the game. Has 1:1 relationship with the first four fields of
/// [Forsyth-Edwards Notation] (FEN): the variant has no fifty-move rule, so
/// the clocks are not tracked.
///
/// The outcome is not stored in FEN: it is derived from the board. A player
/// without a king has lost.
///
/// Planning components (the search, move sources doing lookahead) always work
/// on their own copies: [`Position`] is [`Copy`] and compares by value, which
/// is also how a player notices that the game moved on without it.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(super) board: Board,
    pub(super) castling: CastleRights,
    pub(super) side_to_move: Player,
    pub(super) en_passant_square: Option<Square>,
    pub(super) outcome: Option<Outcome>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use flipper::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self::from_parts(Board::starting(), CastleRights::ALL, Player::White, None)
    }

    /// Assembles a position and brings the derived state in line with the
    /// board: castling rights are kept only where the king and the rook still
    /// stand on their original squares, and the outcome reflects missing
    /// kings.
    pub(super) fn from_parts(
        board: Board,
        castling: CastleRights,
        side_to_move: Player,
        en_passant_square: Option<Square>,
    ) -> Self {
        let mut position = Self {
            board,
            castling,
            side_to_move,
            en_passant_square,
            outcome: None,
        };
        position.update_castling();
        position.update_outcome();
        position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// The square a pawn passed over during the last move, if it was a double
    /// push. Only valid for the move immediately following it.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Terminal result of the game, if it is already decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Marks the game as finished. Used when the side to move runs out of
    /// candidates and forfeits. An already decided game is not changed.
    pub fn resign(&mut self, player: Player) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::win_for(player.opponent()));
        }
    }

    /// Removes the rights whose king or rook has left its home square. Rights
    /// are never restored.
    pub(super) fn update_castling(&mut self) {
        for player in [Player::White, Player::Black] {
            let backrank = Rank::backrank(player);
            let stands = |file: File, kind: PieceKind| {
                self.board.at(Square::new(file, backrank)) == Some(Piece::new(player, kind))
            };
            let king_home = stands(File::E, PieceKind::King);
            let short_rook_home = stands(File::H, PieceKind::Rook);
            let long_rook_home = stands(File::A, PieceKind::Rook);
            if !(king_home && short_rook_home) {
                self.castling.remove(CastleRights::short(player));
            }
            if !(king_home && long_rook_home) {
                self.castling.remove(CastleRights::long(player));
            }
        }
    }

    /// Sets the outcome once a king is gone. If both are missing (which only
    /// a hand-written position can express) White is declared the winner.
    pub(super) fn update_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if !self.board.has_king(Player::Black) {
            self.outcome = Some(Outcome::WhiteWins);
        } else if !self.board.has_king(Player::White) {
            self.outcome = Some(Outcome::BlackWins);
        }
    }

    /// Parses the position from FEN. The halfmove clock and fullmove counter
    /// are optional and ignored when present.
    ///
    /// # Errors
    ///
    /// If the input is not a valid FEN or describes a board that can not
    /// occur in a game (too many pieces, several kings of one color, en
    /// passant square on a wrong rank).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let board = match parts.next() {
            Some(placement) => Board::from_placement(placement)?,
            None => bail!("incorrect FEN: missing pieces placement"),
        };
        let side_to_move: Player = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        let castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        let en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => {
                let square = Square::try_from(value)?;
                // The target is behind the pawn that has just double-pushed,
                // i.e. the opponent of the side to move.
                let expected = Rank::en_passant_origin(side_to_move.opponent());
                let behind = match side_to_move {
                    Player::White => Rank::Six,
                    Player::Black => Rank::Three,
                };
                if square.rank() != behind {
                    bail!("incorrect FEN: en passant square {square} should be on rank {behind}, the double-pushed pawn stands on rank {expected}");
                }
                Some(square)
            },
            None => bail!("incorrect FEN: missing en passant square"),
        };
        match (parts.next(), parts.next()) {
            (None, None) => (),
            (Some(halfmove), Some(fullmove)) => {
                for clock in [halfmove, fullmove] {
                    if clock.is_empty() || !clock.bytes().all(|c| c.is_ascii_digit()) {
                        bail!("incorrect FEN: move clock can only contain digits, got {clock}");
                    }
                }
            },
            _ => bail!("incorrect FEN: halfmove clock and fullmove counter go together"),
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        Ok(Self::from_parts(board, castling, side_to_move, en_passant_square))
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input (surrounding whitespace, optional `fen ` prefix)
    /// and parses it with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        match input.strip_prefix("fen ") {
            Some(stripped) => Self::from_fen(stripped),
            None => Self::from_fen(input),
        }
    }
}

impl fmt::Display for Position {
    /// Prints the position in (four-field) Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square}"),
            None => write!(f, "-"),
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "Outcome: {:?}", &self.outcome)?;
        writeln!(f, "FEN: {self}")?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup(fen: &str) -> Position {
        let position = Position::try_from(fen);
        assert!(position.is_ok(), "input: {fen}");
        let position = position.unwrap();
        assert_eq!(position.to_string(), fen);
        position
    }

    #[test]
    fn correct_fen() {
        assert_eq!(
            setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Position::starting()
        );
        let _ = setup("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - -");
        let _ = setup("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6");
        let _ = setup("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q -");
        let _ = setup("rnbqkbnr/pppp1ppp/8/8/4pP2/8/PPPPP1PP/RNBQKBNR b KQkq f3");
    }

    #[test]
    fn clocks_are_ignored() {
        let position =
            Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(position, Position::starting());
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
        );
        assert!(Position::try_from(
            "\n fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 12 40\n"
        )
        .is_ok());
    }

    #[test]
    fn incorrect_fen() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w kqKQ -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - a 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR  w KQkq -",
        ] {
            assert!(Position::try_from(fen).is_err(), "input: {fen}");
        }
    }

    #[test]
    fn castling_rights_follow_the_board() {
        // Rights without the rook on its home square are dropped.
        let position = Position::try_from("r3k3/8/8/8/8/8/8/4K2R w KQkq -").unwrap();
        assert_eq!(
            position.castling(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG
        );
        // No king on e1: no white rights at all.
        let position = Position::try_from("r3k2r/8/8/8/8/8/8/R2K3R w KQkq -").unwrap();
        assert_eq!(position.castling(), CastleRights::BLACK_BOTH);
    }

    #[test]
    fn outcome_from_missing_king() {
        assert_eq!(Position::starting().outcome(), None);
        let position = Position::try_from("8/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(position.outcome(), Some(Outcome::WhiteWins));
        let position = Position::try_from("4k3/8/8/8/8/8/8/8 w - -").unwrap();
        assert_eq!(position.outcome(), Some(Outcome::BlackWins));
        let position = Position::try_from("8/8/8/8/8/8/8/8 w - -").unwrap();
        assert_eq!(position.outcome(), Some(Outcome::WhiteWins));
    }

    #[test]
    fn resign() {
        let mut position = Position::starting();
        position.resign(Player::Black);
        assert_eq!(position.outcome(), Some(Outcome::WhiteWins));
        // The first result sticks.
        position.resign(Player::White);
        assert_eq!(position.outcome(), Some(Outcome::WhiteWins));
    }

    #[test]
    fn debug_dump() {
        let dump = format!("{:?}", Position::starting());
        assert!(dump.contains("Player to move: White"));
        assert!(dump.contains("FEN: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"));
    }
}
