//! Making moves: the only way a [`Position`] changes during the game.

use crate::chess::core::{File, Move, Piece, PieceKind, Player, Rank, Square};
use crate::chess::position::Position;

impl Position {
    /// Plays a move of the side to move. See [`Position::apply`].
    pub fn make_move(&mut self, next_move: Move) {
        self.apply(next_move, self.side_to_move);
    }

    /// Plays `next_move` for `player`, which has to come from
    /// [`Position::legal_moves`] for the same player: other moves leave the
    /// position in an unspecified (but memory-safe) state.
    ///
    /// Afterwards the en passant square reflects only this move, castling
    /// rights are re-checked against the home squares, the opponent is to
    /// move and the outcome is set if a king was captured.
    pub fn apply(&mut self, next_move: Move, player: Player) {
        let backrank = Rank::backrank(player);
        let mut en_passant_square = None;
        match next_move {
            Move::CastleKingside => {
                self.relocate(player, (File::E, File::G), (File::H, File::F), backrank);
            },
            Move::CastleQueenside => {
                self.relocate(player, (File::E, File::C), (File::A, File::D), backrank);
            },
            Move::Normal {
                kind,
                from,
                to,
                capture,
            } => {
                let _ = self.board.take(from);
                // En passant is the only capture landing on an empty square.
                if capture && kind == PieceKind::Pawn && self.board.is_empty(to) {
                    if let Some(victim) = to.offset(0, -player.push_direction()) {
                        let _ = self.board.take(victim);
                    }
                }
                let _ = self.board.set(to, Some(Piece::new(player, kind)));
                if kind == PieceKind::Pawn && (to.rank() as i8 - from.rank() as i8).abs() == 2 {
                    en_passant_square = from.offset(0, player.push_direction());
                }
            },
            Move::Promotion {
                from,
                to,
                promotion,
                ..
            } => {
                let _ = self.board.take(from);
                let _ = self.board.set(to, Some(Piece::new(player, promotion.into())));
            },
        }
        self.en_passant_square = en_passant_square;
        self.update_castling();
        self.side_to_move = player.opponent();
        self.update_outcome();
    }

    fn relocate(
        &mut self,
        player: Player,
        (king_from, king_to): (File, File),
        (rook_from, rook_to): (File, File),
        backrank: Rank,
    ) {
        let _ = self.board.take(Square::new(king_from, backrank));
        let _ = self.board.take(Square::new(rook_from, backrank));
        let _ = self.board.set(
            Square::new(king_to, backrank),
            Some(Piece::new(player, PieceKind::King)),
        );
        let _ = self.board.set(
            Square::new(rook_to, backrank),
            Some(Piece::new(player, PieceKind::Rook)),
        );
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{CastleRights, Outcome};

    fn play(position: &mut Position, notation: &str) {
        let next_move = Move::from_notation(notation).unwrap();
        assert!(
            position.generate_moves().contains(&next_move),
            "{notation} is not legal in {position}"
        );
        position.make_move(next_move);
    }

    #[test]
    fn double_push_sets_en_passant_square() {
        let mut position = Position::starting();
        play(&mut position, "PE2E4");
        assert_eq!(position.en_passant_square(), Some(Square::E3));
        assert_eq!(position.side_to_move(), Player::Black);
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3"
        );
        play(&mut position, "NG8F6");
        assert_eq!(position.en_passant_square(), None);
    }

    #[test]
    fn en_passant_capture_removes_passed_pawn() {
        let mut position =
            Position::try_from("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3").unwrap();
        play(&mut position, "PD4xE3");
        assert_eq!(position.at(Square::E4), None);
        assert_eq!(
            position.at(Square::E3),
            Some(Piece::new(Player::Black, PieceKind::Pawn))
        );
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/ppp1pppp/8/8/8/4p3/PPPP1PPP/RNBQKBNR w KQkq -"
        );
    }

    #[test]
    fn castling_moves_king_and_rook() {
        let mut position = Position::try_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").unwrap();
        play(&mut position, "O-O");
        assert_eq!(position.to_string(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq -");
        play(&mut position, "O-O-O");
        assert_eq!(position.to_string(), "2kr3r/8/8/8/8/8/8/R4RK1 w - -");
    }

    #[test]
    fn castling_rights_never_come_back() {
        let mut position = Position::try_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").unwrap();
        play(&mut position, "RH1H2");
        assert_eq!(
            position.castling(),
            CastleRights::WHITE_LONG | CastleRights::BLACK_BOTH
        );
        play(&mut position, "KE8D8");
        assert_eq!(position.castling(), CastleRights::WHITE_LONG);
        // The rook returns to its home square: the right is still gone.
        play(&mut position, "RH2H1");
        play(&mut position, "KD8E8");
        assert_eq!(position.castling(), CastleRights::WHITE_LONG);
        assert!(!position.generate_moves().contains(&Move::CastleKingside));
    }

    #[test]
    fn capturing_rook_removes_right() {
        let mut position = Position::try_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").unwrap();
        play(&mut position, "RA1xA8");
        assert_eq!(
            position.castling(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_SHORT
        );
    }

    #[test]
    fn promotion() {
        let mut position = Position::try_from("1r2k3/P7/8/8/8/8/8/4K3 w - -").unwrap();
        play(&mut position, "PA7xB8=N");
        assert_eq!(position.to_string(), "1N2k3/8/8/8/8/8/8/4K3 b - -");
    }

    #[test]
    fn king_capture_ends_the_game() {
        // Walking next to the opponent's rook is allowed: there is no check.
        let mut position = Position::try_from("4k3/8/8/8/8/8/8/4K2R b - -").unwrap();
        play(&mut position, "KE8F7");
        play(&mut position, "RH1H7");
        assert_eq!(position.outcome(), None);
        play(&mut position, "KF7G8");
        play(&mut position, "RH7H8");
        play(&mut position, "KG8xH8");
        assert_eq!(position.outcome(), None);
        let mut position = Position::try_from("4k3/4R3/8/8/8/8/8/4K3 w - -").unwrap();
        play(&mut position, "RE7xE8");
        assert_eq!(position.outcome(), Some(Outcome::WhiteWins));
        assert_eq!(position.side_to_move(), Player::Black);
        assert!(position.generate_moves().is_empty());
    }
}
