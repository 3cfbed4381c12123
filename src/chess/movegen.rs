//! Move generation for the variant.
//!
//! There is no concept of check: every geometrically possible move is
//! playable, including moves that leave the king attacked or capture the
//! opponent's king (which ends the game). Castling only requires the right and
//! empty squares between the king and the rook.

use strum::IntoEnumIterator;

use crate::chess::core::{
    CastleRights,
    Direction,
    File,
    Move,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};
use crate::chess::position::Position;

/// Offsets reachable by a king: a single step in any direction.
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

impl Position {
    /// Calculates the list of moves the side to move can propose.
    ///
    /// Returns an empty list once the game is decided.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.legal_moves(self.side_to_move)
    }

    /// Calculates the moves of given player. The en passant square is only
    /// considered when it belongs to the pawn that `player`'s opponent has just
    /// double-pushed.
    ///
    /// Returns an empty list once the game is decided.
    #[must_use]
    pub fn legal_moves(&self, player: Player) -> MoveList {
        let mut moves = MoveList::new();
        if self.outcome.is_some() {
            return moves;
        }
        self.generate_castling(player, &mut moves);
        self.generate_en_passant(player, &mut moves);
        for (from, kind) in self.board.pieces(player) {
            match kind {
                PieceKind::King => self.generate_steps(player, kind, from, &KING_STEPS, &mut moves),
                PieceKind::Queen => {
                    self.generate_slides(player, kind, from, &Direction::ORTHOGONAL, &mut moves);
                    self.generate_slides(player, kind, from, &Direction::DIAGONAL, &mut moves);
                },
                PieceKind::Rook => {
                    self.generate_slides(player, kind, from, &Direction::ORTHOGONAL, &mut moves);
                },
                PieceKind::Bishop => {
                    self.generate_slides(player, kind, from, &Direction::DIAGONAL, &mut moves);
                },
                PieceKind::Knight => {
                    self.generate_steps(player, kind, from, &KNIGHT_JUMPS, &mut moves);
                },
                PieceKind::Pawn => self.generate_pawn_moves(player, from, &mut moves),
            }
        }
        moves
    }

    fn generate_castling(&self, player: Player, moves: &mut MoveList) {
        let backrank = Rank::backrank(player);
        let empty = |files: &[File]| {
            files
                .iter()
                .all(|file| self.board.is_empty(Square::new(*file, backrank)))
        };
        if self.castling.contains(CastleRights::long(player))
            && empty(&[File::B, File::C, File::D])
        {
            moves.push(Move::CastleQueenside);
        }
        if self.castling.contains(CastleRights::short(player))
            && empty(&[File::F, File::G])
        {
            moves.push(Move::CastleKingside);
        }
    }

    /// The captured pawn stands one rank behind the target square (from the
    /// capturing side's perspective), so the move lands on an empty square.
    fn generate_en_passant(&self, player: Player, moves: &mut MoveList) {
        let Some(target) = self.en_passant_square else {
            return;
        };
        let back = -player.push_direction();
        let Some(victim) = target.offset(0, back) else {
            return;
        };
        if victim.rank() != Rank::en_passant_origin(player)
            || !self.board.is_empty(target)
            || self.board.at(victim)
                != Some(Piece::new(player.opponent(), PieceKind::Pawn))
        {
            return;
        }
        for side in [-1, 1] {
            let Some(from) = target.offset(side, back) else {
                continue;
            };
            if self.board.at(from) == Some(Piece::new(player, PieceKind::Pawn)) {
                moves.push(Move::Normal {
                    kind: PieceKind::Pawn,
                    from,
                    to: target,
                    capture: true,
                });
            }
        }
    }

    /// Kings and knights: every offset is checked independently.
    fn generate_steps(
        &self,
        player: Player,
        kind: PieceKind,
        from: Square,
        offsets: &[(i8, i8)],
        moves: &mut MoveList,
    ) {
        for &(file_delta, rank_delta) in offsets {
            let Some(to) = from.offset(file_delta, rank_delta) else {
                continue;
            };
            if self.board.is_owned_by(to, player) {
                continue;
            }
            moves.push(Move::Normal {
                kind,
                from,
                to,
                capture: self.board.is_owned_by(to, player.opponent()),
            });
        }
    }

    /// Sliding pieces: each ray continues until it leaves the board or hits a
    /// piece. An opponent's piece is captured, an own piece blocks.
    fn generate_slides(
        &self,
        player: Player,
        kind: PieceKind,
        from: Square,
        directions: &[Direction],
        moves: &mut MoveList,
    ) {
        for &direction in directions {
            let mut current = from;
            while let Some(to) = current.shift(direction) {
                match self.board.at(to) {
                    None => moves.push(Move::Normal {
                        kind,
                        from,
                        to,
                        capture: false,
                    }),
                    Some(piece) => {
                        if piece.owner != player {
                            moves.push(Move::Normal {
                                kind,
                                from,
                                to,
                                capture: true,
                            });
                        }
                        break;
                    },
                }
                current = to;
            }
        }
    }

    fn generate_pawn_moves(&self, player: Player, from: Square, moves: &mut MoveList) {
        let forward = player.push_direction();
        if let Some(to) = from.offset(0, forward) {
            if self.board.is_empty(to) {
                push_pawn_move(player, from, to, false, moves);
                if from.rank() == Rank::pawns_starting(player) {
                    if let Some(double) = to.offset(0, forward) {
                        if self.board.is_empty(double) {
                            push_pawn_move(player, from, double, false, moves);
                        }
                    }
                }
            }
        }
        for side in [-1, 1] {
            if let Some(to) = from.offset(side, forward) {
                if self.board.is_owned_by(to, player.opponent()) {
                    push_pawn_move(player, from, to, true, moves);
                }
            }
        }
    }
}

/// Pawn moves onto the last rank are only possible as promotions: one move per
/// promotion kind.
fn push_pawn_move(player: Player, from: Square, to: Square, capture: bool, moves: &mut MoveList) {
    if to.rank() == Rank::promotion(player) {
        for promotion in Promotion::iter() {
            moves.push(Move::Promotion {
                from,
                to,
                promotion,
                capture,
            });
        }
    } else {
        moves.push(Move::Normal {
            kind: PieceKind::Pawn,
            from,
            to,
            capture,
        });
    }
}

/// [Perft] (*per*formance *t*esting) counts the leaf nodes of the move tree
/// of given depth. It is a technique for checking correctness of move
/// generation and move making.
///
/// The counts match standard chess up to depth 3 from the starting position:
/// the differences (moves into check, castling through attacked squares) only
/// appear deeper.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| {
            let mut next = *position;
            next.make_move(*next_move);
            perft(&next, depth - 1)
        })
        .sum()
}
