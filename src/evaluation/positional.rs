//! Piece-square evaluation: material adjusted by where the pieces stand.
//!
//! - Minor and major pieces prefer the center, which is a cheap proxy for
//!   mobility.
//! - Pawns gain a tenth of a pawn for every rank they advance.
//! - The king prefers the rim, away from the action. It is also worth a lot
//!   more than everything else: losing it ends the game.

use strum::IntoEnumIterator;

use crate::chess::core::{PieceKind, Player, Rank, Square};
use crate::chess::position::Position;
use crate::evaluation::material::piece_value;
use crate::evaluation::Value;

const KING_VALUE: Value = 40.0;
/// Bonus for each rank a pawn has advanced from its starting rank.
const PAWN_ADVANCE: Value = 0.1;
/// The centrality bonus of pieces is scaled down: the difference between the
/// rim and the center is 0.05 of a pawn.
const PIECE_CENTRALITY_SCALE: Value = 1.0 / 6.0;

/// Concentric rings of the board: 0 on the rim, 3 in the central four squares.
fn ring(square: Square) -> u8 {
    let file = square.file() as u8;
    let rank = square.rank() as u8;
    file.min(7 - file).min(rank).min(7 - rank)
}

/// Centrality bonus of the square: 0.1 per ring towards the center.
fn centrality(square: Square) -> Value {
    Value::from(ring(square)) / 10.0
}

/// Ranks the pawn has moved forward from its starting rank.
fn pawn_advance(player: Player, rank: Rank) -> Value {
    let advance = rank as i8 - Rank::pawns_starting(player) as i8;
    Value::from(advance * player.push_direction())
}

/// Value of a piece of `kind` standing on `square` from its owner's point of
/// view.
fn square_value(player: Player, kind: PieceKind, square: Square) -> Value {
    match kind {
        PieceKind::King => KING_VALUE - centrality(square),
        PieceKind::Pawn => piece_value(kind) + pawn_advance(player, square.rank()) * PAWN_ADVANCE,
        _ => piece_value(kind) + centrality(square) * PIECE_CENTRALITY_SCALE,
    }
}

/// Sum of the signed piece-square values of all pieces.
#[must_use]
pub fn positional(position: &Position) -> Value {
    Square::iter()
        .filter_map(|square| position.at(square).map(|piece| (square, piece)))
        .map(|(square, piece)| {
            let value = square_value(piece.owner, piece.kind, square);
            match piece.owner {
                Player::White => value,
                Player::Black => -value,
            }
        })
        .sum()
}
