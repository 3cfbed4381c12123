//! Evaluation based on material advantage using "[standard piece
//! valuations]", and a few cheap refinements of it.
//!
//! While not very strong, these evaluation functions are great for testing
//! search and other infrastructure, because they are stable (will not change
//! because of the fixed piece "values"), easy to understand and deterministic.
//!
//! The king is worth more than everything else combined: losing it loses the
//! game.
//!
//! [standard piece valuations]: https://en.wikipedia.org/wiki/Chess_piece_relative_value

use std::collections::HashSet;

use strum::IntoEnumIterator;

use crate::chess::core::{Piece, PieceKind, Player, Square};
use crate::chess::position::Position;
use crate::evaluation::Value;

const KING_VALUE: Value = 30.0;
const QUEEN_VALUE: Value = 9.0;
const ROOK_VALUE: Value = 5.0;
const BISHOP_VALUE: Value = 3.0;
const KNIGHT_VALUE: Value = 3.0;
const PAWN_VALUE: Value = 1.0;

/// Weight of the mobility difference: a tiebreaker rather than a reason to give
/// away material.
const MOBILITY_WEIGHT: Value = 0.01;
/// Share of an attacked piece's value that is considered lost already.
const HANGING_WEIGHT: Value = 0.25;

#[must_use]
pub(super) const fn piece_value(kind: PieceKind) -> Value {
    match kind {
        PieceKind::King => KING_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Pawn => PAWN_VALUE,
    }
}

fn signed_value(piece: Piece) -> Value {
    match piece.owner {
        Player::White => piece_value(piece.kind),
        Player::Black => -piece_value(piece.kind),
    }
}

/// Sum of signed piece values.
#[must_use]
pub fn material(position: &Position) -> Value {
    Square::iter()
        .filter_map(|square| position.at(square))
        .map(signed_value)
        .sum()
}

/// Material plus the difference in the number of available moves.
#[must_use]
pub fn mobility(position: &Position) -> Value {
    let white = position.legal_moves(Player::White).len();
    let black = position.legal_moves(Player::Black).len();
    material(position) + (white as Value - black as Value) * MOBILITY_WEIGHT
}

/// Total value of `player`'s pieces that the opponent can capture right away.
fn attacked_value(position: &Position, player: Player) -> Value {
    let targets: HashSet<Square> = position
        .legal_moves(player.opponent())
        .iter()
        .filter(|next_move| next_move.is_capture())
        .map(|next_move| next_move.destination(player.opponent()))
        .collect();
    targets
        .into_iter()
        .filter_map(|square| position.at(square))
        .filter(|piece| piece.owner == player)
        .map(|piece| piece_value(piece.kind))
        .sum()
}

/// Material where every piece under attack is counted as partially lost.
#[must_use]
pub fn hanging(position: &Position) -> Value {
    let white_hanging = attacked_value(position, Player::White);
    let black_hanging = attacked_value(position, Player::Black);
    material(position) + (black_hanging - white_hanging) * HANGING_WEIGHT
}

/// Material from the piece codes of the [`crate::chess::export::Export`], in
/// pawns.
#[must_use]
pub fn export_material(position: &Position) -> Value {
    let centipawns: i32 = position.export().board().iter().sum();
    Value::from(centipawns) / 100.0
}
