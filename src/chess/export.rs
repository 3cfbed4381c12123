//! Flat numeric encoding of a [`Position`], consumed by evaluation providers
//! and external tools.
//!
//! The layout is:
//!
//! | Index   | Contents |
//! | ------- | -------- |
//! | 0..64   | Board in [`Square`] order, material-weighted piece codes: positive for White, negative for Black, 0 for an empty square |
//! | 64..68  | Castling rights (0 or 1): white kingside, white queenside, black kingside, black queenside |
//! | 68      | En passant square index (0..64) or -1 |
//! | 69      | Side to move: 0 for White, 1 for Black |

use anyhow::{bail, Context};
use strum::IntoEnumIterator;

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Square, BOARD_SIZE};
use crate::chess::position::Position;

/// Number of values in the export.
pub const EXPORT_SIZE: usize = BOARD_SIZE as usize + 6;

const CASTLING_OFFSET: usize = BOARD_SIZE as usize;
const EN_PASSANT_INDEX: usize = CASTLING_OFFSET + 4;
const SIDE_TO_MOVE_INDEX: usize = EN_PASSANT_INDEX + 1;
const NO_EN_PASSANT: i32 = -1;

/// Material-weighted code of a piece kind, in centipawns. The knight is one
/// point cheaper than the bishop so that the two can be told apart.
#[must_use]
pub const fn piece_code(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 3000,
        PieceKind::Queen => 900,
        PieceKind::Rook => 500,
        PieceKind::Bishop => 300,
        PieceKind::Knight => 299,
        PieceKind::Pawn => 100,
    }
}

fn signed_code(piece: Piece) -> i32 {
    match piece.owner {
        Player::White => piece_code(piece.kind),
        Player::Black => -piece_code(piece.kind),
    }
}

fn decode_piece(code: i32) -> anyhow::Result<Option<Piece>> {
    if code == 0 {
        return Ok(None);
    }
    let owner = if code > 0 {
        Player::White
    } else {
        Player::Black
    };
    let magnitude = code.unsigned_abs();
    match PieceKind::iter().find(|kind| piece_code(*kind).unsigned_abs() == magnitude) {
        Some(kind) => Ok(Some(Piece::new(owner, kind))),
        None => bail!("unknown piece code {code}"),
    }
}

fn decode_flag(value: i32, name: &str) -> anyhow::Result<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => bail!("{name} should be 0 or 1, got {value}"),
    }
}

/// The 70-value vector describing a [`Position`]. The outcome is not a part
/// of it: it follows from the kings on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Export {
    values: [i32; EXPORT_SIZE],
}

impl Export {
    /// All values in the documented order.
    #[must_use]
    pub const fn values(&self) -> &[i32; EXPORT_SIZE] {
        &self.values
    }

    /// Board part of the export.
    #[must_use]
    pub fn board(&self) -> &[i32] {
        &self.values[..BOARD_SIZE as usize]
    }
}

impl TryFrom<&[i32]> for Export {
    type Error = anyhow::Error;

    /// Only checks the length. Use [`Position::import`] to validate the
    /// contents.
    fn try_from(values: &[i32]) -> anyhow::Result<Self> {
        Ok(Self {
            values: values.try_into().with_context(|| {
                format!(
                    "export should have {EXPORT_SIZE} values, got {}",
                    values.len()
                )
            })?,
        })
    }
}

impl Position {
    /// Encodes the position. See [`crate::chess::export`] for the layout.
    ///
    /// ```
    /// use flipper::chess::position::Position;
    ///
    /// let export = Position::starting().export();
    /// assert_eq!(&export.board()[..8], &[500, 299, 300, 900, 3000, 300, 299, 500]);
    /// assert_eq!(&export.values()[64..], &[1, 1, 1, 1, -1, 0]);
    /// ```
    #[must_use]
    pub fn export(&self) -> Export {
        let mut values = [0; EXPORT_SIZE];
        for square in Square::iter() {
            if let Some(piece) = self.at(square) {
                values[square.index()] = signed_code(piece);
            }
        }
        for (offset, right) in CastleRights::EXPORT_ORDER.iter().enumerate() {
            values[CASTLING_OFFSET + offset] = i32::from(self.castling().contains(*right));
        }
        values[EN_PASSANT_INDEX] = self
            .en_passant_square()
            .map_or(NO_EN_PASSANT, |square| square as i32);
        values[SIDE_TO_MOVE_INDEX] = match self.side_to_move() {
            Player::White => 0,
            Player::Black => 1,
        };
        Export { values }
    }

    /// Decodes an exported position. Exporting the result produces the same
    /// vector for every position reachable in a game.
    ///
    /// # Errors
    ///
    /// If any value is outside of its domain (unknown piece code, flag other
    /// than 0 or 1, en passant index outside -1..64) or the board has more
    /// pieces than a game can produce.
    pub fn import(export: &Export) -> anyhow::Result<Self> {
        let values = export.values();
        let mut board = Board::empty();
        for square in Square::iter() {
            let piece = decode_piece(values[square.index()])
                .with_context(|| format!("on square {square}"))?;
            let _ = board.set(square, piece);
        }
        board.validate_piece_counts()?;
        let mut castling = CastleRights::empty();
        for (offset, right) in CastleRights::EXPORT_ORDER.iter().enumerate() {
            if decode_flag(values[CASTLING_OFFSET + offset], "castling right")? {
                castling |= *right;
            }
        }
        let en_passant_square = match values[EN_PASSANT_INDEX] {
            NO_EN_PASSANT => None,
            index => Some(
                u8::try_from(index)
                    .map_err(anyhow::Error::from)
                    .and_then(<Square as TryFrom<u8>>::try_from)
                    .with_context(|| format!("en passant index should be -1..64, got {index}"))?,
            ),
        };
        let side_to_move = if decode_flag(values[SIDE_TO_MOVE_INDEX], "side to move")? {
            Player::Black
        } else {
            Player::White
        };
        Ok(Self::from_parts(board, castling, side_to_move, en_passant_square))
    }
}
