//! Square-centric [board representation]: every square holds an optional
//! piece.
//!
//! A mailbox is the natural fit for this variant: there is no check
//! detection, so the move generator never needs attack sets, and the search
//! copies positions on every expansion, which is a plain 64-byte memcpy here.
//!
//! [board representation]: https://www.chessprogramming.org/Mailbox

use std::fmt::{self, Write};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::core::{
    File,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
    MAX_PIECES,
};

/// Piece-on-square grid. The indices follow [`Square`] order: A1 is the first
/// tile, H8 is the last one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tiles: [None; BOARD_SIZE as usize],
        }
    }

    /// The standard initial array.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                let _ = board.set(
                    Square::new(file, Rank::backrank(player)),
                    Some(Piece::new(player, kind)),
                );
                let _ = board.set(
                    Square::new(file, Rank::pawns_starting(player)),
                    Some(Piece::new(player, PieceKind::Pawn)),
                );
            }
        }
        board
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.tiles[square as usize]
    }

    /// Puts a piece on the square or clears it, returning the previous
    /// occupant.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.tiles[square as usize], piece)
    }

    /// Clears the square and returns what stood there.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.tiles[square as usize].take()
    }

    /// Returns true if nothing stands on the square.
    #[must_use]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.at(square).is_none()
    }

    /// Returns true if the square holds a piece of given player.
    #[must_use]
    pub fn is_owned_by(&self, square: Square, player: Player) -> bool {
        self.at(square).is_some_and(|piece| piece.owner == player)
    }

    /// Pieces of the player in square order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Square, PieceKind)> + '_ {
        Square::iter().filter_map(move |square| match self.at(square) {
            Some(piece) if piece.owner == player => Some((square, piece.kind)),
            _ => None,
        })
    }

    /// Returns true if the player still has a king on the board.
    #[must_use]
    pub fn has_king(&self, player: Player) -> bool {
        self.tiles.contains(&Some(Piece::new(player, PieceKind::King)))
    }

    /// Parses the piece placement field of FEN.
    ///
    /// # Errors
    ///
    /// If the input does not describe exactly 8 ranks of exactly 8 squares, or
    /// a player has more pieces than a legal game can produce.
    pub fn from_placement(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} squares");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                let _ = board.set(Square::new(file.try_into()?, rank), Some(piece));
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}"
                );
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {placement}");
        }
        board.validate_piece_counts()?;
        Ok(board)
    }

    /// A player can not have more than 16 pieces and more than one king in a
    /// real game.
    pub(super) fn validate_piece_counts(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let count = self.pieces(player).count();
            if count > MAX_PIECES {
                bail!("{player:?} has {count} pieces, expected at most 16");
            }
            let kings = self
                .pieces(player)
                .filter(|(_, kind)| *kind == PieceKind::King)
                .count();
            if kings > 1 {
                bail!("{player:?} has {kings} kings, expected at most one");
            }
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::iter() {
                if let Some(piece) = self.at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
