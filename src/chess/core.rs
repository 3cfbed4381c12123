//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Maximum number of pieces a single player can have on the board. Positions
/// with more pieces can not be reached and are rejected by the parsers.
pub const MAX_PIECES: usize = 16;

/// Upper bound on the number of moves a player can have: no piece reaches more
/// than 27 squares (a queen in the centre of an empty board) and castling adds
/// at most two more.
pub const MAX_MOVES: usize = MAX_PIECES * 27 + 2;

/// Moves generated for a single player. Stored inline: move generation runs
/// for every node of the search tree.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// A move of the variant. There is no "check" concept, so every move produced
/// by the generator is playable, including the ones that capture the king.
///
/// Moves are compared structurally: a move is removed from the list of
/// candidates by value when its coin flip fails.
///
/// En passant is a [`Move::Normal`] pawn capture whose destination is empty:
/// the captured pawn stands one rank behind the destination.
///
/// The textual notation (used by the game tape) is:
///
/// ```
/// use flipper::chess::core::{Move, PieceKind, Promotion, Square};
///
/// let push = Move::Normal {
///     kind: PieceKind::Pawn,
///     from: Square::E2,
///     to: Square::E4,
///     capture: false,
/// };
/// assert_eq!(push.to_string(), "PE2E4");
/// let capture = Move::Normal {
///     kind: PieceKind::Bishop,
///     from: Square::C1,
///     to: Square::B2,
///     capture: true,
/// };
/// assert_eq!(capture.to_string(), "BC1xB2");
/// let promotion = Move::Promotion {
///     from: Square::D7,
///     to: Square::D8,
///     promotion: Promotion::Queen,
///     capture: false,
/// };
/// assert_eq!(promotion.to_string(), "PD7D8=Q");
/// assert_eq!(Move::CastleKingside.to_string(), "O-O");
/// assert_eq!(Move::CastleQueenside.to_string(), "O-O-O");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Any move that is not a promotion or castling.
    Normal {
        #[allow(missing_docs)]
        kind: PieceKind,
        #[allow(missing_docs)]
        from: Square,
        #[allow(missing_docs)]
        to: Square,
        #[allow(missing_docs)]
        capture: bool,
    },
    /// Pawn reaching the farthest rank, either by a push or by a capture.
    Promotion {
        #[allow(missing_docs)]
        from: Square,
        #[allow(missing_docs)]
        to: Square,
        #[allow(missing_docs)]
        promotion: Promotion,
        #[allow(missing_docs)]
        capture: bool,
    },
    /// Short castle or O-O.
    CastleKingside,
    /// Long castle or O-O-O.
    CastleQueenside,
}

impl Move {
    /// Parses the tape notation. Square names are case-insensitive.
    ///
    /// # Errors
    ///
    /// If the input is not a well-formed move notation. Whether the move is
    /// legal in any given position is not checked here.
    pub fn from_notation(notation: &str) -> anyhow::Result<Self> {
        match notation {
            "O-O" => return Ok(Self::CastleKingside),
            "O-O-O" => return Ok(Self::CastleQueenside),
            _ => (),
        }
        if !notation.is_ascii() {
            bail!("move notation should be ASCII, got {notation}");
        }
        let (body, promotion) = match notation.split_once('=') {
            Some((body, promotion)) => (body, Some(promotion)),
            None => (notation, None),
        };
        let Some(symbol) = body.chars().next() else {
            bail!("move notation should not be empty");
        };
        let kind = PieceKind::try_from(symbol)?;
        let squares = &body[1..];
        let (from, capture, to) = match squares.len() {
            4 => (&squares[..2], false, &squares[2..]),
            5 if squares.as_bytes()[2] == b'x' => (&squares[..2], true, &squares[3..]),
            _ => bail!("move should be <piece><from>[x]<to>, got {notation}"),
        };
        let from = Square::try_from(from).with_context(|| format!("in move {notation}"))?;
        let to = Square::try_from(to).with_context(|| format!("in move {notation}"))?;
        match promotion {
            None => Ok(Self::Normal {
                kind,
                from,
                to,
                capture,
            }),
            Some(promotion) => {
                if kind != PieceKind::Pawn {
                    bail!("only pawns can be promoted, got {notation}");
                }
                let Some((promotion,)) = promotion.chars().collect_tuple() else {
                    bail!("promotion should be a single piece symbol, got {notation}");
                };
                Ok(Self::Promotion {
                    from,
                    to,
                    promotion: Promotion::try_from(promotion)?,
                    capture,
                })
            },
        }
    }

    /// Returns true if the move removes an opponent's piece.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        match self {
            Self::Normal { capture, .. } | Self::Promotion { capture, .. } => *capture,
            Self::CastleKingside | Self::CastleQueenside => false,
        }
    }

    /// Destination square of the moving piece. Castling is described from the
    /// perspective of the king of the player making it.
    #[must_use]
    pub const fn destination(&self, player: Player) -> Square {
        match self {
            Self::Normal { to, .. } | Self::Promotion { to, .. } => *to,
            Self::CastleKingside => Square::new(File::G, Rank::backrank(player)),
            Self::CastleQueenside => Square::new(File::C, Rank::backrank(player)),
        }
    }
}

/// Squares in the tape notation are uppercase (`E2`), unlike FEN.
fn write_notation_square(f: &mut fmt::Formatter<'_>, square: Square) -> fmt::Result {
    write!(f, "{}{}", square.file().symbol().to_ascii_uppercase(), square.rank())
}

impl fmt::Display for Move {
    /// Serializes a move in the tape notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, from, to, capture) = match *self {
            Self::CastleKingside => return f.write_str("O-O"),
            Self::CastleQueenside => return f.write_str("O-O-O"),
            Self::Normal {
                kind,
                from,
                to,
                capture,
            } => (kind, from, to, capture),
            Self::Promotion {
                from, to, capture, ..
            } => (PieceKind::Pawn, from, to, capture),
        };
        f.write_char(kind.symbol().to_ascii_uppercase())?;
        write_notation_square(f, from)?;
        if capture {
            f.write_char('x')?;
        }
        write_notation_square(f, to)?;
        if let Self::Promotion { promotion, .. } = self {
            write!(f, "={}", PieceKind::from(*promotion).symbol().to_ascii_uppercase())?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    fn try_from(notation: &str) -> anyhow::Result<Self> {
        Self::from_notation(notation)
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use flipper::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// This is the same row-major order the state export uses.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Index of the square in row-major order (A1 is 0, H8 is 63).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Moves `file_delta` files to the right and `rank_delta` ranks up (from
    /// White's perspective). Returns [`None`] when the result would leave the
    /// board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        let width = BOARD_WIDTH as i8;
        if !(0..width).contains(&file) || !(0..width).contains(&rank) {
            return None;
        }
        Some(Self::new(
            File::try_from(file as u8).ok()?,
            Rank::try_from(rank as u8).ok()?,
        ))
    }

    /// Shifts the square one step in given direction.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        self.offset(file_delta, rank_delta)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Lowercase letter of the file.
    #[must_use]
    pub const fn symbol(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    /// Both `'a'..='h'` and `'A'..='H'` are accepted: FEN uses lowercase files
    /// and the tape notation uses uppercase ones.
    fn try_from(file: char) -> anyhow::Result<Self> {
        match file.to_ascii_lowercase() {
            lowercase @ 'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(lowercase as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where the player's pawns start and can push two squares from.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The rank where the player's pawns promote.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }

    /// The rank a player's pawn has to stand on to capture en passant.
    #[must_use]
    pub const fn en_passant_origin(player: Player) -> Self {
        match player {
            Player::White => Self::Five,
            Player::Black => Self::Four,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// The game is played between two players: White (having the advantage of the
/// first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a pawn push.
    #[must_use]
    pub const fn push_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Terminal result of the game. Once set it is never cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[allow(missing_docs)]
    WhiteWins,
    #[allow(missing_docs)]
    BlackWins,
}

impl Outcome {
    /// The outcome in which `player` wins.
    #[must_use]
    pub const fn win_for(player: Player) -> Self {
        match player {
            Player::White => Self::WhiteWins,
            Player::Black => Self::BlackWins,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn winner(self) -> Player {
        match self {
            Self::WhiteWins => Player::White,
            Self::BlackWins => Player::Black,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum PieceKind {
    King = 1,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Lowercase algebraic symbol (as used for Black pieces in FEN).
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    /// Parses the piece symbol regardless of its case.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'k' => Ok(Self::King),
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            'p' => Ok(Self::Pawn),
            _ => bail!("piece kind should be within \"KQRBNP\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Uppercase symbols are White pieces, lowercase symbols are Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        if !"KQRBNPkqrbnp".contains(symbol) {
            bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'");
        }
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self::new(owner, PieceKind::try_from(symbol)?))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self.owner {
            // White player: uppercase symbols.
            Player::White => self.kind.symbol().to_ascii_uppercase(),
            // Black player: lowercase symbols.
            Player::Black => self.kind.symbol(),
        })
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). Rights
    /// are recomputed after every move from the home squares: a right is lost
    /// as soon as the king or the corresponding rook is no longer on its
    /// original square, and it never comes back.
    ///
    /// Unlike the standard rules, castling does not care about attacked
    /// squares: there is no check in this variant. The only requirements are
    /// the right itself and empty squares between the king and the rook.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Kingside right of given player.
    #[must_use]
    pub const fn short(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    /// Queenside right of given player.
    #[must_use]
    pub const fn long(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }

    /// The rights in the fixed export order: white-kingside, white-queenside,
    /// black-kingside, black-queenside.
    pub const EXPORT_ORDER: [Self; 4] = [
        Self::WHITE_SHORT,
        Self::WHITE_LONG,
        Self::BLACK_SHORT,
        Self::BLACK_LONG,
    ];
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if given pattern does not match
    ///
    /// [`CastleRights`] := (K)? (Q)? (k)? (q)? | -
    ///
    /// The symbols have to come in this order.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let mut result = Self::empty();
        let mut order = [
            ('K', Self::WHITE_SHORT),
            ('Q', Self::WHITE_LONG),
            ('k', Self::BLACK_SHORT),
            ('q', Self::BLACK_LONG),
        ]
        .into_iter();
        for symbol in input.chars() {
            match order.find(|(expected, _)| *expected == symbol) {
                Some((_, right)) => result |= right,
                None => bail!("unknown castle rights: {input}"),
            }
        }
        if result.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match PieceKind::try_from(symbol)? {
            PieceKind::Queen => Ok(Self::Queen),
            PieceKind::Rook => Ok(Self::Rook),
            PieceKind::Bishop => Ok(Self::Bishop),
            PieceKind::Knight => Ok(Self::Knight),
            kind => bail!("pawn can not be promoted to {kind}"),
        }
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// Rook lines.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
    /// Bishop lines.
    pub const DIAGONAL: [Self; 4] = [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];

    /// (file, rank) step of the direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }
}
