//! This module implements "static" [evaluation], i.e. predicting the relative
//! value of given position without [`crate::search`].
//!
//! Every evaluation function has the same shape: `Fn(&Position) -> Value`. The
//! value is signed from White's perspective (positive is good for White) and
//! measured in pawns. The search treats evaluation functions as opaque, so
//! anything with this signature (including a learned model working on
//! [`Export`] through [`on_export`]) can be plugged in.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

pub mod material;
pub mod positional;

use crate::chess::export::Export;
use crate::chess::position::Position;

/// Score of a position in pawns, positive values favor White.
pub type Value = f64;

/// Adapts an evaluation function working on the numeric [`Export`] of the
/// position (e.g. an external model) to the common signature.
pub fn on_export<F>(provider: F) -> impl Fn(&Position) -> Value
where
    F: Fn(&Export) -> Value,
{
    move |position| provider(&position.export())
}

/// Built-in evaluation functions, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Evaluation {
    /// Plain material count.
    Material,
    /// Material plus a small bonus for having more moves than the opponent.
    Mobility,
    /// Piece-square table favoring central pieces, advanced pawns and a king
    /// on the rim.
    Positional,
    /// Material where pieces under attack are already counted as partially
    /// lost.
    Hanging,
    /// Material computed from the export piece codes.
    ExportMaterial,
}

impl Evaluation {
    /// Returns the evaluation function.
    #[must_use]
    pub fn function(self) -> fn(&Position) -> Value {
        match self {
            Self::Material => material::material,
            Self::Mobility => material::mobility,
            Self::Positional => positional::positional,
            Self::Hanging => material::hanging,
            Self::ExportMaterial => material::export_material,
        }
    }

    /// Evaluates the position with the selected function.
    #[must_use]
    pub fn evaluate(self, position: &Position) -> Value {
        self.function()(position)
    }
}
