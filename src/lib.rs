//! Engine for "flipper chess": a chess variant where every proposed move only
//! succeeds on a coin flip. A failed move is struck from the list of
//! candidates and the same player has to propose another one; the player who
//! runs out of candidates loses. Capturing the king also ends the game.
//!
//! The crate consists of:
//!
//! - [`chess`]: board, move generation and move making for the variant.
//! - [`game`]: the stochastic turn protocol, game driver and the game record.
//! - [`evaluation`]: static evaluation functions.
//! - [`search`]: probabilistic best-first search ("thinking tree") that ranks
//!   the moves by their expected value under the coin flip mechanic.

pub mod chess;
pub mod evaluation;
pub mod game;
pub mod search;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version on startup.
pub fn print_engine_info() {
    println!("Flipper chess engine {}", engine_version());
}

/// Prints information the build type and whether the build is clean on engine
/// startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
