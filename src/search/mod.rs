//! [Search] looks ahead into possible continuations and combines their static
//! evaluations into a ranking of the moves available right now.
//!
//! Regular chess engines assume that the chosen move is played. Here every
//! proposal only succeeds with some probability, so the value of a position
//! is not the value of its best continuation: it is the expectation over the
//! proposer falling back through its preference list, and forfeiting if all of
//! the proposals fail. [`tree::ThinkingTree`] keeps these expectations for a
//! growing best-first tree and [`player::TreePlayer`] uses it to propose
//! moves.
//!
//! [Search]: https://www.chessprogramming.org/Search

use std::time::{Duration, Instant};

use anyhow::bail;

use crate::chess::core::Player;
use crate::evaluation::Value;

pub mod player;
pub mod tree;

/// Parameters of the thinking tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    search_bias: f64,
    play_bias: f64,
    think_time: Duration,
    loss_value: Value,
}

impl SearchConfig {
    /// Validates the parameters:
    ///
    /// - `search_bias` is the share of the exploration that goes to the best
    ///   looking child of each node, the rest is distributed among the others
    ///   the same way.
    /// - `play_bias` is the expected chance of a proposal to succeed.
    /// - `think_time` is the time budget for each proposal.
    /// - `loss_value` is the value of losing the game for White; Black's loss
    ///   is worth `-loss_value`. It should be larger than any evaluation.
    pub fn new(
        search_bias: f64,
        play_bias: f64,
        think_time: Duration,
        loss_value: Value,
    ) -> anyhow::Result<Self> {
        if !(search_bias > 0.0 && search_bias < 1.0) {
            bail!("search bias should be within (0, 1), got {search_bias}");
        }
        if !(play_bias > 0.0 && play_bias < 1.0) {
            bail!("play bias should be within (0, 1), got {play_bias}");
        }
        if !(loss_value.is_finite() && loss_value > 0.0) {
            bail!("loss value should be a positive number, got {loss_value}");
        }
        Ok(Self {
            search_bias,
            play_bias,
            think_time,
            loss_value,
        })
    }

    /// Share of the exploration that goes to the best child.
    #[must_use]
    pub const fn search_bias(&self) -> f64 {
        self.search_bias
    }

    /// Expected chance of a proposal to succeed.
    #[must_use]
    pub const fn play_bias(&self) -> f64 {
        self.play_bias
    }

    /// Time budget for each proposal.
    #[must_use]
    pub const fn think_time(&self) -> Duration {
        self.think_time
    }

    /// Magnitude of the value of a lost game, see [`Self::loss_for`].
    #[must_use]
    pub const fn loss_value(&self) -> Value {
        self.loss_value
    }

    /// Value of a position where `player` has lost: either all of its
    /// proposals failed or its king was captured.
    #[must_use]
    pub fn loss_for(&self, player: Player) -> Value {
        match player {
            Player::White => -self.loss_value,
            Player::Black => self.loss_value,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_bias: 0.5,
            play_bias: 0.5,
            think_time: Duration::from_secs(1),
            loss_value: 100.0,
        }
    }
}

pub(crate) struct Limiter {
    pub(crate) timer: Instant,
    pub(crate) time: Duration,
}

impl Limiter {
    pub(crate) fn new(time: Duration) -> Self {
        Self {
            timer: Instant::now(),
            time,
        }
    }

    #[must_use]
    pub(crate) fn expired(&self) -> bool {
        self.timer.elapsed() >= self.time
    }
}

/// Weights of the options ranked from best to worst when each of them is
/// taken with probability `bias` if the ones before it were not:
/// `bias * (1 - bias)^i` for the `i`-th option (0-indexed).
pub(crate) fn geometric_weights(bias: f64) -> impl Iterator<Item = f64> {
    std::iter::successors(Some(bias), move |weight| Some(weight * (1.0 - bias)))
}
