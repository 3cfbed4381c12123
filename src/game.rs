//! The stochastic turn protocol and the game around it.
//!
//! A half-move goes like this: the side to move proposes one of its
//! candidates, a coin is flipped and the move is either played or struck from
//! the candidates. In the latter case the same side proposes again, until a
//! move succeeds or there are no candidates left, which loses the game.
//!
//! Every proposal and its verdict is written to the game [`Record`] (the
//! "tape"), which can be replayed to reconstruct the game.

use std::fmt;

use anyhow::{bail, Context};
use itertools::Itertools;
use rand::Rng;
use tracing::{info, warn};

use crate::chess::core::{Move, MoveList, Outcome, Player};
use crate::chess::position::Position;

/// Number of consecutive proposals outside of the candidate list after which
/// the proposer is considered broken.
pub const MAX_INVALID_PROPOSALS: usize = 16;

/// Source of moves for one player: a search, a human, a script.
///
/// The position is a snapshot owned by the resolver: proposers that want to
/// keep it or look ahead have to copy it.
pub trait Proposer {
    /// Picks one of the `candidates`. `rejected` holds the moves whose coin
    /// flip already failed during this half-move, in order.
    ///
    /// Returning a move that is not in `candidates` is a protocol error: the
    /// proposal is ignored (no coin is flipped) and asked for again.
    ///
    /// `candidates` is never empty: a side without candidates forfeits
    /// before being asked.
    fn propose(&mut self, position: &Position, candidates: &[Move], rejected: &[Move]) -> Move;
}

impl<F> Proposer for F
where
    F: FnMut(&Position, &[Move], &[Move]) -> Move,
{
    fn propose(&mut self, position: &Position, candidates: &[Move], rejected: &[Move]) -> Move {
        self(position, candidates, rejected)
    }
}

/// Result of the coin flip for a single proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The flip succeeded and the move was played.
    Accepted,
    /// The flip failed and the move was struck from the candidates.
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accepted => "S",
            Self::Rejected => "F",
        })
    }
}

impl TryFrom<&str> for Verdict {
    type Error = anyhow::Error;

    fn try_from(verdict: &str) -> anyhow::Result<Self> {
        match verdict {
            "S" => Ok(Self::Accepted),
            "F" => Ok(Self::Rejected),
            _ => bail!("verdict should be 'S' or 'F', got '{verdict}'"),
        }
    }
}

/// One line of the game record: who proposed what and how the flip went.
///
/// ```
/// use flipper::chess::core::{Move, Player};
/// use flipper::game::{Entry, Verdict};
///
/// let entry = Entry::try_from("w,S,PE2E4").unwrap();
/// assert_eq!(entry.player, Player::White);
/// assert_eq!(entry.verdict, Verdict::Accepted);
/// assert_eq!(entry.proposal, Move::from_notation("PE2E4").unwrap());
/// assert_eq!(entry.to_string(), "w,S,PE2E4");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    #[allow(missing_docs)]
    pub player: Player,
    #[allow(missing_docs)]
    pub verdict: Verdict,
    #[allow(missing_docs)]
    pub proposal: Move,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.player, self.verdict, self.proposal)
    }
}

impl TryFrom<&str> for Entry {
    type Error = anyhow::Error;

    fn try_from(line: &str) -> anyhow::Result<Self> {
        let Some((player, verdict, proposal)) = line.trim().split(',').collect_tuple() else {
            bail!("record entry should be <player>,<verdict>,<move>, got {line}");
        };
        Ok(Self {
            player: player.try_into()?,
            verdict: verdict.try_into()?,
            proposal: proposal.try_into()?,
        })
    }
}

/// The game tape: every proposal of the game in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<Entry>,
}

impl Record {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(missing_docs)]
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Moves that were actually played, in order.
    pub fn accepted(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.verdict == Verdict::Accepted)
            .map(|entry| entry.proposal)
    }

    /// Reconstructs the game from `start` by playing accepted moves in order.
    ///
    /// The record is validated along the way: every proposal must come from
    /// the side to move and be one of its remaining candidates (legal moves
    /// that have not been rejected during the same half-move).
    ///
    /// # Errors
    ///
    /// Names the first entry that violates the rules.
    pub fn replay(&self, start: &Position) -> anyhow::Result<Position> {
        let mut position = *start;
        let mut candidates = position.generate_moves();
        forfeit_without_moves(&mut position, &candidates);
        for (index, entry) in self.entries.iter().enumerate() {
            let context = || format!("entry {} ({entry})", index + 1);
            if position.outcome().is_some() {
                bail!("the game is already decided before {}", context());
            }
            if entry.player != position.side_to_move() {
                bail!(
                    "{} is played by {:?} but {:?} is to move",
                    context(),
                    entry.player,
                    position.side_to_move()
                );
            }
            if !candidates.contains(&entry.proposal) {
                bail!("{}: {} is not a candidate in {position}", context(), entry.proposal);
            }
            match entry.verdict {
                Verdict::Accepted => {
                    position.make_move(entry.proposal);
                    candidates = position.generate_moves();
                    forfeit_without_moves(&mut position, &candidates);
                },
                Verdict::Rejected => {
                    candidates.retain(|candidate| *candidate != entry.proposal);
                    if candidates.is_empty() {
                        position.resign(entry.player);
                    }
                },
            }
        }
        Ok(position)
    }
}

/// A half-move that starts without candidates is forfeited without writing
/// anything to the record.
fn forfeit_without_moves(position: &mut Position, candidates: &[Move]) {
    if candidates.is_empty() {
        position.resign(position.side_to_move());
    }
}

impl fmt::Display for Record {
    /// One entry per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for Record {
    type Error = anyhow::Error;

    /// Parses one entry per line, blank lines are skipped.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let entries = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                Entry::try_from(line).with_context(|| format!("record line {}", index + 1))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { entries })
    }
}

/// How a half-move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalfMove {
    /// The move has been played.
    Played(Move),
    /// Every candidate was rejected: the side to move lost.
    Forfeit,
}

/// Runs the propose, flip, retry-or-forfeit protocol for single half-moves.
pub struct TurnResolver<R: Rng> {
    success_probability: f64,
    rng: R,
}

impl<R: Rng> TurnResolver<R> {
    /// Creates a resolver where every proposal succeeds with
    /// `success_probability`, drawn from `rng`.
    ///
    /// # Errors
    ///
    /// If the probability is outside of `[0, 1]`.
    pub fn new(success_probability: f64, rng: R) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&success_probability) {
            bail!("success probability should be within [0, 1], got {success_probability}");
        }
        Ok(Self {
            success_probability,
            rng,
        })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn success_probability(&self) -> f64 {
        self.success_probability
    }

    /// Resolves one half-move of the side to move in `position`. Every
    /// proposal and its verdict is appended to `record`. On success the move
    /// is applied to `position`; a forfeit sets its outcome.
    ///
    /// # Errors
    ///
    /// If the game is already decided or the proposer keeps proposing moves
    /// that are not candidates.
    pub fn resolve<P: Proposer + ?Sized>(
        &mut self,
        position: &mut Position,
        proposer: &mut P,
        record: &mut Record,
    ) -> anyhow::Result<HalfMove> {
        if let Some(outcome) = position.outcome() {
            bail!("can not play a move: the game is already decided ({outcome})");
        }
        let player = position.side_to_move();
        let mut candidates: MoveList = position.generate_moves();
        let mut rejected = Vec::new();
        let mut invalid_proposals = 0;
        while !candidates.is_empty() {
            // Proposers get their own copy: the authoritative state is never
            // exposed.
            let snapshot = *position;
            let proposal = proposer.propose(&snapshot, &candidates, &rejected);
            if !candidates.contains(&proposal) {
                invalid_proposals += 1;
                warn!(
                    %player,
                    %proposal,
                    attempt = invalid_proposals,
                    "proposed move is not a candidate"
                );
                if invalid_proposals >= MAX_INVALID_PROPOSALS {
                    bail!(
                        "{player:?} proposed {invalid_proposals} moves that are not candidates in a row, last one: {proposal}"
                    );
                }
                continue;
            }
            invalid_proposals = 0;
            if self.rng.gen_bool(self.success_probability) {
                info!(%player, %proposal, "flip succeeds");
                record.push(Entry {
                    player,
                    verdict: Verdict::Accepted,
                    proposal,
                });
                position.apply(proposal, player);
                return Ok(HalfMove::Played(proposal));
            }
            info!(%player, %proposal, "flip fails");
            record.push(Entry {
                player,
                verdict: Verdict::Rejected,
                proposal,
            });
            candidates.retain(|candidate| *candidate != proposal);
            rejected.push(proposal);
        }
        info!(%player, rejected = rejected.len(), "no candidates left, forfeit");
        position.resign(player);
        Ok(HalfMove::Forfeit)
    }
}

/// A game between two proposers: the authoritative position, the resolver and
/// the record.
pub struct Game<R: Rng> {
    start: Position,
    position: Position,
    resolver: TurnResolver<R>,
    record: Record,
    plies: usize,
}

impl<R: Rng> Game<R> {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(start: Position, resolver: TurnResolver<R>) -> Self {
        Self {
            start,
            position: start,
            resolver,
            record: Record::new(),
            plies: 0,
        }
    }

    /// Position the game started from.
    #[must_use]
    pub const fn start(&self) -> &Position {
        &self.start
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Number of moves actually played.
    #[must_use]
    pub const fn plies(&self) -> usize {
        self.plies
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.position.outcome()
    }

    /// Resolves a half-move of the side to move.
    ///
    /// # Errors
    ///
    /// See [`TurnResolver::resolve`].
    pub fn play_half_move<P: Proposer + ?Sized>(
        &mut self,
        proposer: &mut P,
    ) -> anyhow::Result<HalfMove> {
        let result = self
            .resolver
            .resolve(&mut self.position, proposer, &mut self.record)?;
        if matches!(result, HalfMove::Played(_)) {
            self.plies += 1;
        }
        Ok(result)
    }

    /// Alternates the players until the game is decided or `max_plies` moves
    /// were played. Returns [`None`] for an unfinished game.
    ///
    /// # Errors
    ///
    /// See [`TurnResolver::resolve`].
    pub fn play<W: Proposer + ?Sized, B: Proposer + ?Sized>(
        &mut self,
        white: &mut W,
        black: &mut B,
        max_plies: usize,
    ) -> anyhow::Result<Option<Outcome>> {
        while self.outcome().is_none() && self.plies < max_plies {
            let _ = match self.position.side_to_move() {
                Player::White => self.play_half_move(white)?,
                Player::Black => self.play_half_move(black)?,
            };
        }
        if let Some(outcome) = self.outcome() {
            info!(%outcome, plies = self.plies, "game over");
        }
        Ok(self.outcome())
    }
}
