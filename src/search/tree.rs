//! Best-first thinking tree.
//!
//! Every node holds a position and its value: the static evaluation for
//! leaves and the expected value of the proposal sequence for expanded nodes.
//! Children of an expanded node are kept ranked from the perspective of the
//! side to move. The proposer tries them in that order and each proposal
//! succeeds with probability `play_bias`, so the `i`-th child (0-indexed) is
//! played with probability `play_bias * (1 - play_bias)^i`. The probability
//! mass that is left corresponds to every proposal failing, which is a loss.
//!
//! The same geometric scheme with `search_bias` distributes the exploration
//! budget: the root has a search weight of 1 and each child receives its
//! share of the parent's weight according to its rank. The leaf with the
//! highest search weight is expanded next.

use std::cmp::Ordering;
use std::time::Duration;

use tracing::debug;

use crate::chess::core::{Move, Outcome, Player};
use crate::chess::position::Position;
use crate::evaluation::Value;
use crate::search::{geometric_weights, Limiter, SearchConfig};

/// Index of the node in the tree arena.
pub type NodeIndex = usize;
// This is a special value that is used to indicate that the node has no parent.
const TOMBSTONE_PARENT: NodeIndex = usize::MAX;
const ROOT: NodeIndex = 0;

/// Share of the search and play probability that reaches a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    /// Share of the exploration budget.
    pub search: f64,
    /// Chance of the line leading here being played.
    pub play: f64,
}

struct Node {
    position: Position,
    parent: NodeIndex,
    /// Ranked from the best to the worst for the side to move. Empty until
    /// the node is expanded.
    children: Vec<(Move, NodeIndex)>,
    value: Value,
    weights: Weights,
    expanded: bool,
    /// The game is over in this position or the side to move has no moves.
    terminal: bool,
}

impl Node {
    #[must_use]
    const fn expandable(&self) -> bool {
        !self.expanded && !self.terminal
    }
}

/// Tree of positions reachable from the root, grown one leaf at a time.
pub struct ThinkingTree<E> {
    nodes: Vec<Node>,
    config: SearchConfig,
    evaluate: E,
    expansions: usize,
}

impl<E> ThinkingTree<E>
where
    E: Fn(&Position) -> Value,
{
    /// Creates a tree consisting of the root only.
    #[must_use]
    pub fn new(root: Position, config: SearchConfig, evaluate: E) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            config,
            evaluate,
            expansions: 0,
        };
        let _ = tree.add_node(root, TOMBSTONE_PARENT);
        tree.nodes[ROOT].weights = Weights {
            search: 1.0,
            play: 1.0,
        };
        tree
    }

    /// Position the tree is thinking about.
    #[must_use]
    pub fn root(&self) -> &Position {
        &self.nodes[ROOT].position
    }

    /// Expected value of the root position.
    #[must_use]
    pub fn value(&self) -> Value {
        self.nodes[ROOT].value
    }

    /// Number of positions in the tree.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of expansion steps done so far.
    #[must_use]
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// Parameters the tree was created with.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Moves available at the root with the values of the resulting positions,
    /// from the best to the worst for the side to move. Empty before the first
    /// expansion.
    #[must_use]
    pub fn ranked_moves(&self) -> Vec<(Move, Value)> {
        self.nodes[ROOT]
            .children
            .iter()
            .map(|&(next_move, child)| (next_move, self.nodes[child].value))
            .collect()
    }

    /// Weights of the root's children in rank order.
    #[must_use]
    pub fn weights(&self) -> Vec<(Move, Weights)> {
        self.nodes[ROOT]
            .children
            .iter()
            .map(|&(next_move, child)| (next_move, self.nodes[child].weights))
            .collect()
    }

    /// Top-ranked move at the root, if the root was expanded and has any.
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.nodes[ROOT].children.first().map(|&(next_move, _)| next_move)
    }

    /// Line of top-ranked moves from the root down to a leaf.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<Move> {
        let mut line = Vec::new();
        let mut node = &self.nodes[ROOT];
        while let Some(&(next_move, child)) = node.children.first() {
            line.push(next_move);
            node = &self.nodes[child];
        }
        line
    }

    /// Weights of the node reached by playing `line` from the root.
    #[must_use]
    pub fn line_weights(&self, line: &[Move]) -> Option<Weights> {
        let mut index = ROOT;
        for next_move in line {
            index = self.nodes[index]
                .children
                .iter()
                .find(|(candidate, _)| candidate == next_move)
                .map(|&(_, child)| child)?;
        }
        Some(self.nodes[index].weights)
    }

    /// Grows the tree until the time runs out and returns the number of
    /// expansion steps done. At least one step is done even if `time` is
    /// zero, and thinking stops early if there is nothing left to expand.
    pub fn think(&mut self, time: Duration) -> usize {
        let limiter = Limiter::new(time);
        let mut steps = 0;
        while self.expand_once() {
            steps += 1;
            if limiter.expired() {
                break;
            }
        }
        debug!(
            steps,
            nodes = self.nodes(),
            expansions = self.expansions,
            elapsed = ?limiter.timer.elapsed(),
            value = self.value(),
            "thinking done"
        );
        steps
    }

    /// Expands the leaf with the highest search weight, updates the values of
    /// its ancestors and redistributes the weights. Returns `false` if every
    /// leaf is terminal.
    pub fn expand_once(&mut self) -> bool {
        let Some(leaf) = self.most_promising_leaf() else {
            return false;
        };
        self.expand(leaf);
        self.back_up(leaf);
        self.redistribute_weights();
        self.expansions += 1;
        true
    }

    fn add_node(&mut self, position: Position, parent: NodeIndex) -> NodeIndex {
        let (value, terminal) = match position.outcome() {
            Some(Outcome::WhiteWins) => (self.config.loss_for(Player::Black), true),
            Some(Outcome::BlackWins) => (self.config.loss_for(Player::White), true),
            None => ((self.evaluate)(&position), false),
        };
        self.nodes.push(Node {
            position,
            parent,
            children: Vec::new(),
            value,
            weights: Weights {
                search: 0.0,
                play: 0.0,
            },
            expanded: false,
            terminal,
        });
        self.nodes.len() - 1
    }

    /// The first of the expandable leaves with the highest search weight.
    fn most_promising_leaf(&self) -> Option<NodeIndex> {
        let mut best: Option<NodeIndex> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            if !node.expandable() {
                continue;
            }
            match best {
                Some(current) if self.nodes[current].weights.search >= node.weights.search => {},
                _ => best = Some(index),
            }
        }
        best
    }

    fn expand(&mut self, index: NodeIndex) {
        let position = self.nodes[index].position;
        let moves = position.generate_moves();
        if moves.is_empty() {
            self.nodes[index].terminal = true;
        }
        let mut children = Vec::with_capacity(moves.len());
        for next_move in moves {
            let mut child = position;
            child.make_move(next_move);
            children.push((next_move, self.add_node(child, index)));
        }
        let node = &mut self.nodes[index];
        node.children = children;
        node.expanded = true;
    }

    /// Re-ranks the children and recomputes the values of the expanded node
    /// and all of its ancestors.
    fn back_up(&mut self, mut index: NodeIndex) {
        loop {
            self.rank_children(index);
            self.nodes[index].value = self.expected_value(index);
            let parent = self.nodes[index].parent;
            if parent == TOMBSTONE_PARENT {
                break;
            }
            index = parent;
        }
    }

    fn rank_children(&mut self, index: NodeIndex) {
        let mut children = std::mem::take(&mut self.nodes[index].children);
        let nodes = &self.nodes;
        let by_value = |a: &(Move, NodeIndex), b: &(Move, NodeIndex)| -> Ordering {
            nodes[a.1].value.total_cmp(&nodes[b.1].value)
        };
        // Stable sort: ties keep the move generation order.
        match self.nodes[index].position.side_to_move() {
            Player::White => children.sort_by(|a, b| by_value(b, a)),
            Player::Black => children.sort_by(by_value),
        }
        self.nodes[index].children = children;
    }

    /// Value of the expanded node: the children's values weighted by the
    /// chance of each of them being played and the remaining chance of all
    /// proposals failing, which loses the game for the side to move.
    fn expected_value(&self, index: NodeIndex) -> Value {
        let node = &self.nodes[index];
        let mut value = 0.0;
        let mut total_weight = 0.0;
        for (&(_, child), weight) in node
            .children
            .iter()
            .zip(geometric_weights(self.config.play_bias()))
        {
            value += weight * self.nodes[child].value;
            total_weight += weight;
        }
        value + (1.0 - total_weight) * self.config.loss_for(node.position.side_to_move())
    }

    /// Distributes the weights from the root down. Children are always added
    /// after their parents, so a single pass in arena order visits every
    /// parent before its children.
    fn redistribute_weights(&mut self) {
        let (search_bias, play_bias) = (self.config.search_bias(), self.config.play_bias());
        for index in 0..self.nodes.len() {
            let parent = self.nodes[index].weights;
            let children = std::mem::take(&mut self.nodes[index].children);
            let shares = geometric_weights(search_bias).zip(geometric_weights(play_bias));
            for (&(_, child), (search, play)) in children.iter().zip(shares) {
                self.nodes[child].weights = Weights {
                    search: parent.search * search,
                    play: parent.play * play,
                };
            }
            self.nodes[index].children = children;
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::evaluation::material::material;

    fn config(search_bias: f64, play_bias: f64) -> SearchConfig {
        SearchConfig::new(search_bias, play_bias, Duration::ZERO, 100.0).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn root_only() {
        let tree = ThinkingTree::new(Position::starting(), config(0.5, 0.5), material);
        assert_eq!(tree.nodes(), 1);
        assert_eq!(tree.expansions(), 0);
        assert!(tree.ranked_moves().is_empty());
        assert_eq!(tree.best_move(), None);
        assert_close(tree.value(), 0.0);
    }

    #[test]
    fn first_expansion() {
        let mut tree = ThinkingTree::new(Position::starting(), config(0.5, 0.5), material);
        assert!(tree.expand_once());
        assert_eq!(tree.nodes(), 21);
        assert_eq!(tree.ranked_moves().len(), 20);
        // All children are equal: the value is the loss sentinel weighted by the
        // chance of all 20 proposals failing.
        assert_close(tree.value(), -100.0 * 0.5_f64.powi(20));
        let weights = tree.weights();
        assert_close(weights[0].1.search, 0.5);
        assert_close(weights[1].1.search, 0.25);
        assert_close(weights[2].1.play, 0.125);
        // Ties keep the generation order.
        assert_eq!(
            tree.best_move(),
            Some(Position::starting().generate_moves()[0])
        );
    }

    #[test]
    fn captures_are_preferred() {
        // White can take the queen with the pawn.
        let position = Position::try_from("4k3/8/8/3q4/4P3/8/8/4K3 w - -").unwrap();
        let mut tree = ThinkingTree::new(position, config(0.5, 0.5), material);
        assert!(tree.expand_once());
        assert_eq!(tree.best_move(), Some(Move::try_from("PE4xD5").unwrap()));

        // Black to move ranks the moves the other way around.
        let position = Position::try_from("4k3/8/8/3q4/4P3/8/8/4K3 b - -").unwrap();
        let mut tree = ThinkingTree::new(position, config(0.5, 0.5), material);
        assert!(tree.expand_once());
        assert_eq!(tree.best_move(), Some(Move::try_from("QD5xE4").unwrap()));
        let values: Vec<Value> = tree.ranked_moves().iter().map(|(_, value)| *value).collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn king_capture_is_terminal() {
        let position = Position::try_from("4k3/8/8/8/8/8/8/4R1K1 w - -").unwrap();
        let mut tree = ThinkingTree::new(position, config(0.5, 0.5), material);
        assert!(tree.expand_once());
        assert_eq!(tree.best_move(), Some(Move::try_from("RE1xE8").unwrap()));
        assert_close(tree.ranked_moves()[0].1, 100.0);
        // The game is over after the capture, so there is nothing to expand
        // below it.
        let line = tree.principal_variation();
        assert_eq!(line.len(), 1);
        assert!(tree.expand_once());
        assert_eq!(tree.principal_variation(), line);
    }

    #[test]
    fn finished_game_has_nothing_to_expand() {
        let position = Position::try_from("8/8/8/8/8/8/8/4K3 b - -").unwrap();
        let mut tree = ThinkingTree::new(position, config(0.5, 0.5), material);
        assert_close(tree.value(), 100.0);
        assert!(!tree.expand_once());
        assert_eq!(tree.think(Duration::from_millis(10)), 0);
        assert_eq!(tree.nodes(), 1);
    }

    #[test]
    fn no_moves_is_a_loss() {
        // White's king is boxed in by its own pawns, none of which can move.
        let position = Position::try_from("PP5k/PP6/PP6/PP6/PP6/PP6/PP6/KP6 w - -").unwrap();
        assert_eq!(position.outcome(), None);
        assert!(position.generate_moves().is_empty());
        let mut tree = ThinkingTree::new(position, config(0.5, 0.5), material);
        assert!(tree.expand_once());
        assert_close(tree.value(), -100.0);
        assert!(tree.ranked_moves().is_empty());
        assert!(!tree.expand_once());
    }

    #[test]
    fn value_between_best_child_and_loss() {
        let mut tree = ThinkingTree::new(Position::starting(), config(0.5, 0.5), material);
        for _ in 0..50 {
            assert!(tree.expand_once());
        }
        let best = tree.ranked_moves()[0].1;
        assert!(tree.value() < best);
        assert!(tree.value() > -100.0);
    }

    #[test]
    fn search_follows_the_best_line() {
        let mut tree = ThinkingTree::new(Position::starting(), config(0.9, 0.5), material);
        for _ in 0..3 {
            assert!(tree.expand_once());
        }
        let line = tree.principal_variation();
        assert_eq!(line.len(), 3);
        let weights = tree.line_weights(&line).unwrap();
        assert_close(weights.search, 0.9 * 0.9 * 0.9);
        assert_close(weights.play, 0.5 * 0.5 * 0.5);
        assert_eq!(tree.line_weights(&[]), Some(Weights { search: 1.0, play: 1.0 }));
    }

    #[test]
    fn think_expands_at_least_once() {
        let mut tree = ThinkingTree::new(Position::starting(), config(0.5, 0.5), material);
        assert_eq!(tree.think(Duration::ZERO), 1);
        assert_eq!(tree.expansions(), 1);
        assert_eq!(tree.ranked_moves().len(), 20);
    }
}
