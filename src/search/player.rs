//! Search-backed move source.

use tracing::debug;

use crate::chess::core::Move;
use crate::chess::position::Position;
use crate::evaluation::Value;
use crate::game::Proposer;
use crate::search::tree::ThinkingTree;
use crate::search::SearchConfig;

/// Proposes moves in the order of the [`ThinkingTree`] ranking.
///
/// The tree is built when the player is first asked about a position and
/// reused while the same position is shown again (i.e. after the previous
/// proposal failed). Any other position discards the tree.
pub struct TreePlayer<E> {
    config: SearchConfig,
    evaluate: E,
    tree: Option<ThinkingTree<E>>,
}

impl<E> TreePlayer<E>
where
    E: Fn(&Position) -> Value + Clone,
{
    /// Creates a player that thinks for `config.think_time()` about every
    /// new position.
    #[must_use]
    pub const fn new(config: SearchConfig, evaluate: E) -> Self {
        Self {
            config,
            evaluate,
            tree: None,
        }
    }

    /// The tree of the last position the player thought about.
    #[must_use]
    pub const fn tree(&self) -> Option<&ThinkingTree<E>> {
        self.tree.as_ref()
    }
}

impl<E> Proposer for TreePlayer<E>
where
    E: Fn(&Position) -> Value + Clone,
{
    fn propose(&mut self, position: &Position, candidates: &[Move], rejected: &[Move]) -> Move {
        if let Some(tree) = &self.tree {
            if tree.root() != position {
                debug!(nodes = tree.nodes(), "position changed, discarding the tree");
                self.tree = None;
            }
        }
        let tree = self
            .tree
            .get_or_insert_with(|| ThinkingTree::new(*position, self.config, self.evaluate.clone()));
        if tree.expansions() == 0 {
            let _ = tree.think(self.config.think_time());
        }
        debug!(rejected = rejected.len(), "picking the best remaining move");
        tree.ranked_moves()
            .into_iter()
            .map(|(next_move, _)| next_move)
            .find(|next_move| candidates.contains(next_move))
            .unwrap_or_else(|| candidates[0])
    }
}
