//! Arena-backed search tree for MCTS
//!
//! Nodes live in one `Vec` and refer to each other by index. A node owns its
//! children through the arena; the parent link is a plain index used only to
//! walk values back up. Re-rooting copies the surviving subtree into a fresh
//! arena, so the old root and its other branches are dropped with the old
//! `Vec`.

use crate::board::Pos;

/// Index of a node in its [`Tree`]
pub type NodeId = usize;

/// One tree node: statistics for the move that led here.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<(Pos, NodeId)>,
    visits: u32,
    /// Running mean of backed-up values, from the view of the player who
    /// made the move into this node
    q: f64,
    prior: f64,
}

impl Node {
    fn new(parent: Option<NodeId>, prior: f64) -> Self {
        Self {
            parent,
            children: Vec::new(),
            visits: 0,
            q: 0.0,
            prior,
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[(Pos, NodeId)] {
        &self.children
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    pub fn q(&self) -> f64 {
        self.q
    }

    #[inline]
    pub fn prior(&self) -> f64 {
        self.prior
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Count one visit and fold `value` into the running mean.
    fn update(&mut self, value: f64) {
        self.visits += 1;
        self.q += (value - self.q) / f64::from(self.visits);
    }
}

/// MCTS tree. The root is always [`Tree::ROOT`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    /// A tree with a single unexpanded root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, 1.0)],
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `id` reached by `pos`, if expanded
    pub fn child(&self, id: NodeId, pos: Pos) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .find(|(p, _)| *p == pos)
            .map(|&(_, child)| child)
    }

    /// Add children of `id` for moves it does not have yet.
    pub fn expand<I>(&mut self, id: NodeId, priors: I)
    where
        I: IntoIterator<Item = (Pos, f64)>,
    {
        for (pos, prior) in priors {
            if self.child(id, pos).is_some() {
                continue;
            }
            let child = self.nodes.len();
            self.nodes.push(Node::new(Some(id), prior));
            self.nodes[id].children.push((pos, child));
        }
    }

    /// UCT value of a child: `Q + c_puct * P * sqrt(parent N) / (1 + N)`.
    pub fn uct(&self, id: NodeId, c_puct: f64) -> f64 {
        let node = &self.nodes[id];
        let parent_visits = node.parent.map_or(0, |p| self.nodes[p].visits);
        node.q + c_puct * node.prior * f64::from(parent_visits).sqrt() / f64::from(1 + node.visits)
    }

    /// Child of `id` with the highest UCT value, the earliest on ties.
    /// `None` for a leaf.
    pub fn select(&self, id: NodeId, c_puct: f64) -> Option<(Pos, NodeId)> {
        let mut best: Option<((Pos, NodeId), f64)> = None;
        for &(pos, child) in &self.nodes[id].children {
            let value = self.uct(child, c_puct);
            if best.map_or(true, |(_, top)| value > top) {
                best = Some(((pos, child), value));
            }
        }
        best.map(|(choice, _)| choice)
    }

    /// Most visited child of `id`, the earliest on ties.
    pub fn most_visited(&self, id: NodeId) -> Option<(Pos, NodeId)> {
        let mut best: Option<(Pos, NodeId)> = None;
        for &(pos, child) in &self.nodes[id].children {
            let visits = self.nodes[child].visits;
            if best.map_or(true, |(_, top)| visits > self.nodes[top].visits) {
                best = Some((pos, child));
            }
        }
        best
    }

    /// Back `value` up from `id` to the root, negating it at each level.
    ///
    /// `value` is from the view of the player who moved into `id`.
    pub fn update_recursive(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);
        let mut value = value;
        while let Some(node) = current {
            self.nodes[node].update(value);
            current = self.nodes[node].parent;
            value = -value;
        }
    }

    /// Make the root's child for `pos` the new root, keeping its subtree.
    ///
    /// Returns `false` and starts over with a fresh root if `pos` was never
    /// expanded.
    pub fn reroot(&mut self, pos: Pos) -> bool {
        let Some(keep) = self.child(Self::ROOT, pos) else {
            *self = Self::new();
            return false;
        };

        let mut nodes = Vec::new();
        let mut root = self.nodes[keep].clone();
        root.parent = None;
        nodes.push(root);

        // Breadth-first copy; `nodes[i]` still lists old ids until remapped.
        let mut next = 0;
        while next < nodes.len() {
            let old_children = std::mem::take(&mut nodes[next].children);
            let mut children = Vec::with_capacity(old_children.len());
            for (pos, old) in old_children {
                let id = nodes.len();
                let mut child = self.nodes[old].clone();
                child.parent = Some(next);
                nodes.push(child);
                children.push((pos, id));
            }
            nodes[next].children = children;
            next += 1;
        }

        self.nodes = nodes;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: u8, col: u8) -> Pos {
        Pos::new(row, col)
    }

    #[test]
    fn test_new_tree_is_leaf() {
        let tree = Tree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.select(Tree::ROOT, 5.0), None);
        assert_eq!(tree.most_visited(Tree::ROOT), None);
    }

    #[test]
    fn test_expand_skips_existing() {
        let mut tree = Tree::new();
        tree.expand(Tree::ROOT, [(p(0, 0), 0.5), (p(0, 1), 0.5)]);
        tree.expand(Tree::ROOT, [(p(0, 1), 0.9), (p(1, 1), 0.1)]);
        assert_eq!(tree.root().children().len(), 3);
        let child = tree.child(Tree::ROOT, p(0, 1)).unwrap();
        assert_eq!(tree.node(child).prior(), 0.5);
        assert_eq!(tree.node(child).parent(), Some(Tree::ROOT));
    }

    #[test]
    fn test_running_mean_and_sign_flip() {
        let mut tree = Tree::new();
        tree.expand(Tree::ROOT, [(p(0, 0), 1.0)]);
        let child = tree.child(Tree::ROOT, p(0, 0)).unwrap();
        tree.expand(child, [(p(1, 1), 1.0)]);
        let grandchild = tree.child(child, p(1, 1)).unwrap();

        tree.update_recursive(grandchild, 1.0);
        tree.update_recursive(grandchild, 0.0);
        assert_eq!(tree.node(grandchild).visits(), 2);
        assert!((tree.node(grandchild).q() - 0.5).abs() < 1e-12);
        assert!((tree.node(child).q() + 0.5).abs() < 1e-12);
        assert!((tree.root().q() - 0.5).abs() < 1e-12);
        assert_eq!(tree.root().visits(), 2);
    }

    #[test]
    fn test_select_prefers_unvisited_then_value() {
        let mut tree = Tree::new();
        tree.expand(Tree::ROOT, [(p(0, 0), 0.5), (p(0, 1), 0.5)]);
        let first = tree.child(Tree::ROOT, p(0, 0)).unwrap();
        // Equal values: the first child wins the tie
        assert_eq!(tree.select(Tree::ROOT, 5.0), Some((p(0, 0), first)));

        tree.update_recursive(first, -1.0);
        // The visited child lost and has a smaller bonus now
        let second = tree.child(Tree::ROOT, p(0, 1)).unwrap();
        assert_eq!(tree.select(Tree::ROOT, 5.0), Some((p(0, 1), second)));
        assert_eq!(tree.most_visited(Tree::ROOT), Some((p(0, 0), first)));
    }

    #[test]
    fn test_uct_formula() {
        let mut tree = Tree::new();
        tree.expand(Tree::ROOT, [(p(0, 0), 0.25)]);
        let child = tree.child(Tree::ROOT, p(0, 0)).unwrap();
        for _ in 0..3 {
            tree.update_recursive(child, 1.0);
        }
        // Q = 1, parent N = 3, child N = 3
        let expected = 1.0 + 5.0 * 0.25 * 3f64.sqrt() / 4.0;
        assert!((tree.uct(child, 5.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_reroot_keeps_subtree_only() {
        let mut tree = Tree::new();
        tree.expand(Tree::ROOT, [(p(0, 0), 0.5), (p(0, 1), 0.5)]);
        let kept = tree.child(Tree::ROOT, p(0, 1)).unwrap();
        let dropped = tree.child(Tree::ROOT, p(0, 0)).unwrap();
        tree.expand(dropped, [(p(2, 2), 1.0)]);
        tree.expand(kept, [(p(1, 0), 0.5), (p(1, 1), 0.5)]);
        let leaf = tree.child(kept, p(1, 1)).unwrap();
        tree.expand(leaf, [(p(2, 0), 1.0)]);
        let deep = tree.child(leaf, p(2, 0)).unwrap();
        tree.update_recursive(deep, 1.0);
        tree.update_recursive(leaf, -1.0);
        let kept_visits = tree.node(kept).visits();

        assert!(tree.reroot(p(0, 1)));
        // kept, its two children and the grandchild
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().parent(), None);
        assert_eq!(tree.root().visits(), kept_visits);

        let leaf = tree.child(Tree::ROOT, p(1, 1)).unwrap();
        assert_eq!(tree.node(leaf).parent(), Some(Tree::ROOT));
        assert_eq!(tree.node(leaf).visits(), 2);
        let deep = tree.child(leaf, p(2, 0)).unwrap();
        assert_eq!(tree.node(deep).parent(), Some(leaf));
        assert_eq!(tree.node(deep).visits(), 1);
    }

    #[test]
    fn test_reroot_unknown_move_resets() {
        let mut tree = Tree::new();
        tree.expand(Tree::ROOT, [(p(0, 0), 1.0)]);
        assert!(!tree.reroot(p(3, 3)));
        assert_eq!(tree, Tree::new());
    }
}
