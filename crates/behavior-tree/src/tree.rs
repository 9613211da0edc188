//! Arena-based tree storage and evaluation.
//!
//! All nodes of a tree live in one flat `Vec`; composites reference their
//! children by [`NodeId`] index. This keeps ownership trivial (no recursive
//! boxes), makes tree shape cheap to clone and compare in tests, and keeps
//! evaluation order fully deterministic: children are always visited in the
//! order they were passed to the builder.

use crate::{Behavior, Status};

/// Index of a node within its [`Tree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node in the arena: a composite over child indices or a leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<L> {
    /// Evaluates children in order, stopping at the first `Success`.
    ///
    /// Short-circuited logical OR: returns `Failure` only if every child
    /// failed.
    Selector(Vec<NodeId>),

    /// Evaluates children in order, stopping at the first `Failure`.
    ///
    /// Short-circuited logical AND: returns `Success` only if every child
    /// succeeded.
    Sequence(Vec<NodeId>),

    /// Inverts the child's status.
    Inverter(NodeId),

    /// Evaluates the child and returns `Success` regardless of its status.
    AlwaysSucceed(NodeId),

    /// Caller-supplied leaf (condition or action).
    Leaf(L),
}

/// A complete behavior tree: node arena plus designated root.
///
/// Trees are static per archetype: they are built once and evaluated many
/// times. Evaluation borrows the tree immutably, so one tree can drive any
/// number of units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree<L> {
    nodes: Vec<Node<L>>,
    root: NodeId,
}

impl<L> Tree<L> {
    /// Assembles a tree from raw parts.
    ///
    /// Prefer [`TreeBuilder`](crate::TreeBuilder), which validates child
    /// indices as the arena grows.
    ///
    /// # Panics
    ///
    /// Panics if `root` is out of range for `nodes`.
    pub fn from_parts(nodes: Vec<Node<L>>, root: NodeId) -> Self {
        assert!(
            root.index() < nodes.len(),
            "root NodeId out of range for arena"
        );
        Self { nodes, root }
    }

    /// Returns the root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node stored at `id`, if in range.
    pub fn node(&self, id: NodeId) -> Option<&Node<L>> {
        self.nodes.get(id.index())
    }

    /// Evaluates the tree top-down against the given context.
    pub fn tick<C>(&self, ctx: &mut C) -> Status
    where
        L: Behavior<C>,
    {
        self.tick_node(self.root, ctx)
    }

    fn tick_node<C>(&self, id: NodeId, ctx: &mut C) -> Status
    where
        L: Behavior<C>,
    {
        // Builder-validated indices: indexing cannot fail for trees built
        // through TreeBuilder or the checked from_parts.
        match &self.nodes[id.index()] {
            Node::Selector(children) => {
                for &child in children {
                    match self.tick_node(child, ctx) {
                        Status::Success => return Status::Success,
                        Status::Failure => continue,
                    }
                }
                Status::Failure
            }
            Node::Sequence(children) => {
                for &child in children {
                    match self.tick_node(child, ctx) {
                        Status::Success => continue,
                        Status::Failure => return Status::Failure,
                    }
                }
                Status::Success
            }
            Node::Inverter(child) => self.tick_node(*child, ctx).invert(),
            Node::AlwaysSucceed(child) => {
                let _ = self.tick_node(*child, ctx);
                Status::Success
            }
            Node::Leaf(leaf) => leaf.tick(ctx),
        }
    }
}
