//! Builder for bottom-up tree construction.
//!
//! Children must exist before their parent references them, so trees are
//! assembled leaves-first; every method returns the [`NodeId`] of the node it
//! appended, and [`TreeBuilder::build`] seals the arena with a root.

use crate::tree::{Node, NodeId, Tree};

/// Incremental arena builder.
///
/// # Example
///
/// ```
/// use behavior_tree::{Behavior, Status, TreeBuilder};
///
/// struct Ctx;
/// struct Noop;
/// impl Behavior<Ctx> for Noop {
///     fn tick(&self, _ctx: &mut Ctx) -> Status {
///         Status::Success
///     }
/// }
///
/// let mut b = TreeBuilder::new();
/// let leaf = b.leaf(Noop);
/// let root = b.selector(vec![leaf]);
/// let tree = b.build(root);
/// assert_eq!(tree.tick(&mut Ctx), Status::Success);
/// ```
pub struct TreeBuilder<L> {
    nodes: Vec<Node<L>>,
}

impl<L> TreeBuilder<L> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: Node<L>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("tree arena overflow"));
        self.nodes.push(node);
        id
    }

    fn check_child(&self, child: NodeId) {
        assert!(
            child.index() < self.nodes.len(),
            "child NodeId does not reference an existing node"
        );
    }

    /// Appends a leaf node.
    pub fn leaf(&mut self, leaf: L) -> NodeId {
        self.push(Node::Leaf(leaf))
    }

    /// Appends a selector over the given children (first success wins).
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty or references a node not yet built.
    pub fn selector(&mut self, children: Vec<NodeId>) -> NodeId {
        assert!(!children.is_empty(), "Selector must have at least one child");
        for &child in &children {
            self.check_child(child);
        }
        self.push(Node::Selector(children))
    }

    /// Appends a sequence over the given children (first failure aborts).
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty or references a node not yet built.
    pub fn sequence(&mut self, children: Vec<NodeId>) -> NodeId {
        assert!(!children.is_empty(), "Sequence must have at least one child");
        for &child in &children {
            self.check_child(child);
        }
        self.push(Node::Sequence(children))
    }

    /// Appends an inverter around `child`.
    ///
    /// # Panics
    ///
    /// Panics if `child` references a node not yet built.
    pub fn inverter(&mut self, child: NodeId) -> NodeId {
        self.check_child(child);
        self.push(Node::Inverter(child))
    }

    /// Appends an always-succeed decorator around `child`.
    ///
    /// # Panics
    ///
    /// Panics if `child` references a node not yet built.
    pub fn always_succeed(&mut self, child: NodeId) -> NodeId {
        self.check_child(child);
        self.push(Node::AlwaysSucceed(child))
    }

    /// Seals the arena into an immutable [`Tree`] rooted at `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` references a node not yet built.
    pub fn build(self, root: NodeId) -> Tree<L> {
        Tree::from_parts(self.nodes, root)
    }
}

impl<L> Default for TreeBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}
