// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A rooted tree, used for extracting flow paths of transmission lines.
//!
//! Nodes are stored in a `petgraph` graph, with edges pointing from parents
//! to children.  A node is addressed by its [`TreeNodeId`], and parents are
//! found by following the single incoming edge, so children never hold a
//! reference to their parent.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

/// Addresses a node in a [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeNodeId(NodeIndex);

/// A rooted tree of values.
#[derive(Clone, Debug)]
pub struct Tree<T> {
    graph: DiGraph<T, ()>,
    root: NodeIndex,
}

/// A borrowed view of one node of a [`Tree`].
#[derive(Debug)]
pub struct TreeNode<'a, T> {
    tree: &'a Tree<T>,
    id: TreeNodeId,
}

impl<T> Clone for TreeNode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TreeNode<'_, T> {}

impl<T> Tree<T> {
    /// Creates a tree holding only its root.
    pub fn new(root: T) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(root);
        Self { graph, root }
    }

    /// Returns the root node.
    pub fn root(&self) -> TreeNode<'_, T> {
        self.node(TreeNodeId(self.root))
    }

    /// Returns a view of the node with the given id.
    pub fn node(&self, id: TreeNodeId) -> TreeNode<'_, T> {
        TreeNode { tree: self, id }
    }

    /// Appends a child with the given value to `parent` and returns its id.
    pub fn add_child(&mut self, parent: TreeNodeId, value: T) -> TreeNodeId {
        let child = self.graph.add_node(value);
        self.graph.add_edge(parent.0, child, ());
        TreeNodeId(child)
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// A tree always has a root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first node, in depth-first order from `from`, whose value
    /// satisfies `pred`.  `from` itself is included in the search.
    pub fn find_descendant(
        &self,
        from: TreeNodeId,
        mut pred: impl FnMut(&T) -> bool,
    ) -> Option<TreeNode<'_, T>> {
        let mut dfs = Dfs::new(&self.graph, from.0);
        while let Some(index) = dfs.next(&self.graph) {
            if pred(&self.graph[index]) {
                return Some(self.node(TreeNodeId(index)));
            }
        }
        None
    }

    /// Returns the first node of the whole tree whose value satisfies `pred`.
    pub fn find(&self, pred: impl FnMut(&T) -> bool) -> Option<TreeNode<'_, T>> {
        self.find_descendant(TreeNodeId(self.root), pred)
    }
}

impl<T: PartialEq> Tree<T> {
    /// Returns true if any node of the tree holds `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find(|v| v == value).is_some()
    }
}

impl<'a, T> TreeNode<'a, T> {
    /// Returns the id of the node.
    pub fn id(&self) -> TreeNodeId {
        self.id
    }

    /// Returns the value stored in the node.
    pub fn value(&self) -> &'a T {
        &self.tree.graph[self.id.0]
    }

    /// Returns the parent of the node, or `None` for the root.
    pub fn parent(&self) -> Option<TreeNode<'a, T>> {
        self.tree
            .graph
            .neighbors_directed(self.id.0, Direction::Incoming)
            .next()
            .map(|index| self.tree.node(TreeNodeId(index)))
    }

    /// Returns the children of the node, in the order they were added.
    pub fn children(&self) -> Vec<TreeNode<'a, T>> {
        let mut children: Vec<_> = self
            .tree
            .graph
            .neighbors_directed(self.id.0, Direction::Outgoing)
            .map(|index| self.tree.node(TreeNodeId(index)))
            .collect();
        // petgraph lists the most recently added edge first.
        children.reverse();
        children
    }

    /// Returns the nodes from this one up to the root, both included.
    pub fn path_to_root(&self) -> Vec<TreeNode<'a, T>> {
        let mut path = vec![*self];
        while let Some(parent) = path.last().and_then(|n| n.parent()) {
            path.push(parent);
        }
        path
    }

    /// Returns the number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        self.path_to_root().len() - 1
    }
}

impl<T: std::fmt::Display> Tree<T> {
    fn fmt_node(
        &self,
        node: TreeNode<'_, T>,
        depth: usize,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "{:indent$}{}", "", node.value(), indent = depth * 4)?;
        for child in node.children() {
            self.fmt_node(child, depth + 1, f)?;
        }
        Ok(())
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_node(self.root(), 0, f)
    }
}
