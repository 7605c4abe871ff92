// Weighted Graph

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet, VecDeque},
    fmt,
};

pub type NodeIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} does not exist in the graph")]
    NodeOutOfBounds(NodeIndex),

    /// Distinct from a zero-cost path.
    #[error("no path from node {from} to node {to}")]
    Unreachable { from: NodeIndex, to: NodeIndex },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub weight: u64,
    pub target: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T> {
    pub value: T,
    pub index: NodeIndex,
    /// Outgoing edges, in insertion order. Parallel edges are kept.
    pub edges: Vec<Edge>,
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node {{ value: '{}', index: {}, edges: [", self.value, self.index)?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}@{}", edge.target, edge.weight)?;
        }
        write!(f, "] }}")
    }
}

/// Arena of nodes addressed by `NodeIndex`.
///
/// Nodes are never removed, so an index handed out by `create_node`
/// stays valid for the lifetime of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph ({} nodes) {{", self.nodes.len())?;
        for node in &self.nodes {
            writeln!(f, "\t{},", node)?;
        }
        write!(f, "}}")
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a node without any edges.
    pub fn create_node(&mut self, value: T) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node {
            value,
            index,
            edges: Vec::new(),
        });
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeIndex) -> Result<&Node<T>, GraphError> {
        self.nodes
            .get(index)
            .ok_or(GraphError::NodeOutOfBounds(index))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    /// Targets of the outgoing edges of `index`, in insertion order.
    pub fn neighbours(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .get(index)
            .into_iter()
            .flat_map(|node| node.edges.iter().map(|edge| edge.target))
    }

    /// Add the directed edge `source -> target`.
    ///
    /// No de-duplication: linking twice yields two parallel edges.
    pub fn link(
        &mut self,
        weight: u64,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<(), GraphError> {
        if target >= self.nodes.len() {
            return Err(GraphError::NodeOutOfBounds(target));
        }
        let node = self
            .nodes
            .get_mut(source)
            .ok_or(GraphError::NodeOutOfBounds(source))?;
        node.edges.push(Edge { weight, target });
        Ok(())
    }

    /// `link(weight, a, b)` followed by `link(weight, b, a)`.
    pub fn bi_link(&mut self, weight: u64, a: NodeIndex, b: NodeIndex) -> Result<(), GraphError> {
        self.link(weight, a, b)?;
        self.link(weight, b, a)
    }

    /// Every node reachable from `start` (including `start` itself).
    pub fn all_nodes(&self, start: NodeIndex) -> Result<HashSet<NodeIndex>, GraphError> {
        self.node(start)?;
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbours(current) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        Ok(seen)
    }

    /// Minimum total edge weight from `from` to `to` (Dijkstra).
    pub fn shortest_path(&self, from: NodeIndex, to: NodeIndex) -> Result<u64, GraphError> {
        self.node(from)?;
        self.node(to)?;
        let mut distances: Vec<Option<u64>> = vec![None; self.nodes.len()];
        let mut heap: BinaryHeap<Reverse<(u64, NodeIndex)>> = BinaryHeap::new();
        distances[from] = Some(0);
        heap.push(Reverse((0, from)));
        while let Some(Reverse((cost, current))) = heap.pop() {
            if current == to {
                return Ok(cost);
            }
            // stale heap entry
            if distances[current].map_or(false, |best| cost > best) {
                continue;
            }
            for edge in &self.nodes[current].edges {
                let next_cost = cost.saturating_add(edge.weight);
                if distances[edge.target].map_or(true, |best| next_cost < best) {
                    distances[edge.target] = Some(next_cost);
                    heap.push(Reverse((next_cost, edge.target)));
                }
            }
        }
        Err(GraphError::Unreachable { from, to })
    }
}
