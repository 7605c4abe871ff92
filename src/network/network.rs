// Valve Network

use std::{collections::HashMap, fmt, fs};

use tracing::debug;

use crate::{
    error::FlowError,
    graph::{Graph, NodeIndex},
    parser::{parse_scan_lines, ScanLine},
};

/// Every tunnel takes one time unit to walk through.
pub static TUNNEL_WEIGHT: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Valve {
    pub name: String,
    pub rate: u64,
}

impl fmt::Display for Valve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.rate)
    }
}

/// A valve graph together with its name index.
///
/// Built once from parsed input and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct ValveNetwork {
    graph: Graph<Valve>,
    names: HashMap<String, NodeIndex>,
}

impl ValveNetwork {
    pub fn parse(input: &str) -> Result<Self, FlowError> {
        Self::from_scan_lines(&parse_scan_lines(input)?)
    }

    pub fn from_file(path: &str) -> Result<Self, FlowError> {
        let content = fs::read_to_string(path).map_err(|source| FlowError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Two passes: first every valve becomes a node, then every listed
    /// neighbor becomes a directed edge. A neighbor name without its own
    /// line is an inconsistent input and fails the whole build.
    pub fn from_scan_lines(lines: &[ScanLine]) -> Result<Self, FlowError> {
        let mut graph: Graph<Valve> = Graph::new();
        let mut names: HashMap<String, NodeIndex> = HashMap::with_capacity(lines.len());
        for line in lines {
            if names.contains_key(&line.name) {
                return Err(FlowError::DuplicateValve(line.name.clone()));
            }
            let index = graph.create_node(Valve {
                name: line.name.clone(),
                rate: line.rate,
            });
            names.insert(line.name.clone(), index);
        }
        for line in lines {
            let source = names[&line.name];
            for neighbor in &line.neighbors {
                let target = *names
                    .get(neighbor)
                    .ok_or_else(|| FlowError::UnknownValve(neighbor.clone()))?;
                graph.link(TUNNEL_WEIGHT, source, target)?;
            }
        }
        debug!(valves = graph.len(), "built valve network");
        Ok(Self { graph, names })
    }

    pub fn index_of(&self, name: &str) -> Result<NodeIndex, FlowError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| FlowError::UnknownValve(name.to_string()))
    }

    pub fn valve(&self, index: NodeIndex) -> Result<&Valve, FlowError> {
        Ok(&self.graph.node(index)?.value)
    }

    pub fn graph(&self) -> &Graph<Valve> {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Shortest walking time between two valves, by name.
    pub fn distance(&self, from: &str, to: &str) -> Result<u64, FlowError> {
        Ok(self
            .graph
            .shortest_path(self.index_of(from)?, self.index_of(to)?)?)
    }
}

pub fn print_network_dot_format(network: &ValveNetwork, start: Option<NodeIndex>) -> String {
    let mut content = String::new();
    content.push_str("/* DOT FORMAT START */\n");
    content.push_str("digraph G {\n\trankdir = LR;\n");
    for node in network.graph().nodes() {
        content.push_str(&format!(
            "\t{} [shape=record color={} label=\"{}\"];\n",
            node.value.name,
            if Some(node.index) == start {
                "red"
            } else if node.value.rate > 0 {
                "blue"
            } else {
                "gray"
            },
            node.value,
        ));
        for edge in &node.edges {
            if let Ok(target) = network.graph().node(edge.target) {
                content.push_str(&format!(
                    "\t{} -> {} [label=< <B> {} </B> > fontsize=7 fontcolor=darkgreen];\n",
                    node.value.name, target.value.name, edge.weight,
                ));
            }
        }
    }
    content.push_str("}\n");
    content.push_str("/* DOT FORMAT END */\n");
    content
}
