use std::collections::HashSet;

use flowpath::graph::*;

/// a - b - c - d as a bidirectional line, plus an isolated e.
fn line_graph() -> (Graph<&'static str>, Vec<NodeIndex>) {
    let mut graph: Graph<&'static str> = Graph::new();
    let nodes: Vec<NodeIndex> = ["a", "b", "c", "d", "e"]
        .into_iter()
        .map(|name| graph.create_node(name))
        .collect();
    for pair in nodes[..4].windows(2) {
        graph.bi_link(1, pair[0], pair[1]).unwrap();
    }
    (graph, nodes)
}

#[test]
fn create_node_has_no_edges() {
    let mut graph: Graph<u32> = Graph::new();
    assert!(graph.is_empty());
    let a = graph.create_node(7);
    let b = graph.create_node(9);
    assert_ne!(a, b);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.node(a).unwrap().value, 7);
    assert!(graph.node(b).unwrap().edges.is_empty());
}

#[test]
fn link_is_directed_and_keeps_parallel_edges() {
    let mut graph: Graph<u32> = Graph::new();
    let a = graph.create_node(0);
    let b = graph.create_node(1);
    graph.link(1, a, b).unwrap();
    graph.link(1, a, b).unwrap();
    assert_eq!(graph.neighbours(a).collect::<Vec<_>>(), vec![b, b]);
    assert_eq!(graph.neighbours(b).count(), 0);
}

#[test]
fn bi_link_adds_both_directions_with_the_same_weight() {
    let mut graph: Graph<u32> = Graph::new();
    let a = graph.create_node(0);
    let b = graph.create_node(1);
    graph.bi_link(4, a, b).unwrap();
    assert_eq!(graph.node(a).unwrap().edges, vec![Edge { weight: 4, target: b }]);
    assert_eq!(graph.node(b).unwrap().edges, vec![Edge { weight: 4, target: a }]);
}

#[test]
fn link_to_missing_node_fails() {
    let mut graph: Graph<u32> = Graph::new();
    let a = graph.create_node(0);
    assert_eq!(graph.link(1, a, 5), Err(GraphError::NodeOutOfBounds(5)));
    assert_eq!(graph.link(1, 3, a), Err(GraphError::NodeOutOfBounds(3)));
    // nothing was added by the failed calls
    assert!(graph.node(a).unwrap().edges.is_empty());
}

#[test]
fn all_nodes_skips_disconnected_nodes() {
    let (graph, nodes) = line_graph();
    let expected: HashSet<NodeIndex> = nodes[..4].iter().copied().collect();
    assert_eq!(graph.all_nodes(nodes[0]).unwrap(), expected);
    assert_eq!(graph.all_nodes(nodes[2]).unwrap(), expected);
    assert_eq!(
        graph.all_nodes(nodes[4]).unwrap(),
        [nodes[4]].into_iter().collect::<HashSet<NodeIndex>>()
    );
}

#[test]
fn all_nodes_follows_edge_direction() {
    let mut graph: Graph<u32> = Graph::new();
    let a = graph.create_node(0);
    let b = graph.create_node(1);
    let c = graph.create_node(2);
    graph.link(1, a, b).unwrap();
    graph.link(1, b, c).unwrap();
    assert_eq!(graph.all_nodes(a).unwrap().len(), 3);
    assert_eq!(
        graph.all_nodes(c).unwrap(),
        [c].into_iter().collect::<HashSet<NodeIndex>>()
    );
    assert_eq!(graph.all_nodes(9), Err(GraphError::NodeOutOfBounds(9)));
}

#[test]
fn shortest_path_counts_hops_on_unit_weights() {
    let (graph, nodes) = line_graph();
    assert_eq!(graph.shortest_path(nodes[0], nodes[0]), Ok(0));
    assert_eq!(graph.shortest_path(nodes[0], nodes[1]), Ok(1));
    assert_eq!(graph.shortest_path(nodes[0], nodes[3]), Ok(3));
    assert_eq!(graph.shortest_path(nodes[3], nodes[1]), Ok(2));
}

#[test]
fn shortest_path_prefers_cheaper_detour() {
    let mut graph: Graph<u32> = Graph::new();
    let a = graph.create_node(0);
    let b = graph.create_node(1);
    let c = graph.create_node(2);
    let d = graph.create_node(3);
    graph.link(10, a, d).unwrap();
    graph.link(2, a, b).unwrap();
    graph.link(3, b, c).unwrap();
    graph.link(1, c, d).unwrap();
    assert_eq!(graph.shortest_path(a, d), Ok(6));
}

#[test]
fn unreachable_is_not_a_zero_cost_path() {
    let (graph, nodes) = line_graph();
    assert_eq!(
        graph.shortest_path(nodes[0], nodes[4]),
        Err(GraphError::Unreachable {
            from: nodes[0],
            to: nodes[4]
        })
    );
}
