use flowpath::error::FlowError;
use flowpath::network::*;

static SAMPLE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/sample.txt");

fn sample() -> ValveNetwork {
    ValveNetwork::from_file(SAMPLE_PATH).unwrap()
}

#[test]
fn sample_network_builds() {
    let network = sample();
    assert_eq!(network.len(), 10);
    let hh = network.index_of("HH").unwrap();
    assert_eq!(
        network.valve(hh).unwrap(),
        &Valve {
            name: "HH".to_string(),
            rate: 22
        }
    );
    let aa = network.index_of("AA").unwrap();
    let neighbours: Vec<&str> = network
        .graph()
        .neighbours(aa)
        .map(|index| network.valve(index).unwrap().name.as_str())
        .collect();
    assert_eq!(neighbours, vec!["DD", "II", "BB"]);
}

#[test]
fn every_tunnel_costs_one_tick() {
    let network = sample();
    assert!(network
        .graph()
        .nodes()
        .flat_map(|node| node.edges.iter())
        .all(|edge| edge.weight == TUNNEL_WEIGHT));
    assert_eq!(network.distance("AA", "HH").unwrap(), 5);
    assert_eq!(network.distance("JJ", "BB").unwrap(), 3);
    assert_eq!(network.distance("AA", "AA").unwrap(), 0);
}

#[test]
fn building_twice_gives_the_same_network() {
    let content = std::fs::read_to_string(SAMPLE_PATH).unwrap();
    let first = ValveNetwork::parse(&content).unwrap();
    let second = ValveNetwork::parse(&content).unwrap();
    assert_eq!(first.graph(), second.graph());
}

#[test]
fn dangling_neighbor_fails_the_build() {
    let input = "Valve AA has flow rate=0; tunnels lead to valves BB, ZZ\nValve BB has flow rate=3; tunnel leads to valve AA\n";
    match ValveNetwork::parse(input) {
        Err(FlowError::UnknownValve(name)) => assert_eq!(name, "ZZ"),
        other => panic!("Expected an unknown valve error, got {:?}", other),
    }
}

#[test]
fn duplicate_valve_fails_the_build() {
    let input = "Valve AA has flow rate=0; tunnel leads to valve AA\nValve AA has flow rate=3; tunnel leads to valve AA\n";
    assert!(matches!(
        ValveNetwork::parse(input),
        Err(FlowError::DuplicateValve(name)) if name == "AA"
    ));
}

#[test]
fn unknown_name_lookup_fails() {
    let network = sample();
    assert!(matches!(
        network.index_of("QQ"),
        Err(FlowError::UnknownValve(name)) if name == "QQ"
    ));
    assert!(network.distance("AA", "QQ").is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    match ValveNetwork::from_file("demos/does-not-exist.txt") {
        Err(FlowError::Io { path, .. }) => assert_eq!(path, "demos/does-not-exist.txt"),
        other => panic!("Expected an io error, got {:?}", other),
    }
}

#[test]
fn dot_format_lists_valves_and_tunnels() {
    let network = sample();
    let start = network.index_of("AA").ok();
    let dot = print_network_dot_format(&network, start);
    assert!(dot.starts_with("/* DOT FORMAT START */\n"));
    assert!(dot.ends_with("/* DOT FORMAT END */\n"));
    assert!(dot.contains("\tAA [shape=record color=red label=\"AA (0)\"];\n"));
    assert!(dot.contains("\tHH [shape=record color=blue label=\"HH (22)\"];\n"));
    assert!(dot.contains("\tFF [shape=record color=gray label=\"FF (0)\"];\n"));
    assert!(dot.contains("\tHH -> GG "));
    let num_edges = dot.matches(" -> ").count();
    assert_eq!(num_edges, 20);
}
