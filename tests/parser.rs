use flowpath::error::FlowError;
use flowpath::parser::*;

macro_rules! assert_scan_line {
    ($line:expr, $name:expr, $rate:expr, $neighbors:expr) => {
        let expected = ScanLine {
            name: $name.to_string(),
            rate: $rate,
            neighbors: $neighbors.iter().map(|n: &&str| n.to_string()).collect(),
        };
        match scan_line_p::<ValveParserKind>($line) {
            Ok(("", actual)) => assert_eq!(
                actual, expected,
                "Parsed scan line differs for '{}'.\nLeft (actual): {:#?}\nRight (expected): {:#?}",
                $line, actual, expected
            ),
            Ok((rest, parsed)) => panic!(
                "Failed to parse whole line:\n'{}'\nParsed :\n{:#?}\n",
                rest, parsed
            ),
            Err(err) => panic!("Failed to parse line:\n{:#?}", err),
        }
    };
}

#[test]
fn name() {
    assert_eq!(name_p::<ValveParserKind>("AA "), Ok(("", "AA")));
    assert_eq!(name_p::<ValveParserKind>("BB, CC"), Ok((", CC", "BB")));
}

#[test]
fn rate() {
    assert_eq!(rate_p::<ValveParserKind>("has flow rate=0;"), Ok((";", 0)));
    assert_eq!(rate_p::<ValveParserKind>("has flow rate=22;"), Ok((";", 22)));
    assert!(rate_p::<ValveParserKind>("has flow rate=x;").is_err());
}

#[test]
fn connector() {
    assert_eq!(
        connector_p::<ValveParserKind>("tunnels lead to valves DD"),
        Ok(("DD", "tunnels lead to valves"))
    );
    assert_eq!(
        connector_p::<ValveParserKind>("tunnel leads to valve GG"),
        Ok(("GG", "tunnel leads to valve"))
    );
}

#[test]
fn neighbors() {
    assert_eq!(
        neighbors_p::<ValveParserKind>("DD, II, BB"),
        Ok((
            "",
            vec!["DD".to_string(), "II".to_string(), "BB".to_string()]
        ))
    );
    assert_eq!(
        neighbors_p::<ValveParserKind>("GG"),
        Ok(("", vec!["GG".to_string()]))
    );
}

#[test]
fn scan_line() {
    assert_scan_line!(
        "Valve AA has flow rate=0; tunnels lead to valves DD, II, BB",
        "AA",
        0,
        ["DD", "II", "BB"]
    );
    assert_scan_line!(
        "Valve HH has flow rate=22; tunnel leads to valve GG",
        "HH",
        22,
        ["GG"]
    );
    // generic node keyword, surrounding whitespace
    assert_scan_line!(
        "  Node X1 has flow rate=7; tunnels lead to valves Y2,Z3  ",
        "X1",
        7,
        ["Y2", "Z3"]
    );
}

#[test]
fn scan_line_display_parses_back() {
    let line = "Valve BB has flow rate=13; tunnels lead to valves CC, AA";
    let (_, parsed) = scan_line_p::<ValveParserKind>(line).unwrap();
    assert_eq!(parsed.to_string(), line);
}

#[test]
fn scan_lines_skip_blank_lines() {
    let input = "Valve AA has flow rate=0; tunnel leads to valve BB\n\n   \nValve BB has flow rate=5; tunnel leads to valve AA\n";
    let lines = parse_scan_lines(input).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "AA");
    assert_eq!(lines[1].rate, 5);
}

#[test]
fn malformed_line_is_reported_with_its_number() {
    let input = "Valve AA has flow rate=0; tunnel leads to valve BB\n\nValve BB has flow rate=five; tunnel leads to valve AA\n";
    match parse_scan_lines(input) {
        Err(FlowError::MalformedLine { line, content }) => {
            assert_eq!(line, 3);
            assert!(content.contains("rate=five"));
        }
        other => panic!("Expected a malformed line error, got {:?}", other),
    }
}

#[test]
fn missing_neighbors_are_malformed() {
    assert!(matches!(
        parse_scan_lines("Valve AA has flow rate=0; tunnels lead to valves"),
        Err(FlowError::MalformedLine { line: 1, .. })
    ));
    assert!(matches!(
        parse_scan_lines("Valve AA has flow rate=0 tunnels lead to valves BB"),
        Err(FlowError::MalformedLine { line: 1, .. })
    ));
}
