// Valve Scan Parser

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alphanumeric1, char as char_p, u64 as u64_p},
    combinator::{all_consuming, map, opt, recognize},
    error::{context, ContextError, ErrorKind, ParseError},
    multi::separated_list1,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::FlowError;

pub type ValveParserKind<'i> = (&'i str, ErrorKind);

/* Types */
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanLine {
    pub name: String,
    pub rate: u64,
    pub neighbors: Vec<String>,
}

impl fmt::Display for ScanLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Valve {} has flow rate={}; ", self.name, self.rate)?;
        if self.neighbors.len() == 1 {
            write!(f, "tunnel leads to valve ")?;
        } else {
            write!(f, "tunnels lead to valves ")?;
        }
        write!(f, "{}", self.neighbors.join(", "))
    }
}

/* Parsers */
macro_rules! sp_terminated {
    ($parser:expr) => {
        terminated($parser, sp_p)
    };
}

/// sp : [ \t\r\n]*
fn sp_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    let chars = " \t\r\n";
    take_while(move |c| chars.contains(c))(input)
}

/// kind : ("Valve" | "Node") sp
fn kind_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    sp_terminated!(alt((tag("Valve"), tag("Node"))))(input)
}

/// name : [a-zA-Z0-9]+ sp
pub fn name_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    sp_terminated!(alphanumeric1)(input)
}

/// rate : "has flow rate=" sp [0-9]+ sp
pub fn rate_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, u64, E> {
    preceded(sp_terminated!(tag("has flow rate=")), sp_terminated!(u64_p))(input)
}

/// end : ';' sp
fn end_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    sp_terminated!(recognize(char_p(';')))(input)
}

/// connector : "tunnel" 's'? sp ("leads" | "lead") sp "to" sp "valve" 's'? sp
pub fn connector_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    sp_terminated!(recognize(tuple((
        tag("tunnel"),
        opt(char_p('s')),
        sp_p,
        alt((tag("leads"), tag("lead"))),
        sp_p,
        tag("to"),
        sp_p,
        tag("valve"),
        opt(char_p('s')),
    ))))(input)
}

/// neighbors : name (',' sp name)*
pub fn neighbors_p<'i, E: ParseError<&'i str>>(
    input: &'i str,
) -> IResult<&'i str, Vec<String>, E> {
    map(
        separated_list1(sp_terminated!(char_p(',')), name_p),
        |names: Vec<&str>| names.into_iter().map(String::from).collect(),
    )(input)
}

/// scan_line : sp kind name rate end connector neighbors
pub fn scan_line_p<'i, E: ParseError<&'i str> + ContextError<&'i str>>(
    input: &'i str,
) -> IResult<&'i str, ScanLine, E> {
    context(
        "scan line",
        map(
            tuple((sp_p, kind_p, name_p, rate_p, end_p, connector_p, neighbors_p)),
            |(_, _, name, rate, _, _, neighbors)| ScanLine {
                name: name.to_string(),
                rate,
                neighbors,
            },
        ),
    )(input)
}

/// Parse every non-blank line of `input`.
///
/// The first line that does not parse completely aborts the whole input,
/// reporting its 1-based line number.
pub fn parse_scan_lines(input: &str) -> Result<Vec<ScanLine>, FlowError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(
            |(index, line)| match all_consuming(scan_line_p::<ValveParserKind>)(line) {
                Ok((_, scan_line)) => Ok(scan_line),
                Err(_) => Err(FlowError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                }),
            },
        )
        .collect()
}
