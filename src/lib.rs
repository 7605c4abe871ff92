#[path = "error/error.rs"]
pub mod error;
#[path = "parser/parser.rs"]
pub mod parser;
#[path = "graph/graph.rs"]
pub mod graph;
#[path = "network/network.rs"]
pub mod network;
#[path = "search/search.rs"]
pub mod search;
#[path = "search/threads.rs"]
pub mod threads;
#[path = "repl/repl.rs"]
pub mod repl;

pub static DEFAULT_TIME_BUDGET: u32 = 30;
pub static DEFAULT_START_VALVE: &str = "AA";
/// Upper limit on the time budget: the search recurses once per tick.
pub static MAX_TIME_BUDGET: u32 = 1024;
