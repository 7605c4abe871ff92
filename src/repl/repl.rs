// Flowpath Repl

use crate::{
    error::FlowError,
    network::{print_network_dot_format, ValveNetwork},
    search::ValveSearch,
    threads::{default_workers, solve_parallel},
    DEFAULT_START_VALVE, DEFAULT_TIME_BUDGET, MAX_TIME_BUDGET,
};
use reedline_repl_rs::{
    clap::{Arg, ArgMatches, Command},
    Repl, Result,
};

#[derive(Default, Clone)]
pub struct ReplContext {
    pub network: Option<ValveNetwork>,
    pub time_budget: u32,
    pub start: String,
    pub parallel: bool,
}

pub fn init_context() -> ReplContext {
    ReplContext {
        network: None,
        time_budget: DEFAULT_TIME_BUDGET,
        start: DEFAULT_START_VALVE.to_string(),
        parallel: false,
    }
}

pub fn repl(context: ReplContext) -> Result<()> {
    let mut repl = Repl::new(context)
        .with_name("Flowpath ")
        .with_version("v0.1.0")
        .with_description("Find the most pressure a valve network can release in time")
        .with_banner("REPL for valve network searches")
        .with_command(
            Command::new("import")
                .arg(Arg::new("file").required(true))
                .about("Load a valve network from a file (replaces the current one)"),
            import_callback,
        )
        .with_command(
            Command::new("solve")
                .arg(Arg::new("budget").required(false))
                .about("Search the best release within the time budget"),
            solve_callback,
        )
        .with_command(
            Command::new("path")
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true))
                .about("Shortest walking time between two valves"),
            path_callback,
        )
        .with_command(
            Command::new("reach")
                .arg(Arg::new("start").required(false))
                .about("List the valves reachable from a valve"),
            reach_callback,
        )
        .with_command(
            Command::new("graph").about("Print the current network in dot format"),
            graph_callback,
        )
        .with_command(
            Command::new("set")
                .arg(Arg::new("setting").required(true))
                .arg(Arg::new("value").required(true))
                .about("Change a setting: budget <ticks>, start <valve>, parallel <on|off>"),
            set_callback,
        )
        .with_command(
            Command::new("ctx").about("Print the current context"),
            ctx_callback,
        );
    repl.run()
}

fn current_network(context: &ReplContext) -> std::result::Result<&ValveNetwork, String> {
    context
        .network
        .as_ref()
        .ok_or_else(|| " No network loaded, use 'import <file>' first.".to_string())
}

fn ctx_callback(_args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let mut content = match &context.network {
        Some(network) => format!(" Network : {} valves\n", network.len()),
        None => " Network : none\n".to_owned(),
    };
    content.push_str(&format!(" Time budget : {}\n", context.time_budget));
    content.push_str(&format!(" Start valve : {}\n", context.start));
    content.push_str(&format!(" Parallel : {}", context.parallel));
    Ok(Some(content))
}

fn set_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let setting = args.get_one::<String>("setting").map(String::as_str).unwrap_or_default();
    let value = args.get_one::<String>("value").map(String::as_str).unwrap_or_default();
    match setting {
        "budget" => {
            let budget = value.parse::<u32>()?;
            if budget > MAX_TIME_BUDGET {
                return Ok(Some(format!(
                    " Error: time budget {} is above the maximum of {}",
                    budget, MAX_TIME_BUDGET
                )));
            }
            context.time_budget = budget;
            Ok(Some(format!(" Time budget set to {}.", context.time_budget)))
        }
        "start" => {
            context.start = value.to_string();
            Ok(Some(format!(" Start valve set to {}.", context.start)))
        }
        "parallel" => {
            context.parallel = match value {
                "on" => true,
                "off" => false,
                s => return Ok(Some(format!(" Parallel mode '{}' is not valid", s))),
            };
            Ok(Some(format!(" Parallel search {}.", value)))
        }
        s => Ok(Some(format!(" Setting '{}' is not valid", s))),
    }
}

fn import_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let filename = args.get_one::<String>("file").map(String::as_str).unwrap_or_default();
    match import_into_context(context, filename) {
        Ok(num_valves) => Ok(Some(format!(
            " imported '{}' ({} valves)",
            filename, num_valves
        ))),
        Err(err) => Ok(Some(format!(" Error: {}", err))),
    }
}

fn solve_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let budget = match args.get_one::<String>("budget") {
        Some(budget) => budget.parse::<u32>()?,
        None => context.time_budget,
    };
    let network = match current_network(context) {
        Ok(network) => network,
        Err(message) => return Ok(Some(message)),
    };
    let start = match network.index_of(&context.start) {
        Ok(start) => start,
        Err(err) => return Ok(Some(format!(" Error: {}", err))),
    };
    let outcome = if context.parallel {
        solve_parallel(network.graph(), start, budget, default_workers())
    } else {
        ValveSearch::new(network.graph(), start, budget).map(|search| search.run())
    };
    match outcome {
        Ok(outcome) => Ok(Some(format!(
            " Best release in {} ticks from {} : {}\n{}",
            budget, context.start, outcome.best, outcome.stats
        ))),
        Err(err) => Ok(Some(format!(" Error: {}", err))),
    }
}

fn path_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let from = args.get_one::<String>("from").map(String::as_str).unwrap_or_default();
    let to = args.get_one::<String>("to").map(String::as_str).unwrap_or_default();
    let network = match current_network(context) {
        Ok(network) => network,
        Err(message) => return Ok(Some(message)),
    };
    match network.distance(from, to) {
        Ok(cost) => Ok(Some(format!(" {} -> {} : {}", from, to, cost))),
        Err(err) => Ok(Some(format!(" Error: {}", err))),
    }
}

fn reach_callback(args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let start_name = args
        .get_one::<String>("start")
        .unwrap_or(&context.start)
        .clone();
    let network = match current_network(context) {
        Ok(network) => network,
        Err(message) => return Ok(Some(message)),
    };
    match reachable_names(network, &start_name) {
        Ok(names) => Ok(Some(format!(
            " {} valves reachable from {} :\n {}",
            names.len(),
            start_name,
            names.join(", ")
        ))),
        Err(err) => Ok(Some(format!(" Error: {}", err))),
    }
}

fn graph_callback(_args: ArgMatches, context: &mut ReplContext) -> Result<Option<String>> {
    let network = match current_network(context) {
        Ok(network) => network,
        Err(message) => return Ok(Some(message)),
    };
    let start = network.index_of(&context.start).ok();
    Ok(Some(print_network_dot_format(network, start)))
}

pub fn import_into_context(
    context: &mut ReplContext,
    filename: &str,
) -> std::result::Result<usize, FlowError> {
    let network = ValveNetwork::from_file(filename)?;
    let num_valves = network.len();
    context.network = Some(network);
    Ok(num_valves)
}

/// Names of the valves reachable from `start`, sorted.
pub fn reachable_names(
    network: &ValveNetwork,
    start: &str,
) -> std::result::Result<Vec<String>, FlowError> {
    let start = network.index_of(start)?;
    let mut names = network
        .graph()
        .all_nodes(start)?
        .into_iter()
        .map(|index| network.valve(index).map(|valve| valve.name.clone()))
        .collect::<std::result::Result<Vec<String>, FlowError>>()?;
    names.sort();
    Ok(names)
}
