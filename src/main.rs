use std::{env, error::Error, process::ExitCode};

use flowpath::{
    error::FlowError,
    network::ValveNetwork,
    repl::{init_context, repl},
    search::solve,
    DEFAULT_START_VALVE, DEFAULT_TIME_BUDGET,
};
use tracing::{error, info};

fn run(path: &str, budget: u32) -> Result<u64, FlowError> {
    let network = ValveNetwork::from_file(path)?;
    let start = network.index_of(DEFAULT_START_VALVE)?;
    info!(valves = network.len(), budget, "searching {}", path);
    Ok(solve(network.graph(), start, budget)?)
}

fn report(err: &dyn Error) {
    error!("{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
}

/// flowpath <input-file> [budget]
///
/// Without arguments, starts the interactive shell instead.
fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();
    let path = match args.get(1) {
        Some(path) => path,
        None => {
            return match repl(init_context()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!(?err, "repl failed");
                    ExitCode::FAILURE
                }
            }
        }
    };
    let budget = match args.get(2).map(|budget| budget.parse::<u32>()) {
        None => DEFAULT_TIME_BUDGET,
        Some(Ok(budget)) => budget,
        Some(Err(err)) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    match run(path, budget) {
        Ok(best) => {
            println!("{}", best);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
