use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{channel, Receiver, Sender},
        Mutex,
    },
    thread,
    time::Instant,
};

use tracing::{debug, trace, warn};

use crate::{
    graph::{Graph, NodeIndex},
    network::Valve,
    search::{
        HorizonTable, SearchError, SearchOutcome, SearchState, SearchStatistics, Step, ValveSearch,
    },
};

pub type WorkerResult = (usize, Option<u64>, SearchStatistics);

/// Best-score-per-horizon table that can be written from several threads.
///
/// Writes are a `fetch_max`, so a smaller candidate never replaces a
/// larger record, whatever the interleaving.
#[derive(Debug)]
pub struct SharedBestScores {
    scores: Vec<AtomicU64>,
}

impl SharedBestScores {
    pub fn new(budget: u32) -> Self {
        Self {
            scores: (0..=budget).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn snapshot(&self) -> Vec<u64> {
        self.scores
            .iter()
            .map(|score| score.load(Ordering::Acquire))
            .collect()
    }
}

impl HorizonTable for &SharedBestScores {
    fn best(&self, horizon: u32) -> u64 {
        self.scores
            .get(horizon as usize)
            .map_or(0, |score| score.load(Ordering::Acquire))
    }

    fn record(&mut self, horizon: u32, value: u64) -> bool {
        match self.scores.get(horizon as usize) {
            Some(score) => score.fetch_max(value, Ordering::AcqRel) < value,
            None => false,
        }
    }
}

pub fn default_workers() -> usize {
    num_cpus::get()
}

/// Expand the root breadth-first until there are at least `workers`
/// states left to search (or nothing left to expand).
fn split_frontier(
    search: &ValveSearch,
    table: &mut &SharedBestScores,
    workers: usize,
    stats: &mut SearchStatistics,
) -> (Vec<SearchState>, Option<u64>) {
    let mut frontier: Vec<SearchState> = vec![search.initial_state()];
    let mut best: Option<u64> = None;
    while !frontier.is_empty() && frontier.len() < workers {
        let mut next: Vec<SearchState> = Vec::new();
        for state in frontier {
            match search.step(&state, table, stats) {
                Step::Pruned => (),
                Step::Terminal(value) => best = best.max(Some(value)),
                Step::Branch(children) => next.extend(children),
            }
        }
        frontier = next;
    }
    (frontier, best)
}

fn run_worker(
    worker: usize,
    search: &ValveSearch,
    queue: &Mutex<Vec<SearchState>>,
    table: &SharedBestScores,
    sender: &Sender<WorkerResult>,
) {
    let mut handle = table;
    let mut stats = SearchStatistics::default();
    let mut best: Option<u64> = None;
    loop {
        let state = match queue.lock() {
            Ok(mut states) => states.pop(),
            Err(poisoned) => poisoned.into_inner().pop(),
        };
        let state = match state {
            Some(state) => state,
            None => break,
        };
        best = best.max(search.search(state, &mut handle, &mut stats));
    }
    trace!(worker, states = stats.states_explored, "worker done");
    if sender.send((worker, best, stats)).is_err() {
        warn!(worker, "result receiver dropped before the worker finished");
    }
}

fn collect_results(receiver: Receiver<WorkerResult>, outcome: &mut SearchOutcome) {
    for (worker, best, stats) in receiver {
        trace!(worker, ?best, "collected worker result");
        outcome.best = outcome.best.max(best.unwrap_or(0));
        outcome.stats.merge(&stats);
    }
}

/// Same answer as `search::solve`, with the work below the root spread over
/// `workers` threads that share one `SharedBestScores`.
pub fn solve_parallel(
    graph: &Graph<Valve>,
    start: NodeIndex,
    budget: u32,
    workers: usize,
) -> Result<SearchOutcome, SearchError> {
    let search = ValveSearch::new(graph, start, budget)?;
    let workers = workers.max(1);
    let started = Instant::now();
    let table = SharedBestScores::new(budget);
    let mut outcome = SearchOutcome {
        best: 0,
        stats: SearchStatistics::default(),
    };

    let (frontier, frontier_best) =
        split_frontier(&search, &mut &table, workers, &mut outcome.stats);
    outcome.best = frontier_best.unwrap_or(0);
    debug!(
        workers,
        frontier = frontier.len(),
        budget,
        "starting parallel activation search"
    );

    let queue = Mutex::new(frontier);
    let (sender, receiver) = channel::<WorkerResult>();
    thread::scope(|scope| {
        for worker in 0..workers {
            let sender = sender.clone();
            let (search, queue, table) = (&search, &queue, &table);
            scope.spawn(move || run_worker(worker, search, queue, table, &sender));
        }
    });
    drop(sender);
    collect_results(receiver, &mut outcome);

    outcome.stats.set_total_time(started.elapsed());
    debug!(
        best = outcome.best,
        states = outcome.stats.states_explored,
        prunings = outcome.stats.prunings_bound,
        "parallel activation search finished"
    );
    Ok(outcome)
}
