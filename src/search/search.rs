// Activation Search
//
// Depth-first branch-and-bound over (location, previous, time left,
// activated valves). Every tick is either a move through one tunnel or the
// activation of the valve under our feet.

use std::{
    fmt,
    time::{Duration, Instant},
};

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::{
    graph::{Graph, GraphError, NodeIndex},
    network::Valve,
    MAX_TIME_BUDGET,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("time budget {budget} is above the maximum of {max}")]
    BudgetTooLarge { budget: u32, max: u32 },

    /// The reachable rates released over the whole budget do not fit in a `u64`.
    #[error("total rate {total_rate} over {budget} ticks overflows the value range")]
    ValueOverflow { total_rate: u128, budget: u32 },
}

/// Value released per tick by the activated valves.
pub fn pressure_change(activated: &FixedBitSet, rates: &[u64]) -> u64 {
    activated
        .ones()
        .filter_map(|index| rates.get(index))
        .fold(0u64, |total, &rate| total.saturating_add(rate))
}

/// Best accumulated value seen so far for each horizon (time left).
///
/// Shared by every branch of one search invocation. Records only ever grow.
/// Only horizons in `0..=budget` are kept: reads beyond it give 0 and
/// writes beyond it are ignored.
pub trait HorizonTable {
    fn best(&self, horizon: u32) -> u64;
    /// Returns true when `value` became the new record for `horizon`.
    fn record(&mut self, horizon: u32, value: u64) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestScores {
    scores: Vec<u64>,
}

impl BestScores {
    /// One slot per horizon in `0..=budget`, all zero.
    pub fn new(budget: u32) -> Self {
        Self {
            scores: vec![0; budget as usize + 1],
        }
    }

    pub fn scores(&self) -> &[u64] {
        &self.scores
    }
}

impl HorizonTable for BestScores {
    fn best(&self, horizon: u32) -> u64 {
        self.scores.get(horizon as usize).copied().unwrap_or(0)
    }

    fn record(&mut self, horizon: u32, value: u64) -> bool {
        match self.scores.get_mut(horizon as usize) {
            Some(score) if value > *score => {
                *score = value;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub location: NodeIndex,
    /// Where the last move came from. `Some(location)` after an activation
    /// or a stay, which leaves every neighbor open.
    pub previous: Option<NodeIndex>,
    pub time_left: u32,
    pub activated: FixedBitSet,
    /// Value accumulated by the time `time_left` ticks remain.
    pub value: u64,
}

impl SearchState {
    pub fn initial(start: NodeIndex, budget: u32, num_nodes: usize) -> Self {
        Self {
            location: start,
            previous: None,
            time_left: budget,
            activated: FixedBitSet::with_capacity(num_nodes),
            value: 0,
        }
    }

    fn moved_to(&self, target: NodeIndex, released: u64) -> Self {
        Self {
            location: target,
            previous: Some(self.location),
            time_left: self.time_left - 1,
            activated: self.activated.clone(),
            value: self.value + released,
        }
    }

    fn activated_here(&self, released: u64) -> Self {
        let mut activated = self.activated.clone();
        activated.insert(self.location);
        Self {
            location: self.location,
            previous: Some(self.location),
            time_left: self.time_left - 1,
            activated,
            value: self.value + released,
        }
    }

    fn stayed(&self, released: u64) -> Self {
        Self {
            location: self.location,
            previous: Some(self.location),
            time_left: self.time_left - 1,
            activated: self.activated.clone(),
            value: self.value + released,
        }
    }
}

/// Counters collected during one search invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total states visited.
    pub states_explored: u64,
    /// Branches abandoned because their optimistic bound fell below the
    /// record for their horizon.
    pub prunings_bound: u64,
    /// States reached with no time left.
    pub terminals: u64,
    /// Dead ends where the only option was to pass the tick.
    pub stays: u64,
    /// Dead ends where activating the current valve was the only option.
    pub forced_activations: u64,
    pub max_depth: u64,
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_state_explored(&mut self, depth: u64) {
        self.states_explored = self.states_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_terminal(&mut self) {
        self.terminals = self.terminals.saturating_add(1);
    }

    #[inline]
    pub fn on_stay(&mut self) {
        self.stays = self.stays.saturating_add(1);
    }

    #[inline]
    pub fn on_forced_activation(&mut self) {
        self.forced_activations = self.forced_activations.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Fold the counters of another (worker) search into these ones.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.states_explored = self.states_explored.saturating_add(other.states_explored);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.terminals = self.terminals.saturating_add(other.terminals);
        self.stays = self.stays.saturating_add(other.stays);
        self.forced_activations = self
            .forced_activations
            .saturating_add(other.forced_activations);
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  States explored:      {}", self.states_explored)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Terminal states:      {}", self.terminals)?;
        writeln!(f, "  Dead-end stays:       {}", self.stays)?;
        writeln!(f, "  Forced activations:   {}", self.forced_activations)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        write!(f, "  Total time:           {:.2?}", self.time_total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: u64,
    pub stats: SearchStatistics,
}

enum DeadEnd {
    No,
    Stay,
    ForcedActivation,
}

pub(crate) enum Step {
    Pruned,
    Terminal(u64),
    Branch(Vec<SearchState>),
}

/// A prepared search over one graph, start valve and time budget.
#[derive(Debug, Clone)]
pub struct ValveSearch<'g> {
    graph: &'g Graph<Valve>,
    start: NodeIndex,
    budget: u32,
    rates: Vec<u64>,
    /// Reachable valves with a positive rate, highest rate first.
    candidates: Vec<NodeIndex>,
}

impl<'g> ValveSearch<'g> {
    /// Fails when the start does not exist, when the budget is above
    /// `MAX_TIME_BUDGET`, or when opening every reachable valve from the first
    /// tick could release more than `u64::MAX`. Once built, no value or bound
    /// of the search can overflow.
    pub fn new(
        graph: &'g Graph<Valve>,
        start: NodeIndex,
        budget: u32,
    ) -> Result<Self, SearchError> {
        if budget > MAX_TIME_BUDGET {
            return Err(SearchError::BudgetTooLarge {
                budget,
                max: MAX_TIME_BUDGET,
            });
        }
        let rates: Vec<u64> = graph.nodes().map(|node| node.value.rate).collect();
        let mut candidates: Vec<NodeIndex> = graph
            .all_nodes(start)?
            .into_iter()
            .filter(|&index| rates[index] > 0)
            .collect();
        // ties broken by index
        candidates.sort_by(|&a, &b| rates[b].cmp(&rates[a]).then(a.cmp(&b)));
        let total_rate: u128 = candidates.iter().map(|&index| u128::from(rates[index])).sum();
        if total_rate * u128::from(budget) > u128::from(u64::MAX) {
            return Err(SearchError::ValueOverflow { total_rate, budget });
        }
        Ok(Self {
            graph,
            start,
            budget,
            rates,
            candidates,
        })
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn rates(&self) -> &[u64] {
        &self.rates
    }

    pub fn candidates(&self) -> &[NodeIndex] {
        &self.candidates
    }

    pub fn initial_state(&self) -> SearchState {
        SearchState::initial(self.start, self.budget, self.graph.len())
    }

    /// Upper bound on the final value reachable from `state`, ignoring
    /// travel: every remaining tick releases the current pressure and then
    /// opens the best valve still closed.
    pub fn optimistic_bound(&self, state: &SearchState) -> u64 {
        self.bound_with_pressure(state, pressure_change(&state.activated, &self.rates))
    }

    fn bound_with_pressure(&self, state: &SearchState, mut pressure: u64) -> u64 {
        let mut closed = self
            .candidates
            .iter()
            .filter(|&&index| !state.activated.contains(index))
            .map(|&index| self.rates[index]);
        let mut bound = state.value;
        for _ in 0..state.time_left {
            bound = bound.saturating_add(pressure);
            if let Some(rate) = closed.next() {
                pressure = pressure.saturating_add(rate);
            }
        }
        bound
    }

    pub fn run(&self) -> SearchOutcome {
        let mut table = BestScores::new(self.budget);
        self.run_with(&mut table)
    }

    pub fn run_with<H: HorizonTable>(&self, table: &mut H) -> SearchOutcome {
        let started = Instant::now();
        let mut stats = SearchStatistics::default();
        debug!(
            start = self.start,
            budget = self.budget,
            candidates = self.candidates.len(),
            "starting activation search"
        );
        let best = self
            .search(self.initial_state(), table, &mut stats)
            .unwrap_or(0);
        stats.set_total_time(started.elapsed());
        debug!(
            best,
            states = stats.states_explored,
            prunings = stats.prunings_bound,
            "activation search finished"
        );
        SearchOutcome { best, stats }
    }

    /// Best final value below `state`, `None` if the branch was abandoned.
    pub(crate) fn search<H: HorizonTable>(
        &self,
        state: SearchState,
        table: &mut H,
        stats: &mut SearchStatistics,
    ) -> Option<u64> {
        match self.step(&state, table, stats) {
            Step::Pruned => None,
            Step::Terminal(value) => Some(value),
            Step::Branch(children) => children
                .into_iter()
                .filter_map(|child| self.search(child, table, stats))
                .max(),
        }
    }

    /// Children of `state`: activate in place (if the valve is closed and
    /// worth something) and move to every neighbor except the one we just
    /// came from. At a dead end, pass the tick or, if possible, activate.
    pub fn transitions(&self, state: &SearchState) -> Vec<SearchState> {
        if state.time_left == 0 {
            return Vec::new();
        }
        self.expand(state, pressure_change(&state.activated, &self.rates)).0
    }

    fn expand(&self, state: &SearchState, pressure: u64) -> (Vec<SearchState>, DeadEnd) {
        let location = state.location;
        let can_activate = !state.activated.contains(location) && self.rates[location] > 0;
        let moves: Vec<NodeIndex> = self
            .graph
            .neighbours(location)
            .filter(|&target| Some(target) != state.previous)
            .collect();

        let mut children: Vec<SearchState> = Vec::with_capacity(moves.len() + 1);
        let dead_end = match (can_activate, moves.is_empty()) {
            (true, true) => DeadEnd::ForcedActivation,
            (false, true) => DeadEnd::Stay,
            _ => DeadEnd::No,
        };
        if can_activate {
            children.push(state.activated_here(pressure));
        } else if moves.is_empty() {
            children.push(state.stayed(pressure));
        }
        children.extend(moves.into_iter().map(|target| state.moved_to(target, pressure)));
        (children, dead_end)
    }

    /// Prune check, bookkeeping and transitions of a single state.
    pub(crate) fn step<H: HorizonTable>(
        &self,
        state: &SearchState,
        table: &mut H,
        stats: &mut SearchStatistics,
    ) -> Step {
        stats.on_state_explored(u64::from(self.budget.saturating_sub(state.time_left)));
        let pressure = pressure_change(&state.activated, &self.rates);
        let bound = self.bound_with_pressure(state, pressure);
        let record = table.best(state.time_left);
        if bound < record {
            stats.on_pruning_bound();
            trace!(
                location = state.location,
                time_left = state.time_left,
                bound,
                record,
                "pruned"
            );
            return Step::Pruned;
        }
        table.record(state.time_left, state.value);
        if state.time_left == 0 {
            stats.on_terminal();
            return Step::Terminal(state.value);
        }

        let (children, dead_end) = self.expand(state, pressure);
        match dead_end {
            DeadEnd::No => (),
            DeadEnd::Stay => stats.on_stay(),
            DeadEnd::ForcedActivation => stats.on_forced_activation(),
        }
        Step::Branch(children)
    }
}

/// Maximum value released by the end of `budget` ticks, starting on `start`.
///
/// Two approximations are part of this contract:
/// - a move may never go straight back through the tunnel it just came
///   from (acting in place, by activating or staying, lifts that restriction);
/// - branches are compared across the whole search tree by time left only,
///   regardless of which valves each branch opened. A branch is dropped as
///   soon as its optimistic bound is below the best value any branch had
///   with the same time left.
pub fn solve(graph: &Graph<Valve>, start: NodeIndex, budget: u32) -> Result<u64, SearchError> {
    Ok(ValveSearch::new(graph, start, budget)?.run().best)
}
