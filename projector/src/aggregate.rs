//! Builds both raw metrics shapes from recorded invocations.

use crate::model::{AggregateMetrics, Averages, Backend, DetailedMetrics, Stats};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationMetrics {
    /// Microseconds from launch until the workload is ready.
    pub startup_time: u64,
    /// Microseconds from launch until the workload returned.
    pub total_runtime: u64,
}

impl InvocationMetrics {
    pub fn runtime(&self) -> u64 {
        self.total_runtime.saturating_sub(self.startup_time)
    }
}

/// One recorded run of a workload under one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub func_name: String,
    pub func_type: Backend,
    pub input: String,
    #[serde(default)]
    pub metrics: Option<InvocationMetrics>,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: u128,
    min: u64,
    max: u64,
    count: u64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            sum: 0,
            min: u64::MAX,
            max: 0,
            count: 0,
        }
    }
}

impl Accumulator {
    fn add(&mut self, value: u64) {
        self.sum += u128::from(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    /// `[min, max, mean]`, mean rounded to a whole unit.
    fn triple(&self) -> Vec<f64> {
        if self.count == 0 {
            return vec![0.0, 0.0, 0.0];
        }
        vec![self.min as f64, self.max as f64, self.mean().round()]
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Timings {
    startup: Accumulator,
    runtime: Accumulator,
    total: Accumulator,
}

impl Timings {
    fn add(&mut self, metrics: &InvocationMetrics) {
        self.startup.add(metrics.startup_time);
        self.runtime.add(metrics.runtime());
        self.total.add(metrics.total_runtime);
    }

    fn averages(&self, divisor: f64) -> Averages {
        Averages::new(
            self.startup.mean() / divisor,
            self.runtime.mean() / divisor,
            self.total.mean() / divisor,
        )
    }

    fn stats(&self) -> Stats {
        Stats {
            startup: Some(self.startup.triple()),
            runtime: Some(self.runtime.triple()),
            total_time: Some(self.total.triple()),
        }
    }
}

/// Orders inputs numerically when both parse as integers, else lexicographically.
pub fn compare_inputs(a: &str, b: &str) -> Ordering {
    match (a.parse::<u128>(), b.parse::<u128>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn measured<'a>(
    invocations: &'a [Invocation],
) -> impl Iterator<Item = (&'a Invocation, &'a InvocationMetrics)> {
    invocations.iter().filter_map(|invocation| match &invocation.metrics {
        Some(metrics) => Some((invocation, metrics)),
        None => {
            debug!(
                "Skipping {} run of {} without metrics",
                invocation.func_type, invocation.func_name
            );
            None
        }
    })
}

/// Mean startup, runtime and total per function and backend, in milliseconds.
pub fn aggregate_by_function(invocations: &[Invocation]) -> AggregateMetrics {
    let mut grouped: BTreeMap<(&str, Backend), Timings> = BTreeMap::new();
    for (invocation, metrics) in measured(invocations) {
        grouped
            .entry((invocation.func_name.as_str(), invocation.func_type))
            .or_default()
            .add(metrics);
    }

    let mut aggregate = AggregateMetrics::default();
    for ((name, backend), timings) in grouped {
        aggregate
            .entry_mut(name)
            .set(backend, timings.averages(1_000.0));
    }
    aggregate
}

/// Means per input value, then per function, in microseconds.
pub fn aggregate_by_input(invocations: &[Invocation]) -> IndexMap<String, AggregateMetrics> {
    let mut grouped: BTreeMap<(&str, &str, Backend), Timings> = BTreeMap::new();
    for (invocation, metrics) in measured(invocations) {
        grouped
            .entry((
                invocation.input.as_str(),
                invocation.func_name.as_str(),
                invocation.func_type,
            ))
            .or_default()
            .add(metrics);
    }

    let mut by_input: IndexMap<String, AggregateMetrics> = IndexMap::new();
    for ((input, name, backend), timings) in grouped {
        by_input
            .entry(input.to_string())
            .or_default()
            .entry_mut(name)
            .set(backend, timings.averages(1.0));
    }
    by_input.sort_by(|a, _, b, _| compare_inputs(a, b));
    by_input
}

/// `[min, max, mean]` triples per function, backend and input, in microseconds.
pub fn detail_by_module(invocations: &[Invocation]) -> DetailedMetrics {
    let mut grouped: BTreeMap<(&str, Backend), BTreeMap<&str, Timings>> = BTreeMap::new();
    for (invocation, metrics) in measured(invocations) {
        grouped
            .entry((invocation.func_name.as_str(), invocation.func_type))
            .or_default()
            .entry(invocation.input.as_str())
            .or_default()
            .add(metrics);
    }

    let mut detailed = DetailedMetrics::default();
    for ((name, backend), inputs) in grouped {
        let mut inputs: Vec<(&str, Timings)> = inputs.into_iter().collect();
        inputs.sort_by(|a, b| compare_inputs(a.0, b.0));

        let labels = detailed.entry_mut(name).backend_mut(backend);
        for (input, timings) in inputs {
            labels.insert(input.to_string(), timings.stats());
        }
    }

    for module in detailed.0.values_mut() {
        module.ensure_backends();
    }
    detailed
}
