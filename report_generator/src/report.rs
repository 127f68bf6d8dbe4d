use projector::aggregate::{aggregate_by_function, aggregate_by_input, detail_by_module, Invocation};
use projector::{project_aggregate, project_detailed, Chart, Presentation, ProjectionOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A results object holds one invocation or a batch of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResultFile {
    Batch(Vec<Invocation>),
    Single(Invocation),
}

impl ResultFile {
    pub fn into_invocations(self) -> Vec<Invocation> {
        match self {
            ResultFile::Batch(invocations) => invocations,
            ResultFile::Single(invocation) => vec![invocation],
        }
    }
}

#[derive(Debug)]
pub struct Report {
    pub aggregate: Vec<Chart>,
    pub inputs: BTreeMap<String, Vec<Chart>>,
    pub modules: BTreeMap<String, Vec<Chart>>,
    /// Functions left out of the comparison for lack of a backend.
    pub dropped: Vec<String>,
    /// Same, per input value.
    pub dropped_by_input: BTreeMap<String, Vec<String>>,
}

/// Aggregates, projects and renders every chart published by one run.
///
/// Functions missing a backend are dropped from the bar charts. A module or
/// input that fails to project is skipped, a failing aggregate fails the run.
pub fn build(invocations: &[Invocation], options: &ProjectionOptions) -> projector::Result<Report> {
    let mut aggregate = aggregate_by_function(invocations);
    let dropped = aggregate.retain_complete();
    for label in &dropped {
        warn!("Dropping {} from comparison: measured under one backend", label);
    }
    let datasets = project_aggregate(&aggregate, options)?;
    let aggregate = Presentation::aggregate().render(&datasets);

    let mut inputs = BTreeMap::new();
    let mut dropped_by_input = BTreeMap::new();
    for (input, mut metrics) in aggregate_by_input(invocations) {
        let incomplete = metrics.retain_complete();
        for label in &incomplete {
            warn!(
                "Dropping {} from input {} comparison: measured under one backend",
                label, input
            );
        }
        if !incomplete.is_empty() {
            dropped_by_input.insert(input.clone(), incomplete);
        }
        match project_aggregate(&metrics, options) {
            Ok(datasets) => {
                inputs.insert(input, Presentation::aggregate().render(&datasets));
            }
            Err(err) => warn!("Skipping input {}: {}", input, err),
        }
    }

    let detailed = detail_by_module(invocations);
    let mut modules = BTreeMap::new();
    for module in detailed.modules() {
        match project_detailed(&detailed, module, &ProjectionOptions::default()) {
            Ok(datasets) => {
                modules.insert(module.clone(), Presentation::detailed().render(&datasets));
            }
            Err(err) => warn!("Skipping module {}: {}", module, err),
        }
    }

    info!(
        "Charts built: {} functions, {} inputs, {} modules",
        datasets.startup.len(),
        inputs.len(),
        modules.len()
    );

    Ok(Report {
        aggregate,
        inputs,
        modules,
        dropped,
        dropped_by_input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invocations() -> Vec<Invocation> {
        serde_json::from_value(json!([
            { "func_name": "fibonacci", "func_type": "Wasm", "input": "10",
              "metrics": { "startup_time": 1000, "total_runtime": 3000 } },
            { "func_name": "fibonacci", "func_type": "Docker", "input": "10",
              "metrics": { "startup_time": 50000, "total_runtime": 54000 } },
            { "func_name": "prime", "func_type": "Wasm", "input": "7",
              "metrics": { "startup_time": 900, "total_runtime": 1200 } },
        ]))
        .unwrap()
    }

    #[test]
    fn builds_every_chart_group() {
        let report = build(&invocations(), &ProjectionOptions::default()).unwrap();

        assert_eq!(report.aggregate.len(), 3);
        assert_eq!(report.aggregate[0].data.labels, ["fibonacci"]);
        let inputs: Vec<&str> = report.inputs.keys().map(String::as_str).collect();
        assert_eq!(inputs, ["10", "7"]);
        assert!(report.inputs["7"][0].data.labels.is_empty());
        assert_eq!(report.modules.len(), 2);
    }

    #[test]
    fn single_backend_functions_are_reported_per_input() {
        let report = build(&invocations(), &ProjectionOptions::default()).unwrap();

        assert_eq!(report.dropped, ["prime"]);
        assert_eq!(report.dropped_by_input.len(), 1);
        assert_eq!(report.dropped_by_input["7"], ["prime"]);
    }

    #[test]
    fn single_backend_module_keeps_empty_docker_series() {
        let report = build(&invocations(), &ProjectionOptions::default()).unwrap();

        let prime = &report.modules["prime"][0];
        assert_eq!(prime.data.labels, ["7"]);
        let docker = prime
            .data
            .datasets
            .iter()
            .find(|d| d.label == "Docker")
            .unwrap();
        assert_eq!(docker.data, [None]);
    }

    #[test]
    fn truncation_applies_to_bar_charts_only() {
        let report = build(&invocations(), &ProjectionOptions::compact()).unwrap();

        assert_eq!(report.aggregate[0].data.labels, ["fibo"]);
        assert_eq!(report.modules["fibonacci"][0].data.labels, ["10"]);
    }

    #[test]
    fn result_file_accepts_single_or_batch() {
        let single: ResultFile = serde_json::from_value(json!(
            { "func_name": "f", "func_type": "Docker", "input": "1" }
        ))
        .unwrap();
        assert_eq!(single.into_invocations().len(), 1);

        let batch: ResultFile = serde_json::from_value(json!([
            { "func_name": "f", "func_type": "Docker", "input": "1" },
            { "func_name": "f", "func_type": "Wasm", "input": "1" },
        ]))
        .unwrap();
        assert_eq!(batch.into_invocations().len(), 2);
    }
}
