use projector::aggregate::{aggregate_by_function, detail_by_module, Invocation};
use projector::{
    project_aggregate, project_detailed, AggregateMetrics, Backend, DetailedMetrics, Error,
    Presentation, ProjectionOptions,
};
use serde_json::json;

const AGGREGATE: &str = r#"{
    "c-mod": {
        "docker": { "avg_startup_time": 30, "avg_runtime": 31, "avg_total_runtime": 61 },
        "wasm": { "avg_startup_time": 3, "avg_runtime": 4, "avg_total_runtime": 7 }
    },
    "a-mod": {
        "docker": { "avg_startup_time": 10, "avg_runtime": 11, "avg_total_runtime": 21 },
        "wasm": { "avg_startup_time": 1, "avg_runtime": 2, "avg_total_runtime": 3 }
    },
    "b-mod": {
        "wasm": { "avg_startup_time": 2, "avg_runtime": 3, "avg_total_runtime": 5 },
        "docker": { "avg_startup_time": 20, "avg_runtime": 21, "avg_total_runtime": 41 }
    }
}"#;

#[test]
fn aggregate_json_to_charts() {
    let raw = AggregateMetrics::from_json(AGGREGATE).unwrap();

    let datasets = project_aggregate(&raw, &ProjectionOptions::default()).unwrap();
    let charts = Presentation::aggregate().render(&datasets);

    assert_eq!(charts.len(), 3);
    assert_eq!(charts[1].data.labels, ["a-mod", "b-mod", "c-mod"]);
    assert_eq!(
        serde_json::to_value(&charts[1].data.datasets).unwrap(),
        json!([
            { "label": "Wasm", "data": [2.0, 3.0, 4.0], "borderWidth": 1 },
            { "label": "Docker", "data": [11.0, 21.0, 31.0], "borderWidth": 1 },
        ])
    );
}

#[test]
fn repeated_projection_is_byte_identical() {
    let raw = AggregateMetrics::from_json(AGGREGATE).unwrap();
    let options = ProjectionOptions::compact();

    let first = serde_json::to_string(&project_aggregate(&raw, &options).unwrap()).unwrap();
    let second = serde_json::to_string(&project_aggregate(&raw, &options).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn every_bundle_is_aligned() {
    let raw = AggregateMetrics::from_json(AGGREGATE).unwrap();

    let datasets = project_aggregate(&raw, &ProjectionOptions::default()).unwrap();

    for (_, bundle) in datasets.iter() {
        let wasm = bundle.series(Backend::Wasm).unwrap();
        let docker = bundle.series(Backend::Docker).unwrap();
        assert_eq!(bundle.labels.len(), wasm.data.len());
        assert_eq!(bundle.labels.len(), docker.data.len());
    }
}

#[test]
fn empty_json_is_not_an_error() {
    let raw = AggregateMetrics::from_json("{}").unwrap();

    let datasets = project_aggregate(&raw, &ProjectionOptions::default()).unwrap();

    assert_eq!(
        serde_json::to_value(&datasets.startup).unwrap(),
        json!({
            "labels": [],
            "keys": [],
            "series": [
                { "name": "Wasm", "data": [] },
                { "name": "Docker", "data": [] },
            ],
        })
    );
}

#[test]
fn invalid_json_is_a_parse_error() {
    let err = DetailedMetrics::from_json("[1, 2]").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn recorded_invocations_to_module_charts() {
    let invocations: Vec<Invocation> = serde_json::from_value(json!([
        { "func_name": "fibonacci", "func_type": "Wasm", "input": "10",
          "metrics": { "startup_time": 100, "total_runtime": 400 } },
        { "func_name": "fibonacci", "func_type": "Wasm", "input": "10",
          "metrics": { "startup_time": 300, "total_runtime": 600 } },
        { "func_name": "fibonacci", "func_type": "Docker", "input": "10",
          "metrics": { "startup_time": 9000, "total_runtime": 9500 } },
        { "func_name": "fibonacci", "func_type": "Docker", "input": "5",
          "metrics": { "startup_time": 8000, "total_runtime": 8100 } },
        { "func_name": "fibonacci", "func_type": "Wasm", "input": "7", "metrics": null },
    ]))
    .unwrap();

    let detailed = detail_by_module(&invocations);
    let datasets = project_detailed(&detailed, "fibonacci", &ProjectionOptions::default()).unwrap();

    assert_eq!(datasets.startup.labels, ["10", "5"]);
    assert_eq!(
        datasets.startup.series(Backend::Wasm).unwrap().data,
        [Some(200.0), None]
    );
    assert_eq!(
        datasets.runtime.series(Backend::Docker).unwrap().data,
        [Some(500.0), Some(100.0)]
    );

    let aggregate = aggregate_by_function(&invocations);
    let datasets = project_aggregate(&aggregate, &ProjectionOptions::default()).unwrap();
    assert_eq!(
        datasets.total_time.series(Backend::Wasm).unwrap().data,
        [Some(0.5)]
    );
}
