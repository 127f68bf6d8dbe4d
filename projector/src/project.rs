use crate::dataset::ChartDatasets;
use crate::error::{Error, Result};
use crate::model::{
    AggregateMetrics, Averages, Backend, BackendAverages, DetailedMetrics, Dimension, LabelStats,
    Stats, REPRESENTATIVE_INDEX,
};
use tracing::debug;

/// Prefix length used by [`ProjectionOptions::compact`].
pub const COMPACT_LABEL_CHARS: usize = 4;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Truncate displayed labels to this many characters. Lookup keys are
    /// never truncated.
    pub truncate_labels: Option<usize>,
}

impl ProjectionOptions {
    pub fn compact() -> Self {
        Self {
            truncate_labels: Some(COMPACT_LABEL_CHARS),
        }
    }

    pub fn display_label(&self, label: &str) -> String {
        match self.truncate_labels {
            Some(chars) => label.chars().take(chars).collect(),
            None => label.to_string(),
        }
    }
}

/// Projects the aggregate shape into three bundles.
///
/// Labels are sorted ascending regardless of input order, so the output is
/// identical for any enumeration of the same mapping. Every label must carry
/// both backends with all three averages.
pub fn project_aggregate(
    raw: &AggregateMetrics,
    options: &ProjectionOptions,
) -> Result<ChartDatasets> {
    let mut entries: Vec<(&String, &BackendAverages)> = raw.0.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut datasets = ChartDatasets::default();
    for (label, backends) in entries {
        let display = options.display_label(label);
        for &dimension in Dimension::variants() {
            let mut values = Vec::with_capacity(Backend::variants().len());
            for &backend in Backend::variants() {
                let averages = backends
                    .backend(backend)
                    .ok_or_else(|| Error::malformed(label, backend.key()))?;
                let value = averages.get(dimension).ok_or_else(|| {
                    Error::malformed(
                        label,
                        format!("{}.{}", backend.key(), Averages::field_name(dimension)),
                    )
                })?;
                values.push((backend, Some(value)));
            }
            datasets
                .get_mut(dimension)
                .push(label, display.clone(), &values);
        }
    }

    debug!("Aggregate projected: {} labels", datasets.startup.len());
    Ok(datasets)
}

/// Projects one module of the detailed shape into three bundles.
///
/// Unlike [`project_aggregate`] no sort is applied: labels follow the wasm
/// mapping's order, then docker-only labels in the docker mapping's order.
/// A label missing from one backend is `None` in that backend's series.
pub fn project_detailed(
    raw: &DetailedMetrics,
    module: &str,
    options: &ProjectionOptions,
) -> Result<ChartDatasets> {
    let stats = raw.get(module).ok_or_else(|| Error::NotFound {
        module: module.to_string(),
    })?;
    let wasm = stats
        .backend(Backend::Wasm)
        .ok_or_else(|| Error::malformed(module, Backend::Wasm.key()))?;
    let docker = stats
        .backend(Backend::Docker)
        .ok_or_else(|| Error::malformed(module, Backend::Docker.key()))?;

    let mut keys: Vec<&String> = wasm.keys().collect();
    keys.extend(docker.keys().filter(|key| !wasm.contains_key(key.as_str())));

    let mut datasets = ChartDatasets::default();
    for key in keys {
        let display = options.display_label(key);
        for &dimension in Dimension::variants() {
            let values = [
                (Backend::Wasm, representative(wasm, key, Backend::Wasm, dimension)?),
                (Backend::Docker, representative(docker, key, Backend::Docker, dimension)?),
            ];
            datasets
                .get_mut(dimension)
                .push(key, display.clone(), &values);
        }
    }

    debug!(
        "Module {} projected: {} labels",
        module,
        datasets.startup.len()
    );
    Ok(datasets)
}

fn representative(
    labels: &LabelStats,
    label: &str,
    backend: Backend,
    dimension: Dimension,
) -> Result<Option<f64>> {
    let Some(stats) = labels.get(label) else {
        return Ok(None);
    };
    let field = format!("{}.{}", backend.key(), Stats::field_name(dimension));
    let triple = stats
        .get(dimension)
        .ok_or_else(|| Error::malformed(label, field.as_str()))?;

    triple
        .get(REPRESENTATIVE_INDEX)
        .copied()
        .map(Some)
        .ok_or_else(|| Error::malformed(label, format!("{}[{}]", field, REPRESENTATIVE_INDEX)))
}
