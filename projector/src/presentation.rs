//! Rendering hints and target bindings applied on top of projected datasets.
//!
//! The output serializes to the chart configuration a Chart.js style renderer
//! accepts, keyed by the caller's target id.

use crate::dataset::ChartDatasets;
use crate::model::{Backend, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub kind: ChartKind,
    pub stacked: BTreeSet<Dimension>,
    pub bindings: BTreeMap<Dimension, String>,
    pub visible: BTreeSet<Backend>,
    pub border_width: u32,
}

impl Presentation {
    /// Bar charts, startup stacked, both backends shown.
    pub fn aggregate() -> Self {
        Self {
            kind: ChartKind::Bar,
            stacked: BTreeSet::from([Dimension::Startup]),
            bindings: Self::default_bindings(),
            visible: Backend::variants().iter().copied().collect(),
            border_width: 1,
        }
    }

    /// Line charts, nothing stacked, both backends shown.
    pub fn detailed() -> Self {
        Self {
            kind: ChartKind::Line,
            stacked: BTreeSet::new(),
            ..Self::aggregate()
        }
    }

    pub fn default_bindings() -> BTreeMap<Dimension, String> {
        Dimension::variants()
            .iter()
            .enumerate()
            .map(|(i, &dimension)| (dimension, format!("chart-{}", i + 1)))
            .collect()
    }

    pub fn bind(mut self, dimension: Dimension, target: impl Into<String>) -> Self {
        self.bindings.insert(dimension, target.into());
        self
    }

    pub fn unbind(mut self, dimension: Dimension) -> Self {
        self.bindings.remove(&dimension);
        self
    }

    pub fn stack(mut self, dimension: Dimension, stacked: bool) -> Self {
        if stacked {
            self.stacked.insert(dimension);
        } else {
            self.stacked.remove(&dimension);
        }
        self
    }

    pub fn show_only(mut self, backends: &[Backend]) -> Self {
        self.visible = backends.iter().copied().collect();
        self
    }

    /// One chart per bound dimension, in dimension order.
    pub fn render(&self, datasets: &ChartDatasets) -> Vec<Chart> {
        datasets
            .iter()
            .filter_map(|(dimension, bundle)| {
                let target = self.bindings.get(&dimension)?;
                let stacked = self.stacked.contains(&dimension);
                let series = bundle
                    .series
                    .iter()
                    .filter(|s| self.visible.contains(&s.name))
                    .map(|s| ChartDataset {
                        label: s.name.to_string(),
                        data: s.data.clone(),
                        border_width: self.border_width,
                    })
                    .collect();

                Some(Chart {
                    target: target.clone(),
                    title: dimension.to_string(),
                    kind: self.kind,
                    options: ChartOptions {
                        scales: Scales {
                            x: Axis { stacked },
                            y: Axis { stacked },
                        },
                    },
                    data: ChartData {
                        labels: bundle.labels.clone(),
                        datasets: series,
                    },
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub target: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub options: ChartOptions,
    pub data: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub stacked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    #[serde(rename = "borderWidth")]
    pub border_width: u32,
}
