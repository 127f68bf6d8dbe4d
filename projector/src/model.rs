use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Position of the displayed statistic inside each detailed triple.
///
/// The contract is positional. Triples written by [`crate::aggregate`] are
/// `[min, max, mean]`, so this selects the mean.
pub const REPRESENTATIVE_INDEX: usize = 2;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[serde(alias = "Wasm")]
    Wasm,
    #[serde(alias = "Docker")]
    Docker,
}

impl Backend {
    /// Series order inside every bundle.
    pub fn variants() -> &'static [Backend] {
        &[Backend::Wasm, Backend::Docker]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Backend::Wasm => "wasm",
            Backend::Docker => "docker",
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Wasm => write!(f, "Wasm"),
            Backend::Docker => write!(f, "Docker"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Startup,
    Runtime,
    TotalTime,
}

impl Dimension {
    pub fn variants() -> &'static [Dimension] {
        &[Dimension::Startup, Dimension::Runtime, Dimension::TotalTime]
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Startup => write!(f, "Startup"),
            Dimension::Runtime => write!(f, "Runtime"),
            Dimension::TotalTime => write!(f, "Total Time"),
        }
    }
}

/// Mean latencies of one backend for one label.
///
/// Every field is optional so a missing value surfaces as
/// [`crate::Error::MalformedInput`] from the projector instead of a parse error.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_startup_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_runtime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_total_runtime: Option<f64>,
}

impl Averages {
    pub fn new(avg_startup_time: f64, avg_runtime: f64, avg_total_runtime: f64) -> Self {
        Self {
            avg_startup_time: Some(avg_startup_time),
            avg_runtime: Some(avg_runtime),
            avg_total_runtime: Some(avg_total_runtime),
        }
    }

    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Startup => self.avg_startup_time,
            Dimension::Runtime => self.avg_runtime,
            Dimension::TotalTime => self.avg_total_runtime,
        }
    }

    pub fn field_name(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Startup => "avg_startup_time",
            Dimension::Runtime => "avg_runtime",
            Dimension::TotalTime => "avg_total_runtime",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendAverages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<Averages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wasm: Option<Averages>,
}

impl BackendAverages {
    pub fn backend(&self, backend: Backend) -> Option<&Averages> {
        match backend {
            Backend::Wasm => self.wasm.as_ref(),
            Backend::Docker => self.docker.as_ref(),
        }
    }

    pub fn set(&mut self, backend: Backend, averages: Averages) {
        match backend {
            Backend::Wasm => self.wasm = Some(averages),
            Backend::Docker => self.docker = Some(averages),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.docker.is_some() && self.wasm.is_some()
    }
}

/// Aggregate shape: label -> backend -> mean latencies.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateMetrics(pub IndexMap<String, BackendAverages>);

impl AggregateMetrics {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, label: &str) -> Option<&BackendAverages> {
        self.0.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn entry_mut(&mut self, label: &str) -> &mut BackendAverages {
        self.0.entry(label.to_string()).or_default()
    }

    /// Drops labels that lack a backend and returns the dropped labels.
    pub fn retain_complete(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        self.0.retain(|label, backends| {
            let complete = backends.is_complete();
            if !complete {
                dropped.push(label.clone());
            }
            complete
        });
        dropped
    }
}

/// Statistic triples of one label. Index [`REPRESENTATIVE_INDEX`] is displayed.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<Vec<f64>>,
}

impl Stats {
    pub fn get(&self, dimension: Dimension) -> Option<&[f64]> {
        match dimension {
            Dimension::Startup => self.startup.as_deref(),
            Dimension::Runtime => self.runtime.as_deref(),
            Dimension::TotalTime => self.total_time.as_deref(),
        }
    }

    pub fn field_name(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Startup => "startup",
            Dimension::Runtime => "runtime",
            Dimension::TotalTime => "total_time",
        }
    }
}

pub type LabelStats = IndexMap<String, Stats>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wasm: Option<LabelStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<LabelStats>,
}

impl ModuleStats {
    pub fn backend(&self, backend: Backend) -> Option<&LabelStats> {
        match backend {
            Backend::Wasm => self.wasm.as_ref(),
            Backend::Docker => self.docker.as_ref(),
        }
    }

    pub fn backend_mut(&mut self, backend: Backend) -> &mut LabelStats {
        match backend {
            Backend::Wasm => self.wasm.get_or_insert_with(LabelStats::new),
            Backend::Docker => self.docker.get_or_insert_with(LabelStats::new),
        }
    }

    /// Inserts an empty mapping for each backend that has none.
    pub fn ensure_backends(&mut self) {
        self.wasm.get_or_insert_with(LabelStats::new);
        self.docker.get_or_insert_with(LabelStats::new);
    }
}

/// Detailed shape: module -> backend -> label -> statistic triples.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailedMetrics(pub IndexMap<String, ModuleStats>);

impl DetailedMetrics {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, module: &str) -> Option<&ModuleStats> {
        self.0.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn entry_mut(&mut self, module: &str) -> &mut ModuleStats {
        self.0.entry(module.to_string()).or_default()
    }
}
