use crate::model::{Backend, Dimension};
use serde::{Serialize, Serializer};

/// One backend's values, aligned by position with the bundle labels.
/// `None` marks a missing value and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    #[serde(serialize_with = "display_name")]
    pub name: Backend,
    pub data: Vec<Option<f64>>,
}

fn display_name<S: Serializer>(backend: &Backend, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(backend)
}

/// One chart's worth of labels and aligned series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetBundle {
    /// Displayed labels, possibly truncated.
    pub labels: Vec<String>,
    /// Full labels used for lookup.
    pub keys: Vec<String>,
    pub series: Vec<Series>,
}

impl Default for DatasetBundle {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            keys: Vec::new(),
            series: Backend::variants()
                .iter()
                .map(|&name| Series {
                    name,
                    data: Vec::new(),
                })
                .collect(),
        }
    }
}

impl DatasetBundle {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn series(&self, backend: Backend) -> Option<&Series> {
        self.series.iter().find(|s| s.name == backend)
    }

    pub(crate) fn push(&mut self, key: &str, label: String, values: &[(Backend, Option<f64>)]) {
        self.keys.push(key.to_string());
        self.labels.push(label);
        for series in self.series.iter_mut() {
            let value = values
                .iter()
                .find(|(backend, _)| *backend == series.name)
                .and_then(|(_, value)| *value);
            series.data.push(value);
        }
    }

    pub fn is_aligned(&self) -> bool {
        self.labels.len() == self.keys.len()
            && self.series.iter().all(|s| s.data.len() == self.keys.len())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ChartDatasets {
    pub startup: DatasetBundle,
    pub runtime: DatasetBundle,
    pub total_time: DatasetBundle,
}

impl ChartDatasets {
    pub fn get(&self, dimension: Dimension) -> &DatasetBundle {
        match dimension {
            Dimension::Startup => &self.startup,
            Dimension::Runtime => &self.runtime,
            Dimension::TotalTime => &self.total_time,
        }
    }

    pub(crate) fn get_mut(&mut self, dimension: Dimension) -> &mut DatasetBundle {
        match dimension {
            Dimension::Startup => &mut self.startup,
            Dimension::Runtime => &mut self.runtime,
            Dimension::TotalTime => &mut self.total_time,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &DatasetBundle)> {
        Dimension::variants()
            .iter()
            .map(move |&d| (d, self.get(d)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, bundle)| bundle.is_empty())
    }
}
