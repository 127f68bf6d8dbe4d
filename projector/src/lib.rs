pub mod aggregate;
pub mod dataset;
mod error;
pub mod model;
pub mod presentation;
pub mod project;

pub use dataset::{ChartDatasets, DatasetBundle, Series};
pub use error::{Error, Result};
pub use model::{AggregateMetrics, Backend, DetailedMetrics, Dimension, REPRESENTATIVE_INDEX};
pub use presentation::{Chart, ChartKind, Presentation};
pub use project::{project_aggregate, project_detailed, ProjectionOptions};
