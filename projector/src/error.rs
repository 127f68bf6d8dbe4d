use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed metrics for label `{label}`: missing `{field}`")]
    MalformedInput { label: String, field: String },

    #[error("module `{module}` not found in metrics")]
    NotFound { module: String },

    #[error("Serialization error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(label: &str, field: impl Into<String>) -> Self {
        Error::MalformedInput {
            label: label.to_string(),
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
