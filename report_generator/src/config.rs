use anyhow::{Context, Result};
use projector::ProjectionOptions;

const DEFAULT_RESULTS_PREFIX: &str = "results/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bucket_name: String,
    pub bucket_name_public: String,
    pub results_prefix: String,
    pub truncate_labels: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bucket_name = std::env::var("BUCKET_NAME").context("BUCKET_NAME not set")?;
        let bucket_name_public =
            std::env::var("BUCKET_NAME_PUBLIC").context("BUCKET_NAME_PUBLIC not set")?;
        let results_prefix = std::env::var("RESULTS_PREFIX")
            .unwrap_or_else(|_| DEFAULT_RESULTS_PREFIX.to_string());

        let truncate_labels = match std::env::var("TRUNCATE_LABELS") {
            Ok(value) if !value.trim().is_empty() => Some(
                value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("TRUNCATE_LABELS is not a number: {}", value))?,
            ),
            _ => None,
        };

        Ok(Self {
            bucket_name,
            bucket_name_public,
            results_prefix,
            truncate_labels,
        })
    }

    pub fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            truncate_labels: self.truncate_labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_required_and_defaults() {
        temp_env::with_vars(
            [
                ("BUCKET_NAME", Some("private")),
                ("BUCKET_NAME_PUBLIC", Some("public")),
                ("RESULTS_PREFIX", None),
                ("TRUNCATE_LABELS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bucket_name, "private");
                assert_eq!(config.bucket_name_public, "public");
                assert_eq!(config.results_prefix, "results/");
                assert_eq!(config.projection_options(), ProjectionOptions::default());
            },
        );
    }

    #[test]
    fn reads_truncation() {
        temp_env::with_vars(
            [
                ("BUCKET_NAME", Some("private")),
                ("BUCKET_NAME_PUBLIC", Some("public")),
                ("TRUNCATE_LABELS", Some("4")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.projection_options(), ProjectionOptions::compact());
            },
        );
    }

    #[test]
    fn rejects_bad_truncation() {
        temp_env::with_vars(
            [
                ("BUCKET_NAME", Some("private")),
                ("BUCKET_NAME_PUBLIC", Some("public")),
                ("TRUNCATE_LABELS", Some("four")),
            ],
            || assert!(Config::from_env().is_err()),
        );
    }

    #[test]
    fn requires_buckets() {
        temp_env::with_vars(
            [
                ("BUCKET_NAME", None::<&str>),
                ("BUCKET_NAME_PUBLIC", Some("public")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("BUCKET_NAME"));
            },
        );
    }
}
