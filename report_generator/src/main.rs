mod config;
mod report;

use anyhow::Result;
use config::Config;
use futures::{StreamExt, TryStreamExt};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use projector::aggregate::Invocation;
use report::ResultFile;
use serde_json::Value;
use shared::s3::{get_from_json, list_json_keys, put};
use tracing::info;

const CONCURRENT_FETCHES: usize = 16;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let level = std::env::var("LOG_LEVEL").ok();
    shared::log::init(shared::log::level_or_info(level.as_deref()));

    lambda_runtime::run(service_fn(func)).await?;
    Ok(())
}

async fn func(_event: LambdaEvent<Value>) -> Result<()> {
    let config = Config::from_env()?;
    let s3 = shared::s3::client().await;

    let keys = list_json_keys(&s3, &config.bucket_name, &config.results_prefix).await?;
    info!("Result files found: {}", keys.len());

    let invocations = fetch_invocations(&s3, &config.bucket_name, &keys).await?;
    info!("Invocations fetched: {}", invocations.len());

    let report = report::build(&invocations, &config.projection_options())?;

    let public = &config.bucket_name_public;
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    put(&s3, public, &format!("charts/{}.json", today), &report.aggregate).await?;
    put(&s3, public, "charts/aggregate.json", &report.aggregate).await?;

    for (input, charts) in &report.inputs {
        put(&s3, public, &format!("charts/inputs/{}.json", input), charts).await?;
    }
    for (module, charts) in &report.modules {
        put(&s3, public, &format!("charts/modules/{}.json", module), charts).await?;
    }

    info!(
        "Charts uploaded: {} inputs, {} modules",
        report.inputs.len(),
        report.modules.len()
    );

    Ok(())
}

async fn fetch_invocations(
    s3: &aws_sdk_s3::Client,
    bucket_name: &str,
    keys: &[String],
) -> Result<Vec<Invocation>> {
    let files: Vec<ResultFile> = futures::stream::iter(keys)
        .map(|key| get_from_json::<ResultFile>(s3, bucket_name, key))
        .buffered(CONCURRENT_FETCHES)
        .try_collect()
        .await?;

    Ok(files
        .into_iter()
        .flat_map(ResultFile::into_invocations)
        .collect())
}
