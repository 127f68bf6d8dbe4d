use anyhow::{Context, Result};
use aws_sdk_s3::Client;
use aws_smithy_http::byte_stream::ByteStream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub async fn client() -> Client {
    let aws_config = aws_config::load_from_env().await;
    Client::new(&aws_config)
}

pub async fn put<T>(s3: &Client, bucket: &str, key: &str, object: &T) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string_pretty(object)?;
    let body = ByteStream::from(json.into_bytes());

    s3.put_object()
        .bucket(bucket)
        .key(key)
        .content_type("application/json")
        .body(body)
        .send()
        .await
        .with_context(|| format!("put s3://{}/{}", bucket, key))?;

    debug!("Uploaded: s3://{}/{}", bucket, key);
    Ok(())
}

pub async fn get_from_json<T>(s3: &Client, bucket: &str, key: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .with_context(|| format!("get s3://{}/{}", bucket, key))?;

    let bytes = object.body.collect().await?.into_bytes();

    serde_json::from_slice(&bytes).with_context(|| format!("parse s3://{}/{}", bucket, key))
}

/// Keys of every `.json` object under `prefix`, following continuation tokens.
pub async fn list_json_keys(s3: &Client, bucket: &str, prefix: &str) -> Result<Vec<String>> {
    let mut continuation_token = None;
    let mut keys = Vec::new();

    loop {
        let mut request = s3.list_objects_v2().bucket(bucket).prefix(prefix);

        if let Some(token) = &continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await?;

        if let Some(contents) = response.contents {
            keys.extend(
                contents
                    .into_iter()
                    .filter_map(|object| object.key)
                    .filter(|key| key.ends_with(".json")),
            );
        }

        if response.is_truncated {
            continuation_token = response.next_continuation_token;
        } else {
            break;
        }
    }

    Ok(keys)
}
