use std::io::Write;

use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::info;

/// Serializes `value` as JSON and returns the bytes, gzip-compressed when asked.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> anyhow::Result<Vec<u8>> {
    let body = serde_json::to_vec(value)?;
    if !gzip {
        return Ok(body);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    Ok(encoder.finish()?)
}

/// Uploads a dashboard (or any serializable view) to S3 as JSON.
///
/// With `gzip` the object gets a `.gz` suffix and `Content-Encoding: gzip`.
/// Returns the key actually written.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> anyhow::Result<String> {
    let body = encode_json(value, gzip)?;
    let key = if gzip {
        format!("{key}.gz")
    } else {
        key.to_string()
    };

    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(body.into())
        .content_type("application/json");
    if gzip {
        request = request.content_encoding("gzip");
    }

    request
        .send()
        .await
        .with_context(|| format!("S3 PutObject failed for s3://{bucket}/{key}"))?;

    info!(bucket, key = %key, gzip, "Published JSON to S3");
    Ok(key)
}
