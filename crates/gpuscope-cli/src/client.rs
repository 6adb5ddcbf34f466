use anyhow::{bail, Context, Result};
use gpuscope_common::ApiResponse;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Build an API URL from the base URL.
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}/api{}", base.trim_end_matches('/'), path)
}

/// GET an envelope and unwrap its `data`, turning `success: false` into an error.
pub async fn fetch<T: DeserializeOwned>(client: &Client, base: &str, path: &str) -> Result<T> {
    let url = api_url(base, path);
    tracing::debug!(%url, "GET");
    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    let envelope: ApiResponse<T> = resp
        .json()
        .await
        .with_context(|| format!("invalid response from {url} (HTTP {status})"))?;
    unwrap_envelope(envelope)
}

pub fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<T> {
    if !envelope.success {
        bail!(
            "{}",
            envelope.error.as_deref().unwrap_or("request failed")
        );
    }
    match envelope.data {
        Some(data) => Ok(data),
        None => bail!("response carried no data"),
    }
}
