use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde_json::Value;

/// GET a Swagger document and parse it as JSON.
pub async fn fetch_document(client: &reqwest::Client, url: &Url) -> Result<Value> {
    log::debug!("fetching {url}");
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("failed to fetch {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("fetching {url} returned {status}");
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("failed to read response body from {url}"))?;
    log::debug!("received {} bytes from {url}", body.len());

    serde_json::from_str(&body).with_context(|| format!("{url} did not return valid JSON"))
}

/// Read a Swagger document from disk.
pub fn read_document(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Write the filtered definitions as compact JSON.
pub fn write_model(path: &Path, definitions: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let content = serde_json::to_string(definitions)?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
