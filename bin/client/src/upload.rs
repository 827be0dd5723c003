use anyhow::{Context, Result};
use log::info;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Body, Client};
use reqwest::{Method, StatusCode};
use std::fs::File;
use std::path::Path;

/// Characters left as-is in the path segment and in the secret parameter
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Upload one file; returns the number of bytes sent.
///
/// The file is streamed with an explicit Content-Length, which the server
/// requires.
pub fn upload_file(
    server: &str,
    file: &Path,
    name: Option<&str>,
    secret: Option<&str>,
    method: Method,
) -> Result<u64> {
    let name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Cannot derive a filename from {:?}", file))?
            .to_string(),
    };

    let handle = File::open(file).with_context(|| format!("Failed to open {:?}", file))?;
    let size = handle
        .metadata()
        .with_context(|| format!("Failed to read metadata of {:?}", file))?
        .len();

    let url = upload_url(server, &name, secret);
    info!("Uploading {:?} ({} bytes) as '{}'", file, size, name);

    // Large files can take longer than reqwest's default 30s timeout
    let client = Client::builder()
        .timeout(None)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .request(method, &url)
        .body(Body::sized(handle, size))
        .send()
        .with_context(|| format!("Failed to send upload to {}", server))?;

    match response.status() {
        StatusCode::CREATED => {
            info!("Upload of '{}' accepted", name);
            Ok(size)
        }
        StatusCode::NOT_FOUND => anyhow::bail!(
            "Upload rejected with 404 Not Found (missing or wrong secret, or invalid name)"
        ),
        status => anyhow::bail!("Upload failed with status {}", status),
    }
}

/// Build `SERVER/NAME[?SECRET]`, percent-encoding the name and secret.
pub fn upload_url(server: &str, name: &str, secret: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}",
        server.trim_end_matches('/'),
        utf8_percent_encode(name, URL_SAFE)
    );
    if let Some(secret) = secret {
        url.push('?');
        url.push_str(&utf8_percent_encode(secret, URL_SAFE).to_string());
    }
    url
}
