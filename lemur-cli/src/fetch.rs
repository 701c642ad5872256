//! Blocking HTTP fetch for the `--url` source.

use std::time::Duration;

use anyhow::{Context, Result, ensure};

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("lemur/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch a URL and return its body as text.
///
/// # Errors
///
/// Fails when the client cannot be built, the request fails, the response
/// has a non-success status, or the body cannot be decoded as text.
pub fn fetch_text(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request to '{url}' failed"))?;
    ensure!(
        response.status().is_success(),
        "'{url}' answered {}",
        response.status()
    );
    response
        .text()
        .with_context(|| format!("could not decode the body of '{url}' as text"))
}
