use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::util::truncate_to_char_boundary;

/// Long prompts over a large corpus can take a while to answer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const ERROR_BODY_LIMIT: usize = 500;

/// Auth headers for one provider; content type is added by [`post_json`].
pub(crate) fn auth_headers(pairs: &[(&'static str, &str)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(*name, HeaderValue::from_str(value)?);
    }
    Ok(headers)
}

/// POST `body` as JSON and decode the JSON reply. Non-2xx statuses become
/// errors carrying the (truncated) response body.
pub(crate) async fn post_json<Req, Resp>(
    provider: &str,
    url: &str,
    headers: HeaderMap,
    body: &Req,
) -> Result<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;

    debug!(provider, url, "Model request");

    let response = http
        .post(url)
        .headers(headers)
        .header(CONTENT_TYPE, "application/json")
        .json(body)
        .send()
        .await
        .with_context(|| format!("{provider} request failed"))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!(
            "{provider} API error ({status}): {}",
            truncate_to_char_boundary(&text, ERROR_BODY_LIMIT)
        );
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to decode {provider} response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_headers_reject_invalid_values() {
        assert!(auth_headers(&[("x-api-key", "ok-key")]).is_ok());
        assert!(auth_headers(&[("x-api-key", "bad\nkey")]).is_err());
    }
}
