//! reqwest implementation of [`ExternalCallPort`]

use async_trait::async_trait;
use refdesk_application::ports::external_call::{
    ExternalCallError, ExternalCallPort, ExternalRequest, ExternalResponse,
};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("refdesk/", env!("CARGO_PKG_VERSION"));

/// Maximum response body size (2 MB)
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// GETs `{base_url}/{path}` with a per-request timeout
pub struct HttpExternalCall {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExternalCall {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExternalCallError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExternalCallError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn check_body_size(len: usize) -> Result<(), ExternalCallError> {
    if len > MAX_BODY_SIZE {
        return Err(ExternalCallError::Transport(format!(
            "Response too large: {} bytes (max: {} bytes)",
            len, MAX_BODY_SIZE
        )));
    }
    Ok(())
}

#[async_trait]
impl ExternalCallPort for HttpExternalCall {
    async fn call(&self, request: ExternalRequest) -> Result<ExternalResponse, ExternalCallError> {
        let url = self.url_for(&request.path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExternalCallError::Timeout
                } else {
                    ExternalCallError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        if let Some(length) = response.content_length() {
            check_body_size(length as usize)?;
        }
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ExternalCallError::Timeout
            } else {
                ExternalCallError::Transport(e.to_string())
            }
        })?;

        check_body_size(bytes.len())?;

        let body = serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        Ok(ExternalResponse::new(status, body).with_url(final_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let http = HttpExternalCall::new("https://docs.example.org/api/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            http.url_for("/retry"),
            "https://docs.example.org/api/retry"
        );
        assert_eq!(http.url_for("bulkhead"), "https://docs.example.org/api/bulkhead");
    }

    #[test]
    fn test_body_size_limit() {
        assert!(check_body_size(MAX_BODY_SIZE).is_ok());
        let err = check_body_size(MAX_BODY_SIZE + 1).unwrap_err();
        assert!(matches!(err, ExternalCallError::Transport(msg) if msg.contains("too large")));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 on localhost is the discard service; nothing listens there in CI
        let http = HttpExternalCall::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = http.call(ExternalRequest::get("retry")).await.unwrap_err();
        assert!(matches!(
            err,
            ExternalCallError::Transport(_) | ExternalCallError::Timeout
        ));
    }
}
