use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode, header};

use crate::config::StoreConfig;
use crate::filtering::parse_total;
use crate::models::Record;

/// Delay between retry attempts on transient store responses.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound on diagnostics kept from a failed call.
const MAX_DIAGNOSTIC_LEN: usize = 200;

#[derive(Debug)]
pub enum StoreError {
    /// The store rejected the configured credentials (401/403).
    Auth,
    /// Any other failed call: transport error, timeout or non-2xx status.
    Request { detail: String },
}

impl StoreError {
    fn request(detail: impl Into<String>) -> Self {
        Self::Request {
            detail: detail.into().chars().take(MAX_DIAGNOSTIC_LEN).collect(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => f.write_str("store rejected credentials"),
            Self::Request { detail } => write!(f, "store call failed: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// One page of store rows plus the total of the whole filtered set.
#[derive(Debug)]
pub struct StoreResponse {
    pub rows: Vec<Record>,
    pub total: u64,
}

/// Thin client over the store's single list endpoint. Holds one
/// connection-reusing HTTP client with the credentials and the count
/// opt-in set as default headers.
pub struct StoreClient {
    http: Client,
    endpoint: String,
    probe_timeout: Duration,
    max_retries: u32,
}

impl StoreClient {
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = header::HeaderMap::new();
        let auth = header::HeaderValue::from_str(&format!("Bearer {}", cfg.service_role_key))
            .map_err(|err| StoreError::request(err.to_string()))?;
        let apikey = header::HeaderValue::from_str(&cfg.anon_key)
            .map_err(|err| StoreError::request(err.to_string()))?;
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::HeaderName::from_static("apikey"), apikey);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        // opt into the Content-Range total
        headers.insert(
            header::HeaderName::from_static("prefer"),
            header::HeaderValue::from_static("count=exact"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|err| StoreError::request(err.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/rest/v1/{}",
                cfg.base_url.trim_end_matches('/'),
                cfg.table
            ),
            probe_timeout: cfg.probe_timeout,
            max_retries: cfg.max_retries,
        })
    }

    /// Execute a compiled query, retrying transient 429/5xx responses a
    /// bounded number of times.
    pub async fn rows(&self, params: &[(String, String)]) -> Result<StoreResponse, StoreError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let response = self
                .http
                .get(&self.endpoint)
                .query(&params)
                .send()
                .await
                .map_err(|err| StoreError::request(err.to_string()))?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(StoreError::Auth);
            }
            if (status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
                && attempt <= self.max_retries
            {
                tracing::warn!(%status, attempt, "transient store response, retrying");
                tokio::time::sleep(RETRY_BACKOFF).await;
                continue;
            }
            if !status.is_success() {
                return Err(StoreError::request(format!("store responded {status}")));
            }

            // the header must be read before the body consumes the response
            let total = parse_total(
                response
                    .headers()
                    .get("content-range")
                    .and_then(|value| value.to_str().ok()),
            );
            let rows: Vec<Record> = response
                .json()
                .await
                .map_err(|err| StoreError::request(err.to_string()))?;
            return Ok(StoreResponse { rows, total });
        }
    }

    /// Lightweight readiness probe: minimal projection, short timeout, no
    /// retries.
    pub async fn probe(&self) -> Result<(), StoreError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "id"), ("limit", "1")])
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|err| StoreError::request(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Auth);
        }
        if !status.is_success() {
            return Err(StoreError::request(format!("store responded {status}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_are_bounded() {
        let err = StoreError::request("y".repeat(5_000));
        match err {
            StoreError::Request { detail } => assert_eq!(detail.len(), MAX_DIAGNOSTIC_LEN),
            StoreError::Auth => panic!("unexpected variant"),
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let cfg = StoreConfig {
            base_url: "http://store.example/".to_string(),
            service_role_key: "svc".to_string(),
            anon_key: "anon".to_string(),
            table: "afiliados_personal".to_string(),
            request_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(1),
            max_retries: 0,
        };
        let client = StoreClient::new(&cfg).unwrap();
        assert_eq!(client.endpoint, "http://store.example/rest/v1/afiliados_personal");
    }
}
