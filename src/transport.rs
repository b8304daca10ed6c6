use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::error::HarvestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal blocking HTTP capability used by the RCSB client.
///
/// Implementations report transport failures as errors and hand back every
/// status code untouched; deciding what counts as success is up to the caller.
pub trait Transport: Send + Sync {
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, HarvestError>;
    fn get(&self, url: &str) -> Result<HttpResponse, HarvestError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, HarvestError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("rcsb-harvest/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| HarvestError::RcsbHttp(err.to_string()))?,
        );
        // reqwest's blocking client defaults to 30s; None means wait forever.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| HarvestError::RcsbHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn collect(response: reqwest::blocking::Response) -> Result<HttpResponse, HarvestError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|err| HarvestError::RcsbHttp(err.to_string()))?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, HarvestError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|err| HarvestError::RcsbHttp(err.to_string()))?;
        Self::collect(response)
    }

    fn get(&self, url: &str) -> Result<HttpResponse, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| HarvestError::RcsbHttp(err.to_string()))?;
        Self::collect(response)
    }
}
