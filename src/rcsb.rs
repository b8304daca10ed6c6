use serde::Deserialize;
use tracing::{debug, error};

use crate::domain::{EntryId, StructureFormat};
use crate::error::HarvestError;
use crate::query::{Node, SearchRequest};
use crate::transport::{HttpResponse, Transport};

pub const DEFAULT_SEARCH_URL: &str = "https://search.rcsb.org/rcsbsearch/v2/query";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result_set: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    identifier: String,
}

pub struct RcsbClient<T: Transport> {
    transport: T,
    search_url: String,
    download_url: String,
}

impl<T: Transport> RcsbClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_endpoints(transport, DEFAULT_SEARCH_URL, DEFAULT_DOWNLOAD_URL)
    }

    pub fn with_endpoints(transport: T, search_url: &str, download_url: &str) -> Self {
        Self {
            transport,
            search_url: search_url.to_string(),
            download_url: download_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn structure_url(&self, id: &EntryId, format: StructureFormat) -> String {
        format!("{}/{}.{}", self.download_url, id.as_str(), format.extension())
    }

    /// Runs one page of an entry search and returns the identifiers in the
    /// order the service ranked them.
    pub fn search_page(
        &self,
        query: &Node,
        start: usize,
        rows: usize,
    ) -> Result<Vec<EntryId>, HarvestError> {
        let payload = serde_json::to_value(SearchRequest::entries(query, start, rows))
            .map_err(|err| HarvestError::RcsbDecode(err.to_string()))?;
        debug!(start, rows, "rcsb.search request");
        let response = self.transport.post_json(&self.search_url, &payload)?;
        if !response.is_success() {
            error!(
                status = response.status,
                payload = %payload,
                body = %response.text(),
                "rcsb.search rejected"
            );
        }
        let response = handle_status(response)?;
        parse_search_response(&response.body)
    }

    pub fn download_structure(
        &self,
        id: &EntryId,
        format: StructureFormat,
    ) -> Result<Vec<u8>, HarvestError> {
        let url = self.structure_url(id, format);
        debug!(%url, "rcsb.download request");
        let response = handle_status(self.transport.get(&url)?)?;
        Ok(response.body)
    }
}

fn handle_status(response: HttpResponse) -> Result<HttpResponse, HarvestError> {
    if response.is_success() {
        return Ok(response);
    }
    let message = response.text();
    let message = if message.trim().is_empty() {
        "RCSB request failed".to_string()
    } else {
        message
    };
    Err(HarvestError::RcsbStatus {
        status: response.status,
        message,
    })
}

/// An empty body is what the service sends (204) when nothing matches; a
/// missing or null `result_set` is read the same way.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<EntryId>, HarvestError> {
    if body.iter().all(|byte| byte.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }
    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|err| HarvestError::RcsbDecode(err.to_string()))?;
    response
        .result_set
        .unwrap_or_default()
        .into_iter()
        .map(|hit| {
            hit.identifier.parse().map_err(|_| {
                HarvestError::RcsbDecode(format!("unusable identifier {:?}", hit.identifier))
            })
        })
        .collect()
}
