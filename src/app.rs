use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::info;

use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_RESULTS, DEFAULT_SAVE_DIR, ResolvedConfig};
use crate::domain::{EntryId, StructureFormat};
use crate::error::HarvestError;
use crate::query::{Node, SearchCriteria, SequenceQuery};
use crate::rcsb::RcsbClient;
use crate::store::{FetchAction, StructureStore};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub save_dir: Utf8PathBuf,
    pub max_results: usize,
    pub batch_size: usize,
    pub format: StructureFormat,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            save_dir: Utf8PathBuf::from(DEFAULT_SAVE_DIR),
            max_results: DEFAULT_MAX_RESULTS,
            batch_size: DEFAULT_BATCH_SIZE,
            format: StructureFormat::Pdb,
        }
    }
}

impl From<&ResolvedConfig> for SearchOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            save_dir: config.save_dir.clone(),
            max_results: config.max_results,
            batch_size: config.batch_size,
            format: StructureFormat::Pdb,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HarvestItem {
    pub id: String,
    pub path: Utf8PathBuf,
    pub action: FetchAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarvestResult {
    pub paths: Vec<Utf8PathBuf>,
    pub items: Vec<HarvestItem>,
    pub requests: usize,
    pub completed_at: String,
}

impl HarvestResult {
    pub fn downloaded(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.action == FetchAction::Download)
            .count()
    }
}

pub struct Harvester<T: Transport> {
    client: RcsbClient<T>,
}

impl Harvester<ReqwestTransport> {
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, HarvestError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(RcsbClient::with_endpoints(
            transport,
            &config.search_url,
            &config.download_url,
        )))
    }
}

impl<T: Transport> Harvester<T> {
    pub fn new(client: RcsbClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RcsbClient<T> {
        &self.client
    }

    pub fn search_and_download(
        &self,
        criteria: &SearchCriteria,
        options: &SearchOptions,
    ) -> Result<HarvestResult, HarvestError> {
        let query = criteria.build()?;
        info!(
            organisms = criteria.organisms.len(),
            methods = criteria.methods.len(),
            keywords = criteria.keywords.len(),
            "text search"
        );
        self.run(&query, options)
    }

    pub fn search_by_sequence_and_download(
        &self,
        sequence: &str,
        options: &SearchOptions,
    ) -> Result<HarvestResult, HarvestError> {
        let query = SequenceQuery::new(sequence)?;
        info!(length = query.sequence().len(), "sequence search");
        self.run(&query.build(), options)
    }

    /// Pages through the search results and fetches each entry in service
    /// order until `max_results` paths are collected or the results run out.
    pub fn run(&self, query: &Node, options: &SearchOptions) -> Result<HarvestResult, HarvestError> {
        if options.batch_size == 0 {
            return Err(HarvestError::InvalidPageSize);
        }
        let store = StructureStore::new(options.save_dir.clone());
        store.ensure_root()?;

        let mut items: Vec<HarvestItem> = Vec::new();
        let mut requests = 0usize;
        let mut start = 0usize;

        while items.len() < options.max_results {
            let page = self.client.search_page(query, start, options.batch_size)?;
            requests += 1;
            info!(start, returned = page.len(), "rcsb.search page");
            if page.is_empty() {
                break;
            }
            let exhausted = page.len() < options.batch_size;

            for id in page {
                if items.len() >= options.max_results {
                    break;
                }
                items.push(self.fetch_one(&store, id, options.format)?);
            }

            if exhausted {
                break;
            }
            start += options.batch_size;
        }

        info!(
            collected = items.len(),
            requests,
            save_dir = %store.root(),
            "harvest complete"
        );
        Ok(HarvestResult {
            paths: items.iter().map(|item| item.path.clone()).collect(),
            items,
            requests,
            completed_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    fn fetch_one(
        &self,
        store: &StructureStore,
        id: EntryId,
        format: StructureFormat,
    ) -> Result<HarvestItem, HarvestError> {
        let (path, action) = store.fetch(&self.client, &id, format)?;
        Ok(HarvestItem {
            id: id.to_string(),
            path,
            action,
        })
    }
}
