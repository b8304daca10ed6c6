//! Search the RCSB Protein Data Bank and download the matching structures.
//!
//! [`app::Harvester`] is the entry point: it turns [`query::SearchCriteria`]
//! or a sequence into a search query, pages through the results and stores
//! one `<id>.pdb` file per entry, skipping files already on disk.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod query;
pub mod rcsb;
pub mod store;
pub mod transport;

pub use app::{HarvestResult, Harvester, SearchOptions};
pub use error::HarvestError;
pub use query::SearchCriteria;
