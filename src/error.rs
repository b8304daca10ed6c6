use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarvestError {
    #[error("no search criteria provided (organism, method or keyword required)")]
    #[diagnostic(help("pass at least one --organism, --method or --keyword"))]
    NoCriteria,

    #[error("sequence query is empty")]
    EmptySequence,

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("invalid entry identifier: {0}")]
    InvalidEntryId(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("RCSB request failed: {0}")]
    RcsbHttp(String),

    #[error("RCSB returned status {status}: {message}")]
    RcsbStatus { status: u16, message: String },

    #[error("unexpected RCSB search response: {0}")]
    RcsbDecode(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl HarvestError {
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            HarvestError::NoCriteria
                | HarvestError::EmptySequence
                | HarvestError::InvalidPageSize
                | HarvestError::InvalidEntryId(_)
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HarvestError::RcsbHttp(_) | HarvestError::RcsbStatus { .. } | HarvestError::RcsbDecode(_)
        )
    }
}
