use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::debug;

use crate::domain::{EntryId, StructureFormat};
use crate::error::HarvestError;
use crate::rcsb::RcsbClient;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchAction {
    Download,
    Cache,
}

/// Flat directory of structure files, one `<id>.<ext>` per entry.
///
/// A file's presence is the only record that an entry was fetched; its
/// content is never re-checked.
#[derive(Debug, Clone)]
pub struct StructureStore {
    root: Utf8PathBuf,
}

impl StructureStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn ensure_root(&self) -> Result<(), HarvestError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| HarvestError::Filesystem(format!("create {}: {err}", self.root)))
    }

    pub fn structure_path(&self, id: &EntryId, format: StructureFormat) -> Utf8PathBuf {
        self.root.join(format!("{id}.{}", format.extension()))
    }

    pub fn exists(&self, path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    pub fn fetch<T: Transport>(
        &self,
        client: &RcsbClient<T>,
        id: &EntryId,
        format: StructureFormat,
    ) -> Result<(Utf8PathBuf, FetchAction), HarvestError> {
        let path = self.structure_path(id, format);
        if self.exists(&path) {
            debug!(id = %id, path = %path, "already on disk");
            return Ok((path, FetchAction::Cache));
        }

        let content = client.download_structure(id, format)?;
        Self::write_bytes_atomic(&path, &content)?;
        debug!(id = %id, path = %path, bytes = content.len(), "downloaded");
        Ok((path, FetchAction::Download))
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), HarvestError> {
        let parent = path
            .parent()
            .ok_or_else(|| HarvestError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix(".rcsb-harvest")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        temp.write_all(content)
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        Ok(())
    }

    /// Entries already present, sorted by file name.
    pub fn list_structures(&self) -> Result<Vec<Utf8PathBuf>, HarvestError> {
        if !self.root.as_std_path().exists() {
            return Ok(Vec::new());
        }
        let entries = self
            .root
            .read_dir_utf8()
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| HarvestError::Filesystem(err.to_string()))?;
            let path = entry.path();
            let is_structure = matches!(path.extension(), Some("pdb") | Some("cif"));
            if is_structure && path.is_file() {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();
        Ok(paths)
    }
}
