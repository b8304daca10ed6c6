use std::sync::Mutex;

use camino::Utf8PathBuf;
use serde_json::Value;

use rcsb_harvest::domain::{EntryId, StructureFormat};
use rcsb_harvest::error::HarvestError;
use rcsb_harvest::rcsb::RcsbClient;
use rcsb_harvest::store::{FetchAction, StructureStore};
use rcsb_harvest::transport::{HttpResponse, Transport};

#[derive(Default)]
struct CountingTransport {
    gets: Mutex<usize>,
}

impl Transport for CountingTransport {
    fn post_json(&self, _url: &str, _body: &Value) -> Result<HttpResponse, HarvestError> {
        Err(HarvestError::RcsbHttp("not implemented".to_string()))
    }

    fn get(&self, _url: &str) -> Result<HttpResponse, HarvestError> {
        *self.gets.lock().unwrap() += 1;
        Ok(HttpResponse {
            status: 200,
            body: b"HEADER    OXYGEN TRANSPORT\n".to_vec(),
        })
    }
}

#[test]
fn refetch_performs_no_network_call() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let store = StructureStore::new(root.clone());
    store.ensure_root().unwrap();
    let client = RcsbClient::new(CountingTransport::default());
    let id: EntryId = "4HHB".parse().unwrap();

    let (first, action) = store.fetch(&client, &id, StructureFormat::Pdb).unwrap();
    assert_eq!(action, FetchAction::Download);
    assert_eq!(first, root.join("4HHB.pdb"));
    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        "HEADER    OXYGEN TRANSPORT\n"
    );

    let (second, action) = store.fetch(&client, &id, StructureFormat::Pdb).unwrap();
    assert_eq!(action, FetchAction::Cache);
    assert_eq!(second, first);
    assert_eq!(*client.transport().gets.lock().unwrap(), 1);
}

#[test]
fn default_download_url() {
    let client = RcsbClient::new(CountingTransport::default());
    let id: EntryId = "1LYZ".parse().unwrap();
    assert_eq!(
        client.structure_url(&id, StructureFormat::Pdb),
        "https://files.rcsb.org/download/1LYZ.pdb"
    );
}
