mod ancestors;
mod list;

use std::sync::Arc;

use flatkv::MemoryStore;

use crate::Client;

pub(crate) fn new_client() -> (MemoryStore, Client) {
    let store = MemoryStore::new();
    let client = Client::new(Arc::new(store.clone()));
    (store, client)
}
