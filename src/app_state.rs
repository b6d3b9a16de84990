use std::sync::Arc;

use crate::{
    config::Config,
    realtime::RealtimeHub,
    storage::{FsObjectStorage, ObjectStorage},
    store::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub realtime: Arc<RealtimeHub>,
    pub storage: Arc<dyn ObjectStorage>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize the backing store
        let store = Store::connect(&config.database.url).await?;
        store.init().await?;
        let store = Arc::new(store);

        let realtime = Arc::new(RealtimeHub::new(config.realtime.channel_capacity));
        let storage: Arc<dyn ObjectStorage> = Arc::new(FsObjectStorage::new(
            config.storage.root.clone(),
            config.storage.public_base_url.clone(),
        ));

        Ok(Self {
            store,
            realtime,
            storage,
            config,
        })
    }
}
