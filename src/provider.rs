//! Environment Canada weather provider
//!
//! Couples a feed source with the normalization engine. The provider owns
//! the [`TemperatureCache`] behind a mutex that is held for a whole
//! normalization cycle, so overlapping polls are serialized rather than
//! interleaving cache updates.

use std::path::PathBuf;

use chrono::Local;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::data::{read_site_file, CitypageClient, FetchError, SiteData};
use crate::engine::{normalize, EngineConfig, NormalizedFeed, TemperatureCache};

/// How long a saved temperature snapshot remains usable
///
/// Long enough to carry this morning's Today/Tonight pair into the evening,
/// short enough that yesterday's pair is expired by the next afternoon.
const TEMPERATURE_SNAPSHOT_TTL_HOURS: u64 = 12;

/// Where citypage documents come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// MSC Datamart, by province and site code
    Remote { prov_code: String, site_code: String },
    /// A citypage XML file on disk
    File(PathBuf),
}

impl FeedSource {
    /// Snapshot key for this source's temperature cache
    pub fn cache_key(&self) -> String {
        match self {
            FeedSource::Remote {
                prov_code,
                site_code,
            } => format!("temperatures_{}_{}", prov_code.to_uppercase(), site_code),
            FeedSource::File(path) => format!(
                "temperatures_file_{}",
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ),
        }
    }
}

/// Polls a citypage source and normalizes each document
#[derive(Debug)]
pub struct Provider {
    source: FeedSource,
    config: EngineConfig,
    client: CitypageClient,
    temperatures: Mutex<TemperatureCache>,
    store: Option<CacheManager>,
}

impl Provider {
    /// Creates a provider with an empty temperature cache
    pub fn new(source: FeedSource, config: EngineConfig) -> Self {
        info!(?source, "weather provider started");
        Self {
            source,
            config,
            client: CitypageClient::new(),
            temperatures: Mutex::new(TemperatureCache::new()),
            store: None,
        }
    }

    /// Use a custom citypage client
    pub fn with_client(mut self, client: CitypageClient) -> Self {
        self.client = client;
        self
    }

    /// Persist the temperature cache in `store`
    ///
    /// A fresh snapshot from an earlier run is restored immediately.
    pub fn with_store(mut self, store: CacheManager) -> Self {
        let key = self.source.cache_key();
        match store.read::<TemperatureCache>(&key) {
            Some(snapshot) if !snapshot.is_expired => {
                info!(saved_at = %snapshot.saved_at, "restored temperature cache");
                self.temperatures = Mutex::new(snapshot.data);
            }
            Some(_) => debug!("temperature snapshot expired; starting empty"),
            None => debug!("no temperature snapshot found"),
        }
        self.store = Some(store);
        self
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Copy of the current temperature cache
    pub async fn temperature_cache(&self) -> TemperatureCache {
        self.temperatures.lock().await.clone()
    }

    /// Retrieves the latest document and normalizes it
    pub async fn poll(&self) -> Result<NormalizedFeed, FetchError> {
        let doc = match &self.source {
            FeedSource::Remote {
                prov_code,
                site_code,
            } => self.client.fetch_site(prov_code, site_code).await?,
            FeedSource::File(path) => read_site_file(path).await?,
        };

        Ok(self.normalize_document(&doc).await)
    }

    /// Normalizes an already retrieved document
    pub async fn normalize_document(&self, doc: &SiteData) -> NormalizedFeed {
        let mut temperatures = self.temperatures.lock().await;
        let feed = normalize(doc, &self.config, &mut temperatures, Local::now().naive_local());

        if let Some(store) = &self.store {
            if let Err(e) = store.write(
                &self.source.cache_key(),
                &*temperatures,
                TEMPERATURE_SNAPSHOT_TTL_HOURS,
            ) {
                warn!(error = %e, "failed to save temperature cache");
            }
        }

        feed
    }
}
