//! The catalog service, see [`ShipCatalogService`].
use std::{borrow::Cow, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use observability_deps::tracing::{debug, error, info, warn};
use parking_lot::RwLock;
use tokio::sync::OnceCell;

use crate::{
    CatalogSnapshot, CatalogUrls, SHIP_MATRIX_CACHE_KEY, ShipMatrixSource, ShipRecord,
    UpstreamError,
    cache::{CatalogCache, SnapshotLoader},
    normalize::ship_record,
    overrides::{BUILTIN_OVERRIDES, ShipOverride, merge_overrides},
    reference::{AliasTable, ChassisNameSource, ChassisNames, ReferenceError, ShipAliasSource},
};

/// Arguments to create a [`ShipCatalogService`]
#[derive(Debug)]
pub struct ShipCatalogServiceArgs {
    /// The upstream ship matrix
    pub source: Arc<dyn ShipMatrixSource>,
    /// Stores the scraped catalog between refreshes
    pub cache: Arc<dyn CatalogCache>,
    pub chassis_names: Arc<dyn ChassisNameSource>,
    pub ship_aliases: Arc<dyn ShipAliasSource>,
    /// Base URLs relative catalog paths are resolved against
    pub urls: CatalogUrls,
}

/// Fetches, merges, caches and indexes the ship catalog
///
/// Every lookup goes through the cache: on a miss the ship matrix is scraped, normalized and
/// merged with the overrides, then published as a new [`CatalogSnapshot`]. When a scrape fails
/// the last published snapshot keeps being served.
///
/// The chassis and alias reference tables are loaded on first use and kept for the lifetime of
/// the service.
#[derive(Debug)]
pub struct ShipCatalogService {
    source: Arc<dyn ShipMatrixSource>,
    cache: Arc<dyn CatalogCache>,
    chassis_source: Arc<dyn ChassisNameSource>,
    alias_source: Arc<dyn ShipAliasSource>,
    urls: CatalogUrls,
    overrides: Vec<ShipOverride>,
    /// Last snapshot handed out, swapped as a whole
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    chassis_names: OnceCell<ChassisNames>,
    aliases: OnceCell<AliasTable>,
}

impl ShipCatalogService {
    pub fn new(
        ShipCatalogServiceArgs {
            source,
            cache,
            chassis_names,
            ship_aliases,
            urls,
        }: ShipCatalogServiceArgs,
    ) -> Self {
        Self {
            source,
            cache,
            chassis_source: chassis_names,
            alias_source: ship_aliases,
            urls,
            overrides: BUILTIN_OVERRIDES.to_vec(),
            current: RwLock::new(None),
            chassis_names: OnceCell::new(),
            aliases: OnceCell::new(),
        }
    }

    /// Replace the built-in [overrides](crate::overrides) merged on each refresh
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = ShipOverride>) -> Self {
        self.overrides = overrides.into_iter().collect();
        self
    }

    pub fn urls(&self) -> &CatalogUrls {
        &self.urls
    }

    /// The catalog, refreshed first if the cache holds no fresh entry
    ///
    /// A failed refresh falls back to the last known snapshot, and only surfaces an error when
    /// there is none.
    pub async fn all_ships(&self) -> Result<Arc<CatalogSnapshot>, UpstreamError> {
        match self.cache.get_or_load(SHIP_MATRIX_CACHE_KEY, self).await {
            Ok(snapshot) => {
                self.publish(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                if let Some(snapshot) = self.current() {
                    warn!(error = %e, ship_count = snapshot.len(), "serving the previous ship catalog");
                    return Ok(snapshot);
                }
                match self.cache.get_stale(SHIP_MATRIX_CACHE_KEY).await {
                    Some(snapshot) => {
                        warn!(error = %e, ship_count = snapshot.len(), "serving an expired ship catalog");
                        self.publish(Arc::clone(&snapshot));
                        Ok(snapshot)
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Scrape the ship matrix regardless of the cache freshness, store and publish the result
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, UpstreamError> {
        let snapshot = Arc::new(self.scrape().await?);
        self.cache
            .put(SHIP_MATRIX_CACHE_KEY, Arc::clone(&snapshot))
            .await;
        self.publish(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Ships of a chassis, in catalog order
    pub async fn ships_by_chassis_id(
        &self,
        chassis_id: &str,
    ) -> Result<Vec<ShipRecord>, UpstreamError> {
        let snapshot = self.all_ships().await?;
        Ok(snapshot.ships_by_chassis_id(chassis_id).cloned().collect())
    }

    pub async fn ship_by_id(&self, id: &str) -> Result<Option<ShipRecord>, UpstreamError> {
        let snapshot = self.all_ships().await?;
        Ok(snapshot.get(id).cloned())
    }

    /// Case-insensitive lookup on the trimmed name, the first ship in catalog order wins
    pub async fn ship_by_name(&self, name: &str) -> Result<Option<ShipRecord>, UpstreamError> {
        let snapshot = self.all_ships().await?;
        Ok(snapshot.ship_by_name(name).cloned())
    }

    pub async fn find_chassis_name(&self, chassis_id: &str) -> String {
        self.chassis_names().await.name(chassis_id).to_string()
    }

    /// `true` if the hangar name translates exactly to the ship matrix name
    pub async fn ship_names_are_equal(&self, hangar_name: &str, provider_name: &str) -> bool {
        self.aliases().await.hangar_to_provider(hangar_name.trim()) == provider_name
    }

    pub async fn provider_to_hangar(&self, provider_name: &str) -> String {
        self.aliases()
            .await
            .provider_to_hangar(provider_name)
            .to_string()
    }

    pub async fn hangar_to_provider(&self, hangar_name: &str) -> String {
        self.aliases()
            .await
            .hangar_to_provider(hangar_name)
            .to_string()
    }

    fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current.read().as_ref().map(Arc::clone)
    }

    fn publish(&self, snapshot: Arc<CatalogSnapshot>) {
        *self.current.write() = Some(snapshot);
    }

    async fn scrape(&self) -> Result<CatalogSnapshot, UpstreamError> {
        let url = self.source.endpoint();
        debug!(%url, "fetching the ship matrix");

        let response = match self.source.fetch_ship_matrix().await {
            Ok(response) => response,
            Err(source) => {
                let e = UpstreamError::from_client(url, source);
                error!(error = %e, "cannot fetch the ship matrix");
                return Err(e);
            }
        };
        if !response.is_success() {
            error!(
                %url,
                success = ?response.success,
                entries = response.data.len(),
                "the ship matrix response is unsuccessful"
            );
            return Err(UpstreamError::Unsuccessful {
                url,
                success: response.success,
            });
        }

        let chassis_names = match self.load_chassis_names().await {
            Ok(names) => names,
            Err(source) => {
                let e = UpstreamError::ChassisNames { url, source };
                error!(error = %e, "cannot resolve the chassis of the ship matrix");
                return Err(e);
            }
        };
        let officials: IndexMap<String, ShipRecord> = response
            .data
            .iter()
            .map(|entry| ship_record(entry, chassis_names, &self.urls))
            .map(|record| (record.id.clone(), record))
            .collect();
        let official_count = officials.len();
        let merged = merge_overrides(officials, &self.overrides, chassis_names, &self.urls);

        info!(
            %url,
            official_count,
            ship_count = merged.len(),
            "scraped the ship matrix"
        );
        Ok(CatalogSnapshot::from_map(merged))
    }

    async fn load_chassis_names(&self) -> Result<&ChassisNames, ReferenceError> {
        self.chassis_names
            .get_or_try_init(|| async {
                let names = self.chassis_source.chassis_names().await?;
                debug!(chassis_count = names.len(), "loaded the chassis names");
                Ok::<_, ReferenceError>(ChassisNames::new(names))
            })
            .await
    }

    async fn chassis_names(&self) -> Cow<'_, ChassisNames> {
        match self.load_chassis_names().await {
            Ok(names) => Cow::Borrowed(names),
            Err(e) => {
                error!(error = %e, "cannot load the chassis names, every chassis is unknown");
                Cow::Owned(ChassisNames::default())
            }
        }
    }

    async fn aliases(&self) -> Cow<'_, AliasTable> {
        let loaded = self
            .aliases
            .get_or_try_init(|| async {
                let aliases = self.alias_source.ship_aliases().await?;
                debug!(alias_count = aliases.len(), "loaded the ship name aliases");
                Ok::<_, ReferenceError>(AliasTable::new(aliases))
            })
            .await;
        match loaded {
            Ok(table) => Cow::Borrowed(table),
            Err(e) => {
                error!(error = %e, "cannot load the ship name aliases, names are not translated");
                Cow::Owned(AliasTable::default())
            }
        }
    }
}

#[async_trait]
impl SnapshotLoader for ShipCatalogService {
    async fn load_snapshot(&self) -> Result<CatalogSnapshot, UpstreamError> {
        self.scrape().await
    }
}
