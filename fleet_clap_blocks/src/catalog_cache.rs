//! CLI config for the storage of the scraped catalog.
use std::{path::PathBuf, sync::Arc, time::Duration};

use fleet_catalog::cache::{CacheDriver, CatalogCache, FileBackend, MemoryBackend};
use iox_time::TimeProvider;
use observability_deps::tracing::{info, warn};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum ParseError {
    #[snafu(display(
        "Specified {:?} for the catalog cache, required configuration missing for {}",
        catalog_cache,
        missing
    ))]
    MissingCatalogCacheConfig {
        catalog_cache: CatalogCacheType,
        missing: String,
    },
}

/// CLI config for the catalog cache
#[derive(Debug, Clone, clap::Parser)]
pub struct CatalogCacheConfig {
    /// Where the scraped catalog is kept between refreshes.
    ///
    /// Possible values (case insensitive):
    ///
    /// * memory: Kept in the process, every start scrapes the ship matrix again.
    /// * file: Kept in a JSON file in the local filesystem. Must also set `--catalog-cache-dir`.
    #[clap(
        value_enum,
        long = "catalog-cache",
        env = "FLEET_CATALOG_CACHE",
        default_value = "memory",
        ignore_case = true,
        action,
        verbatim_doc_comment
    )]
    pub catalog_cache: CatalogCacheType,

    /// The directory the `file` catalog cache writes to.
    #[clap(long = "catalog-cache-dir", env = "FLEET_CATALOG_CACHE_DIR", action)]
    pub catalog_cache_dir: Option<PathBuf>,
}

impl CatalogCacheConfig {
    /// Create the config-dependant catalog cache, entries expire `ttl` after being written
    pub fn make_catalog_cache(
        &self,
        ttl: Duration,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Arc<dyn CatalogCache>, ParseError> {
        if let Some(dir) = &self.catalog_cache_dir {
            if !matches!(self.catalog_cache, CatalogCacheType::File) {
                warn!(?dir, catalog_cache_type = ?self.catalog_cache,
                      "--catalog-cache-dir / `FLEET_CATALOG_CACHE_DIR` ignored. It only affects 'file' catalog caches");
            }
        }

        let cache: Arc<dyn CatalogCache> = match self.catalog_cache {
            CatalogCacheType::Memory => {
                info!(catalog_cache_type = "Memory", ?ttl, "Catalog Cache");
                Arc::new(CacheDriver::new(
                    MemoryBackend::default(),
                    Some(ttl),
                    time_provider,
                ))
            }
            CatalogCacheType::File => match &self.catalog_cache_dir {
                Some(dir) => {
                    info!(?dir, catalog_cache_type = "Directory", ?ttl, "Catalog Cache");
                    Arc::new(CacheDriver::new(
                        FileBackend::new(dir.clone()),
                        Some(ttl),
                        time_provider,
                    ))
                }
                None => MissingCatalogCacheConfigSnafu {
                    catalog_cache: CatalogCacheType::File,
                    missing: "catalog-cache-dir",
                }
                .fail()?,
            },
        };
        Ok(cache)
    }
}

/// Catalog cache type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum CatalogCacheType {
    /// In-memory.
    Memory,

    /// Filesystem.
    File,
}

impl CatalogCacheType {
    /// Map enum variant to static string, followed inverse of clap parsing rules.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use fleet_catalog::{CatalogSnapshot, ShipRecord};
    use iox_time::{MockProvider, Time};

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn time_provider() -> Arc<dyn TimeProvider> {
        Arc::new(MockProvider::new(Time::from_timestamp_nanos(0)))
    }

    #[test]
    fn default_is_memory() {
        let config = CatalogCacheConfig::try_parse_from(["fleet"]).unwrap();
        assert_eq!(config.catalog_cache, CatalogCacheType::Memory);
        config.make_catalog_cache(TTL, time_provider()).unwrap();
    }

    #[test]
    fn case_insensitive() {
        let config =
            CatalogCacheConfig::try_parse_from(["fleet", "--catalog-cache", "MEMORY"]).unwrap();
        assert_eq!(config.catalog_cache.as_str(), "memory");
    }

    #[test]
    fn file_requires_a_directory() {
        let config =
            CatalogCacheConfig::try_parse_from(["fleet", "--catalog-cache", "file"]).unwrap();
        let err = config
            .make_catalog_cache(TTL, time_provider())
            .unwrap_err()
            .to_string();
        assert_eq!(
            err,
            "Specified File for the catalog cache, required configuration missing for catalog-cache-dir"
        );
    }

    #[tokio::test]
    async fn file_cache_writes_in_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogCacheConfig::try_parse_from([
            "fleet",
            "--catalog-cache",
            "file",
            "--catalog-cache-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();

        let cache = config.make_catalog_cache(TTL, time_provider()).unwrap();
        cache
            .put(
                "ship_matrix",
                Arc::new(CatalogSnapshot::new([ShipRecord::blank("24")])),
            )
            .await;
        assert!(dir.path().join("ship_matrix.json").exists());
    }
}
