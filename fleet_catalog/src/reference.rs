//! Reference tables owned by the persistence layer: chassis names and ship name aliases.
//!
//! Both are read through the [`ChassisNameSource`] and [`ShipAliasSource`] traits and loaded at
//! most once per [`ShipCatalogService`](crate::ShipCatalogService).
use std::{
    collections::HashMap,
    fmt::Debug,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::UNKNOWN_CHASSIS;

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("failed to read reference table {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference table {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference table unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the chassis reference table
#[async_trait]
pub trait ChassisNameSource: Debug + Send + Sync + 'static {
    /// All chassis names keyed by their numeric id
    async fn chassis_names(&self) -> Result<HashMap<u32, String>, ReferenceError>;
}

/// Read access to the ship name alias table
#[async_trait]
pub trait ShipAliasSource: Debug + Send + Sync + 'static {
    async fn ship_aliases(&self) -> Result<Vec<ShipAlias>, ReferenceError>;
}

/// One row of the alias table: the same ship under its hangar name and its ship matrix name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipAlias {
    /// Name used by the hangar exports of the players
    pub hangar_name: String,
    /// Name used by the ship matrix
    pub provider_name: String,
}

impl ShipAlias {
    pub fn new(hangar_name: impl Into<String>, provider_name: impl Into<String>) -> Self {
        Self {
            hangar_name: hangar_name.into(),
            provider_name: provider_name.into(),
        }
    }
}

/// One row of the chassis table as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisEntry {
    pub id: u32,
    pub name: String,
}

/// Memoized chassis reference table
#[derive(Debug, Clone, Default)]
pub struct ChassisNames {
    names: HashMap<u32, String>,
}

impl ChassisNames {
    pub fn new(names: HashMap<u32, String>) -> Self {
        Self { names }
    }

    /// Display name of `chassis_id`, [`UNKNOWN_CHASSIS`] for ids without an entry
    ///
    /// Chassis ids are carried as strings on ship records but are numeric in the reference
    /// table; ids that do not parse as a number never match.
    pub fn name(&self, chassis_id: &str) -> &str {
        chassis_id
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(|id| self.names.get(&id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CHASSIS)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Memoized alias table, indexed in both directions
///
/// When several rows share a key, the last row wins in that direction.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    hangar_to_provider: HashMap<String, String>,
    provider_to_hangar: HashMap<String, String>,
}

impl AliasTable {
    pub fn new(aliases: impl IntoIterator<Item = ShipAlias>) -> Self {
        let mut table = Self::default();
        for alias in aliases {
            table
                .provider_to_hangar
                .insert(alias.provider_name.clone(), alias.hangar_name.clone());
            table
                .hangar_to_provider
                .insert(alias.hangar_name, alias.provider_name);
        }
        table
    }

    /// Ship matrix name of a hangar name, the input itself when there is no alias
    pub fn hangar_to_provider<'a>(&'a self, hangar_name: &'a str) -> &'a str {
        self.hangar_to_provider
            .get(hangar_name)
            .map(String::as_str)
            .unwrap_or(hangar_name)
    }

    /// Hangar name of a ship matrix name, the input itself when there is no alias
    pub fn provider_to_hangar<'a>(&'a self, provider_name: &'a str) -> &'a str {
        self.provider_to_hangar
            .get(provider_name)
            .map(String::as_str)
            .unwrap_or(provider_name)
    }

    pub fn len(&self) -> usize {
        self.hangar_to_provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hangar_to_provider.is_empty()
    }
}

/// Reference tables held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceTables {
    chassis: HashMap<u32, String>,
    aliases: Vec<ShipAlias>,
}

impl StaticReferenceTables {
    pub fn new(
        chassis: impl IntoIterator<Item = (u32, String)>,
        aliases: impl IntoIterator<Item = ShipAlias>,
    ) -> Self {
        Self {
            chassis: chassis.into_iter().collect(),
            aliases: aliases.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ChassisNameSource for StaticReferenceTables {
    async fn chassis_names(&self) -> Result<HashMap<u32, String>, ReferenceError> {
        Ok(self.chassis.clone())
    }
}

#[async_trait]
impl ShipAliasSource for StaticReferenceTables {
    async fn ship_aliases(&self) -> Result<Vec<ShipAlias>, ReferenceError> {
        Ok(self.aliases.clone())
    }
}

/// Reference tables exported as JSON files
///
/// The chassis file holds a list of [`ChassisEntry`], the alias file a list of [`ShipAlias`].
/// A table without a file is empty.
#[derive(Debug, Clone, Default)]
pub struct JsonFileReferenceTables {
    chassis_path: Option<PathBuf>,
    aliases_path: Option<PathBuf>,
}

impl JsonFileReferenceTables {
    pub fn new(chassis_path: Option<PathBuf>, aliases_path: Option<PathBuf>) -> Self {
        Self {
            chassis_path,
            aliases_path,
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ReferenceError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| ReferenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl ChassisNameSource for JsonFileReferenceTables {
    async fn chassis_names(&self) -> Result<HashMap<u32, String>, ReferenceError> {
        let Some(path) = &self.chassis_path else {
            return Ok(HashMap::new());
        };
        let entries: Vec<ChassisEntry> = read_json(path).await?;
        Ok(entries.into_iter().map(|e| (e.id, e.name)).collect())
    }
}

#[async_trait]
impl ShipAliasSource for JsonFileReferenceTables {
    async fn ship_aliases(&self) -> Result<Vec<ShipAlias>, ReferenceError> {
        match &self.aliases_path {
            Some(path) => read_json(path).await,
            None => Ok(vec![]),
        }
    }
}
