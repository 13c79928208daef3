use std::sync::Arc;

use clap::Parser;
use comfy_table::{Cell, Table};
use fleet_catalog::{ShipCatalogService, ShipCatalogServiceArgs, ShipRecord};
use fleet_clap_blocks::{
    catalog_cache::{self, CatalogCacheConfig},
    catalog_source::{self, CatalogSourceConfig},
    reference_tables::ReferenceTablesConfig,
};
use iox_time::SystemProvider;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)]
    CatalogSource(#[from] catalog_source::ParseError),

    #[error(transparent)]
    CatalogCache(#[from] catalog_cache::ParseError),
}

/// Everything needed to build the catalog service
#[derive(Debug, Parser)]
pub(crate) struct CatalogConfig {
    #[clap(flatten)]
    pub(crate) source: CatalogSourceConfig,

    #[clap(flatten)]
    pub(crate) cache: CatalogCacheConfig,

    #[clap(flatten)]
    pub(crate) reference_tables: ReferenceTablesConfig,
}

impl CatalogConfig {
    pub(crate) fn make_service(&self) -> Result<ShipCatalogService, Error> {
        let cache = self.cache.make_catalog_cache(
            self.source.catalog_ttl,
            Arc::new(SystemProvider::new()),
        )?;
        let tables = Arc::new(self.reference_tables.make_reference_tables());

        Ok(ShipCatalogService::new(ShipCatalogServiceArgs {
            source: Arc::new(self.source.make_client()?),
            cache,
            chassis_names: Arc::clone(&tables) as _,
            ship_aliases: tables,
            urls: self.source.catalog_urls(),
        }))
    }
}

/// Output format of ship records
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Format {
    Pretty,
    Json,
}

pub(crate) fn format_ships(
    ships: &[ShipRecord],
    format: Format,
) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => serde_json::to_string_pretty(ships),
        Format::Pretty => Ok(pretty_table(ships)),
    }
}

fn pretty_table(ships: &[ShipRecord]) -> String {
    let mut table = Table::new();
    table.load_preset("||--+-++|    ++++++");
    table.set_header(vec![
        Cell::new("id"),
        Cell::new("name"),
        Cell::new("manufacturer"),
        Cell::new("size"),
        Cell::new("status"),
        Cell::new("crew"),
        Cell::new("chassis"),
    ]);

    for ship in ships {
        let status = if ship.is_flight_ready() {
            "flight-ready"
        } else {
            "not-ready"
        };
        table.add_row(vec![
            Cell::new(&ship.id),
            Cell::new(&ship.name),
            Cell::new(&ship.manufacturer_code),
            Cell::new(ship.size.as_str()),
            Cell::new(status),
            Cell::new(format!("{}-{}", ship.min_crew, ship.max_crew)),
            Cell::new(&ship.chassis_name),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use fleet_catalog::{ProductionStatus, ShipSize};
    use pretty_assertions::assert_eq;

    use super::*;

    fn aurora() -> ShipRecord {
        ShipRecord {
            production_status: ProductionStatus::FlightReady,
            min_crew: 1,
            max_crew: 1,
            name: "Aurora MR".to_string(),
            size: ShipSize::Small,
            manufacturer_code: "RSI".to_string(),
            chassis_name: "Aurora".to_string(),
            ..ShipRecord::blank("24")
        }
    }

    #[test]
    fn pretty() {
        let out = format_ships(&[aurora()], Format::Pretty).unwrap();
        assert_eq!(
            out,
            "\
+----+-----------+--------------+-------+--------------+------+---------+
| id | name      | manufacturer | size  | status       | crew | chassis |
+----+-----------+--------------+-------+--------------+------+---------+
| 24 | Aurora MR | RSI          | small | flight-ready | 1-1  | Aurora  |
+----+-----------+--------------+-------+--------------+------+---------+"
        );
    }

    #[test]
    fn pretty_empty() {
        let out = format_ships(&[], Format::Pretty).unwrap();
        assert!(out.contains("| id | name | manufacturer | size | status | crew | chassis |"));
        assert!(!out.contains("Aurora"));
    }

    #[test]
    fn json() {
        let out = format_ships(&[aurora()], Format::Json).unwrap();
        let parsed: Vec<ShipRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![aurora()]);
    }
}
