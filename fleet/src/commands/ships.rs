use clap::Parser;
use fleet_catalog::UpstreamError;
use observability_deps::tracing::info;

use super::common::{self, CatalogConfig, Format, format_ships};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Config(#[from] common::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("failed to format the output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("no ship found for {0:?}")]
    NotFound(String),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Parser)]
pub(crate) struct Config {
    #[clap(subcommand)]
    cmd: SubCommand,
}

#[derive(Debug, Parser)]
enum SubCommand {
    /// List the ships of the catalog, officials first
    List(ListConfig),

    /// Show a ship by id
    Show(ShowConfig),

    /// Find a ship by name, ignoring case and surrounding whitespace
    Find(FindConfig),

    /// Scrape the ship matrix now, regardless of the cached catalog
    Refresh(RefreshConfig),
}

#[derive(Debug, Parser)]
struct ListConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,

    /// Only list the ships of this chassis
    #[clap(long = "chassis-id")]
    chassis_id: Option<String>,

    /// The format in which to output the ships
    #[clap(value_enum, long = "format", default_value = "pretty")]
    output_format: Format,
}

#[derive(Debug, Parser)]
struct ShowConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,

    /// The format in which to output the ship
    #[clap(value_enum, long = "format", default_value = "pretty")]
    output_format: Format,

    /// Id of the ship
    id: String,
}

#[derive(Debug, Parser)]
struct FindConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,

    /// The format in which to output the ship
    #[clap(value_enum, long = "format", default_value = "pretty")]
    output_format: Format,

    /// Name of the ship
    name: String,
}

#[derive(Debug, Parser)]
struct RefreshConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,
}

pub(crate) async fn command(config: Config) -> Result<()> {
    match config.cmd {
        SubCommand::List(ListConfig {
            catalog,
            chassis_id,
            output_format,
        }) => {
            let service = catalog.make_service()?;
            let ships = match chassis_id {
                Some(chassis_id) => service.ships_by_chassis_id(&chassis_id).await?,
                None => service.all_ships().await?.iter().cloned().collect(),
            };
            println!("{}", format_ships(&ships, output_format)?);
        }
        SubCommand::Show(ShowConfig {
            catalog,
            output_format,
            id,
        }) => {
            let service = catalog.make_service()?;
            let ship = service.ship_by_id(&id).await?.ok_or(Error::NotFound(id))?;
            println!("{}", format_ships(&[ship], output_format)?);
        }
        SubCommand::Find(FindConfig {
            catalog,
            output_format,
            name,
        }) => {
            let service = catalog.make_service()?;
            let ship = service
                .ship_by_name(&name)
                .await?
                .ok_or(Error::NotFound(name))?;
            println!("{}", format_ships(&[ship], output_format)?);
        }
        SubCommand::Refresh(RefreshConfig { catalog }) => {
            let service = catalog.make_service()?;
            let snapshot = service.refresh().await?;
            info!(ship_count = snapshot.len(), "refreshed the ship catalog");
            println!("Ship catalog refreshed: {} ships", snapshot.len());
        }
    }

    Ok(())
}
