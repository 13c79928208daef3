use clap::Parser;

use super::common::{self, CatalogConfig};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Config(#[from] common::Error),
}

#[derive(Debug, Parser)]
pub(crate) struct Config {
    #[clap(subcommand)]
    cmd: SubCommand,
}

#[derive(Debug, Parser)]
enum SubCommand {
    /// Translate a ship matrix name to its hangar name
    ToHangar(NameConfig),

    /// Translate a hangar name to its ship matrix name
    ToProvider(NameConfig),

    /// Check whether a hangar name designates a ship matrix name
    Equals(EqualsConfig),
}

#[derive(Debug, Parser)]
struct NameConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,

    name: String,
}

#[derive(Debug, Parser)]
struct EqualsConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,

    /// Name of the ship in a hangar export
    hangar_name: String,

    /// Name of the ship in the ship matrix
    provider_name: String,
}

pub(crate) async fn command(config: Config) -> Result<(), Error> {
    match config.cmd {
        SubCommand::ToHangar(NameConfig { catalog, name }) => {
            let service = catalog.make_service()?;
            println!("{}", service.provider_to_hangar(&name).await);
        }
        SubCommand::ToProvider(NameConfig { catalog, name }) => {
            let service = catalog.make_service()?;
            println!("{}", service.hangar_to_provider(&name).await);
        }
        SubCommand::Equals(EqualsConfig {
            catalog,
            hangar_name,
            provider_name,
        }) => {
            let service = catalog.make_service()?;
            println!(
                "{}",
                service
                    .ship_names_are_equal(&hangar_name, &provider_name)
                    .await
            );
        }
    }
    Ok(())
}
