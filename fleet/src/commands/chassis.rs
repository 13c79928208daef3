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
    /// Print the display name of a chassis id
    Name(NameConfig),
}

#[derive(Debug, Parser)]
struct NameConfig {
    #[clap(flatten)]
    catalog: CatalogConfig,

    /// Numeric id of the chassis
    id: String,
}

pub(crate) async fn command(config: Config) -> Result<(), Error> {
    match config.cmd {
        SubCommand::Name(NameConfig { catalog, id }) => {
            let service = catalog.make_service()?;
            println!("{}", service.find_chassis_name(&id).await);
        }
    }
    Ok(())
}
