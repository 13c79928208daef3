//! Entrypoint of the fleet binary
use dotenvy::dotenv;
use trogging::{
    TroggingGuard,
    cli::LoggingConfigBuilderExt,
    tracing_subscriber::{Registry, prelude::*},
};

mod commands {
    pub(crate) mod alias;
    pub(crate) mod chassis;
    pub(crate) mod common;
    pub(crate) mod ships;
}

enum ReturnCode {
    Failure = 1,
}

#[derive(Debug, clap::Parser)]
#[clap(
    name = "fleet",
    version,
    disable_help_flag = true,
    arg(
        clap::Arg::new("help")
            .short('h')
            .long("help")
            .help("Print help information")
            .action(clap::ArgAction::Help)
            .global(true)
    ),
    about = "Star Citizen ship catalog command line tools",
    long_about = r#"Star Citizen ship catalog command line tools

Examples:
    # List every ship of the catalog
    fleet ships list

    # Show a ship by id, as JSON
    fleet ships show 24 --format json

    # Keep the scraped catalog on disk between runs
    fleet ships list --catalog-cache file --catalog-cache-dir ~/.fleet

    # Translate a hangar ship name to its ship matrix name
    fleet alias to-provider "Dragonfly Black" --ship-names-file ship_names.json

    # Run with full debug logging specified with LOG_FILTER
    LOG_FILTER=debug fleet ships refresh
"#
)]
struct Config {
    #[clap(flatten)]
    logging_config: trogging::cli::LoggingConfig,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Parser)]
enum Command {
    /// Query the ship catalog
    Ships(commands::ships::Config),

    /// Query the chassis reference table
    Chassis(commands::chassis::Config),

    /// Translate ship names between hangar exports and the ship matrix
    Alias(commands::alias::Config),
}

fn main() -> Result<(), std::io::Error> {
    // load all environment variables from .env before doing anything
    load_dotenv();

    let config: Config = clap::Parser::parse();

    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    tokio_runtime.block_on(async move {
        fn handle_init_logs(r: Result<TroggingGuard, trogging::Error>) -> TroggingGuard {
            match r {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Initializing logs failed: {e}");
                    std::process::exit(ReturnCode::Failure as _);
                }
            }
        }

        let _tracing_guard = handle_init_logs(init_logs_and_tracing(&config.logging_config));

        match config.command {
            None => println!("command required, -h/--help for help"),
            Some(Command::Ships(config)) => {
                if let Err(e) = commands::ships::command(config).await {
                    eprintln!("Ships command failed: {e}");
                    std::process::exit(ReturnCode::Failure as _)
                }
            }
            Some(Command::Chassis(config)) => {
                if let Err(e) = commands::chassis::command(config).await {
                    eprintln!("Chassis command failed: {e}");
                    std::process::exit(ReturnCode::Failure as _)
                }
            }
            Some(Command::Alias(config)) => {
                if let Err(e) = commands::alias::command(config).await {
                    eprintln!("Alias command failed: {e}");
                    std::process::exit(ReturnCode::Failure as _)
                }
            }
        }
    });

    Ok(())
}

/// Source the .env file before initialising the Config struct - this sets
/// any envs in the file, which the Config struct then uses.
///
/// Precedence is given to existing env variables.
fn load_dotenv() {
    match dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            // a missing env file is not an error
        }
        Err(e) => {
            eprintln!("FATAL Error loading config from: {e}");
            eprintln!("Aborting");
            std::process::exit(ReturnCode::Failure as _);
        }
    };
}

fn init_logs_and_tracing(
    config: &trogging::cli::LoggingConfig,
) -> Result<TroggingGuard, trogging::Error> {
    let log_layer = trogging::Builder::new()
        .with_default_log_filter("info")
        .with_logging_config(config)
        .build()?;

    let subscriber = Registry::default().with(log_layer);
    trogging::install_global(subscriber)
}
