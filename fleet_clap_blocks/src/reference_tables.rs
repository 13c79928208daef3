//! CLI config for the reference tables owned by the persistence layer.
use std::path::PathBuf;

use fleet_catalog::reference::JsonFileReferenceTables;

/// CLI config for the chassis and ship name alias tables
///
/// Both tables are read from JSON exports; a table without a file is empty.
#[derive(Debug, Clone, Default, clap::Parser)]
pub struct ReferenceTablesConfig {
    /// JSON list of `{"id": <number>, "name": <string>}` chassis entries.
    #[clap(long = "chassis-file", env = "FLEET_CHASSIS_FILE", action)]
    pub chassis_file: Option<PathBuf>,

    /// JSON list of `{"hangar_name": <string>, "provider_name": <string>}` ship name aliases.
    #[clap(long = "ship-names-file", env = "FLEET_SHIP_NAMES_FILE", action)]
    pub ship_names_file: Option<PathBuf>,
}

impl ReferenceTablesConfig {
    pub fn make_reference_tables(&self) -> JsonFileReferenceTables {
        JsonFileReferenceTables::new(self.chassis_file.clone(), self.ship_names_file.clone())
    }
}
