//! Building blocks for [`clap`]-driven configs of the fleet tools.
pub mod catalog_cache;
pub mod catalog_source;
pub mod reference_tables;
