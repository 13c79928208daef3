use serde::{Deserialize, Serialize};

/// Display name of a chassis id without an entry in the chassis reference table
pub const UNKNOWN_CHASSIS: &str = "Unknown chassis";

/// Whether a ship can be flown in the game today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductionStatus {
    FlightReady,
    NotReady,
}

impl ProductionStatus {
    /// Only the exact `flight-ready` status is flight ready, every other upstream value is not
    pub fn from_upstream(status: Option<&str>) -> Self {
        match status {
            Some("flight-ready") => Self::FlightReady,
            _ => Self::NotReady,
        }
    }
}

/// Size class of a ship
///
/// `Vehicle` is not a ship matrix size, it tags ground vehicles added to the catalog by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipSize {
    Vehicle,
    Snub,
    Small,
    Medium,
    Large,
    Capital,
    Unknown,
}

impl ShipSize {
    pub fn from_upstream(size: Option<&str>) -> Self {
        match size.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("vehicle") => Self::Vehicle,
            Some("snub") => Self::Snub,
            Some("small") => Self::Small,
            Some("medium") => Self::Medium,
            Some("large") => Self::Large,
            Some("capital") => Self::Capital,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Snub => "snub",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Capital => "capital",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ShipSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized entry of the ship catalog
///
/// `min_crew <= max_crew` always holds for records built by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRecord {
    /// Unique within a [`CatalogSnapshot`](crate::CatalogSnapshot)
    pub id: String,
    pub production_status: ProductionStatus,
    pub min_crew: u32,
    pub max_crew: u32,
    /// Trimmed display name
    pub name: String,
    pub size: ShipSize,
    pub cargo_capacity: u32,
    pub pledge_url: String,
    pub media_url: Option<String>,
    pub media_thumb_url: Option<String>,
    pub manufacturer_name: String,
    pub manufacturer_code: String,
    pub chassis_id: String,
    /// Resolved from `chassis_id`, [`UNKNOWN_CHASSIS`] when the id is not referenced
    pub chassis_name: String,
}

impl ShipRecord {
    /// A record with only its id set, the starting point of overrides defined from scratch
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            production_status: ProductionStatus::NotReady,
            min_crew: 0,
            max_crew: 0,
            name: String::new(),
            size: ShipSize::Unknown,
            cargo_capacity: 0,
            pledge_url: String::new(),
            media_url: None,
            media_thumb_url: None,
            manufacturer_name: String::new(),
            manufacturer_code: String::new(),
            chassis_id: String::new(),
            chassis_name: UNKNOWN_CHASSIS.to_string(),
        }
    }

    pub fn is_flight_ready(&self) -> bool {
        self.production_status == ProductionStatus::FlightReady
    }
}
