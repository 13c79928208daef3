//! Immutable, indexed view of the merged ship catalog.
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShipRecord;

/// The full catalog at a point in time
///
/// Built once per refresh and never mutated afterwards; a refresh builds a new snapshot and
/// swaps it in. Iteration follows insertion order, official records first, then overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    ships: IndexMap<String, ShipRecord>,
    /// Folded name -> position of the first record carrying that name
    by_name: HashMap<String, usize>,
    /// Chassis id -> positions, in iteration order
    by_chassis: HashMap<String, Vec<usize>>,
}

impl CatalogSnapshot {
    /// Build a snapshot from records in iteration order
    ///
    /// A record whose id was already seen replaces the earlier one in place.
    pub fn new(records: impl IntoIterator<Item = ShipRecord>) -> Self {
        let mut ships = IndexMap::new();
        for record in records {
            ships.insert(record.id.clone(), record);
        }
        Self::from_map(ships)
    }

    pub(crate) fn from_map(ships: IndexMap<String, ShipRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(ships.len());
        let mut by_chassis: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, ship) in ships.values().enumerate() {
            by_name.entry(fold_name(&ship.name)).or_insert(pos);
            by_chassis
                .entry(ship.chassis_id.clone())
                .or_default()
                .push(pos);
        }

        Self {
            ships,
            by_name,
            by_chassis,
        }
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Look up a ship by id
    pub fn get(&self, id: &str) -> Option<&ShipRecord> {
        self.ships.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ships.contains_key(id)
    }

    /// Case-insensitive lookup on the trimmed name, the first match in iteration order wins
    pub fn ship_by_name(&self, name: &str) -> Option<&ShipRecord> {
        self.by_name
            .get(&fold_name(name))
            .and_then(|pos| self.ships.get_index(*pos))
            .map(|(_, ship)| ship)
    }

    /// Ships whose chassis id is exactly `chassis_id`, in iteration order
    pub fn ships_by_chassis_id<'a>(
        &'a self,
        chassis_id: &str,
    ) -> impl Iterator<Item = &'a ShipRecord> + use<'a> {
        self.by_chassis
            .get(chassis_id)
            .into_iter()
            .flatten()
            .filter_map(|pos| self.ships.get_index(*pos).map(|(_, ship)| ship))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ships.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipRecord> {
        self.ships.values()
    }
}

fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<'a> IntoIterator for &'a CatalogSnapshot {
    type Item = &'a ShipRecord;
    type IntoIter = indexmap::map::Values<'a, String, ShipRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.ships.values()
    }
}

impl FromIterator<ShipRecord> for CatalogSnapshot {
    fn from_iter<T: IntoIterator<Item = ShipRecord>>(iter: T) -> Self {
        Self::new(iter)
    }
}

// Serialized as the list of records, the indexes are rebuilt on load.
impl Serialize for CatalogSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ships.values())
    }
}

impl<'de> Deserialize<'de> for CatalogSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<ShipRecord>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ship(id: &str, name: &str, chassis_id: &str) -> ShipRecord {
        ShipRecord {
            name: name.to_string(),
            chassis_id: chassis_id.to_string(),
            ..ShipRecord::blank(id)
        }
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new([
            ship("1", "Aurora ES", "1"),
            ship("2", "RSI Constellation", "4"),
            ship("3", "Aurora MR", "1"),
            ship("4", "rsi constellation", "4"),
        ])
    }

    #[test]
    fn get_by_id() {
        let snapshot = snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.get("3").unwrap().name, "Aurora MR");
        assert!(snapshot.get("42").is_none());
        assert!(!snapshot.contains("42"));
    }

    #[test]
    fn name_lookup_is_case_and_whitespace_insensitive() {
        let snapshot = snapshot();
        let a = snapshot.ship_by_name("RSI Constellation").unwrap();
        let b = snapshot.ship_by_name("  rsi constellation ").unwrap();
        assert_eq!(a, b);
        // first in iteration order wins on a tie
        assert_eq!(a.id, "2");
        assert!(snapshot.ship_by_name("Idris").is_none());
    }

    #[test]
    fn chassis_lookup_keeps_iteration_order() {
        let snapshot = snapshot();
        let ids: Vec<_> = snapshot
            .ships_by_chassis_id("1")
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(snapshot.ships_by_chassis_id("99").count(), 0);
    }

    #[test]
    fn later_record_replaces_earlier_one_in_place() {
        let snapshot = CatalogSnapshot::new([
            ship("1", "Aurora ES", "1"),
            ship("2", "Mustang Alpha", "2"),
            ship("1", "Aurora LN", "1"),
        ]);
        let ids: Vec<_> = snapshot.ids().collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(snapshot.get("1").unwrap().name, "Aurora LN");
        assert!(snapshot.ship_by_name("Aurora ES").is_none());
    }

    #[test]
    fn serde() {
        let snapshot = snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let loaded: CatalogSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, loaded);
        assert_eq!(loaded.ship_by_name("aurora mr").unwrap().id, "3");
    }
}
