//! Hand-maintained ships merged on top of the ship matrix.
//!
//! Some ships are missing from the ship matrix (ground vehicles, civilian variants of military
//! ships) and some editions only differ from an official ship by their name and pictures. Each
//! of them is described by a [`ShipOverride`]: an optional base record to duplicate and a
//! [`ShipPatch`] applied on top of it.
use indexmap::IndexMap;
use observability_deps::tracing::{debug, warn};

use crate::{
    CatalogUrls, ProductionStatus, ShipRecord, ShipSize, reference::ChassisNames,
};

/// A URL of an override, resolved against the [`CatalogUrls`] at merge time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRef {
    /// Path on the website serving the ship matrix
    Site(&'static str),
    /// Path on the media CDN of that website
    Media(&'static str),
    /// Used verbatim
    Absolute(&'static str),
}

impl UrlRef {
    pub fn resolve(&self, urls: &CatalogUrls) -> String {
        match self {
            Self::Site(path) => urls.site_url(path),
            Self::Media(path) => urls.media_url(path),
            Self::Absolute(url) => (*url).to_string(),
        }
    }
}

/// Field values replacing those of the base record, `None` keeps the base value
///
/// Setting `chassis_id` also resolves the chassis name again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipPatch {
    pub production_status: Option<ProductionStatus>,
    pub min_crew: Option<u32>,
    pub max_crew: Option<u32>,
    pub name: Option<&'static str>,
    pub size: Option<ShipSize>,
    pub cargo_capacity: Option<u32>,
    pub pledge_url: Option<UrlRef>,
    pub media_url: Option<UrlRef>,
    pub media_thumb_url: Option<UrlRef>,
    pub manufacturer_name: Option<&'static str>,
    pub manufacturer_code: Option<&'static str>,
    pub chassis_id: Option<&'static str>,
}

impl ShipPatch {
    pub const EMPTY: Self = Self {
        production_status: None,
        min_crew: None,
        max_crew: None,
        name: None,
        size: None,
        cargo_capacity: None,
        pledge_url: None,
        media_url: None,
        media_thumb_url: None,
        manufacturer_name: None,
        manufacturer_code: None,
        chassis_id: None,
    };

    pub fn apply(&self, record: &mut ShipRecord, chassis_names: &ChassisNames, urls: &CatalogUrls) {
        if let Some(status) = self.production_status {
            record.production_status = status;
        }
        if let Some(min_crew) = self.min_crew {
            record.min_crew = min_crew;
        }
        if let Some(max_crew) = self.max_crew {
            record.max_crew = max_crew;
        }
        record.max_crew = record.max_crew.max(record.min_crew);
        if let Some(name) = self.name {
            record.name = name.trim().to_string();
        }
        if let Some(size) = self.size {
            record.size = size;
        }
        if let Some(cargo_capacity) = self.cargo_capacity {
            record.cargo_capacity = cargo_capacity;
        }
        if let Some(url) = self.pledge_url {
            record.pledge_url = url.resolve(urls);
        }
        if let Some(url) = self.media_url {
            record.media_url = Some(url.resolve(urls));
        }
        if let Some(url) = self.media_thumb_url {
            record.media_thumb_url = Some(url.resolve(urls));
        }
        if let Some(name) = self.manufacturer_name {
            record.manufacturer_name = name.to_string();
        }
        if let Some(code) = self.manufacturer_code {
            record.manufacturer_code = code.to_string();
        }
        if let Some(chassis_id) = self.chassis_id {
            record.chassis_id = chassis_id.to_string();
            record.chassis_name = chassis_names.name(chassis_id).to_string();
        }
    }
}

/// A ship merged on top of the official catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipOverride {
    /// Id of the resulting record, distinct from every official id
    pub id: &'static str,
    /// Id of the record to duplicate, `None` to start from a blank record
    pub base: Option<&'static str>,
    pub patch: ShipPatch,
}

impl ShipOverride {
    /// Build the record of this override, `None` if its base is not in `merged`
    pub fn build(
        &self,
        merged: &IndexMap<String, ShipRecord>,
        chassis_names: &ChassisNames,
        urls: &CatalogUrls,
    ) -> Option<ShipRecord> {
        let mut record = match self.base {
            None => ShipRecord::blank(self.id),
            Some(base) => ShipRecord {
                id: self.id.to_string(),
                ..merged.get(base)?.clone()
            },
        };
        self.patch.apply(&mut record, chassis_names, urls);
        Some(record)
    }
}

/// Ships missing from, or differing from, the ship matrix
pub static BUILTIN_OVERRIDES: &[ShipOverride] = &[
    // ground vehicle, not part of the ship matrix
    ShipOverride {
        id: "0",
        base: None,
        patch: ShipPatch {
            production_status: Some(ProductionStatus::FlightReady),
            min_crew: Some(1),
            max_crew: Some(2),
            name: Some("Greycat PTV"),
            size: Some(ShipSize::Vehicle),
            pledge_url: Some(UrlRef::Site("/pledge/Standalone-Ships/Greycat-PTV-Buggy")),
            media_url: Some(UrlRef::Site("/media/5rg8z7erquf0wr/source/Buggy.jpg")),
            media_thumb_url: Some(UrlRef::Site("/media/5rg8z7erquf0wr/store_small/Buggy.jpg")),
            manufacturer_name: Some("Greycat Industrial"),
            manufacturer_code: Some("GRIN"),
            chassis_id: Some("0"),
            ..ShipPatch::EMPTY
        },
    },
    ShipOverride {
        id: "1001",
        base: None,
        patch: ShipPatch {
            production_status: Some(ProductionStatus::NotReady),
            min_crew: Some(1),
            max_crew: Some(1),
            name: Some("F8C Lightning Civilian"),
            size: Some(ShipSize::Medium),
            pledge_url: Some(UrlRef::Absolute("https://starcitizen.tools/F8C_Lightning")),
            media_url: Some(UrlRef::Absolute(
                "https://starcitizen.tools/images/8/87/F8C_concierge.jpg",
            )),
            media_thumb_url: Some(UrlRef::Absolute(
                "https://starcitizen.tools/images/8/87/F8C_concierge.jpg",
            )),
            manufacturer_name: Some("Anvil Aerospace"),
            manufacturer_code: Some("ANVL"),
            chassis_id: Some("1001"),
            ..ShipPatch::EMPTY
        },
    },
    ShipOverride {
        id: "1002",
        base: Some("1001"),
        patch: ShipPatch {
            name: Some("F8C Lightning Executive Edition"),
            pledge_url: Some(UrlRef::Absolute(
                "https://starcitizen.tools/F8C_Lightning_Executive_Edition",
            )),
            media_url: Some(UrlRef::Absolute(
                "https://starcitizen.tools/images/1/16/F8C_Lightning_Executive_Edition.jpg",
            )),
            media_thumb_url: Some(UrlRef::Absolute(
                "https://starcitizen.tools/images/1/16/F8C_Lightning_Executive_Edition.jpg",
            )),
            ..ShipPatch::EMPTY
        },
    },
    ShipOverride {
        id: "1070",
        base: None,
        patch: ShipPatch {
            production_status: Some(ProductionStatus::FlightReady),
            min_crew: Some(1),
            max_crew: Some(1),
            name: Some("Mustang Omega : AMD Edition"),
            size: Some(ShipSize::Small),
            pledge_url: Some(UrlRef::Site("/pledge/ships/mustang/Mustang-Omega")),
            media_url: Some(UrlRef::Site("/media/gmru9y7ynd1bbr/source/Omega-Front.jpg")),
            media_thumb_url: Some(UrlRef::Site(
                "/media/gmru9y7ynd1bbr/store_small/Omega-Front.jpg",
            )),
            manufacturer_name: Some("Consolidated Outland"),
            manufacturer_code: Some("CNOU"),
            chassis_id: Some("16"),
            ..ShipPatch::EMPTY
        },
    },
    ShipOverride {
        id: "1062",
        base: Some("62"),
        patch: ShipPatch {
            name: Some("Carrack with Pisces Expedition"),
            pledge_url: Some(UrlRef::Site(
                "/pledge/Standalone-Ships/Anvil-Carrack-IAE-2949",
            )),
            media_url: Some(UrlRef::Media("/g7dx300udpe1v/source.jpg")),
            media_thumb_url: Some(UrlRef::Media("/g7dx300udpe1v/store_small.jpg")),
            ..ShipPatch::EMPTY
        },
    },
];

/// Merge `overrides` on top of the official records
///
/// Overrides are applied in order after every official record; an override whose id is already
/// taken replaces that record in place. A duplicating override sees the official records and
/// every override before it.
pub fn merge_overrides(
    officials: IndexMap<String, ShipRecord>,
    overrides: &[ShipOverride],
    chassis_names: &ChassisNames,
    urls: &CatalogUrls,
) -> IndexMap<String, ShipRecord> {
    let mut merged = officials;
    for ship_override in overrides {
        let Some(record) = ship_override.build(&merged, chassis_names, urls) else {
            warn!(
                id = ship_override.id,
                base = ?ship_override.base,
                "base ship of override not found in catalog, skipping override"
            );
            continue;
        };
        if merged.contains_key(&record.id) {
            debug!(id = %record.id, "override replaces an existing ship");
        }
        merged.insert(record.id.clone(), record);
    }
    merged
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use pretty_assertions::assert_eq;

    use super::*;

    fn carrack() -> ShipRecord {
        ShipRecord {
            production_status: ProductionStatus::FlightReady,
            min_crew: 4,
            max_crew: 6,
            name: "Carrack".to_string(),
            size: ShipSize::Large,
            cargo_capacity: 456,
            pledge_url: "https://robertsspaceindustries.com/pledge/ships/carrack".to_string(),
            media_url: Some("https://robertsspaceindustries.com/media/carrack.jpg".to_string()),
            media_thumb_url: None,
            manufacturer_name: "Anvil Aerospace".to_string(),
            manufacturer_code: "ANVL".to_string(),
            chassis_id: "31".to_string(),
            chassis_name: "Carrack".to_string(),
            ..ShipRecord::blank("62")
        }
    }

    fn officials() -> IndexMap<String, ShipRecord> {
        let aurora = ShipRecord {
            name: "Aurora MR".to_string(),
            chassis_id: "5".to_string(),
            ..ShipRecord::blank("24")
        };
        [aurora, carrack()]
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect()
    }

    fn chassis_names() -> ChassisNames {
        ChassisNames::new(HashMap::from([
            (16, "Mustang".to_string()),
            (31, "Carrack".to_string()),
        ]))
    }

    #[test]
    fn builtin_override_ids_are_unique() {
        let ids: HashSet<_> = BUILTIN_OVERRIDES.iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), BUILTIN_OVERRIDES.len());
    }

    #[test]
    fn builtin_overrides_merge() {
        let officials = officials();
        for o in BUILTIN_OVERRIDES {
            assert!(!officials.contains_key(o.id), "override {} is official", o.id);
        }

        let merged = merge_overrides(
            officials,
            BUILTIN_OVERRIDES,
            &chassis_names(),
            &CatalogUrls::defaults(),
        );

        let ids: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(ids, ["24", "62", "0", "1001", "1002", "1070", "1062"]);

        let ptv = &merged["0"];
        assert_eq!(ptv.name, "Greycat PTV");
        assert_eq!(ptv.size, ShipSize::Vehicle);
        assert_eq!((ptv.min_crew, ptv.max_crew), (1, 2));
        assert_eq!(
            ptv.pledge_url,
            "https://robertsspaceindustries.com/pledge/Standalone-Ships/Greycat-PTV-Buggy"
        );
        assert_eq!(ptv.chassis_name, crate::UNKNOWN_CHASSIS);

        let mustang = &merged["1070"];
        assert_eq!(mustang.chassis_name, "Mustang");
    }

    #[test]
    fn duplicated_records_are_independent() {
        let merged = merge_overrides(
            officials(),
            BUILTIN_OVERRIDES,
            &chassis_names(),
            &CatalogUrls::defaults(),
        );

        // the official record is untouched
        assert_eq!(merged["62"], carrack());

        let expedition = &merged["1062"];
        assert_eq!(expedition.name, "Carrack with Pisces Expedition");
        assert_eq!(
            expedition.media_thumb_url.as_deref(),
            Some("https://media.robertsspaceindustries.com/g7dx300udpe1v/store_small.jpg")
        );
        // inherited from the base record
        assert_eq!((expedition.min_crew, expedition.max_crew), (4, 6));
        assert_eq!(expedition.cargo_capacity, 456);
        assert_eq!(expedition.chassis_id, "31");

        let executive = &merged["1002"];
        assert_eq!(executive.manufacturer_code, "ANVL");
        assert_eq!(executive.size, ShipSize::Medium);
        assert_eq!(merged["1001"].name, "F8C Lightning Civilian");
    }

    #[test]
    fn override_with_missing_base_is_skipped() {
        let mut officials = officials();
        officials.shift_remove("62");

        let merged = merge_overrides(
            officials,
            BUILTIN_OVERRIDES,
            &chassis_names(),
            &CatalogUrls::defaults(),
        );
        assert!(!merged.contains_key("1062"));
        assert!(merged.contains_key("1002"));
    }

    #[test]
    fn last_override_wins() {
        let overrides = [
            ShipOverride {
                id: "24",
                base: Some("24"),
                patch: ShipPatch {
                    name: Some("Aurora MR Patched"),
                    ..ShipPatch::EMPTY
                },
            },
            ShipOverride {
                id: "900",
                base: None,
                patch: ShipPatch {
                    name: Some("First"),
                    ..ShipPatch::EMPTY
                },
            },
            ShipOverride {
                id: "900",
                base: None,
                patch: ShipPatch {
                    name: Some("Second"),
                    ..ShipPatch::EMPTY
                },
            },
        ];

        let merged = merge_overrides(
            officials(),
            &overrides,
            &ChassisNames::default(),
            &CatalogUrls::defaults(),
        );

        let ids: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(ids, ["24", "62", "900"]);
        assert_eq!(merged["24"].name, "Aurora MR Patched");
        assert_eq!(merged["24"].chassis_id, "5");
        assert_eq!(merged["900"].name, "Second");
    }
}
