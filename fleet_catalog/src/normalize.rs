//! Conversion of ship matrix entries into [`ShipRecord`]s.
use fleet_ship_matrix::ShipMatrixEntry;
use observability_deps::tracing::debug;
use url::Url;

use crate::{ProductionStatus, ShipRecord, ShipSize, reference::ChassisNames};

/// Default base URL of the website serving the ship matrix
pub const DEFAULT_SITE_URL: &str = "https://robertsspaceindustries.com";

/// Default base URL of the media CDN of that website
pub const DEFAULT_MEDIA_URL: &str = "https://media.robertsspaceindustries.com";

/// Base URLs that relative paths found in the catalog are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogUrls {
    pub site: Url,
    pub media: Url,
}

impl CatalogUrls {
    pub fn new(site: Url, media: Url) -> Self {
        Self { site, media }
    }

    pub fn parse(site: &str, media: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(site)?, Url::parse(media)?))
    }

    #[cfg(test)]
    pub(crate) fn defaults() -> Self {
        Self::parse(DEFAULT_SITE_URL, DEFAULT_MEDIA_URL).unwrap()
    }

    /// Resolve a path against the site base URL, see [`complete_url`]
    pub fn site_url(&self, path: &str) -> String {
        complete_url(&self.site, path)
    }

    /// Resolve a path against the media base URL, see [`complete_url`]
    pub fn media_url(&self, path: &str) -> String {
        complete_url(&self.media, path)
    }
}


/// Prefix `path` with `base` unless it already starts with an HTTP scheme
///
/// The ship matrix mixes absolute URLs and site-relative paths for the same fields.
pub fn complete_url(base: &Url, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http") {
        return path.to_string();
    }
    let base = base.as_str().trim_end_matches('/');
    match path {
        "" => base.to_string(),
        p if p.starts_with('/') => format!("{base}{p}"),
        p => format!("{base}/{p}"),
    }
}

/// Build the normalized record of an upstream entry
pub fn ship_record(
    entry: &ShipMatrixEntry,
    chassis_names: &ChassisNames,
    urls: &CatalogUrls,
) -> ShipRecord {
    let chassis_id = entry.chassis_id.clone().unwrap_or_default();
    let chassis_name = chassis_names.name(&chassis_id).to_string();

    let mut max_crew = entry.max_crew;
    if max_crew < entry.min_crew {
        debug!(
            id = %entry.id,
            min_crew = entry.min_crew,
            max_crew,
            "max crew lower than min crew, raising it"
        );
        max_crew = entry.min_crew;
    }

    // only the first media entry is used
    let media = entry.media.first();
    let media_url = media
        .and_then(|m| m.source_url.as_deref())
        .map(|p| urls.site_url(p));
    let media_thumb_url = media
        .and_then(|m| m.images.as_ref())
        .and_then(|i| i.store_small.as_deref())
        .map(|p| urls.site_url(p));

    ShipRecord {
        id: entry.id.clone(),
        production_status: ProductionStatus::from_upstream(entry.production_status.as_deref()),
        min_crew: entry.min_crew,
        max_crew,
        name: entry.name.trim().to_string(),
        size: ShipSize::from_upstream(entry.size.as_deref()),
        cargo_capacity: entry.cargocapacity,
        pledge_url: urls.site_url(entry.url.as_deref().unwrap_or_default()),
        media_url,
        media_thumb_url,
        manufacturer_name: entry.manufacturer.name.clone().unwrap_or_default(),
        manufacturer_code: entry.manufacturer.code.clone().unwrap_or_default(),
        chassis_id,
        chassis_name,
    }
}
