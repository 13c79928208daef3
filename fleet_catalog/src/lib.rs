//! The ship catalog: the authoritative list of ships, scraped from the ship matrix, patched with
//! a hand-maintained set of [overrides], cached with a time-to-live and indexed for lookups.
//!
//! The entry point is [`ShipCatalogService`]. Lookups are served from an immutable
//! [`CatalogSnapshot`] which is replaced as a whole on each refresh.
pub mod cache;
mod normalize;
pub mod overrides;
mod record;
pub mod reference;
mod service;
mod snapshot;
mod source;

pub use normalize::{CatalogUrls, DEFAULT_MEDIA_URL, DEFAULT_SITE_URL, complete_url, ship_record};
pub use record::{ProductionStatus, ShipRecord, ShipSize, UNKNOWN_CHASSIS};
pub use service::{ShipCatalogService, ShipCatalogServiceArgs};
pub use snapshot::CatalogSnapshot;
pub use source::ShipMatrixSource;

/// Key of the catalog in the [`CatalogCache`](cache::CatalogCache)
pub const SHIP_MATRIX_CACHE_KEY: &str = "ship_matrix";

/// Failure to obtain a new catalog from the upstream ship matrix
///
/// This is the only error raised by the catalog. A failed refresh never publishes a partial
/// snapshot.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to fetch the ship matrix from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: fleet_ship_matrix::Error,
    },

    #[error("failed to decode the ship matrix from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: fleet_ship_matrix::Error,
    },

    #[error("the ship matrix from {url} is unsuccessful (success flag: {success:?})")]
    Unsuccessful { url: String, success: Option<bool> },

    #[error("cannot resolve the chassis of the ship matrix from {url}: {source}")]
    ChassisNames {
        url: String,
        #[source]
        source: reference::ReferenceError,
    },
}

impl UpstreamError {
    /// Classify a client error raised while fetching `url`
    pub fn from_client(url: impl Into<String>, source: fleet_ship_matrix::Error) -> Self {
        let url = url.into();
        if source.is_decode() {
            Self::Decode { url, source }
        } else {
            Self::Transport { url, source }
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Decode { url, .. }
            | Self::Unsuccessful { url, .. }
            | Self::ChassisNames { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use fleet_ship_matrix::StatusCode;

    use super::*;

    #[test]
    fn classify_client_errors() {
        let decode = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = UpstreamError::from_client("http://x", fleet_ship_matrix::Error::Json(decode));
        assert!(matches!(err, UpstreamError::Decode { .. }));

        let err = UpstreamError::from_client(
            "http://x",
            fleet_ship_matrix::Error::ApiError {
                code: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::new(),
            },
        );
        assert!(matches!(err, UpstreamError::Transport { .. }));
        assert_eq!(err.url(), "http://x");
    }
}
