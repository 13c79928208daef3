//! CLI config for the upstream ship matrix.
use std::time::Duration;

use fleet_catalog::{CatalogUrls, DEFAULT_MEDIA_URL, DEFAULT_SITE_URL};
use fleet_ship_matrix::Client;
use observability_deps::tracing::info;
use snafu::{ResultExt, Snafu};
use url::Url;

#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum ParseError {
    #[snafu(display("Unable to create the ship matrix client for {}: {}", url, source))]
    CreateClient {
        url: Url,
        source: fleet_ship_matrix::Error,
    },
}

/// CLI config for the ship matrix and the catalog built from it
#[derive(Debug, Clone, clap::Parser)]
pub struct CatalogSourceConfig {
    /// Base URL of the website serving the ship matrix.
    ///
    /// The catalog is fetched from `<url>/ship-matrix/index`, and relative pledge and media
    /// paths found in it are resolved against this URL.
    #[clap(
        long = "ship-matrix-url",
        env = "FLEET_SHIP_MATRIX_URL",
        default_value = DEFAULT_SITE_URL,
        action
    )]
    pub ship_matrix_url: Url,

    /// Base URL of the media CDN, used by the built-in ships missing from the ship matrix.
    #[clap(
        long = "media-url",
        env = "FLEET_MEDIA_URL",
        default_value = DEFAULT_MEDIA_URL,
        action
    )]
    pub media_url: Url,

    /// Abort a ship matrix request taking longer than this.
    #[clap(
        long = "ship-matrix-timeout",
        env = "FLEET_SHIP_MATRIX_TIMEOUT",
        default_value = "30s",
        value_parser = humantime::parse_duration,
        action
    )]
    pub ship_matrix_timeout: Duration,

    /// How long a scraped catalog is served before the ship matrix is fetched again.
    #[clap(
        long = "catalog-ttl",
        env = "FLEET_CATALOG_TTL",
        default_value = "3d",
        value_parser = humantime::parse_duration,
        action
    )]
    pub catalog_ttl: Duration,
}

impl CatalogSourceConfig {
    /// Create the ship matrix client
    pub fn make_client(&self) -> Result<Client, ParseError> {
        let client = Client::new(self.ship_matrix_url.clone())
            .context(CreateClientSnafu {
                url: self.ship_matrix_url.clone(),
            })?
            .with_timeout(self.ship_matrix_timeout);
        info!(
            url = %self.ship_matrix_url,
            timeout = ?self.ship_matrix_timeout,
            "Ship matrix"
        );
        Ok(client)
    }

    pub fn catalog_urls(&self) -> CatalogUrls {
        CatalogUrls::new(self.ship_matrix_url.clone(), self.media_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults() {
        let config = CatalogSourceConfig::try_parse_from(["fleet"]).unwrap();
        assert_eq!(config.ship_matrix_url.as_str(), "https://robertsspaceindustries.com/");
        assert_eq!(config.ship_matrix_timeout, Duration::from_secs(30));
        assert_eq!(config.catalog_ttl, Duration::from_secs(3 * 24 * 60 * 60));
        assert_eq!(
            config.catalog_urls(),
            CatalogUrls::parse(DEFAULT_SITE_URL, DEFAULT_MEDIA_URL).unwrap()
        );

        let client = config.make_client().unwrap();
        assert_eq!(
            client.ship_matrix_url().unwrap().as_str(),
            "https://robertsspaceindustries.com/ship-matrix/index"
        );
    }

    #[test]
    fn overrides() {
        let config = CatalogSourceConfig::try_parse_from([
            "fleet",
            "--ship-matrix-url",
            "http://localhost:8080",
            "--media-url",
            "http://localhost:8081",
            "--ship-matrix-timeout",
            "2s",
            "--catalog-ttl",
            "1h 30m",
        ])
        .unwrap();
        assert_eq!(config.ship_matrix_timeout, Duration::from_secs(2));
        assert_eq!(config.catalog_ttl, Duration::from_secs(90 * 60));
        assert_eq!(
            config.catalog_urls().media_url("/x.jpg"),
            "http://localhost:8081/x.jpg"
        );
    }

    #[test]
    fn invalid_url() {
        let err = CatalogSourceConfig::try_parse_from(["fleet", "--ship-matrix-url", "not a url"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
