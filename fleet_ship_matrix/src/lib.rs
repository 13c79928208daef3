//! Client for the ship matrix published by the Roberts Space Industries website.
//!
//! The ship matrix is the upstream source of the ship catalog. It is served as a single JSON
//! document from `GET /ship-matrix/index`, see [`ShipMatrixResponse`] for its shape.
mod wire;

use std::time::Duration;

use reqwest::{IntoUrl, Method, header::USER_AGENT};
use url::Url;

pub use reqwest::StatusCode;
pub use wire::{Manufacturer, Media, MediaImages, ShipMatrixEntry, ShipMatrixResponse};

/// Path of the ship matrix document, relative to the site base URL
pub const SHIP_MATRIX_PATH: &str = "/ship-matrix/index";

const DEFAULT_USER_AGENT: &str = concat!("fleet/", env!("CARGO_PKG_VERSION"));

/// Primary error type for the [`Client`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("base URL error: {0}")]
    BaseUrl(#[source] reqwest::Error),

    #[error("request URL error: {0}")]
    RequestUrl(#[from] url::ParseError),

    #[error("failed to read the response bytes: {0}")]
    Bytes(#[source] reqwest::Error),

    #[error("failed to parse JSON response: {0}")]
    Json(#[source] serde_json::Error),

    #[error("server responded with error [{code}]: {message}")]
    ApiError { code: StatusCode, message: String },

    #[error("failed to send {method} {url} request: {source}")]
    RequestSend {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    fn request_send(method: Method, url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::RequestSend {
            method,
            url: url.into(),
            source,
        }
    }

    /// `true` if the body arrived in full but could not be decoded
    ///
    /// A body cut off while reading it is a transport failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The ship matrix client
///
/// Cheap to clone, the underlying [`reqwest::Client`] shares its connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    /// The base URL of the website serving the ship matrix
    base_url: Url,
    /// Per request timeout, `None` leaves it to the transport defaults
    timeout: Option<Duration>,
    /// Value of the `User-Agent` header sent with each request
    user_agent: String,
    /// A [`reqwest::Client`] for handling HTTP requests
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new [`Client`]
    pub fn new<U: IntoUrl>(base_url: U) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into_url().map_err(Error::BaseUrl)?,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Abort requests that do not complete within `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the `User-Agent` header sent to the upstream site
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The base URL requests are made against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the ship matrix document
    pub fn ship_matrix_url(&self) -> Result<Url> {
        Ok(self.base_url.join(SHIP_MATRIX_PATH)?)
    }

    /// Make a request to `GET /ship-matrix/index`
    ///
    /// Any non-`200` response is reported as [`Error::ApiError`]. The `success` flag of the
    /// payload is NOT checked here, callers decide what an unsuccessful payload means.
    pub async fn ship_matrix_index(&self) -> Result<ShipMatrixResponse> {
        let url = self.ship_matrix_url()?;
        let mut req = self
            .http_client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let resp = req
            .send()
            .await
            .map_err(|src| Error::request_send(Method::GET, SHIP_MATRIX_PATH, src))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::ApiError {
                code: status,
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let bytes = resp.bytes().await.map_err(Error::Bytes)?;
        serde_json::from_slice(&bytes).map_err(Error::Json)
    }
}
