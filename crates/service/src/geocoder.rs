//! Address resolution against the Nominatim search API.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default Nominatim endpoint.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim requires an identifying User-Agent.
const USER_AGENT_VALUE: &str = "courier-tools/0.3 (https://github.com/courierclub/courier-tools)";

/// Errors from address resolution.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider returned an empty result set
    #[error("no results found for address: {0}")]
    NoResults(String),

    /// The HTTP request itself failed
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("geocoding provider returned status {0}")]
    Status(reqwest::StatusCode),

    /// The provider returned a body we could not interpret
    #[error("malformed geocoding response: {0}")]
    MalformedResponse(String),

    /// The provider returned coordinates outside geographic bounds
    #[error("geocoding provider returned invalid coordinates: {0}")]
    InvalidCoordinates(#[from] courier_geo::GeoError),
}

impl GeocodeError {
    /// True when the failure is infrastructure-flavored rather than "this
    /// address does not exist". Transient failures are reported to clients
    /// with a generic message.
    pub fn is_transient(&self) -> bool {
        !matches!(self, GeocodeError::NoResults(_))
    }
}

/// A resolved address with provider metadata.
///
/// Coordinates are validated and normalized to 7 decimal places before this
/// type is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Formatted address name from the provider
    pub display_name: String,
    pub place_id: Option<i64>,
    /// Result importance score
    pub importance: Option<f64>,
    pub category: Option<String>,
    pub place_type: Option<String>,
}

/// Address resolution capability.
pub trait Geocoder: Send + Sync {
    /// Resolves a sanitized address string to coordinates and metadata.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = std::result::Result<GeocodedLocation, GeocodeError>> + Send;
}

/// Raw Nominatim search hit (`format=jsonv2`). Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
    place_id: Option<i64>,
    importance: Option<f64>,
    category: Option<String>,
    #[serde(rename = "type")]
    place_type: Option<String>,
}

impl SearchHit {
    fn into_location(self) -> Result<GeocodedLocation, GeocodeError> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| GeocodeError::MalformedResponse(format!("bad latitude: {}", self.lat)))?;
        let lon: f64 = self
            .lon
            .parse()
            .map_err(|_| GeocodeError::MalformedResponse(format!("bad longitude: {}", self.lon)))?;

        let (latitude, longitude) = courier_geo::normalize_coordinates(lat, lon)?;

        Ok(GeocodedLocation {
            latitude,
            longitude,
            display_name: self.display_name,
            place_id: self.place_id,
            importance: self.importance,
            category: self.category,
            place_type: self.place_type,
        })
    }
}

/// Nominatim-backed [`Geocoder`] with bounded retry and polite pacing.
///
/// Nominatim's usage policy asks for at most one request per second, so
/// requests through one client are spaced out accordingly. Retries apply only
/// to throttling (429), server errors, and connect/timeout failures; an
/// address that does not exist is not retried.
pub struct NominatimClient {
    inner: reqwest::Client,
    base_url: String,
    max_retries: u32,
    rate_limit_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    /// Creates a client against the public Nominatim endpoint.
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a specific endpoint (self-hosted Nominatim,
    /// or a test server).
    pub fn with_base_url(base_url: &str) -> Result<Self, GeocodeError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_VALUE)
            .build()?;

        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 3,
            rate_limit_delay: Duration::from_secs(1),
            last_request: Mutex::new(None),
        })
    }

    /// Sleeps long enough to keep at least `rate_limit_delay` between
    /// consecutive requests.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.rate_limit_delay {
                tokio::time::sleep(self.rate_limit_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let mut attempt: u32 = 0;

        loop {
            self.pace().await;
            debug!(address, attempt, "geocoding request");

            let result = self
                .inner
                .get(&url)
                .query(&[
                    ("q", address),
                    ("format", "jsonv2"),
                    ("limit", "1"),
                    ("addressdetails", "1"),
                    ("accept-language", "en"),
                ])
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    let hits: Vec<SearchHit> = response.json().await?;
                    let Some(hit) = hits.into_iter().next() else {
                        return Err(GeocodeError::NoResults(address.to_string()));
                    };
                    return hit.into_location();
                }
                Ok(response)
                    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || response.status().is_server_error() =>
                {
                    if attempt >= self.max_retries {
                        return Err(GeocodeError::Status(response.status()));
                    }
                    let backoff = Duration::from_secs(1 << attempt);
                    warn!(
                        status = %response.status(),
                        backoff_secs = backoff.as_secs(),
                        "geocoding provider busy, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Ok(response) => return Err(GeocodeError::Status(response.status())),
                Err(err) if attempt < self.max_retries && (err.is_timeout() || err.is_connect()) => {
                    warn!(error = %err, attempt, "geocoding request failed, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
