//! Error classification for the calculation pipeline.
//!
//! Core failures bubble up typed; infrastructure failures from collaborators
//! (geocoder outages, storage trouble) are flattened to generic messages so
//! connection strings, timeouts, and provider internals never reach clients.

use crate::geocoder::GeocodeError;
use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Which of the two input addresses an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Source,
    Destination,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressField::Source => f.write_str("source"),
            AddressField::Destination => f.write_str("destination"),
        }
    }
}

/// Errors from the distance calculation pipeline.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An input address failed the validation gate
    #[error("{field} address is invalid or empty")]
    RejectedAddress { field: AddressField },

    /// An input address could not be reduced to a safe form
    #[error("{field} address could not be sanitized: {source}")]
    Sanitization {
        field: AddressField,
        source: courier_sanitize::SanitizeError,
    },

    /// The geocoder found no match for an address
    #[error("failed to geocode {field} address '{address}': address not found")]
    AddressNotFound {
        field: AddressField,
        address: String,
    },

    /// The geocoding provider failed for infrastructure reasons
    #[error("geocoding service is temporarily unavailable")]
    GeocoderUnavailable {
        #[source]
        source: GeocodeError,
    },

    /// Distance math rejected the geocoded coordinates
    #[error("distance calculation failed: {0}")]
    Calculation(#[from] courier_geo::GeoError),

    /// The history store rejected the operation
    #[error("query storage is temporarily unavailable")]
    Storage {
        #[source]
        source: StoreError,
    },

    /// Out-of-range paging or sort parameters for a history query
    #[error("invalid history parameters: {0}")]
    InvalidHistoryParams(String),
}
