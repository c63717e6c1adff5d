//! Distance calculation pipeline for courier-tools.
//!
//! [`DistanceService`] sequences the full workflow for one address pair:
//!
//! 1. Validate and sanitize both addresses ([`courier_sanitize`])
//! 2. Geocode both concurrently through a pluggable [`Geocoder`]
//! 3. Compute the Haversine distance ([`courier_geo`]), with the
//!    equal-coordinates short-circuit
//! 4. Persist the record through a pluggable [`QueryStore`]
//!
//! The service owns error classification: core failures surface typed, while
//! infrastructure failures from collaborators are flattened into generic
//! messages before they can reach a client.

mod error;
mod geocoder;
mod store;

pub use error::{AddressField, Result, ServiceError};
pub use geocoder::{GeocodeError, GeocodedLocation, Geocoder, NominatimClient};
pub use store::{
    DistanceRecord, HistoryPage, HistoryParams, MAX_HISTORY_LIMIT, MAX_HISTORY_OFFSET,
    MemoryStore, NewDistanceRecord, QueryStore, SortField, SortOrder, StoreError,
    sanitize_search_term,
};

use chrono::{DateTime, Utc};
use courier_geo::{Coordinate, DistanceUnit, calculate_distance};
use courier_sanitize::{sanitize_address, validate_address};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Complete output of one distance calculation.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceCalculation {
    /// Storage id of the persisted record
    pub id: i64,
    pub source_address: String,
    pub destination_address: String,
    pub source: GeocodedLocation,
    pub destination: GeocodedLocation,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
}

/// Orchestrates the calculation pipeline over pluggable geocoding and storage.
pub struct DistanceService<G, S> {
    geocoder: G,
    store: S,
}

impl<G: Geocoder, S: QueryStore> DistanceService<G, S> {
    pub fn new(geocoder: G, store: S) -> Self {
        Self { geocoder, store }
    }

    /// Runs the full pipeline for one address pair.
    #[instrument(skip(self))]
    pub async fn calculate(
        &self,
        source_address: &str,
        destination_address: &str,
    ) -> Result<DistanceCalculation> {
        let clean_source = prepare_address(AddressField::Source, source_address)?;
        let clean_destination = prepare_address(AddressField::Destination, destination_address)?;

        let (source_result, destination_result) = tokio::join!(
            self.geocoder.geocode(&clean_source),
            self.geocoder.geocode(&clean_destination),
        );

        let source = classify_geocode(AddressField::Source, &clean_source, source_result)?;
        let destination = classify_geocode(
            AddressField::Destination,
            &clean_destination,
            destination_result,
        )?;

        let distance_km = calculate_distance(
            source.latitude,
            source.longitude,
            destination.latitude,
            destination.longitude,
            DistanceUnit::Kilometers,
        )?;

        let record = self
            .store
            .append(NewDistanceRecord {
                source_address: clean_source,
                destination_address: clean_destination,
                source: Coordinate::try_new(source.latitude, source.longitude)?,
                destination: Coordinate::try_new(destination.latitude, destination.longitude)?,
                distance_km,
            })
            .await
            .map_err(|source| ServiceError::Storage { source })?;

        info!(distance_km, id = record.id, "distance calculation stored");

        Ok(DistanceCalculation {
            id: record.id,
            source_address: record.source_address,
            destination_address: record.destination_address,
            source,
            destination,
            distance_km,
            created_at: record.created_at,
        })
    }

    /// Serves the paginated, filterable history of stored calculations.
    pub async fn history(&self, params: &HistoryParams) -> Result<HistoryPage> {
        params
            .validate()
            .map_err(ServiceError::InvalidHistoryParams)?;

        let cleaned;
        let params = match &params.search {
            Some(term) => {
                let sanitized = sanitize_search_term(term);
                cleaned = HistoryParams {
                    search: (!sanitized.is_empty()).then_some(sanitized),
                    ..params.clone()
                };
                &cleaned
            }
            None => params,
        };

        self.store
            .history(params)
            .await
            .map_err(|source| ServiceError::Storage { source })
    }
}

/// Gate then salvage: input must pass validation before sanitization runs.
fn prepare_address(field: AddressField, raw: &str) -> Result<String> {
    if !validate_address(raw) {
        return Err(ServiceError::RejectedAddress { field });
    }
    sanitize_address(raw).map_err(|source| ServiceError::Sanitization { field, source })
}

/// Maps a geocoder outcome into the service error taxonomy. Transient
/// provider failures are flattened so their details stay out of responses.
fn classify_geocode(
    field: AddressField,
    address: &str,
    result: std::result::Result<GeocodedLocation, GeocodeError>,
) -> Result<GeocodedLocation> {
    result.map_err(|err| {
        warn!(%field, error = %err, "geocoding failed");
        if err.is_transient() {
            ServiceError::GeocoderUnavailable { source: err }
        } else {
            ServiceError::AddressNotFound {
                field,
                address: address.to_string(),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Geocoder backed by a fixed address table.
    struct StaticGeocoder {
        locations: HashMap<String, (f64, f64)>,
        fail_transient: bool,
    }

    impl StaticGeocoder {
        fn new(entries: &[(&str, f64, f64)]) -> Self {
            Self {
                locations: entries
                    .iter()
                    .map(|(addr, lat, lng)| (addr.to_string(), (*lat, *lng)))
                    .collect(),
                fail_transient: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                locations: HashMap::new(),
                fail_transient: true,
            }
        }
    }

    impl Geocoder for StaticGeocoder {
        async fn geocode(&self, address: &str) -> std::result::Result<GeocodedLocation, GeocodeError> {
            if self.fail_transient {
                return Err(GeocodeError::Status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                ));
            }
            let (lat, lng) = self
                .locations
                .get(address)
                .copied()
                .ok_or_else(|| GeocodeError::NoResults(address.to_string()))?;
            Ok(GeocodedLocation {
                latitude: lat,
                longitude: lng,
                display_name: address.to_string(),
                place_id: Some(1),
                importance: Some(0.5),
                category: None,
                place_type: None,
            })
        }
    }

    fn service(entries: &[(&str, f64, f64)]) -> DistanceService<StaticGeocoder, MemoryStore> {
        DistanceService::new(StaticGeocoder::new(entries), MemoryStore::new())
    }

    #[tokio::test]
    async fn test_full_pipeline_stores_record() {
        let svc = service(&[
            ("Alexanderplatz, Berlin", 52.5219, 13.4132),
            ("Champ de Mars, Paris", 48.8556, 2.2986),
        ]);

        let result = svc
            .calculate("Alexanderplatz, Berlin", "Champ de Mars, Paris")
            .await
            .unwrap();

        assert!((result.distance_km - 880.0).abs() < 10.0, "{}", result.distance_km);
        assert_eq!(result.id, 1);

        let page = svc.history(&HistoryParams::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].distance_km, result.distance_km);
    }

    #[tokio::test]
    async fn test_identical_addresses_give_exact_zero() {
        let svc = service(&[("Alexanderplatz, Berlin", 52.5219, 13.4132)]);

        let result = svc
            .calculate("Alexanderplatz, Berlin", "Alexanderplatz, Berlin")
            .await
            .unwrap();

        assert_eq!(result.distance_km, 0.0);
    }

    #[tokio::test]
    async fn test_rejected_address_names_the_field() {
        let svc = service(&[]);

        let err = svc.calculate("ab", "Champ de Mars, Paris").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::RejectedAddress {
                field: AddressField::Source
            }
        ));

        let err = svc
            .calculate("Alexanderplatz, Berlin", "'; DROP TABLE users; --")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::RejectedAddress {
                field: AddressField::Destination
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_address_maps_to_not_found() {
        let svc = service(&[("Alexanderplatz, Berlin", 52.5219, 13.4132)]);

        let err = svc
            .calculate("Alexanderplatz, Berlin", "Nowhere Special Lane")
            .await
            .unwrap_err();

        match err {
            ServiceError::AddressNotFound { field, address } => {
                assert_eq!(field, AddressField::Destination);
                assert_eq!(address, "Nowhere Special Lane");
            }
            other => panic!("expected AddressNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_outage_flattens_to_unavailable() {
        let svc = DistanceService::new(StaticGeocoder::unavailable(), MemoryStore::new());

        let err = svc
            .calculate("Alexanderplatz, Berlin", "Champ de Mars, Paris")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::GeocoderUnavailable { .. }));
        // The client-facing message carries no provider detail
        assert_eq!(
            err.to_string(),
            "geocoding service is temporarily unavailable"
        );
    }

    #[tokio::test]
    async fn test_address_is_sanitized_before_geocoding_and_storage() {
        // The geocoder only knows the cleaned form of the address
        let svc = service(&[
            ("123 Main St", 40.0, -74.0),
            ("Champ de Mars, Paris", 48.8556, 2.2986),
        ]);

        let result = svc
            .calculate("  123   Main St  ", "Champ de Mars, Paris")
            .await
            .unwrap();

        assert_eq!(result.source_address, "123 Main St");
    }

    #[tokio::test]
    async fn test_history_rejects_bad_params() {
        let svc = service(&[]);
        let err = svc
            .history(&HistoryParams {
                limit: 500,
                ..HistoryParams::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidHistoryParams(_)));
    }

    #[tokio::test]
    async fn test_history_search_is_sanitized() {
        let svc = service(&[
            ("Alexanderplatz, Berlin", 52.5219, 13.4132),
            ("Champ de Mars, Paris", 48.8556, 2.2986),
        ]);
        svc.calculate("Alexanderplatz, Berlin", "Champ de Mars, Paris")
            .await
            .unwrap();

        // Dangerous characters are stripped before the store sees the term
        let page = svc
            .history(&HistoryParams {
                search: Some("<'Berlin;'>".to_string()),
                ..HistoryParams::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }
}
