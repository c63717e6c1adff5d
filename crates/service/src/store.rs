//! Query history storage.
//!
//! The pipeline persists every successful calculation and serves it back with
//! pagination, search, and sorting. Sort fields are a closed enum so request
//! input can never name an arbitrary column.

use chrono::{DateTime, Utc};
use courier_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::future::Future;
use thiserror::Error;
use tokio::sync::RwLock;

/// Maximum page size for history queries.
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Maximum offset for history queries.
pub const MAX_HISTORY_OFFSET: usize = 10_000;

/// Search terms are truncated to this many characters.
const MAX_SEARCH_LEN: usize = 100;

/// Errors from the storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// A persisted distance calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub id: i64,
    pub source_address: String,
    pub destination_address: String,
    pub source: Coordinate,
    pub destination: Coordinate,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for a new record; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewDistanceRecord {
    pub source_address: String,
    pub destination_address: String,
    pub source: Coordinate,
    pub destination: Coordinate,
    pub distance_km: f64,
}

/// Sortable record fields for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Id,
    DistanceKm,
    SourceAddress,
    DestinationAddress,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Paging, sorting, and search parameters for history queries.
#[derive(Debug, Clone)]
pub struct HistoryParams {
    /// Number of items to return (1..=100)
    pub limit: usize,
    /// Number of items to skip (0..=10000)
    pub offset: usize,
    /// Substring match against either address
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl HistoryParams {
    /// Rejects out-of-range paging values.
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("limit must be a positive integer".to_string());
        }
        if self.limit > MAX_HISTORY_LIMIT {
            return Err(format!("limit cannot exceed {MAX_HISTORY_LIMIT}"));
        }
        if self.offset > MAX_HISTORY_OFFSET {
            return Err(format!("offset cannot exceed {MAX_HISTORY_OFFSET}"));
        }
        Ok(())
    }
}

/// Strips characters with meaning to markup or SQL from a search term and
/// bounds its length. The store matches substrings only, so this is belt
/// and suspenders rather than the primary defense.
pub fn sanitize_search_term(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | ';' | '\\'))
        .take(MAX_SEARCH_LEN)
        .collect()
}

/// One page of history results.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub items: Vec<DistanceRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Append/query capability for calculation records.
pub trait QueryStore: Send + Sync {
    fn append(
        &self,
        record: NewDistanceRecord,
    ) -> impl Future<Output = Result<DistanceRecord, StoreError>> + Send;

    fn history(
        &self,
        params: &HistoryParams,
    ) -> impl Future<Output = Result<HistoryPage, StoreError>> + Send;
}

/// In-memory store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<DistanceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryStore for MemoryStore {
    async fn append(&self, record: NewDistanceRecord) -> Result<DistanceRecord, StoreError> {
        let mut records = self.records.write().await;
        let stored = DistanceRecord {
            id: records.len() as i64 + 1,
            source_address: record.source_address,
            destination_address: record.destination_address,
            source: record.source,
            destination: record.destination,
            distance_km: record.distance_km,
            created_at: Utc::now(),
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn history(&self, params: &HistoryParams) -> Result<HistoryPage, StoreError> {
        let records = self.records.read().await;

        let mut items: Vec<DistanceRecord> = match &params.search {
            Some(term) => {
                let needle = term.to_lowercase();
                records
                    .iter()
                    .filter(|r| {
                        r.source_address.to_lowercase().contains(&needle)
                            || r.destination_address.to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect()
            }
            None => records.clone(),
        };

        items.sort_by(|a, b| {
            let ord = match params.sort_by {
                SortField::Id => a.id.cmp(&b.id),
                SortField::DistanceKm => a
                    .distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(Ordering::Equal),
                SortField::SourceAddress => a.source_address.cmp(&b.source_address),
                SortField::DestinationAddress => {
                    a.destination_address.cmp(&b.destination_address)
                }
            };
            match params.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = items.len();
        let page: Vec<DistanceRecord> = items
            .into_iter()
            .skip(params.offset)
            .take(params.limit)
            .collect();
        let has_more = params.offset + page.len() < total;

        Ok(HistoryPage {
            items: page,
            total,
            limit: params.limit,
            offset: params.offset,
            has_more,
        })
    }
}
