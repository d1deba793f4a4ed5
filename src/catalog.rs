//! Catalog contract

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a catalog source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The backing store could not answer the query. Callers should surface a
    /// "failed to load reports" notice and keep their prior list rather than
    /// treating this as fatal.
    #[error("catalog unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause, suitable for a log line.
        reason: String,
    },
}

/// A purchasable research report as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Catalog id, unique across reports.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Author or publishing desk.
    pub author: String,

    /// Short abstract shown on listing cards.
    pub description: String,

    /// Purchase price.
    pub price: Decimal,

    /// Average review rating, 0 to 5.
    pub rating: Decimal,

    /// Optional cover thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Category name used for exact-match filtering.
    pub category: String,

    /// Publication timestamp; the backing store does not always supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,

    /// Review count; absent for reports the store has no review data for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

/// Server-side filters accepted by [`CatalogSource::list_reports`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    /// Free-text query over title, author and description.
    pub query: Option<String>,

    /// Exact category name.
    pub category: Option<String>,
}

/// The hosted backend's query surface, treated as an opaque collaborator.
///
/// The crate ships only this contract plus a fixture-backed implementation;
/// the real client lives outside the core.
pub trait CatalogSource {
    /// List reports matching the given filters.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Unavailable`]: the backing store could not answer.
    fn list_reports(&self, filters: &CatalogFilters) -> Result<Vec<Report>, CatalogError>;

    /// List the distinct category names in the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Unavailable`]: the backing store could not answer.
    fn list_categories(&self) -> Result<Vec<String>, CatalogError>;
}
