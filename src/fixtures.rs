//! Sample catalog data for tests and examples

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    catalog::{CatalogError, CatalogFilters, CatalogSource, Report},
    ranking::{CategoryFilter, matches_query},
};

fn report(
    id: &str,
    title: &str,
    author: &str,
    description: &str,
    price_minor: i64,
    rating_tenths: i64,
    category: &str,
    published_second: Option<i64>,
    review_count: Option<u32>,
) -> Report {
    Report {
        id: id.to_owned(),
        title: title.to_owned(),
        author: author.to_owned(),
        description: description.to_owned(),
        price: Decimal::new(price_minor, 2),
        rating: Decimal::new(rating_tenths, 1),
        thumbnail_url: None,
        category: category.to_owned(),
        published_at: published_second.and_then(|second| Timestamp::from_second(second).ok()),
        review_count,
    }
}

/// A small catalog with varied prices, ratings, categories and gaps in the
/// optional fields.
pub fn sample_reports() -> Vec<Report> {
    vec![
        report(
            "rep-fintech-q3",
            "Fintech Quarterly Outlook",
            "Mensa Otabil",
            "Payments, lending and the quarter ahead",
            4999,
            46,
            "fintech",
            Some(1_755_000_000),
            Some(128),
        ),
        report(
            "rep-energy-west",
            "West African Energy Markets",
            "Amina Diallo",
            "Generation capacity and tariff trends",
            12_999,
            49,
            "energy",
            Some(1_752_000_000),
            Some(310),
        ),
        report(
            "rep-agri-2026",
            "Agribusiness 2026",
            "Kwame Mensah",
            "Cocoa, cashew and export logistics",
            7999,
            41,
            "agriculture",
            Some(1_756_000_000),
            Some(54),
        ),
        report(
            "rep-telecom-5g",
            "5G Rollout Tracker",
            "Amina Diallo",
            "Spectrum auctions and coverage maps",
            8999,
            44,
            "telecom",
            None,
            Some(97),
        ),
        report(
            "rep-retail-informal",
            "Informal Retail Census",
            "Mensa Otabil",
            "Market stalls, kiosks and distribution reach",
            5999,
            38,
            "retail",
            Some(1_740_000_000),
            None,
        ),
        report(
            "rep-fintech-momo",
            "Mobile Money Adoption",
            "Kwame Mensah",
            "Wallet growth and agent network economics",
            3999,
            47,
            "fintech",
            None,
            None,
        ),
    ]
}

/// In-memory catalog over [`sample_reports`], applying the same filters the
/// hosted backend would.
#[derive(Debug, Clone)]
pub struct FixtureCatalog {
    reports: Vec<Report>,
}

impl FixtureCatalog {
    /// A catalog over the sample reports.
    pub fn new() -> Self {
        Self {
            reports: sample_reports(),
        }
    }

    /// A catalog over the given reports.
    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self { reports }
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSource for FixtureCatalog {
    fn list_reports(&self, filters: &CatalogFilters) -> Result<Vec<Report>, CatalogError> {
        let category = filters
            .category
            .as_deref()
            .map_or(CategoryFilter::All, CategoryFilter::from_selection);

        let query = filters.query.as_deref().unwrap_or_default();

        Ok(self
            .reports
            .iter()
            .filter(|report| category.matches(report) && matches_query(report, query))
            .cloned()
            .collect())
    }

    fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(crate::ranking::categories(&self.reports))
    }
}
