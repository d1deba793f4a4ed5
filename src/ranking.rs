//! Report filtering and ranking

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::catalog::Report;

/// Weight of the average rating in the trending score.
const RATING_WEIGHT: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Weight of the review count in the trending score.
const REVIEW_WEIGHT: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

/// Upper bound for synthesized review counts.
const ESTIMATED_REVIEWS_CAP: u32 = 500;

/// A report decorated with the fields ranking needs.
///
/// The catalog record stays untouched: a missing publication timestamp is
/// viewed as the Unix epoch (so it sorts as oldest) and a missing review
/// count gets a stable per-id estimate. Both are attached at read time and
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RankableReport {
    report: Report,
    published_at: Timestamp,
    review_count: u32,
}

impl RankableReport {
    /// Decorate a catalog record for ranking.
    pub fn decorate(report: Report) -> Self {
        let published_at = report.published_at.unwrap_or(Timestamp::UNIX_EPOCH);
        let review_count = report
            .review_count
            .unwrap_or_else(|| estimated_review_count(&report.id));

        Self {
            report,
            published_at,
            review_count,
        }
    }

    /// The underlying catalog record.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Publication timestamp, defaulted to the epoch when the catalog has
    /// none.
    pub fn published_at(&self) -> Timestamp {
        self.published_at
    }

    /// Review count, estimated when the catalog has none.
    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    /// Composite trending score: `rating × 0.7 + review_count × 0.3`.
    pub fn trending_score(&self) -> Decimal {
        self.report.rating * RATING_WEIGHT + Decimal::from(self.review_count) * REVIEW_WEIGHT
    }
}

/// Decorate a whole catalog listing.
pub fn decorate_all(reports: impl IntoIterator<Item = Report>) -> Vec<RankableReport> {
    reports.into_iter().map(RankableReport::decorate).collect()
}

/// Stable stand-in review count for reports the store has no review data
/// for, derived from the id so repeated reads agree.
fn estimated_review_count(id: &str) -> u32 {
    let hash = id
        .bytes()
        .fold(0u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(u32::from(byte)));

    hash % ESTIMATED_REVIEWS_CAP
}

/// The named ranking modes of the report list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Descending composite trending score.
    Trending,
    /// Most recently published first; unpublished sorts oldest.
    New,
    /// Descending review count.
    MostReviewed,
}

/// Secondary sort selected independently of the tab.
///
/// When active it is applied after the tab ranking and therefore determines
/// the rendered order outright. That precedence is the storefront's observed
/// behavior and is preserved here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Ascending price.
    PriceLowToHigh,
    /// Descending price.
    PriceHighToLow,
    /// Descending rating.
    Rating,
    /// Most recently published first.
    Newest,
}

/// Category selection for the report list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Match every report.
    All,
    /// Exact match against the report's category.
    Named(String),
}

impl CategoryFilter {
    /// Map the UI's selection string, where `"all"` is the match-everything
    /// sentinel.
    pub fn from_selection(selection: &str) -> Self {
        if selection.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Named(selection.to_owned())
        }
    }

    /// Whether the report passes this filter.
    pub fn matches(&self, report: &Report) -> bool {
        match self {
            Self::All => true,
            Self::Named(category) => report.category == *category,
        }
    }
}

/// Whether the report matches a free-text query.
///
/// Case-insensitive substring match over title, author and description; an
/// empty or whitespace-only query matches everything.
pub fn matches_query(report: &Report, query: &str) -> bool {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return true;
    }

    report.title.to_lowercase().contains(&query)
        || report.author.to_lowercase().contains(&query)
        || report.description.to_lowercase().contains(&query)
}

/// Keep only reports matching the free-text query.
pub fn filter_by_query(reports: Vec<RankableReport>, query: &str) -> Vec<RankableReport> {
    reports
        .into_iter()
        .filter(|rankable| matches_query(rankable.report(), query))
        .collect()
}

/// Keep only reports passing the category filter.
pub fn filter_by_category(
    reports: Vec<RankableReport>,
    filter: &CategoryFilter,
) -> Vec<RankableReport> {
    reports
        .into_iter()
        .filter(|rankable| filter.matches(rankable.report()))
        .collect()
}

/// Order reports by the given tab.
///
/// All sorts are stable: reports that compare equal keep their relative
/// input order.
pub fn rank(mut reports: Vec<RankableReport>, tab: Tab) -> Vec<RankableReport> {
    match tab {
        Tab::Trending => reports.sort_by(|a, b| b.trending_score().cmp(&a.trending_score())),
        Tab::New => reports.sort_by(|a, b| b.published_at().cmp(&a.published_at())),
        Tab::MostReviewed => reports.sort_by(|a, b| b.review_count().cmp(&a.review_count())),
    }

    reports
}

/// Apply a secondary sort.
pub fn sort_by(mut reports: Vec<RankableReport>, order: SortBy) -> Vec<RankableReport> {
    match order {
        SortBy::PriceLowToHigh => {
            reports.sort_by(|a, b| a.report().price.cmp(&b.report().price));
        }
        SortBy::PriceHighToLow => {
            reports.sort_by(|a, b| b.report().price.cmp(&a.report().price));
        }
        SortBy::Rating => reports.sort_by(|a, b| b.report().rating.cmp(&a.report().rating)),
        SortBy::Newest => reports.sort_by(|a, b| b.published_at().cmp(&a.published_at())),
    }

    reports
}

/// Produce the order actually rendered for a tab and optional secondary
/// sort. An active secondary sort supersedes the tab ranking.
pub fn display_order(
    reports: Vec<RankableReport>,
    tab: Tab,
    secondary: Option<SortBy>,
) -> Vec<RankableReport> {
    let ranked = rank(reports, tab);

    match secondary {
        Some(order) => sort_by(ranked, order),
        None => ranked,
    }
}

/// The distinct category names present in a listing, sorted for stable
/// display.
pub fn categories(reports: &[Report]) -> Vec<String> {
    let distinct: FxHashSet<&str> = reports
        .iter()
        .map(|report| report.category.as_str())
        .collect();

    let mut names: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
    names.sort_unstable();

    names
}

#[cfg(test)]
mod tests {
    use crate::fixtures;

    use super::*;

    fn report(id: &str, rating: Decimal, reviews: Option<u32>, published: Option<i64>) -> Report {
        Report {
            id: id.to_owned(),
            title: format!("Report {id}"),
            author: "Insight Desk".to_owned(),
            description: "Quarterly market analysis".to_owned(),
            price: Decimal::new(4999, 2),
            rating,
            thumbnail_url: None,
            category: "markets".to_owned(),
            published_at: published.and_then(|second| Timestamp::from_second(second).ok()),
            review_count: reviews,
        }
    }

    #[test]
    fn decorate_defaults_missing_publication_to_epoch() {
        let rankable = RankableReport::decorate(report("r1", Decimal::new(45, 1), Some(10), None));

        assert_eq!(rankable.published_at(), Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn decorate_estimates_missing_review_count_deterministically() {
        let a = RankableReport::decorate(report("r1", Decimal::new(45, 1), None, None));
        let b = RankableReport::decorate(report("r1", Decimal::new(45, 1), None, None));

        assert_eq!(a.review_count(), b.review_count());
        assert!(a.review_count() < ESTIMATED_REVIEWS_CAP);
    }

    #[test]
    fn trending_score_blends_rating_and_reviews() {
        let rankable = RankableReport::decorate(report("r1", Decimal::new(40, 1), Some(10), None));

        // 4.0 × 0.7 + 10 × 0.3 = 5.8
        assert_eq!(rankable.trending_score(), Decimal::new(58, 1));
    }

    #[test]
    fn trending_rank_is_descending_by_score() {
        let reports = decorate_all([
            report("low", Decimal::new(10, 1), Some(1), None),
            report("high", Decimal::new(50, 1), Some(100), None),
            report("mid", Decimal::new(40, 1), Some(10), None),
        ]);

        let ranked = rank(reports, Tab::Trending);
        let ids: Vec<&str> = ranked.iter().map(|r| r.report().id.as_str()).collect();

        assert_eq!(ids, ["high", "mid", "low"]);
    }

    #[test]
    fn trending_rank_keeps_input_order_on_score_ties() {
        let reports = decorate_all([
            report("first", Decimal::new(40, 1), Some(10), None),
            report("second", Decimal::new(40, 1), Some(10), None),
            report("third", Decimal::new(40, 1), Some(10), None),
        ]);

        let ranked = rank(reports, Tab::Trending);
        let ids: Vec<&str> = ranked.iter().map(|r| r.report().id.as_str()).collect();

        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn new_rank_puts_unpublished_last() {
        let reports = decorate_all([
            report("undated", Decimal::new(40, 1), Some(10), None),
            report("older", Decimal::new(40, 1), Some(10), Some(1_600_000_000)),
            report("newer", Decimal::new(40, 1), Some(10), Some(1_700_000_000)),
        ]);

        let ranked = rank(reports, Tab::New);
        let ids: Vec<&str> = ranked.iter().map(|r| r.report().id.as_str()).collect();

        assert_eq!(ids, ["newer", "older", "undated"]);
    }

    #[test]
    fn most_reviewed_rank_is_non_increasing() {
        let reports = decorate_all([
            report("a", Decimal::new(40, 1), Some(3), None),
            report("b", Decimal::new(40, 1), Some(120), None),
            report("c", Decimal::new(40, 1), Some(45), None),
        ]);

        let ranked = rank(reports, Tab::MostReviewed);
        let counts: Vec<u32> = ranked.iter().map(RankableReport::review_count).collect();

        assert_eq!(counts, [120, 45, 3]);
    }

    #[test]
    fn query_matches_title_author_and_description_case_insensitively() {
        let subject = report("r1", Decimal::new(40, 1), Some(1), None);

        assert!(matches_query(&subject, "REPORT R1"));
        assert!(matches_query(&subject, "insight"));
        assert!(matches_query(&subject, "quarterly"));
        assert!(!matches_query(&subject, "blockchain"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let subject = report("r1", Decimal::new(40, 1), Some(1), None);

        assert!(matches_query(&subject, ""));
        assert!(matches_query(&subject, "   "));
    }

    #[test]
    fn category_all_sentinel_matches_everything() {
        let subject = report("r1", Decimal::new(40, 1), Some(1), None);

        assert!(CategoryFilter::from_selection("all").matches(&subject));
        assert!(CategoryFilter::from_selection("All").matches(&subject));
        assert!(CategoryFilter::from_selection("markets").matches(&subject));
        assert!(!CategoryFilter::from_selection("energy").matches(&subject));
    }

    #[test]
    fn absent_category_filters_to_empty_list() {
        let reports = decorate_all([report("r1", Decimal::new(40, 1), Some(1), None)]);

        let filtered = filter_by_category(reports, &CategoryFilter::from_selection("energy"));

        assert!(filtered.is_empty());
    }

    #[test]
    fn clearing_filters_restores_full_list() {
        let reports = decorate_all(fixtures::sample_reports());
        let full = reports.len();

        let narrowed = filter_by_category(
            filter_by_query(reports.clone(), "nothing matches this"),
            &CategoryFilter::from_selection("missing"),
        );
        assert!(narrowed.is_empty());

        let restored = filter_by_category(
            filter_by_query(reports, ""),
            &CategoryFilter::All,
        );
        assert_eq!(restored.len(), full);
    }

    #[test]
    fn secondary_sort_supersedes_tab_ranking() {
        let mut cheap = report("cheap", Decimal::new(10, 1), Some(1), None);
        cheap.price = Decimal::new(999, 2);
        let mut dear = report("dear", Decimal::new(50, 1), Some(500), None);
        dear.price = Decimal::new(19_999, 2);

        let ordered = display_order(
            decorate_all([dear, cheap]),
            Tab::Trending,
            Some(SortBy::PriceLowToHigh),
        );
        let ids: Vec<&str> = ordered.iter().map(|r| r.report().id.as_str()).collect();

        // Trending would put "dear" first; the price sort wins.
        assert_eq!(ids, ["cheap", "dear"]);
    }

    #[test]
    fn display_order_without_secondary_keeps_tab_ranking() {
        let reports = decorate_all([
            report("low", Decimal::new(10, 1), Some(1), None),
            report("high", Decimal::new(50, 1), Some(100), None),
        ]);

        let ordered = display_order(reports, Tab::Trending, None);
        let ids: Vec<&str> = ordered.iter().map(|r| r.report().id.as_str()).collect();

        assert_eq!(ids, ["high", "low"]);
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let mut a = report("a", Decimal::new(40, 1), Some(1), None);
        a.category = "energy".to_owned();
        let b = report("b", Decimal::new(40, 1), Some(1), None);
        let c = report("c", Decimal::new(40, 1), Some(1), None);

        assert_eq!(categories(&[a, b, c]), ["energy", "markets"]);
    }
}
