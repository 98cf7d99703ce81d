//! The query engine filters, groups and ranks the listings in a [`Dataset`].
//!
//! All operations are pure functions of the dataset and their arguments: nothing is cached and
//! the dataset is only ever borrowed immutably. Empty results are returned as empty vectors
//! rather than errors.
use crate::dataset::Dataset;
use crate::listing::{Listing, Month, Region};
use derive_more::{Display, Error};
use indexmap::IndexMap;
use log::debug;
use std::cmp::Ordering;
use std::hash::Hash;

pub mod request;
pub use request::{Aggregation, Query, QueryResult};

/// The lowest price which can be searched for
pub const PRICE_FLOOR: f64 = 0.0;

/// The highest price which can be searched for
pub const PRICE_CEILING: f64 = 1500.0;

/// Indicates that a query was rejected before it was run
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum QueryError {
    /// A region or month name which is not one of the known values
    #[display("Invalid {kind}: {value}")]
    InvalidEnum {
        /// What kind of value this was (e.g. "region")
        kind: &'static str,
        /// The value supplied
        value: String,
    },
    /// A price range which is inverted or falls outside the searchable range
    #[display("Invalid price range: {min} to {max} (prices must be between 0 and 1500)")]
    InvalidRange {
        /// The lower bound supplied
        min: f64,
        /// The upper bound supplied
        max: f64,
    },
}

/// An inclusive range of nightly prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// Create a new price range, checking `min <= max` and both lie in the searchable range
    pub fn new(min: f64, max: f64) -> Result<Self, QueryError> {
        let valid = |price: f64| (PRICE_FLOOR..=PRICE_CEILING).contains(&price);
        if valid(min) && valid(max) && min <= max {
            Ok(Self { min, max })
        } else {
            Err(QueryError::InvalidRange { min, max })
        }
    }

    /// The lower bound
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The upper bound
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the price lies within the range, including both ends
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    /// The range initially offered by the search page
    fn default() -> Self {
        Self {
            min: 200.0,
            max: 500.0,
        }
    }
}

/// The mean nightly price of the listings in one group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMean<K> {
    /// The value of the grouping field(s)
    pub key: K,
    /// Arithmetic mean of `price_per_night` over the group
    pub mean_price: f64,
    /// The number of listings in the group
    pub count: usize,
}

/// Mean price per region
pub type RegionMean = GroupMean<Region>;

/// Mean price per month
pub type MonthMean = GroupMean<Month>;

/// Mean price per region and month
pub type RegionMonthMean = GroupMean<(Region, Month)>;

/// A field (or combination of fields) which listings can be grouped by
pub trait GroupKey: Copy + Eq + Hash + Ord {
    /// Get the key for the given listing
    fn of(listing: &Listing) -> Self;

    /// Put the groups into their display order
    fn order(groups: &mut [GroupMean<Self>]) {
        groups.sort_by_key(|group| group.key);
    }
}

impl GroupKey for Region {
    fn of(listing: &Listing) -> Self {
        listing.region
    }

    /// Regions are ranked by descending mean price
    fn order(groups: &mut [GroupMean<Self>]) {
        groups.sort_by(|a, b| {
            b.mean_price
                .total_cmp(&a.mean_price)
                .then(a.key.cmp(&b.key))
        });
    }
}

impl GroupKey for Month {
    fn of(listing: &Listing) -> Self {
        listing.month
    }
}

impl GroupKey for (Region, Month) {
    fn of(listing: &Listing) -> Self {
        (listing.region, listing.month)
    }
}

/// Group listings by `K` and compute the mean price of each group.
///
/// Only groups with at least one listing are returned. They are ordered according to
/// [`GroupKey::order`].
pub fn average_price_by<'a, K, I>(listings: I) -> Vec<GroupMean<K>>
where
    K: GroupKey,
    I: IntoIterator<Item = &'a Listing>,
{
    let mut totals: IndexMap<K, (f64, usize)> = IndexMap::new();
    for listing in listings {
        let (sum, count) = totals.entry(K::of(listing)).or_default();
        *sum += listing.price_per_night;
        *count += 1;
    }

    let mut groups: Vec<_> = totals
        .into_iter()
        .map(|(key, (sum, count))| GroupMean {
            key,
            mean_price: sum / count as f64,
            count,
        })
        .collect();
    K::order(&mut groups);

    groups
}

/// Mean price per region for the given listings, most expensive first
pub fn average_price_by_region<'a, I>(listings: I) -> Vec<RegionMean>
where
    I: IntoIterator<Item = &'a Listing>,
{
    average_price_by(listings)
}

/// Mean price per month for the given listings, in collection order
pub fn average_price_by_month<'a, I>(listings: I) -> Vec<MonthMean>
where
    I: IntoIterator<Item = &'a Listing>,
{
    average_price_by(listings)
}

/// Sort listings by descending rating, then by descending number of reviews.
///
/// The sort is stable, so listings which tie on both keep their relative order. Ratings which
/// compare equal (including `0.0` and `-0.0`) are treated as a tie.
pub fn sort_by_rating(listings: &mut [&Listing]) {
    listings.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.review_count.cmp(&a.review_count))
    });
}

/// Runs queries against a borrowed [`Dataset`]
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> QueryEngine<'a> {
    /// Create a query engine for the given dataset
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// The dataset being queried
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Listings satisfying the predicate, in dataset order
    fn select<P>(&self, predicate: P) -> Vec<&'a Listing>
    where
        P: Fn(&Listing) -> bool,
    {
        self.dataset
            .listings()
            .iter()
            .filter(|&listing| predicate(listing))
            .collect()
    }

    /// Find listings in a region and month within a price range, best rated first.
    ///
    /// All matching listings are returned; callers wanting a top-N view should truncate.
    pub fn search(
        &self,
        region: Region,
        month: Month,
        price_range: PriceRange,
    ) -> Vec<&'a Listing> {
        let mut listings = self.select(|listing| {
            listing.region == region
                && listing.month == month
                && price_range.contains(listing.price_per_night)
        });
        sort_by_rating(&mut listings);
        debug!(
            "Search for {region} in {month} ({} to {}) matched {} listings",
            price_range.min(),
            price_range.max(),
            listings.len()
        );

        listings
    }

    /// Mean price grouped by `K` over the whole dataset
    pub fn average_by<K: GroupKey>(&self) -> Vec<GroupMean<K>> {
        average_price_by(self.dataset.listings())
    }

    /// Mean price per region over the whole dataset, most expensive first
    pub fn average_by_region(&self) -> Vec<RegionMean> {
        self.average_by()
    }

    /// Mean price per month over the whole dataset, in collection order
    pub fn average_by_month(&self) -> Vec<MonthMean> {
        self.average_by()
    }

    /// Mean price per region for a single month, most expensive first
    pub fn average_by_region_for_month(&self, month: Month) -> Vec<RegionMean> {
        average_price_by(self.select(|listing| listing.month == month))
    }

    /// Mean price per month over the given regions combined, in collection order
    pub fn average_by_month_for_regions(&self, regions: &[Region]) -> Vec<MonthMean> {
        average_price_by(self.select(|listing| regions.contains(&listing.region)))
    }

    /// Mean price per region and month for the given regions.
    ///
    /// Ordered by region, then by month in collection order.
    pub fn average_by_region_and_month(&self, regions: &[Region]) -> Vec<RegionMonthMean> {
        average_price_by(self.select(|listing| regions.contains(&listing.region)))
    }

    /// All listings for any of the given months, in dataset order
    pub fn filter_by_months(&self, months: &[Month]) -> Vec<&'a Listing> {
        self.select(|listing| months.contains(&listing.month))
    }

    /// All listings for any of the given regions in a single month, in dataset order
    pub fn filter_by_regions_and_month(
        &self,
        regions: &[Region],
        month: Month,
    ) -> Vec<&'a Listing> {
        self.select(|listing| listing.month == month && regions.contains(&listing.region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_query_error, dataset, listing};
    use float_cmp::assert_approx_eq;
    use map_macro::hash_set;
    use rstest::rstest;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn prices(listings: &[&Listing]) -> Vec<f64> {
        listings.iter().map(|l| l.price_per_night).collect()
    }

    #[rstest]
    #[case(0.0, 1500.0)]
    #[case(200.0, 200.0)]
    #[case(1500.0, 1500.0)]
    fn test_price_range_valid(#[case] min: f64, #[case] max: f64) {
        let range = PriceRange::new(min, max).unwrap();
        assert!(range.contains(min));
        assert!(range.contains(max));
    }

    #[rstest]
    #[case(500.0, 200.0)]
    #[case(-1.0, 200.0)]
    #[case(0.0, 1500.5)]
    #[case(2000.0, 3000.0)]
    #[case(f64::NAN, 100.0)]
    fn test_price_range_invalid(#[case] min: f64, #[case] max: f64) {
        assert!(matches!(
            PriceRange::new(min, max),
            Err(QueryError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_price_range_error_message() {
        assert_query_error!(
            PriceRange::new(500.0, 200.0),
            "Invalid price range: 500 to 200 (prices must be between 0 and 1500)"
        );
    }

    #[test]
    fn test_search_review_count_tiebreak() {
        let dataset = Dataset::new(vec![
            listing(Region::Cataluna, Month::Julio, 300.0, 4.5, 10),
            listing(Region::Cataluna, Month::Julio, 100.0, 4.5, 20),
        ])
        .unwrap();
        let engine = QueryEngine::new(&dataset);

        let range = PriceRange::new(PRICE_FLOOR, PRICE_CEILING).unwrap();
        let results = engine.search(Region::Cataluna, Month::Julio, range);
        assert_eq!(prices(&results), [100.0, 300.0]);

        let means = engine.average_by_region();
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].key, Region::Cataluna);
        assert_eq!(means[0].count, 2);
        assert_approx_eq!(f64, means[0].mean_price, 200.0);
    }

    #[test]
    fn test_search_signed_zero_ratings_tie() {
        let dataset = Dataset::new(vec![
            listing(Region::Cataluna, Month::Julio, 100.0, 0.0, 5),
            listing(Region::Cataluna, Month::Julio, 200.0, -0.0, 100),
        ])
        .unwrap();
        let engine = QueryEngine::new(&dataset);

        let range = PriceRange::new(PRICE_FLOOR, PRICE_CEILING).unwrap();
        let results = engine.search(Region::Cataluna, Month::Julio, range);
        assert_eq!(prices(&results), [200.0, 100.0]);
    }

    #[rstest]
    fn test_search_filters_and_sorts(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let range = PriceRange::new(100.0, 300.0).unwrap();
        let results = engine.search(Region::Cataluna, Month::Julio, range);

        // Price bounds are inclusive at both ends
        assert_eq!(prices(&results), [300.0, 100.0, 150.0]);
        for pair in results.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(
                a.rating > b.rating || (a.rating == b.rating && a.review_count >= b.review_count)
            );
        }
    }

    #[rstest]
    fn test_search_is_complete(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let range = PriceRange::new(0.0, 1500.0).unwrap();
        for region in Region::iter() {
            for month in Month::iter() {
                let results = engine.search(region, month, range);
                let expected = dataset
                    .listings()
                    .iter()
                    .filter(|l| l.region == region && l.month == month)
                    .count();
                assert_eq!(results.len(), expected);
                assert!(results.iter().all(|l| l.region == region && l.month == month));
            }
        }
    }

    #[rstest]
    fn test_search_stable_for_ties(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let range = PriceRange::new(0.0, 1500.0).unwrap();
        let results = engine.search(Region::Galicia, Month::Enero, range);
        let names: Vec<_> = results
            .iter()
            .map(|l| l.accommodation_name.as_str())
            .collect();
        assert_eq!(names, ["Galicia 1", "Galicia 2"]);
    }

    #[rstest]
    fn test_search_empty(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let range = PriceRange::new(1400.0, 1500.0).unwrap();
        assert!(engine.search(Region::Andalucia, Month::Enero, range).is_empty());
    }

    #[rstest]
    fn test_average_by_region_ordered_by_price(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let means = engine.average_by_region();
        let keys: Vec<_> = means.iter().map(|g| g.key).collect();
        assert_eq!(keys, [Region::Madrid, Region::Cataluna, Region::Galicia]);
        assert_approx_eq!(f64, means[0].mean_price, 400.0);
        assert_approx_eq!(f64, means[1].mean_price, 150.0);
        assert_approx_eq!(f64, means[2].mean_price, 80.0);
    }

    #[rstest]
    fn test_average_by_month_calendar_order(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let months: Vec<_> = engine.average_by_month().iter().map(|g| g.key).collect();
        assert_eq!(months, [Month::Febrero, Month::Julio, Month::Enero]);
    }

    #[rstest]
    fn test_average_by_region_for_month(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let means = engine.average_by_region_for_month(Month::Febrero);
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].key, Region::Madrid);
        assert_approx_eq!(f64, means[0].mean_price, 400.0);

        assert!(engine.average_by_region_for_month(Month::Mayo).is_empty());
    }

    #[rstest]
    fn test_average_by_month_for_regions(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let means = engine.average_by_month_for_regions(&[Region::Cataluna, Region::Galicia]);
        let keys: Vec<_> = means.iter().map(|g| g.key).collect();
        assert_eq!(keys, [Month::Julio, Month::Enero]);
        assert_approx_eq!(f64, means[1].mean_price, 80.0);

        assert!(engine.average_by_month_for_regions(&[]).is_empty());
    }

    #[rstest]
    fn test_average_by_region_and_month(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let means = engine.average_by_region_and_month(&[Region::Galicia, Region::Madrid]);
        let keys: Vec<_> = means.iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            [
                (Region::Galicia, Month::Enero),
                (Region::Madrid, Month::Febrero),
                (Region::Madrid, Month::Julio)
            ]
        );
    }

    #[rstest]
    fn test_filter_by_months(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let listings = engine.filter_by_months(&[Month::Enero, Month::Febrero]);
        assert_eq!(prices(&listings), [70.0, 90.0, 400.0]);
        assert!(engine.filter_by_months(&[]).is_empty());
    }

    #[rstest]
    fn test_filter_by_regions_and_month(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let listings =
            engine.filter_by_regions_and_month(&[Region::Madrid, Region::Cataluna], Month::Julio);
        assert_eq!(prices(&listings), [100.0, 300.0, 50.0, 150.0, 400.0, 400.0]);

        let regions: HashSet<_> = listings.iter().map(|l| l.region).collect();
        assert_eq!(regions, hash_set! {Region::Madrid, Region::Cataluna});
    }

    #[rstest]
    fn test_queries_are_idempotent(dataset: Dataset) {
        let engine = QueryEngine::new(&dataset);
        let range = PriceRange::default();
        assert_eq!(
            engine.search(Region::Cataluna, Month::Julio, range),
            engine.search(Region::Cataluna, Month::Julio, range)
        );
        assert_eq!(engine.average_by_region(), engine.average_by_region());
        assert_eq!(engine.average_by_month(), engine.average_by_month());
    }

    #[test]
    fn test_average_price_by_empty() {
        assert!(average_price_by_region([]).is_empty());
        assert!(average_price_by_month([]).is_empty());
    }
}
