//! Query value objects, which describe a complete request against the dataset.
use super::{
    GroupKey, GroupMean, MonthMean, PriceRange, QueryEngine, QueryError, RegionMean,
    RegionMonthMean, average_price_by, sort_by_rating,
};
use crate::listing::{Listing, Month, Region};

/// How the selected listings should be summarised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// Return the listings themselves, best rated first
    #[default]
    None,
    /// Mean price per region
    ByRegion,
    /// Mean price per month
    ByMonth,
    /// Mean price per region and month
    ByRegionAndMonth,
}

/// A request for listings matching some criteria.
///
/// Criteria which are `None` don't filter anything out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Only include listings in one of these regions
    pub regions: Option<Vec<Region>>,
    /// Only include listings for one of these months
    pub months: Option<Vec<Month>>,
    /// Only include listings whose price lies in this range
    pub price_range: Option<PriceRange>,
    /// How to summarise the listings
    pub aggregation: Aggregation,
}

impl Query {
    /// A query equivalent to [`QueryEngine::search`], parsed from user input.
    ///
    /// Names and prices are checked here, so invalid input is rejected before the dataset is
    /// touched.
    pub fn search(
        region: &str,
        month: &str,
        price_min: f64,
        price_max: f64,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            regions: Some(vec![region.parse()?]),
            months: Some(vec![month.parse()?]),
            price_range: Some(PriceRange::new(price_min, price_max)?),
            aggregation: Aggregation::None,
        })
    }

    /// Restrict to the given regions
    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = Some(regions);
        self
    }

    /// Restrict to the given months
    pub fn with_months(mut self, months: Vec<Month>) -> Self {
        self.months = Some(months);
        self
    }

    /// Restrict to the given price range
    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = Some(price_range);
        self
    }

    /// Summarise the results with the given aggregation
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Whether the listing satisfies all of the query's criteria
    pub fn matches(&self, listing: &Listing) -> bool {
        self.regions
            .as_ref()
            .is_none_or(|regions| regions.contains(&listing.region))
            && self
                .months
                .as_ref()
                .is_none_or(|months| months.contains(&listing.month))
            && self
                .price_range
                .is_none_or(|range| range.contains(listing.price_per_night))
    }
}

/// The outcome of running a [`Query`]
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<'a> {
    /// Matching listings, best rated first
    Listings(Vec<&'a Listing>),
    /// Mean price per region, most expensive first
    ByRegion(Vec<RegionMean>),
    /// Mean price per month, in collection order
    ByMonth(Vec<MonthMean>),
    /// Mean price per region and month
    ByRegionAndMonth(Vec<RegionMonthMean>),
}

impl QueryResult<'_> {
    /// The number of listings or groups in the result
    pub fn len(&self) -> usize {
        match self {
            Self::Listings(listings) => listings.len(),
            Self::ByRegion(groups) => groups.len(),
            Self::ByMonth(groups) => groups.len(),
            Self::ByRegionAndMonth(groups) => groups.len(),
        }
    }

    /// Whether nothing matched the query
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> QueryEngine<'a> {
    /// Run a query against the dataset
    pub fn execute(&self, query: &Query) -> QueryResult<'a> {
        let mut listings = self.select(|listing| query.matches(listing));

        match query.aggregation {
            Aggregation::None => {
                sort_by_rating(&mut listings);
                QueryResult::Listings(listings)
            }
            Aggregation::ByRegion => QueryResult::ByRegion(aggregate(listings)),
            Aggregation::ByMonth => QueryResult::ByMonth(aggregate(listings)),
            Aggregation::ByRegionAndMonth => QueryResult::ByRegionAndMonth(aggregate(listings)),
        }
    }
}

fn aggregate<K: GroupKey>(listings: Vec<&Listing>) -> Vec<GroupMean<K>> {
    average_price_by(listings)
}
