//! Views present the results of queries to the user.
//!
//! Each [`View`] corresponds to one page of the dashboard. A view runs the queries it needs
//! against a [`QueryEngine`] and writes the results as tables to a [`Report`].
use crate::listing::{Month, Region};
use crate::output::{Report, Table, format_price};
use crate::query::{PriceRange, QueryEngine};
use anyhow::Result;
use indexmap::IndexMap;
use itertools::Itertools;
use std::io::Write;
use std::iter;
use strum::IntoEnumIterator;

pub mod histogram;
use histogram::PriceHistogram;

/// The number of listings shown by the search page if not otherwise specified
pub const DEFAULT_TOP_N: usize = 20;

/// A page of the dashboard, along with the user's selections for that page
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// A description of the dataset
    Intro,
    /// The best rated listings for a region, month and price range
    Search {
        /// The region to search in
        region: Region,
        /// The month to search in
        month: Month,
        /// The acceptable nightly prices
        price_range: PriceRange,
        /// The maximum number of listings to show
        top: usize,
        /// Also list every listing for the region and month, regardless of price
        all_prices: bool,
    },
    /// Mean prices for every region and every month
    GeneralComparison,
    /// How prices are distributed in each of the given months
    MonthDistribution {
        /// The months to compare
        months: Vec<Month>,
    },
    /// How prices are distributed in each of the given regions, for one month
    RegionDistribution {
        /// The month to compare prices for
        month: Month,
        /// The regions to compare
        regions: Vec<Region>,
    },
    /// Mean price per month for each of the given regions
    TimeSeries {
        /// The regions to compare
        regions: Vec<Region>,
    },
    /// Mean price per region for one month
    Map {
        /// The month to show prices for
        month: Month,
    },
}

impl View {
    /// The name of the page
    pub fn title(&self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Search { .. } => "Search",
            Self::GeneralComparison => "General price comparison",
            Self::MonthDistribution { .. } | Self::RegionDistribution { .. } => {
                "Particular price comparison"
            }
            Self::TimeSeries { .. } => "Time series",
            Self::Map { .. } => "Map",
        }
    }

    /// Run the view's queries and write the results
    pub fn render<W: Write>(&self, engine: &QueryEngine, report: &mut Report<W>) -> Result<()> {
        match self {
            Self::Intro => render_intro(engine, report),
            Self::Search {
                region,
                month,
                price_range,
                top,
                all_prices,
            } => render_search(
                engine,
                report,
                *region,
                *month,
                *price_range,
                *top,
                *all_prices,
            ),
            Self::GeneralComparison => render_general_comparison(engine, report),
            Self::MonthDistribution { months } => {
                render_month_distribution(engine, report, months)
            }
            Self::RegionDistribution { month, regions } => {
                render_region_distribution(engine, report, *month, regions)
            }
            Self::TimeSeries { regions } => render_time_series(engine, report, regions),
            Self::Map { month } => render_map(engine, report, *month),
        }
    }
}

fn render_intro<W: Write>(engine: &QueryEngine, report: &mut Report<W>) -> Result<()> {
    report.message(
        "Prices and ratings of holiday accommodation for six guests across the Spanish \
         autonomous communities, collected month by month over a year. Search for the best \
         rated listings in a region, compare prices between regions and months, and follow \
         how prices change through the year.",
    )?;

    let dataset = engine.dataset();
    let listings = dataset.listings();
    let mean_price = if listings.is_empty() {
        "n/a".to_string()
    } else {
        let total: f64 = listings.iter().map(|l| l.price_per_night).sum();
        format_price(total / listings.len() as f64)
    };

    let mut table = Table::new("Dataset summary", &["Statistic", "Value"]);
    table.push_row(["Listings".to_string(), dataset.len().to_string()]);
    table.push_row(["Regions".to_string(), dataset.regions().len().to_string()]);
    table.push_row(["Months".to_string(), dataset.months().iter().join(", ")]);
    table.push_row(["Mean price (€/night)".to_string(), mean_price]);
    report.table(&table)
}

fn render_search<W: Write>(
    engine: &QueryEngine,
    report: &mut Report<W>,
    region: Region,
    month: Month,
    price_range: PriceRange,
    top: usize,
    all_prices: bool,
) -> Result<()> {
    let listings = engine.search(region, month, price_range);
    if listings.is_empty() {
        report.message("Sorry, there are no listings matching your requirements.")?;
    } else {
        let shown = top.min(listings.len());
        let mut table = Table::new(
            format!(
                "Top {shown} listings in {region} for {month} ({} to {} €/night)",
                format_price(price_range.min()),
                format_price(price_range.max())
            ),
            &["Accommodation", "Price (€/night)", "Discount", "Rating", "Reviews"],
        );
        for listing in listings.iter().take(shown) {
            table.push_row([
                listing.accommodation_name.clone(),
                format_price(listing.price_per_night),
                listing.discount.clone(),
                listing.rating.to_string(),
                listing.review_count.to_string(),
            ]);
        }
        report.table(&table)?;
    }

    if all_prices {
        let mut table = Table::new(
            format!("Rating and price of all listings in {region} for {month}"),
            &["Accommodation", "Rating", "Price (€/night)"],
        );
        for listing in engine.filter_by_regions_and_month(&[region], month) {
            table.push_row([
                listing.accommodation_name.clone(),
                listing.rating.to_string(),
                format_price(listing.price_per_night),
            ]);
        }
        report.table(&table)?;
    }

    Ok(())
}

fn render_general_comparison<W: Write>(
    engine: &QueryEngine,
    report: &mut Report<W>,
) -> Result<()> {
    let mut table = Table::new(
        "Mean price by autonomous community",
        &["Region", "Mean price (€/night)", "Listings"],
    );
    for group in engine.average_by_region() {
        table.push_row([
            group.key.to_string(),
            format_price(group.mean_price),
            group.count.to_string(),
        ]);
    }
    report.table(&table)?;

    let mut table = Table::new(
        "Mean price by month",
        &["Month", "Mean price (€/night)", "Listings"],
    );
    for group in engine.average_by_month() {
        table.push_row([
            group.key.to_string(),
            format_price(group.mean_price),
            group.count.to_string(),
        ]);
    }
    report.table(&table)
}

/// Write a table with one row per price bin and one column of counts per series
fn write_histograms<W, K>(
    report: &mut Report<W>,
    title: String,
    histograms: &IndexMap<K, PriceHistogram>,
) -> Result<()>
where
    W: Write,
    K: ToString,
{
    let mut header = vec!["Price (€/night)".to_string()];
    header.extend(histograms.keys().map(ToString::to_string));
    let mut table = Table::new(title, &header.iter().map(String::as_str).collect_vec());

    for (idx, label) in PriceHistogram::labels().enumerate() {
        let counts = histograms.values().map(|h| h.counts()[idx].to_string());
        table.push_row(iter::once(label).chain(counts));
    }

    report.table(&table)
}

fn render_month_distribution<W: Write>(
    engine: &QueryEngine,
    report: &mut Report<W>,
    months: &[Month],
) -> Result<()> {
    let listings = engine.filter_by_months(months);
    let histograms: IndexMap<_, _> = Month::iter()
        .filter(|month| months.contains(month))
        .map(|month| {
            let histogram = PriceHistogram::from_listings(
                listings.iter().copied().filter(|l| l.month == month),
            );
            (month, histogram)
        })
        .collect();

    if histograms.values().all(|h| h.total() == 0) {
        return report.message("There are no listings for the selected months.");
    }

    write_histograms(report, "Price distribution by month".into(), &histograms)
}

fn render_region_distribution<W: Write>(
    engine: &QueryEngine,
    report: &mut Report<W>,
    month: Month,
    regions: &[Region],
) -> Result<()> {
    let listings = engine.filter_by_regions_and_month(regions, month);
    let histograms: IndexMap<_, _> = Region::iter()
        .filter(|region| regions.contains(region))
        .map(|region| {
            let histogram = PriceHistogram::from_listings(
                listings.iter().copied().filter(|l| l.region == region),
            );
            (region, histogram)
        })
        .collect();

    if histograms.values().all(|h| h.total() == 0) {
        return report.message(&format!(
            "There are no listings for the selected regions in {month}."
        ));
    }

    write_histograms(
        report,
        format!("Price distribution by autonomous community for {month}"),
        &histograms,
    )
}

fn render_time_series<W: Write>(
    engine: &QueryEngine,
    report: &mut Report<W>,
    regions: &[Region],
) -> Result<()> {
    let means: IndexMap<_, _> = engine
        .average_by_region_and_month(regions)
        .into_iter()
        .map(|group| (group.key, group.mean_price))
        .collect();
    if means.is_empty() {
        return report.message("There are no listings for the selected regions.");
    }

    let regions = means.keys().map(|(region, _)| *region).unique().collect_vec();
    let mut header = vec!["Month".to_string()];
    header.extend(regions.iter().map(ToString::to_string));
    let mut table = Table::new(
        "Mean price per month (€/night)",
        &header.iter().map(String::as_str).collect_vec(),
    );
    for month in Month::iter() {
        let cells = regions
            .iter()
            .map(|region| {
                means
                    .get(&(*region, month))
                    .map_or_else(String::new, |mean| format_price(*mean))
            })
            .collect_vec();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        table.push_row(iter::once(month.to_string()).chain(cells));
    }

    report.table(&table)
}

fn render_map<W: Write>(engine: &QueryEngine, report: &mut Report<W>, month: Month) -> Result<()> {
    let means = engine.average_by_region_for_month(month);
    if means.is_empty() {
        return report.message(&format!("There are no listings for {month}."));
    }

    let mut table = Table::new(
        format!("Mean price by autonomous community for {month}"),
        &["Region", "Mean price (€/night)"],
    );
    for group in means {
        table.push_row([group.key.to_string(), format_price(group.mean_price)]);
    }

    report.table(&table)
}
