//! Price histograms, used to show how nightly prices are distributed.
use crate::listing::Listing;
use crate::query::PRICE_CEILING;

/// The width of each price bin, in euros
pub const BIN_WIDTH: usize = 100;

/// Number of bins below the price ceiling
const BIN_COUNT: usize = 15;

/// Counts of listings in fixed-width price bins.
///
/// Prices at or above the price ceiling are counted in a final overflow bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [usize; BIN_COUNT + 1],
}

impl PriceHistogram {
    /// Count the prices of the given listings
    pub fn from_listings<'a, I>(listings: I) -> Self
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let mut counts = [0; BIN_COUNT + 1];
        for listing in listings {
            counts[bin_index(listing.price_per_night)] += 1;
        }

        Self { counts }
    }

    /// The total number of listings counted
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The number of listings in each bin, from cheapest to most expensive
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Labels for the bins, in the same order as [`PriceHistogram::counts`]
    pub fn labels() -> impl Iterator<Item = String> {
        (0..=BIN_COUNT).map(bin_label)
    }
}

/// The bin a price falls into
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bin_index(price: f64) -> usize {
    if price >= PRICE_CEILING {
        BIN_COUNT
    } else {
        ((price / BIN_WIDTH as f64).floor() as usize).min(BIN_COUNT - 1)
    }
}

/// A label describing the prices in a bin (e.g. "100-199")
fn bin_label(idx: usize) -> String {
    let lower = idx * BIN_WIDTH;
    if idx == BIN_COUNT {
        format!("{lower}+")
    } else {
        format!("{lower}-{}", lower + BIN_WIDTH - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::listing;
    use crate::listing::{Month, Region};
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(99.99, 0)]
    #[case(100.0, 1)]
    #[case(1499.0, 14)]
    #[case(1500.0, 15)]
    #[case(9000.0, 15)]
    fn test_bin_index(#[case] price: f64, #[case] expected: usize) {
        assert_eq!(bin_index(price), expected);
    }

    #[test]
    fn test_histogram() {
        let listings = [
            listing(Region::Aragon, Month::Mayo, 50.0, 4.0, 1),
            listing(Region::Aragon, Month::Mayo, 75.0, 4.0, 1),
            listing(Region::Aragon, Month::Mayo, 250.0, 4.0, 1),
            listing(Region::Aragon, Month::Mayo, 2000.0, 4.0, 1),
        ];
        let histogram = PriceHistogram::from_listings(&listings);
        assert_eq!(histogram.total(), 4);

        assert_eq!(
            histogram.counts(),
            [2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]
        );

        let labels: Vec<_> = PriceHistogram::labels().collect();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[0], "0-99");
        assert_eq!(labels[1], "100-199");
        assert_eq!(labels[14], "1400-1499");
        assert_eq!(labels[15], "1500+");
    }
}
