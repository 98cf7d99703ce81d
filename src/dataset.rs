//! The dataset is the collection of listings which all queries run against.
//!
//! It is loaded once at startup and never modified afterwards.
use crate::input::read_csv;
use crate::listing::{Listing, Month, Region};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::info;
use std::path::Path;

/// The name of the listings file, used when no other path is configured
pub const DEFAULT_DATASET_FILE_NAME: &str = "airbnb.csv";

/// The range of valid guest ratings
const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;

/// An immutable, ordered collection of listings
#[derive(Debug, Default, PartialEq)]
pub struct Dataset {
    listings: Vec<Listing>,
}

impl Dataset {
    /// Create a dataset from listings which have already been loaded.
    ///
    /// The listings are validated in the same way as when reading from file.
    pub fn new(listings: Vec<Listing>) -> Result<Self> {
        for (idx, listing) in listings.iter().enumerate() {
            check_listing(listing).with_context(|| format!("Invalid listing at row {}", idx + 1))?;
        }

        Ok(Self { listings })
    }

    /// Read the dataset from a semicolon-delimited file
    pub fn from_path(file_path: &Path) -> Result<Self> {
        let listings = read_csv(file_path)?;
        let dataset = Self::new(listings)
            .with_context(|| format!("Error reading {}", file_path.display()))?;
        info!(
            "Loaded {} listings from {}",
            dataset.len(),
            file_path.display()
        );

        Ok(dataset)
    }

    /// All listings, in file order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// The number of listings
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset has no listings
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// The distinct regions present, in canonical order
    pub fn regions(&self) -> Vec<Region> {
        self.listings.iter().map(|l| l.region).unique().sorted().collect()
    }

    /// The distinct months present, in collection order
    pub fn months(&self) -> Vec<Month> {
        self.listings.iter().map(|l| l.month).unique().sorted().collect()
    }
}

/// Check the numeric fields of a listing are within their valid ranges
fn check_listing(listing: &Listing) -> Result<()> {
    ensure!(
        listing.price_per_night.is_finite() && listing.price_per_night >= 0.0,
        "Price per night must be a non-negative number, got {}",
        listing.price_per_night
    );
    ensure!(
        RATING_RANGE.contains(&listing.rating),
        "Rating must be between 0 and 5, got {}",
        listing.rating
    );

    Ok(())
}
