//! Fixtures for tests

use crate::dataset::Dataset;
use crate::listing::{Listing, Month, Region};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Assert that a query was rejected with the given message
macro_rules! assert_query_error {
    ($result:expr, $msg:expr) => {
        assert_eq!($result.unwrap_err().to_string(), $msg);
    };
}
pub(crate) use assert_query_error;

/// A listing with placeholder name and no discount
pub fn listing(
    region: Region,
    month: Month,
    price_per_night: f64,
    rating: f64,
    review_count: u32,
) -> Listing {
    Listing {
        accommodation_name: format!("{region} {price_per_night}"),
        region,
        month,
        price_per_night,
        discount: String::new(),
        rating,
        review_count,
    }
}

/// A small dataset covering three regions and three months
#[fixture]
pub fn dataset() -> Dataset {
    let named = |name: &str, listing: Listing| Listing {
        accommodation_name: name.into(),
        ..listing
    };

    Dataset::new(vec![
        listing(Region::Cataluna, Month::Julio, 100.0, 4.5, 20),
        listing(Region::Cataluna, Month::Julio, 300.0, 4.75, 5),
        listing(Region::Cataluna, Month::Julio, 50.0, 5.0, 1),
        listing(Region::Cataluna, Month::Julio, 150.0, 4.5, 20),
        named(
            "Galicia 1",
            listing(Region::Galicia, Month::Enero, 70.0, 4.0, 10),
        ),
        named(
            "Galicia 2",
            listing(Region::Galicia, Month::Enero, 90.0, 4.0, 10),
        ),
        listing(Region::Madrid, Month::Febrero, 400.0, 4.25, 8),
        listing(Region::Madrid, Month::Julio, 400.0, 3.75, 2),
        listing(Region::Madrid, Month::Julio, 400.0, 4.0, 3),
    ])
    .unwrap()
}
