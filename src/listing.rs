//! Listings are the rows of the dataset, each describing one accommodation offered in a given
//! region and month.
//!
//! Regions and months are closed sets, so they are represented as enums. The declaration order
//! of each enum is its canonical order: for [`Month`] this is the collection cycle, which starts
//! in February.
use crate::input::deserialise_decimal;
use crate::query::QueryError;
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use unicase::UniCase;

/// Implement `Display`, `FromStr`, `Serialize` and `Deserialize` for a labelled enum.
///
/// The enum must derive `IntoStaticStr` (giving its label) and `EnumIter`. Parsing ignores case
/// and surrounding whitespace and also accepts the listed aliases.
macro_rules! define_labelled_enum {
    ($name:ident, $kind:literal, [$(($alias:literal, $variant:ident)),* $(,)?]) => {
        impl $name {
            /// The label used for this value in the dataset
            pub fn label(self) -> &'static str {
                self.into()
            }

            /// Look up a value by label, ignoring case
            fn from_label(s: &str) -> Option<Self> {
                let s = UniCase::new(s.trim());
                let aliases: &[(&str, $name)] = &[$(($alias, $name::$variant)),*];
                Self::iter()
                    .map(|value| (value.label(), value))
                    .chain(aliases.iter().copied())
                    .find(|(label, _)| UniCase::new(*label) == s)
                    .map(|(_, value)| value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl FromStr for $name {
            type Err = QueryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(s).ok_or_else(|| QueryError::InvalidEnum {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserialiser: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s: String = Deserialize::deserialize(deserialiser)?;
                s.parse().map_err(D::Error::custom)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serialiser: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serialiser.collect_str(self)
            }
        }
    };
}

/// One of the 17 Spanish autonomous communities covered by the dataset
#[allow(missing_docs)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum Region {
    #[strum(serialize = "Andalucía")]
    Andalucia,
    #[strum(serialize = "Aragón")]
    Aragon,
    #[strum(serialize = "Asturias")]
    Asturias,
    #[strum(serialize = "Cantabria")]
    Cantabria,
    #[strum(serialize = "Castilla-La Mancha")]
    CastillaLaMancha,
    #[strum(serialize = "Castilla y León")]
    CastillaYLeon,
    #[strum(serialize = "Cataluña")]
    Cataluna,
    #[strum(serialize = "Extremadura")]
    Extremadura,
    #[strum(serialize = "Galicia")]
    Galicia,
    #[strum(serialize = "Islas Baleares")]
    IslasBaleares,
    #[strum(serialize = "Canarias")]
    Canarias,
    #[strum(serialize = "La Rioja")]
    LaRioja,
    #[strum(serialize = "Comunidad de Madrid")]
    Madrid,
    #[strum(serialize = "Región de Murcia")]
    Murcia,
    #[strum(serialize = "Navarra")]
    Navarra,
    #[strum(serialize = "País Vasco")]
    PaisVasco,
    #[strum(serialize = "Comunidad Valenciana")]
    ComunidadValenciana,
}

// The long-form names are those used by the official regional boundary files
define_labelled_enum!(
    Region,
    "region",
    [
        ("Principado de Asturias", Asturias),
        ("Castilla - La Mancha", CastillaLaMancha),
        ("Comunidad Foral de Navarra", Navarra),
    ]
);

/// A month of the collection cycle.
///
/// Variants are declared in collection order (February to January), so the derived `Ord` and
/// [`IntoEnumIterator::iter`] both follow that cycle rather than the calendar year.
#[allow(missing_docs)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum Month {
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
    Enero,
}

define_labelled_enum!(Month, "month", []);

impl Month {
    /// The conventional month number (January = 1)
    pub fn calendar_number(self) -> u32 {
        match self {
            Self::Enero => 1,
            other => other as u32 + 2,
        }
    }
}

/// A single accommodation offered in one region for one month
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Listing {
    /// The name shown for the accommodation
    #[serde(rename = "Alojamiento")]
    pub accommodation_name: String,
    /// The region in which the accommodation is located
    #[serde(rename = "Destino")]
    pub region: Region,
    /// The month for which the price was collected
    #[serde(rename = "Mes")]
    pub month: Month,
    /// Price per night in euros
    #[serde(rename = "precio_noche", deserialize_with = "deserialise_decimal")]
    pub price_per_night: f64,
    /// A free-text discount label (e.g. "10%"), possibly empty
    #[serde(rename = "Descuento", default)]
    pub discount: String,
    /// Average guest rating, between 0 and 5
    #[serde(rename = "Valoración", deserialize_with = "deserialise_decimal")]
    pub rating: f64,
    /// Number of guest reviews
    #[serde(rename = "Nº Reseñas")]
    pub review_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_query_error;
    use rstest::rstest;

    #[test]
    fn test_region_count() {
        assert_eq!(Region::COUNT, 17);
        assert_eq!(Region::iter().count(), 17);
    }

    #[test]
    fn test_month_order() {
        let labels: Vec<_> = Month::iter().map(Month::label).collect();
        assert_eq!(
            labels,
            [
                "Febrero",
                "Marzo",
                "Abril",
                "Mayo",
                "Junio",
                "Julio",
                "Agosto",
                "Septiembre",
                "Octubre",
                "Noviembre",
                "Diciembre",
                "Enero"
            ]
        );
        assert!(Month::Diciembre < Month::Enero);
    }

    #[rstest]
    #[case(Month::Enero, 1)]
    #[case(Month::Febrero, 2)]
    #[case(Month::Julio, 7)]
    #[case(Month::Diciembre, 12)]
    fn test_month_calendar_number(#[case] month: Month, #[case] expected: u32) {
        assert_eq!(month.calendar_number(), expected);
    }

    #[rstest]
    #[case("Cataluña", Region::Cataluna)]
    #[case("cataluña", Region::Cataluna)]
    #[case("  CATALUÑA ", Region::Cataluna)]
    #[case("Castilla y León", Region::CastillaYLeon)]
    #[case("Principado de Asturias", Region::Asturias)]
    #[case("Castilla - La Mancha", Region::CastillaLaMancha)]
    #[case("Comunidad Foral de Navarra", Region::Navarra)]
    fn test_region_from_str(#[case] input: &str, #[case] expected: Region) {
        assert_eq!(input.parse::<Region>().unwrap(), expected);
    }

    #[rstest]
    #[case("Foo", "Invalid region: Foo")]
    #[case("", "Invalid region: ")]
    #[case("Cataluna", "Invalid region: Cataluna")]
    fn test_region_from_str_invalid(#[case] input: &str, #[case] msg: &str) {
        assert_query_error!(input.parse::<Region>(), msg);
    }

    #[test]
    fn test_month_from_str() {
        assert_eq!("julio".parse::<Month>().unwrap(), Month::Julio);
        assert_query_error!("July".parse::<Month>(), "Invalid month: July");
    }

    #[test]
    fn test_labels_round_trip() {
        for region in Region::iter() {
            assert_eq!(region.to_string().parse::<Region>().unwrap(), region);
        }
        for month in Month::iter() {
            assert_eq!(month.to_string().parse::<Month>().unwrap(), month);
        }
    }
}
