//! Common routines for handling input data.
use anyhow::{Context, Result, ensure};
use serde::de::{Deserialize, DeserializeOwned, Deserializer, Error};
use std::fs;
use std::path::Path;

/// The field delimiter used by the listings files
pub const DELIMITER: u8 = b';';

/// Read a series of type Ts from a semicolon-delimited CSV file into a `Vec<T>`.
///
/// Columns are matched against the header row by name and extra columns are ignored.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = read_csv_internal(file_path)
        .with_context(|| format!("Error reading {}", file_path.display()))?;
    Ok(vec)
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(csv::Trim::All)
        .from_path(file_path)?;

    let vec: Vec<T> = reader.deserialize().collect::<Result<_, _>>()?;
    ensure!(!vec.is_empty(), "CSV file cannot be empty");

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read file {}", file_path.display()))?;
    let toml_data = toml::from_str(&toml_str)
        .with_context(|| format!("Could not parse TOML file {}", file_path.display()))?;
    Ok(toml_data)
}

/// Parse a decimal number written with either `.` or `,` as the decimal separator.
///
/// Negative zero is read as zero.
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    s.parse()
        .ok()
        .or_else(|| s.replacen(',', ".", 1).parse().ok())
        .filter(|value: &f64| value.is_finite())
        .map(|value| if value == 0.0 { 0.0 } else { value })
}

/// Read a finite f64, accepting a comma as the decimal separator
pub fn deserialise_decimal<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserialiser)?;
    parse_decimal(&s).ok_or_else(|| D::Error::custom(format!("Invalid number: {s}")))
}
