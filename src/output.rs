//! The module responsible for writing query results for the user.
//!
//! Results are written as tables, either aligned for reading in a terminal or as CSV for use in
//! other programs.
use crate::input::DELIMITER;
use anyhow::Result;
use clap::ValueEnum;
use itertools::Itertools;
use std::io::Write;

/// The format in which tables are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns with a title, for reading in a terminal
    #[default]
    Table,
    /// Semicolon-delimited values, without titles or messages
    Csv,
}

/// Format a price or mean price for display
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// A titled table of string cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    title: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given title and column names
    pub fn new(title: impl Into<String>, header: &[&str]) -> Self {
        Self {
            title: title.into(),
            header: header.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row to the bottom of the table
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let row = row.into_iter().map(|cell| cell.to_string()).collect_vec();
        assert_eq!(
            row.len(),
            self.header.len(),
            "Row has wrong number of columns"
        );
        self.rows.push(row);
    }

    /// Write with columns padded to a common width
    fn write_aligned<W: Write>(&self, out: &mut W) -> Result<()> {
        let width = |cell: &String| cell.chars().count();
        let widths = (0..self.header.len())
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| width(&row[col]))
                    .chain([width(&self.header[col])])
                    .max()
                    .unwrap_or_default()
            })
            .collect_vec();

        let format_row = |row: &[String]| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(out, "{}", self.title)?;
        writeln!(out, "{}", format_row(&self.header))?;
        let rule = widths.iter().map(|width| "-".repeat(*width)).collect_vec();
        writeln!(out, "{}", format_row(&rule))?;
        for row in &self.rows {
            writeln!(out, "{}", format_row(row))?;
        }

        Ok(())
    }

    /// Write as delimited values with a header row
    fn write_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(out);
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Writes the tables and messages making up a view
pub struct Report<W: Write> {
    format: OutputFormat,
    out: W,
    empty: bool,
}

impl<W: Write> Report<W> {
    /// Create a report which writes to `out`
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out,
            empty: true,
        }
    }

    /// Write a blank line between consecutive items
    fn separate(&mut self) -> Result<()> {
        if !self.empty {
            writeln!(self.out)?;
        }
        self.empty = false;

        Ok(())
    }

    /// Write a line of text for the user.
    ///
    /// Messages are omitted from CSV output.
    pub fn message(&mut self, text: &str) -> Result<()> {
        if self.format == OutputFormat::Csv {
            return Ok(());
        }

        self.separate()?;
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Write a table
    pub fn table(&mut self, table: &Table) -> Result<()> {
        self.separate()?;
        match self.format {
            OutputFormat::Table => table.write_aligned(&mut self.out),
            OutputFormat::Csv => table.write_csv(&mut self.out),
        }
    }

    /// Finish the report, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
