use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use std::{
    fmt::{Display, Write as _},
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use crate::data::{Data, Table};

/// Output file format for [`export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Html,
    Csv,
}

impl Format {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Csv => "csv",
        }
    }
}

/// Returns the path of the output file for `table`:
/// `<prefix>_<country>_<period>.<extension>`.
#[must_use]
pub fn output_path(prefix: &str, table: &Table, format: Format) -> PathBuf {
    PathBuf::from(format!(
        "{prefix}_{}_{}.{}",
        table.country(),
        table.period(),
        format.extension()
    ))
}

/// Writes every table in `data` to its own file, named as described in
/// [`output_path`].
///
/// A file that cannot be written does not stop the others from being
/// written. Returns the path and error for each failed file.
pub fn export(data: &Data, prefix: &str, format: Format) -> Vec<(PathBuf, anyhow::Error)> {
    let mut errors = Vec::new();
    for (i, table) in data.tables().iter().enumerate() {
        let path = output_path(prefix, table, format);
        let result = match format {
            Format::Html => fs::write(&path, html(table, i + 1)).map_err(anyhow::Error::from),
            Format::Csv => File::create(&path)
                .map_err(anyhow::Error::from)
                .and_then(|file| write_csv(table, file)),
        };
        match result {
            Ok(()) => debug!(path = %path.display(), "wrote table"),
            Err(e) => errors.push((path, e)),
        }
    }
    errors
}

/// Renders `table` as an HTML page, captioned as table number `number`.
#[must_use]
pub fn html(table: &Table, number: usize) -> String {
    Html { table, number }.to_string()
}

/// An HTML page for one table, built through its [`Display`] implementation.
struct Html<'a> {
    table: &'a Table,
    number: usize,
}

impl Display for Html<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table;
        write!(
            f,
            "<html><body>Table {}, PC Quarterly Market Share, the {}, {}",
            self.number,
            Escaped(table.country()),
            Escaped(table.period())
        )?;
        write!(f, "<table border ='1'><tr>")?;
        for heading in ["Vendor", "Units", "Share"] {
            write!(f, "<th style=\"width:120px\">{heading}</th>")?;
        }
        write!(f, "</tr>")?;
        for row in table.rows() {
            write!(
                f,
                "<tr><td align='center'>{}</td><td align='right'>{}</td><td align='right'>{}%</td></tr>",
                Escaped(&row.vendor),
                row.units,
                share(row.share)
            )?;
        }
        write!(
            f,
            "<tr style=\"background-color: #FFFACD\"><td align='center'>Total</td><td align='right'>{}</td><td align='right'>{:.0}%</td></tr>",
            table.total_units(),
            table.total_share().round_ties_even()
        )?;
        write!(f, "</table></body></html>")
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Vendor")]
    vendor: &'a str,
    #[serde(rename = "Units")]
    units: f64,
    #[serde(rename = "Share")]
    share: f64,
}

/// Writes `table` as CSV to `wtr`: a header line, one line per vendor, and a
/// final `Total` line.
///
/// # Errors
///
/// Returns any errors from writing to `wtr`.
pub fn write_csv(table: &Table, wtr: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    for row in table.rows() {
        wtr.serialize(CsvRow {
            vendor: &row.vendor,
            units: row.units.get(),
            share: row.share,
        })?;
    }
    wtr.serialize(CsvRow {
        vendor: "Total",
        units: table.total_units().get(),
        share: table.total_share(),
    })?;
    wtr.flush()
        .with_context(|| format!("writing table {}, {}", table.country(), table.period()))?;
    Ok(())
}

/// Formats a percentage with at most one decimal place, rounding half to
/// even: `33.3`, `40`.
fn share(value: f64) -> String {
    let rounded = (value * 10.0).round_ties_even() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Writes text with HTML special characters escaped.
struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}
