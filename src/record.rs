use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, trace};

use std::path::Path;

use crate::units::Units;

/// One line of sales data: units sold by a vendor in a country during a
/// reporting period.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub country: String,
    pub period: String,
    pub vendor: String,
    pub units: Units,
}

impl Record {
    /// Creates a record for `units` sold by `vendor` in `country` during
    /// `period`.
    ///
    /// `units` must be finite and not negative, as it is when parsed by
    /// [`read_csv`].
    #[must_use]
    pub fn new(country: &str, period: &str, vendor: &str, units: f64) -> Self {
        Self {
            country: country.to_string(),
            period: period.to_string(),
            vendor: vendor.to_string(),
            units: units.into(),
        }
    }
}

/// Defines the CSV columns that identify a sales line.
///
/// Every field is optional here so that incomplete lines can be recognised
/// and skipped before the `Units` column is looked at.
#[derive(Debug, Deserialize)]
struct CsvKey {
    #[serde(rename = "Country", alias = "country", alias = "COUNTRY")]
    country: Option<String>,
    #[serde(rename = "Timescale", alias = "timescale", alias = "TIMESCALE")]
    timescale: Option<String>,
    #[serde(rename = "Vendor", alias = "vendor", alias = "VENDOR")]
    vendor: Option<String>,
}

impl CsvKey {
    /// Reports whether country, timescale, and vendor are all present and
    /// not blank.
    fn is_complete(&self) -> bool {
        [&self.country, &self.timescale, &self.vendor]
            .iter()
            .all(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

/// Defines the CSV column holding the units sold.
#[derive(Debug, Deserialize)]
struct CsvUnits {
    #[serde(rename = "Units", alias = "units", alias = "UNITS")]
    units: Option<Units>,
}

/// Reads sales data from the CSV file at `path`.
///
/// The file must have a header line naming the columns `Country`,
/// `Timescale`, `Vendor`, and `Units` (in any order). Fields are separated by
/// commas and may be quoted with single quotes. Lines with a blank country,
/// timescale, or vendor are skipped, whatever their `Units` value, as are
/// lines too short to have those fields.
///
/// # Errors
///
/// Returns errors if:
/// * The file cannot be opened or read
/// * A line cannot be parsed as CSV
/// * A complete line has a missing or invalid `Units` value
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .quote(b'\'')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .clone();
    let mut records = Vec::new();
    let mut line = csv::StringRecord::new();
    while rdr
        .read_record(&mut line)
        .with_context(|| format!("reading {}", path.display()))?
    {
        let line_no = line.position().map_or(0, csv::Position::line);
        let key: CsvKey = line
            .deserialize(Some(&headers))
            .with_context(|| format!("{}: line {line_no}", path.display()))?;
        if !key.is_complete() {
            trace!(line = line_no, "skipping incomplete record");
            continue;
        }
        let row: CsvUnits = line
            .deserialize(Some(&headers))
            .with_context(|| format!("{}: line {line_no}", path.display()))?;
        let Some(units) = row.units else {
            bail!("{}: line {line_no}: missing Units value", path.display());
        };
        records.push(Record {
            country: key.country.unwrap_or_default(),
            period: key.timescale.unwrap_or_default(),
            vendor: key.vendor.unwrap_or_default(),
            units,
        });
    }
    debug!(path = %path.display(), records = records.len(), "read sales data");
    Ok(records)
}
