use anyhow::Result;
use tracing::{debug, warn};

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use crate::{
    data::{Data, Row, Table},
    record::{read_csv, Record},
    units::Units,
};

#[derive(Default)]
struct Group {
    total: Units,
    vendors: Vec<(String, Units)>,
}

/// Groups `records` by country and period and sums the units sold by each
/// vendor within each group.
///
/// The resulting tables are ordered by country, then period. Within a table,
/// rows appear in the order each vendor was first seen in `records`. Each
/// row's share is its percentage of the table's total units; if that total
/// is zero, every share in the table is zero.
///
/// Units in `records` must be finite and not negative; see [`Record::new`].
///
/// # Examples
///
/// ```
/// # use market_share::{aggregate, Record};
/// let data = aggregate(vec![
///     Record::new("US", "Q1", "Acme", 30.0),
///     Record::new("US", "Q1", "Acme", 10.0),
///     Record::new("US", "Q1", "Globex", 60.0),
/// ]);
/// assert_eq!(data.len(), 1);
/// assert_eq!(data.units_and_share("Acme", "US", "Q1"), Some((40.0, 40.0)));
/// ```
pub fn aggregate(records: impl IntoIterator<Item = Record>) -> Data {
    let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();
    let mut slots: HashMap<(String, String, String), usize> = HashMap::new();
    let mut count = 0;
    for record in records {
        count += 1;
        let group = groups
            .entry((record.country.clone(), record.period.clone()))
            .or_default();
        group.total += record.units;
        let key = (record.country, record.period, record.vendor);
        match slots.get(&key) {
            Some(&i) => group.vendors[i].1 += record.units,
            None => {
                group.vendors.push((key.2.clone(), record.units));
                slots.insert(key, group.vendors.len() - 1);
            }
        }
    }
    let tables: Vec<Table> = groups
        .into_iter()
        .map(|((country, period), group)| {
            let total = group.total.get();
            if total == 0.0 {
                warn!(%country, %period, "group has no units sold, shares set to zero");
            }
            let rows = group
                .vendors
                .into_iter()
                .map(|(vendor, units)| Row {
                    vendor,
                    units,
                    share: if total == 0.0 {
                        0.0
                    } else {
                        units.get() * 100.0 / total
                    },
                })
                .collect();
            Table::new(country, period, rows)
        })
        .collect();
    debug!(records = count, tables = tables.len(), "aggregated sales data");
    Data::from_tables(tables)
}

impl Data {
    /// Reads sales data from the CSV file at `path` and aggregates it.
    ///
    /// See [`read_csv`] for the file format.
    ///
    /// # Errors
    ///
    /// Returns any errors from reading the CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Ok(aggregate(read_csv(path)?))
    }
}
