use std::collections::HashMap;

use crate::units::Units;

/// One vendor's aggregated figures within a [`Table`].
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub vendor: String,
    pub units: Units,
    /// Percentage of the table's total units sold by this vendor.
    pub share: f64,
}

/// Aggregated sales for one country during one period.
///
/// Each vendor appears in at most one row. Rows keep the order in which they
/// were created until the table is sorted with [`Data::sort`].
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    country: String,
    period: String,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new(country: String, period: String, rows: Vec<Row>) -> Self {
        Self {
            country,
            period,
            rows,
        }
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn period(&self) -> &str {
        &self.period
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row for `vendor`, if any.
    #[must_use]
    pub fn row(&self, vendor: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.vendor == vendor)
    }

    /// Returns the 1-based position of `vendor`'s row in the current row
    /// order, if any.
    #[must_use]
    pub fn position(&self, vendor: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.vendor == vendor).map(|i| i + 1)
    }

    #[must_use]
    pub fn total_units(&self) -> Units {
        self.rows.iter().map(|r| &r.units).sum()
    }

    #[must_use]
    pub fn total_share(&self) -> f64 {
        self.rows.iter().map(|r| r.share).sum()
    }

    fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Vendor => self.rows.sort_by(|a, b| a.vendor.cmp(&b.vendor)),
            SortKey::Units => self.rows.sort_by(|a, b| a.units.cmp(&b.units)),
        }
    }
}

/// Selects the column a table's rows are sorted by. Both orders are
/// ascending and stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Vendor name, lexicographically.
    Vendor,
    /// Units sold, numerically.
    Units,
}

/// Holds aggregated sales data as a set of tables, one per (country, period)
/// group.
///
/// To build a `Data` from sales records, use [`crate::aggregate`] or
/// [`Data::from_csv`].
#[derive(Debug, Default)]
pub struct Data {
    tables: Vec<Table>,
    index: HashMap<(String, String), usize>,
}

impl Data {
    /// Creates a `Data` from tables with distinct (country, period) pairs.
    pub(crate) fn from_tables(tables: Vec<Table>) -> Self {
        let index = tables
            .iter()
            .enumerate()
            .map(|(i, t)| ((t.country.clone(), t.period.clone()), i))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(index.len(), tables.len(), "duplicate table group");
        Self { tables, index }
    }

    /// Returns all tables, in order of (country, period).
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns the table for `country` and `period`, if any.
    #[must_use]
    pub fn table(&self, country: &str, period: &str) -> Option<&Table> {
        self.slot(country, period).map(|i| &self.tables[i])
    }

    /// Returns the units and share for `vendor` in `country` during `period`.
    ///
    /// Returns `None` if there is no such table, or the table has no row for
    /// `vendor`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use market_share::{aggregate, Record};
    /// let data = aggregate(vec![
    ///     Record::new("US", "Q1", "Acme", 40.0),
    ///     Record::new("US", "Q1", "Globex", 60.0),
    /// ]);
    /// assert_eq!(data.units_and_share("Acme", "US", "Q1"), Some((40.0, 40.0)));
    /// assert_eq!(data.units_and_share("Acme", "UK", "Q1"), None);
    /// ```
    #[must_use]
    pub fn units_and_share(&self, vendor: &str, country: &str, period: &str) -> Option<(f64, f64)> {
        self.table(country, period)?
            .row(vendor)
            .map(|r| (r.units.get(), r.share))
    }

    /// Returns the 1-based position of `vendor`'s row in the table for
    /// `country` and `period`.
    ///
    /// The position reflects the table's current row order, so any later
    /// sort may change it.
    #[must_use]
    pub fn row_position(&self, vendor: &str, country: &str, period: &str) -> Option<usize> {
        self.table(country, period)?.position(vendor)
    }

    /// Sorts the rows of the table for `country` and `period` by vendor name.
    pub fn sort_by_vendor(&mut self, country: &str, period: &str) {
        self.sort(country, period, SortKey::Vendor);
    }

    /// Sorts the rows of the table for `country` and `period` by units sold,
    /// smallest first.
    pub fn sort_by_units(&mut self, country: &str, period: &str) {
        self.sort(country, period, SortKey::Units);
    }

    /// Sorts the rows of the table for `country` and `period` by `key`.
    ///
    /// Does nothing if there is no such table. Other tables are unaffected.
    pub fn sort(&mut self, country: &str, period: &str, key: SortKey) {
        if let Some(i) = self.slot(country, period) {
            self.tables[i].sort(key);
        }
    }

    /// Sorts the rows of every table by `key`.
    pub fn sort_all(&mut self, key: SortKey) {
        for table in &mut self.tables {
            table.sort(key);
        }
    }

    fn slot(&self, country: &str, period: &str) -> Option<usize> {
        self.index
            .get(&(country.to_string(), period.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate, Record};

    fn example() -> Data {
        aggregate(vec![
            Record::new("US", "Q1", "Acme", 30.0),
            Record::new("US", "Q1", "Acme", 10.0),
            Record::new("US", "Q1", "Globex", 60.0),
        ])
    }

    fn vendors(data: &Data, country: &str, period: &str) -> Vec<String> {
        data.table(country, period)
            .unwrap()
            .rows()
            .iter()
            .map(|r| r.vendor.clone())
            .collect()
    }

    #[test]
    fn units_and_share_fn_finds_vendor_figures() {
        let data = example();
        assert_eq!(data.units_and_share("Acme", "US", "Q1"), Some((40.0, 40.0)));
        assert_eq!(data.units_and_share("Globex", "US", "Q1"), Some((60.0, 60.0)));
    }

    #[test]
    fn units_and_share_fn_returns_none_when_absent() {
        let data = example();
        assert_eq!(data.units_and_share("Initech", "US", "Q1"), None);
        assert_eq!(data.units_and_share("Acme", "US", "Q2"), None);
        assert_eq!(data.units_and_share("Acme", "UK", "Q1"), None);
        assert_eq!(Data::default().units_and_share("Acme", "US", "Q1"), None);
    }

    #[test]
    fn row_position_fn_tracks_current_row_order() {
        let mut data = example();
        assert_eq!(data.row_position("Globex", "US", "Q1"), Some(2));
        data.sort_by_units("US", "Q1");
        assert_eq!(data.row_position("Globex", "US", "Q1"), Some(2));
        data.sort_by_vendor("US", "Q1");
        assert_eq!(data.row_position("Globex", "US", "Q1"), Some(2));
        assert_eq!(data.row_position("Acme", "US", "Q1"), Some(1));
    }

    #[test]
    fn row_position_fn_returns_none_when_absent() {
        let data = example();
        assert_eq!(data.row_position("Initech", "US", "Q1"), None);
        assert_eq!(data.row_position("Acme", "FR", "Q1"), None);
    }

    #[test]
    fn sort_by_vendor_fn_orders_rows_alphabetically() {
        let mut data = aggregate(vec![
            Record::new("US", "Q1", "Globex", 5.0),
            Record::new("US", "Q1", "Initech", 1.0),
            Record::new("US", "Q1", "Acme", 9.0),
        ]);
        assert_eq!(vendors(&data, "US", "Q1"), ["Globex", "Initech", "Acme"]);
        data.sort_by_vendor("US", "Q1");
        assert_eq!(vendors(&data, "US", "Q1"), ["Acme", "Globex", "Initech"]);
        assert_eq!(data.row_position("Globex", "US", "Q1"), Some(2));
    }

    #[test]
    fn sort_by_units_fn_orders_rows_by_units_ascending() {
        let mut data = aggregate(vec![
            Record::new("US", "Q1", "Globex", 5.0),
            Record::new("US", "Q1", "Initech", 1.0),
            Record::new("US", "Q1", "Acme", 9.0),
        ]);
        data.sort_by_units("US", "Q1");
        assert_eq!(vendors(&data, "US", "Q1"), ["Initech", "Globex", "Acme"]);
    }

    #[test]
    fn sort_by_units_fn_keeps_equal_rows_in_existing_order() {
        let mut data = aggregate(vec![
            Record::new("US", "Q1", "Zeta", 5.0),
            Record::new("US", "Q1", "Alpha", 5.0),
            Record::new("US", "Q1", "Mid", 1.0),
        ]);
        data.sort_by_units("US", "Q1");
        assert_eq!(vendors(&data, "US", "Q1"), ["Mid", "Zeta", "Alpha"]);
        data.sort_by_vendor("US", "Q1");
        data.sort_by_units("US", "Q1");
        assert_eq!(vendors(&data, "US", "Q1"), ["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn sort_fn_only_affects_the_named_table() {
        let mut data = aggregate(vec![
            Record::new("US", "Q1", "Globex", 5.0),
            Record::new("US", "Q1", "Acme", 9.0),
            Record::new("US", "Q2", "Globex", 5.0),
            Record::new("US", "Q2", "Acme", 9.0),
        ]);
        data.sort_by_vendor("US", "Q1");
        assert_eq!(vendors(&data, "US", "Q1"), ["Acme", "Globex"]);
        assert_eq!(vendors(&data, "US", "Q2"), ["Globex", "Acme"]);
    }

    #[test]
    fn sort_fn_is_a_no_op_for_unknown_group() {
        let mut data = example();
        data.sort_by_vendor("UK", "Q1");
        data.sort_by_units("US", "Q9");
        assert_eq!(vendors(&data, "US", "Q1"), ["Acme", "Globex"]);
    }

    #[test]
    fn sort_all_fn_sorts_every_table() {
        let mut data = aggregate(vec![
            Record::new("US", "Q1", "Globex", 5.0),
            Record::new("US", "Q1", "Acme", 9.0),
            Record::new("UK", "Q1", "Initech", 1.0),
            Record::new("UK", "Q1", "Globex", 2.0),
        ]);
        data.sort_all(SortKey::Vendor);
        assert_eq!(vendors(&data, "US", "Q1"), ["Acme", "Globex"]);
        assert_eq!(vendors(&data, "UK", "Q1"), ["Globex", "Initech"]);
        data.sort_all(SortKey::Units);
        assert_eq!(vendors(&data, "US", "Q1"), ["Globex", "Acme"]);
        assert_eq!(vendors(&data, "UK", "Q1"), ["Initech", "Globex"]);
    }

    #[test]
    fn table_totals_sum_rows() {
        let data = example();
        let table = data.table("US", "Q1").unwrap();
        assert_eq!(table.total_units().get(), 100.0);
        assert!((table.total_share() - 100.0).abs() < 1e-9);
    }
}
