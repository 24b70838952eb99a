use anyhow::bail;
use serde_with::DeserializeFromStr;

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    iter::Sum,
    ops::AddAssign,
    str::FromStr,
};

/// Represents a number of units sold.
///
/// Input data may contain fractional counts, so the value is stored as an
/// `f64`, but the [`Display`] implementation rounds it to a whole number and
/// groups the thousands with commas (`1,234,568`).
#[derive(Clone, Copy, Default, DeserializeFromStr)]
pub struct Units(f64);

impl Units {
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Units {
    /// Wraps a count of units, which must be finite and not negative.
    fn from(value: f64) -> Self {
        debug_assert!(
            value.is_finite() && value >= 0.0,
            "invalid units {value}: must be a non-negative number"
        );
        Self(value)
    }
}

impl Debug for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = format!("{:.0}", self.0.round_ties_even().abs());
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 1);
        if self.0.round_ties_even() < 0.0 {
            grouped.push('-');
        }
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        f.pad(&grouped)
    }
}

impl FromStr for Units {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: f64 = match s.trim().replace(',', "").parse() {
            Ok(value) => value,
            Err(e) => bail!("invalid units {s:?}: {e}"),
        };
        if !value.is_finite() || value < 0.0 {
            bail!("invalid units {s:?}: must be a non-negative number");
        }
        Ok(Self(value))
    }
}

impl AddAssign for Units {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Units {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, units| {
            acc += units;
            acc
        })
    }
}

impl<'a> Sum<&'a Units> for Units {
    fn sum<I: Iterator<Item = &'a Units>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl PartialEq for Units {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Units {}

impl PartialOrd for Units {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Units {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
