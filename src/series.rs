//! Year-indexed population series.

use serde::{Deserialize, Serialize};

/// Contiguous sequence of values keyed by year, one entry per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    t_0: i32,
    vals: Vec<f64>,
}

impl TimeSeries {
    /// Create a series whose first entry belongs to year `t_0`.
    pub fn new(t_0: i32, vals: Vec<f64>) -> Self {
        Self { t_0, vals }
    }

    pub(crate) fn push(&mut self, val: f64) {
        self.vals.push(val);
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    pub fn first_year(&self) -> i32 {
        self.t_0
    }

    /// Year of the last entry, `None` for an empty series.
    pub fn last_year(&self) -> Option<i32> {
        if self.vals.is_empty() {
            return None;
        }
        i32::try_from(i64::from(self.t_0) + self.vals.len() as i64 - 1).ok()
    }

    pub fn last(&self) -> Option<f64> {
        self.vals.last().copied()
    }

    /// Value at `year`, if the series covers it.
    pub fn get(&self, year: i32) -> Option<f64> {
        let idx = usize::try_from(i64::from(year) - i64::from(self.t_0)).ok()?;
        self.vals.get(idx).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.vals
    }

    /// Iterate over `(year, value)` pairs in increasing year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.vals
            .iter()
            .enumerate()
            .map(|(k, &val)| (self.t_0 + k as i32, val))
    }

    /// Years covered by both `self` and `other`, as an inclusive range.
    pub fn overlap(&self, other: &TimeSeries) -> Option<(i32, i32)> {
        let first = self.first_year().max(other.first_year());
        let last = self.last_year()?.min(other.last_year()?);
        (first <= last).then_some((first, last))
    }

    /// Combine two series year by year over their overlap.
    pub fn zip_with<F>(&self, other: &TimeSeries, mut f: F) -> TimeSeries
    where
        F: FnMut(f64, f64) -> f64,
    {
        let Some((first, last)) = self.overlap(other) else {
            return TimeSeries::new(self.t_0.max(other.t_0), Vec::new());
        };
        let vals = (first..=last)
            .filter_map(|year| Some(f(self.get(year)?, other.get(year)?)))
            .collect();
        TimeSeries::new(first, vals)
    }
}
