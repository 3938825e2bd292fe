//! Error statistics between series and calibration of model parameters.

use crate::error::{Error, Result};
use crate::params::ParameterSet;
use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};

/// Absolute difference `|a - b|` for every year both series cover.
pub fn abs_error(a: &TimeSeries, b: &TimeSeries) -> TimeSeries {
    a.zip_with(b, |x, y| (x - y).abs())
}

/// Relative difference in percent, `100 * |a - b| / b`, for every year both
/// series cover.
pub fn rel_error(a: &TimeSeries, b: &TimeSeries) -> TimeSeries {
    a.zip_with(b, |x, y| 100.0 * (x - y).abs() / y)
}

/// Arithmetic mean, NaN for an empty series.
pub fn mean(series: &TimeSeries) -> f64 {
    compute_mean(series.values())
}

/// Largest value, NaN for an empty series.
pub fn max(series: &TimeSeries) -> f64 {
    series
        .values()
        .iter()
        .copied()
        .reduce(f64::max)
        .unwrap_or(f64::NAN)
}

fn compute_mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return f64::NAN;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

/// Summary of how far one series is from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Number of years both series cover.
    pub n_years: usize,
    pub mean_abs: f64,
    pub max_abs: f64,
    /// Mean relative error in percent.
    pub mean_rel: f64,
    /// Max relative error in percent.
    pub max_rel: f64,
}

impl ErrorReport {
    /// Compare `a` against the reference `b`.
    pub fn compare(a: &TimeSeries, b: &TimeSeries) -> Self {
        let abs = abs_error(a, b);
        let rel = rel_error(a, b);
        Self {
            n_years: abs.len(),
            mean_abs: mean(&abs),
            max_abs: max(&abs),
            mean_rel: mean(&rel),
            max_rel: max(&rel),
        }
    }
}

/// Average annual growth of `series` between `t_1` and its last year.
///
/// `t_1` defaults to the first year of the series.
///
/// # Errors
/// Returns [`Error::InvalidRange`] if `t_1` is not covered by the series or
/// leaves no elapsed time before the last year.
pub fn estimate_annual_growth(series: &TimeSeries, t_1: Option<i32>) -> Result<f64> {
    let t_1 = t_1.unwrap_or(series.first_year());
    let last_year = series.last_year();
    let (Some(t_end), Some(p_1), Some(p_end)) = (last_year, series.get(t_1), series.last()) else {
        return Err(Error::InvalidRange {
            t_0: t_1,
            t_end: last_year.unwrap_or(t_1),
        });
    };
    if t_end <= t_1 {
        return Err(Error::InvalidRange { t_0: t_1, t_end });
    }

    let elapsed_time = (t_end - t_1) as f64;
    Ok((p_end - p_1) / elapsed_time)
}

/// Parameters for the constant growth model fitted to `series`.
///
/// The run spans the whole series and starts from its first value, while
/// the growth rate is estimated from `t_1` on.
pub fn calibrate_constant(series: &TimeSeries, t_1: Option<i32>) -> Result<ParameterSet> {
    let annual_growth = estimate_annual_growth(series, t_1)?;
    let t_0 = series.first_year();
    let t_end = series.last_year().ok_or(Error::InvalidRange { t_0, t_end: t_0 })?;
    let p_0 = series.values()[0];
    log::debug!("calibrated annual growth {annual_growth} over {t_0}..={t_end}");
    Ok(ParameterSet::new(t_0, t_end, p_0).with("annual_growth", annual_growth))
}
