use crate::error::{Error, Result};
use crate::params::ParameterSet;
use crate::rules::GrowthRule;
use crate::series::TimeSeries;

/// Run a growth rule year by year from `t_0` to `t_end`.
///
/// The returned series starts at `(t_0, p_0)` and each following entry is
/// the previous one plus the rule's delta for the previous year, so the
/// rule is invoked exactly `t_end - t_0` times.
///
/// # Errors
/// Returns [`Error::InvalidRange`] if `t_end < t_0`, before the rule is
/// ever invoked. Any error from the rule aborts the run and no partial
/// series is returned.
pub fn simulate<R>(params: &ParameterSet, rule: &R) -> Result<TimeSeries>
where
    R: GrowthRule + ?Sized,
{
    let (t_0, t_end) = (params.t_0, params.t_end);
    if t_end < t_0 {
        return Err(Error::InvalidRange { t_0, t_end });
    }

    let n_steps = (i64::from(t_end) - i64::from(t_0)) as usize;
    log::debug!("simulating {t_0}..={t_end} ({n_steps} steps) from p_0 = {}", params.p_0);

    let mut series = TimeSeries::new(t_0, Vec::new());
    let mut pop = params.p_0;
    series.push(pop);

    for year in t_0..t_end {
        let delta = rule.delta(year, pop, params)?;
        pop += delta;
        log::trace!("{year} -> {}: {pop}", year + 1);
        series.push(pop);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Constant, Model, Proportional};
    use std::cell::Cell;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn constant_growth_scenario() {
        let params = ParameterSet::new(1950, 1955, 2.557).with("annual_growth", 0.07);
        let series = simulate(&params, &Constant).unwrap();
        assert_eq!(series.first_year(), 1950);
        assert_eq!(series.last_year(), Some(1955));
        assert_close(series.values(), &[2.557, 2.627, 2.697, 2.767, 2.837, 2.907]);
    }

    #[test]
    fn proportional_growth_scenario() {
        let params = ParameterSet::new(2000, 2003, 1.0).with("alpha", 0.02);
        let series = simulate(&params, &Proportional).unwrap();
        assert_close(series.values(), &[1.0, 1.02, 1.0404, 1.061208]);
    }

    #[test]
    fn single_year_never_invokes_rule() {
        let calls = Cell::new(0);
        let rule = |_year: i32, _pop: f64, _params: &ParameterSet| -> Result<f64> {
            calls.set(calls.get() + 1);
            Ok(1.0)
        };
        let params = ParameterSet::new(1980, 1980, 4.4);
        let series = simulate(&params, &rule).unwrap();
        assert_eq!(series.iter().collect::<Vec<_>>(), vec![(1980, 4.4)]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn rule_is_invoked_once_per_step_in_year_order() {
        let years = std::cell::RefCell::new(Vec::new());
        let rule = |year: i32, _pop: f64, _params: &ParameterSet| -> Result<f64> {
            years.borrow_mut().push(year);
            Ok(0.0)
        };
        simulate(&ParameterSet::new(1950, 1954, 1.0), &rule).unwrap();
        assert_eq!(years.into_inner(), vec![1950, 1951, 1952, 1953]);
    }

    #[test]
    fn run_may_end_at_the_last_representable_year() {
        let params = ParameterSet::new(i32::MAX - 2, i32::MAX, 1.0).with("annual_growth", 0.5);
        let series = simulate(&params, &Constant).unwrap();
        assert_eq!(series.last_year(), Some(i32::MAX));
        assert_eq!(
            series.iter().collect::<Vec<_>>(),
            vec![(i32::MAX - 2, 1.0), (i32::MAX - 1, 1.5), (i32::MAX, 2.0)]
        );

        let params = ParameterSet::new(i32::MAX, i32::MAX, 1.0);
        let series = simulate(&params, &Constant).unwrap();
        assert_eq!(series.last_year(), Some(i32::MAX));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let params = ParameterSet::new(2016, 1950, 2.557).with("annual_growth", 0.07);
        assert_eq!(
            simulate(&params, &Constant),
            Err(Error::InvalidRange {
                t_0: 2016,
                t_end: 1950
            })
        );
    }

    #[test]
    fn rule_errors_abort_the_run() {
        let params = ParameterSet::new(1950, 2016, 2.557);
        assert!(matches!(
            simulate(&params, &Model::Constant),
            Err(Error::MissingParameter { key }) if key == "annual_growth"
        ));
    }
}
