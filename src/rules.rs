//! Growth rules: one year's net population change.

use crate::error::{Error, Result};
use crate::params::ParameterSet;
use serde::{Deserialize, Serialize};

/// Computes the net change of the population during `year`.
///
/// Implementations must be pure: the same inputs give the same delta and
/// nothing is retained between calls. Any closure with the matching
/// signature is a growth rule too.
pub trait GrowthRule {
    fn delta(&self, year: i32, pop: f64, params: &ParameterSet) -> Result<f64>;
}

impl<F> GrowthRule for F
where
    F: Fn(i32, f64, &ParameterSet) -> Result<f64>,
{
    fn delta(&self, year: i32, pop: f64, params: &ParameterSet) -> Result<f64> {
        self(year, pop, params)
    }
}

/// Adds `annual_growth` every year.
#[derive(Debug, Clone, Copy, Default)]
pub struct Constant;

impl GrowthRule for Constant {
    fn delta(&self, _year: i32, _pop: f64, params: &ParameterSet) -> Result<f64> {
        params.get("annual_growth")
    }
}

/// Grows by `alpha * pop`, or by `birth_rate * pop - death_rate * pop`
/// when no `alpha` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional;

impl GrowthRule for Proportional {
    fn delta(&self, _year: i32, pop: f64, params: &ParameterSet) -> Result<f64> {
        if params.contains("alpha") {
            return Ok(params.get("alpha")? * pop);
        }
        if params.contains("birth_rate") && params.contains("death_rate") {
            let births = params.get("birth_rate")? * pop;
            let deaths = params.get("death_rate")? * pop;
            return Ok(births - deaths);
        }
        Err(Error::MissingParameter {
            key: "alpha".to_string(),
        })
    }
}

/// Proportional growth at `alpha1` before `threshold_year` and at
/// `alpha2` from `threshold_year` on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoRegime;

impl GrowthRule for TwoRegime {
    fn delta(&self, year: i32, pop: f64, params: &ParameterSet) -> Result<f64> {
        let alpha = if f64::from(year) < params.get("threshold_year")? {
            params.get("alpha1")?
        } else {
            params.get("alpha2")?
        };
        Ok(alpha * pop)
    }
}

/// Growth rule selectable by name from a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    Constant,
    Proportional,
    TwoRegime,
}

impl GrowthRule for Model {
    fn delta(&self, year: i32, pop: f64, params: &ParameterSet) -> Result<f64> {
        match self {
            Model::Constant => Constant.delta(year, pop, params),
            Model::Proportional => Proportional.delta(year, pop, params),
            Model::TwoRegime => TwoRegime.delta(year, pop, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ParameterSet {
        ParameterSet::new(1950, 2016, 2.557)
    }

    #[test]
    fn constant_ignores_year_and_population() {
        let params = base().with("annual_growth", 0.07);
        assert_eq!(Constant.delta(1950, 2.557, &params), Ok(0.07));
        assert_eq!(Constant.delta(2010, 100.0, &params), Ok(0.07));
        assert!(matches!(
            Constant.delta(1950, 2.557, &base()),
            Err(Error::MissingParameter { key }) if key == "annual_growth"
        ));
    }

    #[test]
    fn proportional_prefers_alpha() {
        let params = base()
            .with("alpha", 0.02)
            .with("birth_rate", 0.5)
            .with("death_rate", 0.1);
        assert_eq!(Proportional.delta(1950, 1.0, &params), Ok(0.02));
    }

    #[test]
    fn proportional_falls_back_to_birth_and_death_rates() {
        let params = base().with("birth_rate", 0.025).with("death_rate", 0.0077);
        let delta = Proportional.delta(1950, 2.0, &params).unwrap();
        assert!((delta - 2.0 * (0.025 - 0.0077)).abs() < 1e-12);

        let params = base().with("birth_rate", 0.025);
        assert!(matches!(
            Proportional.delta(1950, 2.0, &params),
            Err(Error::MissingParameter { key }) if key == "alpha"
        ));
    }

    #[test]
    fn two_regime_switches_at_threshold_year() {
        let params = base()
            .with("alpha1", 0.019)
            .with("alpha2", 0.015)
            .with("threshold_year", 1980.0);
        assert_eq!(TwoRegime.delta(1979, 1.0, &params), Ok(0.019));
        assert_eq!(TwoRegime.delta(1980, 1.0, &params), Ok(0.015));
        assert_eq!(TwoRegime.delta(1981, 1.0, &params), Ok(0.015));
    }

    #[test]
    fn two_regime_accepts_thresholds_beyond_any_year() {
        let params = base()
            .with("alpha1", 0.019)
            .with("alpha2", 0.015)
            .with("threshold_year", 1e10);
        assert_eq!(TwoRegime.delta(i32::MAX, 1.0, &params), Ok(0.019));

        let params = params.with("threshold_year", 1979.5);
        assert_eq!(TwoRegime.delta(1979, 1.0, &params), Ok(0.019));
        assert_eq!(TwoRegime.delta(1980, 1.0, &params), Ok(0.015));
    }

    #[test]
    fn two_regime_requires_threshold_year() {
        let params = base().with("alpha1", 0.019).with("alpha2", 0.015);
        assert!(matches!(
            TwoRegime.delta(1979, 1.0, &params),
            Err(Error::MissingParameter { key }) if key == "threshold_year"
        ));
    }

    #[test]
    fn closures_are_growth_rules() {
        let halve =
            |_year: i32, pop: f64, _params: &ParameterSet| -> Result<f64> { Ok(-pop / 2.0) };
        assert_eq!(halve.delta(1950, 4.0, &base()), Ok(-2.0));
    }

    #[test]
    fn model_names_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            model: Model,
        }
        let wrapper: Wrapper = toml::from_str("model = \"two_regime\"").unwrap();
        assert_eq!(wrapper.model, Model::TwoRegime);
    }
}
