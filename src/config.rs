use crate::params::ParameterSet;
use crate::rules::Model;
use crate::series::TimeSeries;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fmt::Debug,
    fs,
    ops::{Range, RangeBounds},
    path::Path,
};

/// Simulation configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base parameters shared by every scenario.
    pub params: ParameterSet,

    /// Optional fit of the base parameters to a reference series.
    #[serde(default)]
    pub calibration: Option<CalibrationConfig>,

    /// Scenarios to simulate.
    pub scenarios: Vec<ScenarioConfig>,

    /// Reference estimates the scenarios are compared against.
    #[serde(default)]
    pub references: Vec<ReferenceConfig>,
}

/// Replace `t_0`, `t_end`, `p_0` and `annual_growth` by values fitted to a
/// reference series.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Name of the reference series to fit.
    pub reference: String,
    /// First year used to estimate the growth rate.
    #[serde(default)]
    pub t_1: Option<i32>,
}

/// A growth model plus the parameters it changes relative to the base.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub model: Model,
    #[serde(default)]
    pub overrides: BTreeMap<String, f64>,
}

/// Yearly estimates starting at `t_0`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub name: String,
    pub t_0: i32,
    pub values: Vec<f64>,
}

impl ReferenceConfig {
    pub fn series(&self) -> TimeSeries {
        TimeSeries::new(self.t_0, self.values.clone())
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a [`Config`] from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Base parameters, fitted to the calibration reference if one is set.
    pub fn base_params(&self) -> Result<ParameterSet> {
        let Some(calibration) = &self.calibration else {
            return Ok(self.params.clone());
        };
        let reference = self
            .reference(&calibration.reference)
            .with_context(|| format!("unknown reference {:?}", calibration.reference))?;
        let fitted = crate::stats::calibrate_constant(&reference.series(), calibration.t_1)
            .context("failed to calibrate parameters")?;

        let mut params = self.params.clone();
        for key in ["t_0", "t_end", "p_0", "annual_growth"] {
            params = params.with_override(key, fitted.get(key)?)?;
        }
        Ok(params)
    }

    /// Parameters of one scenario: the base with its overrides applied.
    pub fn scenario_params(
        &self,
        base: &ParameterSet,
        scenario: &ScenarioConfig,
    ) -> Result<ParameterSet> {
        let mut params = base.clone();
        for (key, &value) in &scenario.overrides {
            params = params
                .with_override(key, value)
                .with_context(|| format!("invalid override of {key:?}"))?;
        }
        check_range(&params).with_context(|| format!("invalid scenario {:?}", scenario.name))?;
        Ok(params)
    }

    pub fn reference(&self, name: &str) -> Option<&ReferenceConfig> {
        self.references.iter().find(|reference| reference.name == name)
    }

    fn validate(&self) -> Result<()> {
        check_range(&self.params).context("invalid base parameters")?;
        check_num(self.params.p_0, f64::MIN..=f64::MAX).context("invalid initial population")?;

        if self.scenarios.is_empty() {
            bail!("at least one scenario must be given");
        }
        check_names(self.scenarios.iter().map(|s| s.name.as_str()))
            .context("invalid scenario names")?;
        check_names(self.references.iter().map(|r| r.name.as_str()))
            .context("invalid reference names")?;

        for reference in &self.references {
            check_num(reference.t_0, YEARS).with_context(|| {
                format!("invalid first year of reference {:?}", reference.name)
            })?;
            check_num(reference.values.len(), 1..100_000)
                .with_context(|| format!("invalid length of reference {:?}", reference.name))?;
            for (year, val) in reference.series().iter() {
                check_num(val, f64::MIN..=f64::MAX).with_context(|| {
                    format!("invalid value of reference {:?} in {year}", reference.name)
                })?;
            }
        }

        if let Some(calibration) = &self.calibration {
            if self.reference(&calibration.reference).is_none() {
                bail!("calibration reference {:?} is not defined", calibration.reference);
            }
        }

        Ok(())
    }
}

const YEARS: Range<i32> = -10_000..10_000;

fn check_range(params: &ParameterSet) -> Result<()> {
    check_num(params.t_0, YEARS).context("invalid first year")?;
    check_num(params.t_end, params.t_0..YEARS.end).context("invalid last year")?;
    Ok(())
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            bail!("names must not be empty");
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            bail!("name {name:?} must only contain ASCII letters, digits, '_' or '-'");
        }
        if !seen.insert(name) {
            bail!("name {name:?} is used more than once");
        }
    }
    Ok(())
}
