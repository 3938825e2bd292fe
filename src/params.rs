use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed configuration values of one simulation run.
///
/// The first year, last year and initial population are typed fields;
/// anything a growth rule needs on top of that lives in `extra`.
/// Scenario variants are derived with [`ParameterSet::with_override`],
/// which leaves the original value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// First simulated year (inclusive).
    pub t_0: i32,
    /// Last simulated year (inclusive).
    pub t_end: i32,
    /// Population at `t_0`.
    pub p_0: f64,

    /// Rule-specific parameters such as `annual_growth` or `alpha`.
    #[serde(flatten)]
    extra: BTreeMap<String, f64>,
}

impl ParameterSet {
    pub fn new(t_0: i32, t_end: i32, p_0: f64) -> Self {
        Self {
            t_0,
            t_end,
            p_0,
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style insertion of a rule-specific parameter.
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Look up a parameter by name.
    ///
    /// `t_0`, `t_end` and `p_0` are always present.
    ///
    /// # Errors
    /// Returns [`Error::MissingParameter`] if `key` is not set.
    pub fn get(&self, key: &str) -> Result<f64> {
        match key {
            "t_0" => Ok(self.t_0 as f64),
            "t_end" => Ok(self.t_end as f64),
            "p_0" => Ok(self.p_0),
            _ => self
                .extra
                .get(key)
                .copied()
                .ok_or_else(|| Error::MissingParameter {
                    key: key.to_string(),
                }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(key, "t_0" | "t_end" | "p_0") || self.extra.contains_key(key)
    }

    /// Return an independent copy with one parameter replaced or added.
    ///
    /// # Errors
    /// Returns [`Error::InvalidYear`] if `t_0` or `t_end` is given a
    /// non-integral value.
    pub fn with_override(&self, key: &str, value: f64) -> Result<Self> {
        let mut params = self.clone();
        match key {
            "t_0" => params.t_0 = to_year(key, value)?,
            "t_end" => params.t_end = to_year(key, value)?,
            "p_0" => params.p_0 = value,
            _ => {
                params.extra.insert(key.to_string(), value);
            }
        }
        Ok(params)
    }

    /// Rule-specific parameters in key order.
    pub fn extra(&self) -> impl Iterator<Item = (&str, f64)> {
        self.extra.iter().map(|(key, &value)| (key.as_str(), value))
    }
}

/// Convert a parameter value to a whole year.
fn to_year(key: &str, value: f64) -> Result<i32> {
    let in_range = value >= i32::MIN as f64 && value <= i32::MAX as f64;
    if !in_range || value.fract() != 0.0 {
        return Err(Error::InvalidYear {
            key: key.to_string(),
            value,
        });
    }
    Ok(value as i32)
}
