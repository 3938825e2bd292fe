//! Discrete-time population growth models.
//!
//! A [`ParameterSet`] fixes the simulated years, the initial population and
//! whatever a [`GrowthRule`] needs. [`simulate`] applies the rule once per
//! year and returns the resulting [`TimeSeries`], which can then be compared
//! against reference estimates with the functions in [`stats`].

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod manager;
pub mod model;
pub mod params;
pub mod rules;
pub mod series;
pub mod stats;

pub use engine::simulate;
pub use error::{Error, Result};
pub use params::ParameterSet;
pub use rules::{Constant, GrowthRule, Model, Proportional, TwoRegime};
pub use series::TimeSeries;
