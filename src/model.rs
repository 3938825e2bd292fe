//! Simulation output records.

use crate::params::ParameterSet;
use crate::rules::Model;
use crate::series::TimeSeries;
use anyhow::{Context, Result};
use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Result of simulating one scenario.
///
/// Carries the model and the exact parameters it was run with, so a saved
/// trajectory can be analyzed without the configuration that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Scenario name.
    pub name: String,

    /// Growth rule used.
    pub model: Model,

    /// Parameters the scenario was run with.
    pub params: ParameterSet,

    /// Simulated population per year.
    pub series: TimeSeries,
}

impl Trajectory {
    /// Save the trajectory to a MessagePack-encoded file.
    pub fn save<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write_named(&mut writer, self).context("failed to serialize trajectory")?;
        writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }

    /// Load a trajectory previously written by [`Trajectory::save`].
    pub fn load<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);
        let trajectory =
            decode::from_read(&mut reader).context("failed to deserialize trajectory")?;
        Ok(trajectory)
    }
}
