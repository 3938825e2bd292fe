use crate::config::Config;
use crate::model::Trajectory;
use crate::series::TimeSeries;
use crate::stats::ErrorReport;
use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs::File, io::BufWriter, path::Path};

pub trait Obs {
    fn update(&mut self, trajectory: &Trajectory) -> Result<()>;
    fn report(&self) -> serde_json::Value;
}

#[derive(Serialize)]
struct Endpoint {
    name: String,
    year: i32,
    population: f64,
}

/// Last simulated year and population of every trajectory.
pub struct FinalPopulation {
    endpoints: Vec<Endpoint>,
}

impl FinalPopulation {
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
        }
    }
}

impl Obs for FinalPopulation {
    fn update(&mut self, trajectory: &Trajectory) -> Result<()> {
        let series = &trajectory.series;
        let year = series.last_year().context("trajectory is empty")?;
        let population = series.last().context("trajectory is empty")?;
        self.endpoints.push(Endpoint {
            name: trajectory.name.clone(),
            year,
            population,
        });
        Ok(())
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "final_population": self.endpoints })
    }
}

#[derive(Serialize)]
struct Comparison {
    name: String,
    reference: String,
    #[serde(flatten)]
    report: ErrorReport,
}

/// Absolute and relative errors of every trajectory against every
/// reference series.
pub struct ReferenceErrors {
    references: Vec<(String, TimeSeries)>,
    comparisons: Vec<Comparison>,
}

impl ReferenceErrors {
    pub fn new(cfg: &Config) -> Self {
        let references = cfg
            .references
            .iter()
            .map(|reference| (reference.name.clone(), reference.series()))
            .collect();
        Self {
            references,
            comparisons: Vec::new(),
        }
    }
}

impl Obs for ReferenceErrors {
    fn update(&mut self, trajectory: &Trajectory) -> Result<()> {
        for (reference, series) in &self.references {
            let report = ErrorReport::compare(&trajectory.series, series);
            if report.n_years == 0 {
                log::warn!("{:?} does not overlap reference {reference:?}", trajectory.name);
            }
            self.comparisons.push(Comparison {
                name: trajectory.name.clone(),
                reference: reference.clone(),
                report,
            });
        }
        Ok(())
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "reference_errors": self.comparisons })
    }
}

pub struct Analyzer {
    obs_ptr_vec: Vec<Box<dyn Obs>>,
}

impl Analyzer {
    pub fn new(cfg: &Config) -> Self {
        let mut obs_ptr_vec: Vec<Box<dyn Obs>> = Vec::new();
        obs_ptr_vec.push(Box::new(FinalPopulation::new()));
        obs_ptr_vec.push(Box::new(ReferenceErrors::new(cfg)));
        Self { obs_ptr_vec }
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let trajectory = Trajectory::load(file)?;
        for obs in &mut self.obs_ptr_vec {
            obs.update(&trajectory).context("failed to update observable")?;
        }
        Ok(())
    }

    pub fn report(&self) -> Vec<serde_json::Value> {
        self.obs_ptr_vec.iter().map(|obs| obs.report()).collect()
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, &self.report())
            .context("failed to serialize results")?;
        Ok(())
    }
}
