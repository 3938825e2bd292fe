use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::simulate;
use crate::model::Trajectory;
use anyhow::{Context, Result};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Runs, analyzes and cleans the scenarios of one simulation directory.
///
/// The directory must contain a `config.toml`; trajectories and results
/// are written next to it.
pub struct Manager {
    sim_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(sim_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { sim_dir, cfg })
    }

    pub fn run_simulations(&self) -> Result<()> {
        let base = self.cfg.base_params().context("failed to build base parameters")?;
        log::info!("{base:#?}");

        for scenario in &self.cfg.scenarios {
            let params = self.cfg.scenario_params(&base, scenario)?;
            let extra: Vec<_> = params.extra().collect();
            log::info!(
                "simulating {:?} ({:?}) over {}..={} with {extra:?}",
                scenario.name,
                scenario.model,
                params.t_0,
                params.t_end
            );

            let series = simulate(&params, &scenario.model)
                .with_context(|| format!("failed to simulate scenario {:?}", scenario.name))?;

            let trajectory = Trajectory {
                name: scenario.name.clone(),
                model: scenario.model,
                params,
                series,
            };

            let file = self.trajectory_file(&scenario.name);
            trajectory
                .save(&file)
                .with_context(|| format!("failed to save {file:?}"))?;
            log::info!("saved {file:?}");
        }

        Ok(())
    }

    pub fn run_analysis(&self) -> Result<()> {
        let mut analyzer = Analyzer::new(&self.cfg);

        let files = self
            .trajectory_files()
            .context("failed to list trajectory files")?;
        for file in &files {
            analyzer
                .add_file(file)
                .with_context(|| format!("failed to add {file:?}"))?;
        }
        log::info!("analyzed {} trajectory files", files.len());

        let results_file = self.results_file();
        analyzer
            .save_results(&results_file)
            .context("failed to save results")?;
        log::info!("saved {results_file:?}");

        Ok(())
    }

    pub fn clean_sim(&self) -> Result<()> {
        let mut files = self
            .trajectory_files()
            .context("failed to list trajectory files")?;
        files.push(self.results_file());

        for file in files.iter().filter(|file| file.exists()) {
            fs::remove_file(file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }

        Ok(())
    }

    fn trajectory_files(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.sim_dir.join("trajectory-*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let mut files: Vec<_> = glob(pattern)
            .context("failed to glob trajectory files")?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    fn trajectory_file(&self, name: &str) -> PathBuf {
        self.sim_dir.join(format!("trajectory-{name}.msgpack"))
    }

    fn results_file(&self) -> PathBuf {
        self.sim_dir.join("results.json")
    }
}
