use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::io::age_profile::load_age_profile_csv;
use crate::math::{AdaptiveDopri5, FixedStepRk4, TimeGrid};
use crate::model::{AgeProfile, SeirdModel, SeirdParams, SeirdState, Trajectory};
use crate::plot::ChartSpec;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum SolverConfig {
    Dopri5 { rtol: f64, atol: f64 },
    Rk4 { max_dt: f64 },
}

impl SolverConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SolverConfig::Dopri5 { .. } => "dopri5",
            SolverConfig::Rk4 { .. } => "rk4",
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        let AdaptiveDopri5 { rtol, atol } = AdaptiveDopri5::default();
        SolverConfig::Dopri5 { rtol, atol }
    }
}

/// One simulation run. Missing fields fall back to the reference scenario:
/// one exposed individual in a population of a million, 100 daily points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub population: f64,
    pub beta: f64,
    pub k: f64,
    pub delta: f64,
    pub rho: f64,
    /// Age tables; the Swedish tables when absent.
    pub age_profile: Option<AgeProfile>,
    /// When set, replaces `age_profile`.
    pub age_csv: Option<PathBuf>,
    pub initial_exposed: f64,
    pub t_start: f64,
    pub t_end: f64,
    pub points: usize,
    pub solver: SolverConfig,
    pub chart: ChartSpec,
    pub output_dir: PathBuf,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            population: 1_000_000.0,
            beta: 2.0,
            k: 1.0 / 7.0,
            delta: 1.0 / 10.0,
            rho: 1.0 / 9.0,
            age_profile: None,
            age_csv: None,
            initial_exposed: 1.0,
            t_start: 0.0,
            t_end: 99.0,
            points: 100,
            solver: SolverConfig::default(),
            chart: ChartSpec::default(),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ScenarioConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let cfg: Self = serde_json::from_str(&text)?;
        info!("loaded scenario from {}", path.as_ref().display());
        Ok(cfg)
    }

    pub fn age_profile(&self) -> SimResult<AgeProfile> {
        match &self.age_csv {
            Some(path) => load_age_profile_csv(path),
            None => match &self.age_profile {
                Some(profile) => Ok(profile.clone()),
                None => AgeProfile::sweden(),
            },
        }
    }

    pub fn params(&self) -> SimResult<SeirdParams> {
        let alpha = self.age_profile()?.alpha();
        SeirdParams::new(self.population, self.beta, self.k, self.delta, alpha, self.rho)
    }

    pub fn initial_state(&self) -> SimResult<SeirdState> {
        if !(self.initial_exposed >= 0.0 && self.initial_exposed <= self.population) {
            return Err(SimError::config(format!(
                "initial_exposed must lie in [0, {}], got {}",
                self.population, self.initial_exposed
            )));
        }
        Ok(SeirdState::seeded(self.population, self.initial_exposed))
    }

    pub fn grid(&self) -> SimResult<TimeGrid> {
        TimeGrid::linspace(self.t_start, self.t_end, self.points)
    }

    /// Build the model and integrate it with the configured solver.
    pub fn simulate(&self, params: SeirdParams) -> SimResult<Trajectory> {
        let model = SeirdModel::new(params)?;
        let initial = self.initial_state()?;
        let grid = self.grid()?;
        match self.solver {
            SolverConfig::Dopri5 { rtol, atol } => model.simulate(&AdaptiveDopri5 { rtol, atol }, initial, &grid),
            SolverConfig::Rk4 { max_dt } => model.simulate(&FixedStepRk4 { max_dt }, initial, &grid),
        }
    }
}
