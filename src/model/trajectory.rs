use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::seird::SeirdState;

/// Compartment selector for series extraction and charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compartment {
    #[serde(rename = "S", alias = "Susceptible")]
    Susceptible,
    #[serde(rename = "E", alias = "Exposed")]
    Exposed,
    #[serde(rename = "I", alias = "Infected")]
    Infected,
    #[serde(rename = "R", alias = "Recovered")]
    Recovered,
    #[serde(rename = "D", alias = "Dead")]
    Dead,
}

impl Compartment {
    pub const ALL: [Compartment; 5] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infected,
        Compartment::Recovered,
        Compartment::Dead,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Compartment::Susceptible => "S",
            Compartment::Exposed => "E",
            Compartment::Infected => "I",
            Compartment::Recovered => "R",
            Compartment::Dead => "D",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Exposed => "Exposed",
            Compartment::Infected => "Infected",
            Compartment::Recovered => "Recovered",
            Compartment::Dead => "Dead",
        }
    }

    pub fn of(self, state: &SeirdState) -> f64 {
        match self {
            Compartment::Susceptible => state.s,
            Compartment::Exposed => state.e,
            Compartment::Infected => state.i,
            Compartment::Recovered => state.r,
            Compartment::Dead => state.d,
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Compartment {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Compartment::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::config(format!("unknown compartment '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub t: f64,
    pub state: SeirdState,
}

/// Solver output: one state per grid point, in grid order.
#[derive(Debug, Clone)]
pub struct Trajectory {
    population: f64,
    points: Vec<TrajectoryPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub final_state: SeirdState,
    pub peak_infectious: f64,
    pub peak_day: f64,
    pub total_deaths: f64,
}

impl Trajectory {
    pub fn new(population: f64, points: Vec<TrajectoryPoint>) -> Self {
        Self { population, points }
    }

    pub fn population(&self) -> f64 {
        self.population
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.t).collect()
    }

    pub fn series(&self, compartment: Compartment) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.t, compartment.of(&p.state))).collect()
    }

    /// S+E+I+R+D at every point.
    pub fn totals(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.t, p.state.total())).collect()
    }

    /// Largest |S+E+I+R+D - N| / N over the trajectory.
    pub fn max_conservation_error(&self) -> f64 {
        self.points
            .iter()
            .map(|p| (p.state.total() - self.population).abs() / self.population)
            .fold(0.0, f64::max)
    }

    /// Smallest compartment value anywhere in the trajectory.
    pub fn min_value(&self) -> f64 {
        self.points
            .iter()
            .flat_map(|p| p.state.to_array())
            .fold(f64::INFINITY, f64::min)
    }

    pub fn summary(&self) -> Option<RunSummary> {
        let last = self.points.last()?;
        let peak = self
            .points
            .iter()
            .max_by(|a, b| a.state.i.total_cmp(&b.state.i))?;
        Some(RunSummary {
            final_state: last.state,
            peak_infectious: peak.state.i,
            peak_day: peak.t,
            total_deaths: last.state.d,
        })
    }
}
