use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::math::grid::TimeGrid;
use crate::math::ode::{Integrator, OdeSystem};
use crate::model::trajectory::{Trajectory, TrajectoryPoint};

pub const COMPARTMENTS: usize = 5;

/// Relative tolerance when checking that the initial state sums to N.
const INITIAL_SUM_RTOL: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeirdParams {
    /// Total population N. Authoritative; never recomputed from the state.
    pub population: f64,

    // Rates (per day)
    pub beta: f64,  // transmission
    pub k: f64,     // 1/infectious period
    pub delta: f64, // 1/incubation period
    pub rho: f64,   // 1/time to death

    /// Case-fatality proportion, see [`crate::model::age::AgeProfile::alpha`].
    pub alpha: f64,
}

impl SeirdParams {
    pub fn new(population: f64, beta: f64, k: f64, delta: f64, alpha: f64, rho: f64) -> SimResult<Self> {
        let p = Self { population, beta, k, delta, alpha, rho };
        p.check()?;
        Ok(p)
    }

    pub fn check(&self) -> SimResult<()> {
        for (name, v) in [
            ("population", self.population),
            ("beta", self.beta),
            ("k", self.k),
            ("delta", self.delta),
            ("rho", self.rho),
            ("alpha", self.alpha),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SimError::domain(format!("{name} must be finite and >= 0, got {v}")));
            }
        }
        if self.population <= 0.0 {
            return Err(SimError::domain("population must be > 0"));
        }
        if self.alpha > 1.0 {
            return Err(SimError::config(format!("alpha must be a proportion in [0, 1], got {}", self.alpha)));
        }
        Ok(())
    }
}

/// One value per compartment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeirdState {
    pub s: f64,
    pub e: f64,
    pub i: f64,
    pub r: f64,
    pub d: f64,
}

impl SeirdState {
    pub fn new(s: f64, e: f64, i: f64, r: f64, d: f64) -> Self {
        Self { s, e, i, r, d }
    }

    /// Everyone susceptible except `exposed` seed individuals.
    pub fn seeded(population: f64, exposed: f64) -> Self {
        let seed = exposed.clamp(0.0, population.max(0.0));
        Self::new(population - seed, seed, 0.0, 0.0, 0.0)
    }

    pub fn total(&self) -> f64 {
        self.s + self.e + self.i + self.r + self.d
    }

    pub fn to_array(self) -> [f64; COMPARTMENTS] {
        [self.s, self.e, self.i, self.r, self.d]
    }

    pub fn from_array([s, e, i, r, d]: [f64; COMPARTMENTS]) -> Self {
        Self { s, e, i, r, d }
    }
}

impl From<[f64; COMPARTMENTS]> for SeirdState {
    fn from(y: [f64; COMPARTMENTS]) -> Self {
        Self::from_array(y)
    }
}

impl From<SeirdState> for [f64; COMPARTMENTS] {
    fn from(s: SeirdState) -> Self {
        s.to_array()
    }
}

/// A SEIRD system over parameters that passed [`SeirdParams::check`].
#[derive(Debug, Clone)]
pub struct SeirdModel {
    params: SeirdParams,
}

impl SeirdModel {
    pub fn new(params: SeirdParams) -> SimResult<Self> {
        params.check()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SeirdParams {
        &self.params
    }

    /// Rates of change in compartment order S, E, I, R, D.
    ///
    /// The system is autonomous; `t` is only part of the solver interface.
    /// Outflow from I splits into recovery at (1-alpha)·k and death at
    /// alpha·rho, so the five rates always sum to zero.
    pub fn deriv(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
        let SeirdParams { population, beta, k, delta, alpha, rho } = self.params;
        let (s, e, i) = (y[0], y[1], y[2]);

        let infections = beta * s * i / population;
        let incubated = delta * e;
        let recoveries = (1.0 - alpha) * k * i;
        let deaths = alpha * rho * i;

        dy[0] = -infections;
        dy[1] = infections - incubated;
        dy[2] = incubated - recoveries - deaths;
        dy[3] = recoveries;
        dy[4] = deaths;
    }

    pub fn rates(&self, state: &SeirdState) -> SeirdState {
        let mut dy = [0.0; COMPARTMENTS];
        self.deriv(0.0, &state.to_array(), &mut dy);
        SeirdState::from_array(dy)
    }

    /// Integrate from `initial` over `grid` with the given solver.
    pub fn simulate<I: Integrator<COMPARTMENTS>>(
        &self,
        integrator: &I,
        initial: SeirdState,
        grid: &TimeGrid,
    ) -> SimResult<Trajectory> {
        self.check_initial(&initial)?;

        debug!(
            "integrating {} grid points over [{}, {}] with {}",
            grid.len(),
            grid.start(),
            grid.end(),
            integrator.name()
        );
        let states = integrator.solve(self, &initial.to_array(), grid)?;
        if states.len() != grid.len() {
            return Err(SimError::integration(format!(
                "{} returned {} states for {} grid points",
                integrator.name(),
                states.len(),
                grid.len()
            )));
        }

        let points = grid
            .points()
            .iter()
            .zip(states)
            .map(|(&t, y)| TrajectoryPoint { t, state: SeirdState::from_array(y) })
            .collect();
        Ok(Trajectory::new(self.params.population, points))
    }

    fn check_initial(&self, initial: &SeirdState) -> SimResult<()> {
        let y = initial.to_array();
        if y.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SimError::domain(format!("initial state must be finite and >= 0, got {y:?}")));
        }
        let n = self.params.population;
        if (initial.total() - n).abs() > INITIAL_SUM_RTOL * n {
            return Err(SimError::config(format!(
                "initial state sums to {}, expected population {n}",
                initial.total()
            )));
        }
        Ok(())
    }
}

impl OdeSystem<COMPARTMENTS> for SeirdModel {
    fn deriv(&self, t: f64, y: &[f64], dy: &mut [f64]) {
        SeirdModel::deriv(self, t, y, dy)
    }
}
