//! Adaptive Dormand–Prince 5(4) integration via `ode_solvers`.

use log::debug;
use ode_solvers::dop_shared::OutputType;
use ode_solvers::dopri5::Dopri5;
use ode_solvers::Vector5;

use crate::error::{SimError, SimResult};
use crate::math::grid::TimeGrid;
use crate::math::ode::{state_at, Integrator, OdeSystem, Shifted};

/// Adaptive step-size solver with relative/absolute error control.
///
/// The grid is integrated interval by interval, restarting the stepper at
/// every grid point so reported states sit exactly on the requested times.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveDopri5 {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for AdaptiveDopri5 {
    fn default() -> Self {
        Self { rtol: 1.0e-8, atol: 1.0e-6 }
    }
}

// Step-size controller settings, as `Dopri5::new` picks them.
const SAFETY_FACTOR: f64 = 0.9;
const PI_BETA: f64 = 0.04;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 10.0;
const MAX_STEPS: u32 = 100_000;
const STIFFNESS_CHECK_EVERY: u32 = 1000;

impl Integrator<5> for AdaptiveDopri5 {
    fn name(&self) -> &'static str {
        "dopri5"
    }

    fn solve<S: OdeSystem<5>>(&self, system: &S, y0: &[f64; 5], grid: &TimeGrid) -> SimResult<Vec<[f64; 5]>> {
        if !(self.rtol > 0.0 && self.atol > 0.0) {
            return Err(SimError::config(format!(
                "dopri5 tolerances must be > 0 (rtol={}, atol={})",
                self.rtol, self.atol
            )));
        }

        let mut out = Vec::with_capacity(grid.len());
        out.push(*y0);
        let mut y = Vector5::from_column_slice(y0);

        let (mut evals, mut accepted, mut rejected) = (0usize, 0usize, 0usize);
        for (t0, t1) in grid.intervals() {
            // Sparse output records every accepted step; the last one closes [0, h].
            let h = t1 - t0;
            let mut stepper = Dopri5::from_param(
                Shifted { system, t0 },
                0.0,
                h,
                h,
                y,
                self.rtol,
                self.atol,
                SAFETY_FACTOR,
                PI_BETA,
                FAC_MIN,
                FAC_MAX,
                h,
                0.0,
                MAX_STEPS,
                STIFFNESS_CHECK_EVERY,
                OutputType::Sparse,
            );
            let stats = stepper
                .integrate()
                .map_err(|e| SimError::integration(format!("dopri5 failed on [{t0}, {t1}]: {e}")))?;
            evals += stats.num_eval as usize;
            accepted += stats.accepted_steps as usize;
            rejected += stats.rejected_steps as usize;

            let row = state_at(stepper.x_out(), stepper.y_out(), h, t1)?;
            y = Vector5::from_column_slice(&row);
            out.push(row);
        }

        debug!("dopri5: {evals} evaluations, {accepted} accepted steps, {rejected} rejected steps");
        Ok(out)
    }
}
