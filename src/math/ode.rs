use ode_solvers::rk4::Rk4;
use ode_solvers::{System, Vector5};

use crate::error::{SimError, SimResult};
use crate::math::grid::TimeGrid;

/// Right-hand side of a first-order system y' = f(t, y) with `N` components.
pub trait OdeSystem<const N: usize> {
    /// Fill `dy` with the derivative at `(t, y)`. Both slices have length `N`.
    fn deriv(&self, t: f64, y: &[f64], dy: &mut [f64]);
}

/// A numerical solver that reports the state of an [`OdeSystem`] at every
/// point of a [`TimeGrid`].
///
/// The returned vector has the same length and order as the grid and its
/// first element is `y0`. Solvers never retry: a failure is returned as
/// [`SimError::Integration`].
pub trait Integrator<const N: usize> {
    fn name(&self) -> &'static str;

    fn solve<S: OdeSystem<N>>(&self, system: &S, y0: &[f64; N], grid: &TimeGrid) -> SimResult<Vec<[f64; N]>>;
}

/// Adapter handing an [`OdeSystem`] to `ode_solvers` on local time
/// `s = t - t0`, so every interval starts at exactly zero.
pub(crate) struct Shifted<'a, S> {
    pub system: &'a S,
    pub t0: f64,
}

impl<S: OdeSystem<5>> System<f64, Vector5<f64>> for Shifted<'_, S> {
    fn system(&self, s: f64, y: &Vector5<f64>, dy: &mut Vector5<f64>) {
        self.system.deriv(self.t0 + s, y.as_slice(), dy.as_mut_slice());
    }
}

/// Pick the solver output sitting on the interval end `h` (local time).
pub(crate) fn state_at(x_out: &[f64], y_out: &[Vector5<f64>], h: f64, t1: f64) -> SimResult<[f64; 5]> {
    let (x, y) = x_out
        .iter()
        .zip(y_out)
        .min_by(|a, b| (a.0 - h).abs().total_cmp(&(b.0 - h).abs()))
        .ok_or_else(|| SimError::integration(format!("solver produced no output up to t={t1}")))?;
    if (x - h).abs() > 1e-9 * h.max(1.0) {
        return Err(SimError::integration(format!("solver output stops short of t={t1}")));
    }

    let mut row = [0.0; 5];
    row.copy_from_slice(y.as_slice());
    ensure_finite(&row, t1)?;
    Ok(row)
}

/// Classical fixed-step RK4 from `ode_solvers`. Each grid interval is split
/// into equal steps no longer than `max_dt` days, so output points land
/// exactly on the grid.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepRk4 {
    pub max_dt: f64,
}

impl Default for FixedStepRk4 {
    fn default() -> Self {
        Self { max_dt: 0.1 }
    }
}

impl Integrator<5> for FixedStepRk4 {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn solve<S: OdeSystem<5>>(&self, system: &S, y0: &[f64; 5], grid: &TimeGrid) -> SimResult<Vec<[f64; 5]>> {
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(SimError::config(format!("rk4 max_dt must be > 0, got {}", self.max_dt)));
        }

        let mut out = Vec::with_capacity(grid.len());
        out.push(*y0);
        let mut y = Vector5::from_column_slice(y0);

        for (t0, t1) in grid.intervals() {
            let h = t1 - t0;
            let steps = (h / self.max_dt).ceil().max(1.0);
            let mut stepper = Rk4::new(Shifted { system, t0 }, 0.0, y, h, h / steps);
            stepper
                .integrate()
                .map_err(|e| SimError::integration(format!("rk4 failed on [{t0}, {t1}]: {e}")))?;

            let row = state_at(stepper.x_out(), stepper.y_out(), h, t1)?;
            y = Vector5::from_column_slice(&row);
            out.push(row);
        }
        Ok(out)
    }
}

pub(crate) fn ensure_finite(y: &[f64], t: f64) -> SimResult<()> {
    if y.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SimError::integration(format!("non-finite state at t={t}: {y:?}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    /// Five independent decays with rates 1..=5.
    pub struct Decays;

    impl OdeSystem<5> for Decays {
        fn deriv(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
            for (i, (d, v)) in dy.iter_mut().zip(y).enumerate() {
                *d = -((i + 1) as f64) * v;
            }
        }
    }

    /// y' = y², which leaves every finite range at t = 1 when y(0) = 1.
    pub struct Blowup;

    impl OdeSystem<5> for Blowup {
        fn deriv(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
            for (d, v) in dy.iter_mut().zip(y) {
                *d = v * v;
            }
        }
    }

    /// Run `f` on a worker thread and fail the test if it takes longer than `secs`.
    pub fn within<T: Send + 'static>(secs: u64, f: impl FnOnce() -> T + Send + 'static) -> T {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(f());
        });
        rx.recv_timeout(Duration::from_secs(secs))
            .unwrap_or_else(|_| panic!("solver did not return within {secs}s"))
    }

    pub fn assert_matches_decays(grid: &TimeGrid, out: &[[f64; 5]], tol: f64) {
        assert_eq!(out.len(), grid.len());
        for (t, y) in grid.points().iter().zip(out) {
            for (i, v) in y.iter().enumerate() {
                let exact = (-((i + 1) as f64) * t).exp();
                assert!((v - exact).abs() < tol, "t={t} i={i} got {v} want {exact}");
            }
        }
    }

    #[test]
    fn rk4_tracks_exponential_decay() {
        let grid = TimeGrid::new(vec![0.0, 0.3, 1.0, 2.5, 5.0]).unwrap();
        let (grid, out) = within(20, move || {
            let out = FixedStepRk4 { max_dt: 0.001 }.solve(&Decays, &[1.0; 5], &grid);
            (grid, out)
        });
        let out = out.unwrap();
        assert_eq!(out[0], [1.0; 5]);
        assert_matches_decays(&grid, &out, 1e-9);
    }

    #[test]
    fn rk4_reports_non_finite_state() {
        let grid = TimeGrid::linspace(0.0, 10.0, 3).unwrap();
        let err = within(20, move || FixedStepRk4 { max_dt: 0.5 }.solve(&Blowup, &[1.0; 5], &grid)).unwrap_err();
        assert!(matches!(err, SimError::Integration(_)), "{err}");
    }

    #[test]
    fn rk4_rejects_bad_step() {
        let grid = TimeGrid::linspace(0.0, 1.0, 2).unwrap();
        assert!(FixedStepRk4 { max_dt: 0.0 }.solve(&Decays, &[1.0; 5], &grid).is_err());
    }

    #[test]
    fn output_must_reach_interval_end() {
        let y = [Vector5::from_element(1.0), Vector5::from_element(2.0)];
        assert_eq!(state_at(&[0.0, 1.0], &y, 1.0, 4.0).unwrap(), [2.0; 5]);
        assert!(matches!(state_at(&[0.0, 0.5], &y, 1.0, 4.0), Err(SimError::Integration(_))));
        assert!(state_at(&[], &[], 1.0, 4.0).is_err());
    }
}
