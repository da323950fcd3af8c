use seird::math::{AdaptiveDopri5, FixedStepRk4, TimeGrid};
use seird::model::{AgeProfile, Compartment, SeirdModel, SeirdParams, SeirdState, Trajectory};
use seird::ScenarioConfig;

const N: f64 = 1_000_000.0;

fn reference_model() -> SeirdModel {
    let alpha = AgeProfile::sweden().unwrap().alpha();
    SeirdModel::new(SeirdParams::new(N, 2.0, 1.0 / 7.0, 1.0 / 10.0, alpha, 1.0 / 9.0).unwrap()).unwrap()
}

fn reference_grid() -> TimeGrid {
    TimeGrid::linspace(0.0, 99.0, 100).unwrap()
}

fn run_dopri5() -> Trajectory {
    reference_model()
        .simulate(&AdaptiveDopri5::default(), SeirdState::seeded(N, 1.0), &reference_grid())
        .expect("dopri5 run")
}

fn run_rk4() -> Trajectory {
    reference_model()
        .simulate(&FixedStepRk4 { max_dt: 0.05 }, SeirdState::seeded(N, 1.0), &reference_grid())
        .expect("rk4 run")
}

fn assert_non_increasing(series: &[(f64, f64)], eps: f64, what: &str) {
    for w in series.windows(2) {
        assert!(w[1].1 <= w[0].1 + eps, "{what} increased between t={} and t={}: {} -> {}", w[0].0, w[1].0, w[0].1, w[1].1);
    }
}

fn assert_non_decreasing(series: &[(f64, f64)], eps: f64, what: &str) {
    for w in series.windows(2) {
        assert!(w[1].1 >= w[0].1 - eps, "{what} decreased between t={} and t={}: {} -> {}", w[0].0, w[1].0, w[0].1, w[1].1);
    }
}

#[test]
fn population_is_conserved_at_every_point() {
    for traj in [run_dopri5(), run_rk4()] {
        assert_eq!(traj.len(), 100);
        for (t, total) in traj.totals() {
            assert!((total - N).abs() / N < 1e-3, "t={t} total={total}");
        }
        assert!(traj.max_conservation_error() < 1e-6);
    }
}

#[test]
fn compartments_stay_non_negative() {
    for traj in [run_dopri5(), run_rk4()] {
        assert!(traj.min_value() > -1e-3, "min = {}", traj.min_value());
    }
}

#[test]
fn susceptibles_fall_and_deaths_plateau() {
    let traj = run_dopri5();

    let s = traj.series(Compartment::Susceptible);
    assert_non_increasing(&s, 1e-6, "S");
    assert!(s[99].1 < 10.0, "S(99) = {}", s[99].1);

    let d = traj.series(Compartment::Dead);
    assert_non_decreasing(&d, 1e-6, "D");
    let daily: Vec<f64> = d.windows(2).map(|w| w[1].1 - w[0].1).collect();
    let busiest = daily.iter().cloned().fold(0.0, f64::max);
    assert!(daily[daily.len() - 1] < 0.1 * busiest, "deaths still rising fast at day 99");
    assert!(d[99].1 > 17_000.0 && d[99].1 < 18_000.0, "D(99) = {}", d[99].1);

    let summary = traj.summary().unwrap();
    assert!(summary.peak_day >= 45.0 && summary.peak_day <= 60.0, "peak on day {}", summary.peak_day);
    assert_eq!(summary.total_deaths, d[99].1);
}

#[test]
fn fixed_step_and_adaptive_solvers_agree() {
    let (a, b) = (run_dopri5(), run_rk4());
    for (pa, pb) in a.points().iter().zip(b.points()) {
        assert_eq!(pa.t, pb.t);
        for c in Compartment::ALL {
            let (va, vb) = (c.of(&pa.state), c.of(&pb.state));
            assert!((va - vb).abs() <= 1e-3 * N * 1e-3 + 1e-3 * va.abs(), "{c} at t={}: {va} vs {vb}", pa.t);
        }
    }
}

#[test]
fn zero_transmission_creates_no_infections() {
    let params = SeirdParams::new(N, 0.0, 1.0 / 7.0, 1.0 / 10.0, 0.05, 1.0 / 9.0).unwrap();
    let model = SeirdModel::new(params).unwrap();
    let grid = reference_grid();

    // Infectious seed only: E stays empty and I drains.
    let initial = SeirdState::new(N - 10.0, 0.0, 10.0, 0.0, 0.0);
    let traj = model.simulate(&AdaptiveDopri5::default(), initial, &grid).unwrap();
    for p in traj.points() {
        assert!((p.state.s - initial.s).abs() < 1e-9);
        assert!(p.state.e.abs() < 1e-9);
    }
    assert_non_increasing(&traj.series(Compartment::Infected), 1e-9, "I");
    assert!(traj.points()[99].state.i < 1e-3);

    // Exposed seed: E drains and no more than the seed ever becomes infected.
    let initial = SeirdState::new(N - 10.0, 10.0, 0.0, 0.0, 0.0);
    let traj = model.simulate(&FixedStepRk4::default(), initial, &grid).unwrap();
    assert_non_increasing(&traj.series(Compartment::Exposed), 1e-9, "E");
    let infected_pool: Vec<(f64, f64)> = traj.points().iter().map(|p| (p.t, p.state.e + p.state.i)).collect();
    assert_non_increasing(&infected_pool, 1e-9, "E+I");
    for p in traj.points() {
        assert!((p.state.s - initial.s).abs() < 1e-9);
        assert!(p.state.r + p.state.d <= 10.0 + 1e-9);
    }
}

#[test]
fn default_scenario_matches_reference_run() {
    let cfg = ScenarioConfig::default();
    let traj = cfg.simulate(cfg.params().unwrap()).unwrap();
    let reference = run_dopri5();
    assert_eq!(traj.len(), reference.len());
    let (a, b) = (traj.summary().unwrap(), reference.summary().unwrap());
    assert!((a.total_deaths - b.total_deaths).abs() < 1e-6);
}
