use seird::io::age_profile::load_age_profile_csv;
use seird::model::{AgeProfile, Compartment};
use seird::{ScenarioConfig, SolverConfig};

#[test]
fn shipped_age_table_matches_builtin() {
    let p = load_age_profile_csv("data/age_profile_sweden.csv").expect("load age csv");
    assert_eq!(p, AgeProfile::sweden().unwrap());
}

#[test]
fn all_compartments_scenario_runs() {
    let cfg = ScenarioConfig::from_json_file("scenarios/all_compartments.json").expect("load scenario");
    assert_eq!(cfg.solver, SolverConfig::Rk4 { max_dt: 0.05 });
    assert_eq!(cfg.chart.series, Compartment::ALL.to_vec());

    let params = cfg.params().expect("params");
    assert!((params.alpha - AgeProfile::sweden().unwrap().alpha()).abs() < 1e-15);

    let traj = cfg.simulate(params).expect("simulate");
    assert_eq!(traj.len(), 100);

    let dir = tempfile::tempdir().unwrap();
    let chart = dir.path().join("all.svg");
    seird::plot::render_chart(&traj, &cfg.chart, &chart).expect("render");
    let svg = std::fs::read_to_string(chart).unwrap();
    for c in Compartment::ALL {
        assert!(svg.contains(c.label()), "legend missing {c}");
    }
    assert!(svg.contains("Total"));
}
