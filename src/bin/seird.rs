use std::path::PathBuf;

use anyhow::Context;
use log::{info, warn};

use seird::calibration::basic_reproduction_number;
use seird::io::run_log::write_run_log;
use seird::io::trajectory_csv::write_trajectory_csv;
use seird::logging;
use seird::plot::render_chart;
use seird::ScenarioConfig;

/// Tolerance on S+E+I+R+D = N relative to N.
const CONSERVATION_RTOL: f64 = 1e-3;

fn main() -> anyhow::Result<()> {
    logging::init_default();

    // Optional scenario file; the reference scenario runs without one.
    let scenario_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = match &scenario_path {
        Some(path) => ScenarioConfig::from_json_file(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    let run_id = scenario_path
        .as_deref()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference".to_string());

    let params = cfg.params().context("invalid parameters")?;
    info!(
        "N={:.0} beta={} k={:.4} delta={:.4} rho={:.4} alpha={:.6} R0={:.3}",
        params.population,
        params.beta,
        params.k,
        params.delta,
        params.rho,
        params.alpha,
        basic_reproduction_number(&params)
    );

    let traj = cfg.simulate(params).context("simulation failed")?;
    info!("{} points over [{}, {}] with {}", traj.len(), cfg.t_start, cfg.t_end, cfg.solver.name());

    let drift = traj.max_conservation_error();
    if drift > CONSERVATION_RTOL {
        warn!("population drifted by {:.2e} of N", drift);
    }

    if let Some(summary) = traj.summary() {
        info!(
            "peak infectious {:.0} on day {:.0}; deaths by day {:.0}: {:.0}",
            summary.peak_infectious, summary.peak_day, cfg.t_end, summary.total_deaths
        );
    }

    let csv_path = cfg.output_dir.join(format!("seird_{run_id}.csv"));
    write_trajectory_csv(&csv_path, &traj).context("write trajectory csv failed")?;
    info!("trajectory written to {}", csv_path.display());

    let log_path = write_run_log(&cfg.output_dir, &run_id, &params, cfg.solver.name(), &traj)
        .context("write run log failed")?;
    info!("run log written to {}", log_path.display());

    render_chart(&traj, &cfg.chart, cfg.output_dir.join(format!("seird_{run_id}.svg"))).context("render chart failed")?;

    Ok(())
}
