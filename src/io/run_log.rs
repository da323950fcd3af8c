use std::io::Write;
use std::path::{Path, PathBuf};

use crate::calibration::basic_reproduction_number;
use crate::error::SimResult;
use crate::model::seird::SeirdParams;
use crate::model::trajectory::Trajectory;

/// Plain-text record of a run: `key=value` parameters, then the timeline.
pub fn write_run_log(
    out_dir: impl AsRef<Path>,
    run_id: &str,
    params: &SeirdParams,
    solver: &str,
    traj: &Trajectory,
) -> SimResult<PathBuf> {
    std::fs::create_dir_all(out_dir.as_ref())?;
    let path = out_dir.as_ref().join(format!("seird_{}.txt", run_id));
    let mut f = std::io::BufWriter::new(std::fs::File::create(&path)?);

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "population={:.0}", params.population)?;
    writeln!(f, "beta={:.6}", params.beta)?;
    writeln!(f, "k={:.6}", params.k)?;
    writeln!(f, "delta={:.6}", params.delta)?;
    writeln!(f, "rho={:.6}", params.rho)?;
    writeln!(f, "alpha={:.6}", params.alpha)?;
    writeln!(f, "r0={:.6}", basic_reproduction_number(params))?;
    writeln!(f, "solver={}", solver)?;
    writeln!(f, "points={}", traj.len())?;
    writeln!(f)?;
    writeln!(f, "t,S,E,I,R,D")?;

    for p in traj.points() {
        let s = p.state;
        writeln!(f, "{:.2},{:.3},{:.3},{:.3},{:.3},{:.3}", p.t, s.s, s.e, s.i, s.r, s.d)?;
    }
    f.flush()?;

    Ok(path)
}
