use std::io::Write;
use std::path::Path;

use crate::error::SimResult;
use crate::model::trajectory::{Compartment, Trajectory};

/// Write `t,S,E,I,R,D`, one row per grid point.
pub fn write_trajectory<W: Write>(writer: W, traj: &Trajectory) -> SimResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["t"];
    header.extend(Compartment::ALL.iter().map(|c| c.code()));
    wtr.write_record(&header)?;

    for p in traj.points() {
        let mut record = vec![p.t.to_string()];
        record.extend(p.state.to_array().iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_trajectory_csv(path: impl AsRef<Path>, traj: &Trajectory) -> SimResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_trajectory(std::fs::File::create(path)?, traj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seird::SeirdState;
    use crate::model::trajectory::TrajectoryPoint;

    #[test]
    fn writes_header_and_rows() {
        let traj = Trajectory::new(
            10.0,
            vec![
                TrajectoryPoint { t: 0.0, state: SeirdState::new(9.0, 1.0, 0.0, 0.0, 0.0) },
                TrajectoryPoint { t: 0.5, state: SeirdState::new(8.5, 1.0, 0.25, 0.25, 0.0) },
            ],
        );
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "t,S,E,I,R,D\n0,9,1,0,0,0\n0.5,8.5,1,0.25,0.25,0\n");
    }
}
