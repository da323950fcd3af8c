pub mod calibration;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod model;
pub mod plot;

pub use config::{ScenarioConfig, SolverConfig};
pub use error::{SimError, SimResult};
pub use model::seird::{SeirdModel, SeirdParams, SeirdState};
