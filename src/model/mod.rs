pub mod age;
pub mod seird;
pub mod trajectory;

pub use age::{AgeGroup, AgeProfile};
pub use seird::{SeirdModel, SeirdParams, SeirdState, COMPARTMENTS};
pub use trajectory::{Compartment, RunSummary, Trajectory, TrajectoryPoint};
