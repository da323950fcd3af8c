pub mod dopri;
pub mod grid;
pub mod ode;

pub use dopri::AdaptiveDopri5;
pub use grid::TimeGrid;
pub use ode::{FixedStepRk4, Integrator, OdeSystem};
