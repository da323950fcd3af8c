use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Everything that can abort a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Inconsistent inputs: age tables, time grid, initial state, scenario file.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The ODE solver failed or produced non-finite values.
    #[error("integration error: {0}")]
    Integration(String),

    /// Negative or non-finite populations or rates.
    #[error("domain error: {0}")]
    Domain(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn config(msg: impl Into<String>) -> Self {
        SimError::Configuration(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        SimError::Domain(msg.into())
    }

    pub fn integration(msg: impl Into<String>) -> Self {
        SimError::Integration(msg.into())
    }
}

/// `ensure!`-style guard returning a [`SimError`] of the given kind.
macro_rules! ensure_sim {
    ($cond:expr, $kind:ident, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::SimError::$kind(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_sim;
