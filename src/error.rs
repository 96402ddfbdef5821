//! Error types of `rustcfd`
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SimError>;

/// Everything that can stop a simulation
#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid configuration, detected before the first step
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Conjugate gradient exhausted its iteration cap
    #[error(
        "{operator} solve did not converge in step {step}: \
         residual {residual:.3e} after {iterations} iterations"
    )]
    NonConvergence {
        /// Time step in which the solve failed
        step: usize,
        /// Name of the linear operator
        operator: &'static str,
        /// Iterations performed
        iterations: usize,
        /// Relative residual norm of the returned iterate
        residual: f64,
    },

    /// NaN or Inf appeared in a field
    #[error("non-finite values produced by {stage} in step {step}")]
    NonFinite {
        /// Time step
        step: usize,
        /// Pipeline stage that produced the values
        stage: &'static str,
    },

    /// Configuration file could not be read
    #[error("unable to read {path:?}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("unable to parse configuration")]
    Parse(#[from] toml::de::Error),
}

impl SimError {
    /// Shorthand for [`SimError::Config`]
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}
