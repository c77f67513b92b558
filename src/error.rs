//! Error type shared by the library
//!
//! Every failure aborts a run before or instead of producing output; the
//! simulation loop itself never fails (close encounters are absorbed by the
//! softening term).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating arguments, reading input or allocating
/// run state.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("time-step and total-time must be positive with total-time >= time-step (got time-step = {time_step}, total-time = {total_time})")]
    InvalidTiming { time_step: f64, total_time: f64 },

    #[error("outputs-per-body must be positive")]
    NoOutputs,

    #[error("num-threads must be positive")]
    NoThreads,

    #[error("invalid physics constant {name} = {value}")]
    InvalidPhysics { name: &'static str, value: f64 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed npy data: {0}")]
    Npy(String),

    #[error("malformed scenario file: {0}")]
    Scenario(#[from] serde_yaml::Error),

    #[error("input must have 7 columns, found {0}")]
    InputColumns(usize),

    #[error("input must have at least 1 row")]
    NoBodies,

    #[error("body {index} has invalid mass {mass} (must be positive and finite)")]
    InvalidMass { index: usize, mass: f64 },

    #[error("body {index} has a non-finite position or velocity")]
    NonFiniteState { index: usize },

    #[error("body {index}: expected a 3-vector for {field}, found {len} components")]
    VectorLength {
        index: usize,
        field: &'static str,
        len: usize,
    },

    #[error("{len} values cannot form a {rows}x{cols} matrix")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("could not allocate a {rows}x{cols} matrix")]
    Allocation { rows: usize, cols: usize },

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("trajectory incomplete: {written} of {expected} rows written")]
    IncompleteTrajectory { written: usize, expected: usize },
}

impl SimError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
