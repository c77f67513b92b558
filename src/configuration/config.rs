//! Configuration types for loading simulation scenarios from YAML.
//!
//! Besides `.npy` matrices, a run can start from a small YAML scenario. A
//! scenario consists of:
//!
//! - [`PhysicsConfig`]  – physical constants (optional, defaults to SI gravity)
//! - [`BodyConfig`]     – initial state for each body
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An Earth–Moon scenario matching these types:
//!
//! ```yaml
//! physics:
//!   G: 6.6743015e-11          # gravitational constant
//!   softening: 1.0e-9         # added to squared distances
//!
//! bodies:
//!   - m: 5.97e24
//!     x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, -12.5, 0.0 ]
//!   - m: 7.35e22
//!     x: [ 3.844e8, 0.0, 0.0 ]
//!     v: [ 0.0, 1022.0, 0.0 ]
//! ```
//!
//! This module also resolves the worker thread count for a run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::simulation::params::{Physics, GRAVITATIONAL_CONSTANT, SOFTENING};

/// Physical constants of a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    #[serde(default = "default_g")]
    pub G: f64, // gravitational constant
    #[serde(default = "default_softening")]
    pub softening: f64, // prevents singular forces at tiny separations
}

fn default_g() -> f64 {
    GRAVITATIONAL_CONSTANT
}

fn default_softening() -> f64 {
    SOFTENING
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            G: default_g(),
            softening: default_softening(),
        }
    }
}

impl PhysicsConfig {
    pub fn to_physics(&self) -> Physics {
        Physics {
            G: self.G,
            softening: self.softening,
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub m: f64, // mass (kg)
    pub x: Vec<f64>, // initial position (m)
    pub v: Vec<f64>, // initial velocity (m/s)
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SimError::io(path, e))?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// True for `.yaml` / `.yml` paths
pub fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("yaml" | "yml")
    )
}

/// Pick the worker count for a run of `n` bodies
/// - an explicit request must be positive
/// - the default is the number of physical cores
/// - never more threads than bodies
pub fn resolve_threads(requested: Option<usize>, n: usize) -> Result<usize> {
    let threads = match requested {
        Some(0) => return Err(SimError::NoThreads),
        Some(t) => t,
        None => {
            let t = num_cpus::get_physical().max(1);
            info!("num-threads not given, using {t} (physical cores)");
            t
        }
    };

    let limit = n.max(1);
    if threads > limit {
        if requested.is_some() {
            warn!("num-threads {threads} exceeds body count, using {limit}");
        }
        return Ok(limit);
    }
    Ok(threads)
}
