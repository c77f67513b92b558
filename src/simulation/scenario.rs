//! Build fully-initialized simulation scenarios from input data
//!
//! Takes an `n x 7` input matrix or a `ScenarioConfig` (YAML-facing) and
//! produces a runtime bundle containing:
//! - physical constants (`Physics`)
//! - system state (`System` with bodies at t = 0)
//! - active force set (`ForceSet`)
//!
//! The engine consumes a `Scenario` together with the run `Parameters`

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::error::{Result, SimError};
use crate::matrix::Matrix;
use crate::simulation::forces::ForceSet;
use crate::simulation::params::Physics;
use crate::simulation::states::{Body, NVec3, System};

pub struct Scenario {
    pub physics: Physics,
    pub system: System,
    pub forces: ForceSet,
}

impl Scenario {
    /// Bodies from an input matrix, gravity from `physics`
    pub fn from_matrix(input: &Matrix, physics: Physics) -> Result<Self> {
        physics.validate()?;
        let system = System::from_matrix(input)?;
        Ok(Self::assemble(system, physics))
    }

    /// Bodies and constants from a YAML scenario
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let physics = cfg.physics.to_physics();
        physics.validate()?;

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(index, bc)| body_from_config(index, bc))
            .collect::<Result<Vec<_>>>()?;

        let system = System::new(bodies)?;
        Ok(Self::assemble(system, physics))
    }

    fn assemble(system: System, physics: Physics) -> Self {
        Self {
            physics,
            system,
            forces: ForceSet::gravity(physics),
        }
    }
}

fn body_from_config(index: usize, bc: &BodyConfig) -> Result<Body> {
    let vec3 = |field: &'static str, raw: &[f64]| match raw {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(SimError::VectorLength {
            index,
            field,
            len: raw.len(),
        }),
    };
    Ok(Body::new(bc.m, vec3("x", &bc.x)?, vec3("v", &bc.v)?))
}
