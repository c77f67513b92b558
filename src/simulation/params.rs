//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the run schedule derived once from the command line:
//! - step size and total simulated time,
//! - number of steps, steps between snapshots and number of snapshot rows
//!
//! `Physics` holds the gravitational constant and softening term handed to
//! the force law

use crate::error::{Result, SimError};

/// Gravitational constant in N m^2 / kg^2
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743015e-11;

/// Softening added to squared distances (m^2)
pub const SOFTENING: f64 = 1e-9;

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub G: f64, // gravitational constant
    pub softening: f64, // epsilon added to |r|^2
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            G: GRAVITATIONAL_CONSTANT,
            softening: SOFTENING,
        }
    }
}

impl Physics {
    /// G must be finite and non-negative, softening finite and positive
    pub fn validate(&self) -> Result<()> {
        if !(self.G.is_finite() && self.G >= 0.0) {
            return Err(SimError::InvalidPhysics { name: "G", value: self.G });
        }
        if !(self.softening.is_finite() && self.softening > 0.0) {
            return Err(SimError::InvalidPhysics {
                name: "softening",
                value: self.softening,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub time_step: f64, // dt (s)
    pub total_time: f64, // simulated time span (s)
    pub num_steps: usize, // round(total_time / time_step)
    pub output_steps: usize, // steps between snapshot rows, >= 1
    pub num_outputs: usize, // rows in the trajectory
}

impl Parameters {
    /// Validate the schedule and derive step and output counts
    pub fn derive(time_step: f64, total_time: f64, outputs_per_body: usize) -> Result<Self> {
        let valid = time_step.is_finite()
            && total_time.is_finite()
            && time_step > 0.0
            && total_time > 0.0
            && time_step <= total_time;
        if !valid {
            return Err(SimError::InvalidTiming { time_step, total_time });
        }
        if outputs_per_body == 0 {
            return Err(SimError::NoOutputs);
        }

        let num_steps = ((total_time / time_step).round() as usize).max(1);
        let output_steps = (num_steps / outputs_per_body).max(1);
        let num_outputs = num_steps.div_ceil(output_steps);

        Ok(Self {
            time_step,
            total_time,
            num_steps,
            output_steps,
            num_outputs,
        })
    }
}
