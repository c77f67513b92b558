//! Optional hooks called by the engine between steps
//!
//! Observers run on the driver thread after a step's integration barrier,
//! never inside the force loop.

use log::debug;

use crate::simulation::forces::potential_energy;
use crate::simulation::params::Physics;
use crate::simulation::states::System;

pub trait StepObserver {
    /// After step `step` has been integrated
    fn on_step(&mut self, _step: usize, _system: &System) {}

    /// After `row` of the trajectory has been written
    fn on_snapshot(&mut self, _row: usize, _system: &System) {}
}

/// No-op observer
impl StepObserver for () {}

/// Logs progress and conserved quantities at `debug` level
/// Potential energy is O(n²), so it is only evaluated on logged steps
pub struct ProgressLog {
    every: usize,
    total_steps: usize,
    physics: Physics,
}

impl ProgressLog {
    /// Log every `every` steps out of `total_steps`
    pub fn new(every: usize, total_steps: usize, physics: Physics) -> Self {
        Self {
            every: every.max(1),
            total_steps,
            physics,
        }
    }

    pub fn every(&self) -> usize {
        self.every
    }

    /// Whether step `step` gets a log line
    pub fn logs_step(&self, step: usize) -> bool {
        step % self.every == 0
    }
}

impl StepObserver for ProgressLog {
    fn on_step(&mut self, step: usize, system: &System) {
        if self.logs_step(step) && log::log_enabled!(log::Level::Debug) {
            let p = system.total_momentum();
            let ke = system.kinetic_energy();
            let pe = potential_energy(system, &self.physics);
            debug!(
                "step {}/{} t = {:.6e} s, |p| = {:.6e}, KE = {:.6e}, PE = {:.6e}, E = {:.6e}",
                step,
                self.total_steps,
                system.t,
                p.norm(),
                ke,
                pe,
                ke + pe
            );
        }
    }

    fn on_snapshot(&mut self, row: usize, system: &System) {
        debug!("snapshot row {} at t = {:.6e} s", row, system.t);
    }
}
