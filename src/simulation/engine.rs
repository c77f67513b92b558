//! Simulation driver
//!
//! Runs the step loop as an explicit state machine:
//!
//! `Initialized -> Stepping { t = 1 .. num_steps - 1 } -> Finalizing -> Done`
//!
//! Each `Stepping` transition evaluates forces and integrates on the worker
//! pool, then (back on the driver thread) notifies the observer and records a
//! snapshot if `t` lands on an output boundary. There is no early exit.

use log::{debug, info};

use crate::error::{Result, SimError};
use crate::matrix::Matrix;
use crate::simulation::forces::ForceSet;
use crate::simulation::observer::StepObserver;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;
use crate::simulation::scheduler::StepScheduler;
use crate::simulation::snapshot::SnapshotRecorder;
use crate::simulation::states::{NVec3, System};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initialized,
    Stepping { t: usize },
    Finalizing,
    Done,
}

pub struct Engine {
    parameters: Parameters,
    system: System,
    forces: ForceSet,
    scheduler: StepScheduler,
    recorder: SnapshotRecorder,
    force_buf: Vec<NVec3>,
    state: EngineState,
}

impl Engine {
    /// Allocate run state and start the worker pool
    /// `threads` must already be resolved (see `resolve_threads`)
    pub fn new(scenario: Scenario, parameters: Parameters, threads: usize) -> Result<Self> {
        let n = scenario.system.len();
        let scheduler = StepScheduler::new(threads)?;
        let recorder = SnapshotRecorder::new(parameters.num_outputs, n, parameters.output_steps)?;

        let mut force_buf = Vec::new();
        force_buf
            .try_reserve_exact(n)
            .map_err(|_| SimError::Allocation { rows: n, cols: 3 })?;
        force_buf.resize(n, NVec3::zeros());

        info!(
            "{} bodies, {} steps of {} s, {} outputs every {} steps, {} threads",
            n,
            parameters.num_steps,
            parameters.time_step,
            parameters.num_outputs,
            parameters.output_steps,
            scheduler.threads()
        );

        Ok(Self {
            parameters,
            system: scenario.system,
            forces: scenario.forces,
            scheduler,
            recorder,
            force_buf,
            state: EngineState::Initialized,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn threads(&self) -> usize {
        self.scheduler.threads()
    }

    /// State after step `t`, or Finalizing once the loop is exhausted
    fn stepping_from(&self, t: usize) -> EngineState {
        if t < self.parameters.num_steps {
            EngineState::Stepping { t }
        } else {
            EngineState::Finalizing
        }
    }

    /// Perform one state transition and return the new state
    pub fn advance(&mut self, observer: &mut dyn StepObserver) -> EngineState {
        self.state = match self.state {
            EngineState::Initialized => {
                let row = self.recorder.record_initial(&self.system);
                observer.on_snapshot(row, &self.system);
                self.stepping_from(1)
            }
            EngineState::Stepping { t } => {
                self.scheduler.step(
                    &self.forces,
                    &mut self.system,
                    &mut self.force_buf,
                    self.parameters.time_step,
                );
                observer.on_step(t, &self.system);
                if let Some(row) = self.recorder.record_step(t, &self.system) {
                    observer.on_snapshot(row, &self.system);
                }
                self.stepping_from(t + 1)
            }
            EngineState::Finalizing => {
                if let Some(row) = self.recorder.finalize(&self.system) {
                    debug!("final state written to row {row}");
                    observer.on_snapshot(row, &self.system);
                }
                EngineState::Done
            }
            EngineState::Done => EngineState::Done,
        };
        self.state
    }

    /// Drive the state machine until `Done`
    pub fn run_to_end(&mut self, observer: &mut dyn StepObserver) {
        while self.state != EngineState::Done {
            self.advance(observer);
        }
    }

    /// Run to completion and return the trajectory
    pub fn run(self) -> Result<Matrix> {
        self.run_with(&mut ())
    }

    pub fn run_with(mut self, observer: &mut dyn StepObserver) -> Result<Matrix> {
        self.run_to_end(observer);
        self.into_trajectory()
    }

    /// The recorded trajectory; fails unless the run reached `Done`
    pub fn into_trajectory(self) -> Result<Matrix> {
        self.recorder.into_output()
    }
}
