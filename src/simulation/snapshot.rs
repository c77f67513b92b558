//! Trajectory recording
//!
//! The output matrix has one row per snapshot and `3n` columns. Row 0 is the
//! initial state, row `t / output_steps` the state after step `t`, and the last
//! row is always the end-of-run state. Every row is written exactly once, in
//! increasing order.
//!
//! Aligned runs (`num_steps` a multiple of `output_steps`) differ from a loop
//! that fills the last row at step `(num_outputs - 1) * output_steps`: here
//! that row holds the end-of-run state instead.

use crate::error::{Result, SimError};
use crate::matrix::Matrix;
use crate::simulation::states::System;

#[derive(Debug)]
pub struct SnapshotRecorder {
    output: Matrix,
    output_steps: usize,
    next_row: usize,
}

impl SnapshotRecorder {
    /// Allocate a `num_outputs x 3n` trajectory
    pub fn new(num_outputs: usize, n: usize, output_steps: usize) -> Result<Self> {
        let cols = n
            .checked_mul(3)
            .ok_or(SimError::Allocation { rows: num_outputs, cols: usize::MAX })?;
        Ok(Self {
            output: Matrix::create(num_outputs, cols)?,
            output_steps: output_steps.max(1),
            next_row: 0,
        })
    }

    pub fn num_outputs(&self) -> usize {
        self.output.rows()
    }

    pub fn rows_written(&self) -> usize {
        self.next_row
    }

    fn last_row(&self) -> usize {
        self.output.rows().saturating_sub(1)
    }

    fn write(&mut self, row: usize, sys: &System) {
        debug_assert_eq!(row, self.next_row, "snapshot rows must be written in order");
        sys.write_positions(self.output.row_mut(row));
        self.next_row = row + 1;
    }

    /// Row 0: positions before the first step
    pub fn record_initial(&mut self, sys: &System) -> usize {
        self.write(0, sys);
        0
    }

    /// Called after integrating step `t`
    /// Writes row `t / output_steps` when `t` lands on an output boundary;
    /// the last row is left for [`finalize`](Self::finalize)
    pub fn record_step(&mut self, t: usize, sys: &System) -> Option<usize> {
        if t % self.output_steps != 0 {
            return None;
        }
        let row = t / self.output_steps;
        if row >= self.last_row() {
            return None;
        }
        self.write(row, sys);
        Some(row)
    }

    /// Write the last row with the end-of-run state
    /// A single-row trajectory keeps its initial state in row 0
    pub fn finalize(&mut self, sys: &System) -> Option<usize> {
        let row = self.last_row();
        if row < self.next_row {
            return None;
        }
        self.write(row, sys);
        Some(row)
    }

    /// Hand back the completed trajectory
    pub fn into_output(self) -> Result<Matrix> {
        if self.next_row != self.output.rows() {
            return Err(SimError::IncompleteTrajectory {
                written: self.next_row,
                expected: self.output.rows(),
            });
        }
        Ok(self.output)
    }
}
