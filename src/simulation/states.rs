//! Core state types for the N-body simulation.
//!
//! `Body` holds one point mass, `System` the fixed-size collection of bodies
//! for a run plus the current simulation time `t`.

use nalgebra::Vector3;

use crate::error::{Result, SimError};
use crate::matrix::Matrix;

pub type NVec3 = Vector3<f64>;

/// Columns of an input row: mass, position, velocity
pub const INPUT_COLS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position (m)
    pub v: NVec3, // velocity (m/s)
    pub m: f64, // mass (kg)
}

impl Body {
    pub fn new(m: f64, x: NVec3, v: NVec3) -> Self {
        Self { x, v, m }
    }

    pub fn momentum(&self) -> NVec3 {
        self.m * self.v
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // body order is fixed for the run
    pub t: f64, // time
}

impl System {
    /// Build a system from validated bodies
    /// Rejects empty systems, non-positive masses and non-finite state
    pub fn new(bodies: Vec<Body>) -> Result<Self> {
        if bodies.is_empty() {
            return Err(SimError::NoBodies);
        }
        for (index, b) in bodies.iter().enumerate() {
            if !(b.m.is_finite() && b.m > 0.0) {
                return Err(SimError::InvalidMass { index, mass: b.m });
            }
            if !(b.x.iter().all(|c| c.is_finite()) && b.v.iter().all(|c| c.is_finite())) {
                return Err(SimError::NonFiniteState { index });
            }
        }
        Ok(Self { bodies, t: 0.0 })
    }

    /// Load bodies from an `n x 7` matrix with columns
    /// `[m, x, y, z, vx, vy, vz]`
    pub fn from_matrix(input: &Matrix) -> Result<Self> {
        if input.cols() != INPUT_COLS {
            return Err(SimError::InputColumns(input.cols()));
        }
        if input.rows() == 0 {
            return Err(SimError::NoBodies);
        }

        let bodies = (0..input.rows())
            .map(|i| {
                let r = input.row(i);
                Body::new(
                    r[0],
                    NVec3::new(r[1], r[2], r[3]),
                    NVec3::new(r[4], r[5], r[6]),
                )
            })
            .collect();
        Self::new(bodies)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, i: usize) -> Option<&Body> {
        self.bodies.get(i)
    }

    pub fn mass(&self, i: usize) -> Option<f64> {
        self.bodies.get(i).map(|b| b.m)
    }

    pub fn position(&self, i: usize) -> Option<NVec3> {
        self.bodies.get(i).map(|b| b.x)
    }

    pub fn velocity(&self, i: usize) -> Option<NVec3> {
        self.bodies.get(i).map(|b| b.v)
    }

    /// Copy all positions into `out` as `[x0, y0, z0, x1, ...]`
    /// `out` must be exactly `3n` long
    pub fn write_positions(&self, out: &mut [f64]) {
        assert_eq!(out.len(), 3 * self.bodies.len(), "position row must be 3n wide");
        for (chunk, b) in out.chunks_exact_mut(3).zip(&self.bodies) {
            chunk.copy_from_slice(b.x.as_slice());
        }
    }

    /// Flattened `3n` position vector
    pub fn positions(&self) -> Vec<f64> {
        let mut out = vec![0.0; 3 * self.bodies.len()];
        self.write_positions(&mut out);
        out
    }

    /// Total linear momentum, sum of m * v
    pub fn total_momentum(&self) -> NVec3 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Total kinetic energy, sum of m |v|^2 / 2
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum()
    }
}
