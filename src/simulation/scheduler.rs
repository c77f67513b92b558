//! Parallel step scheduler
//!
//! A rayon pool is built once per run and reused for every step. Each step
//! has two fork-join phases; `install` only returns once every task of a phase
//! has finished, which is the barrier between force evaluation, integration
//! and the (single-threaded) snapshot that follows.
//!
//! Force phase: the pair triangle `j < i` is walked row by row. Row `k` is
//! paired with its mirror row `n - 1 - k` so every task carries roughly `n`
//! pair evaluations, and rayon's work stealing balances whatever is left.
//! Each worker accumulates into its own force buffer, picked by its index in
//! the pool, so no two threads ever write the same slot. The buffers live as
//! long as the scheduler and are summed into the caller's buffer after the
//! phase.
//!
//! Integration phase: one task per body slot, no sharing.

use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SimError};
use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::integrate_body;
use crate::simulation::states::{Body, NVec3, System};

pub struct StepScheduler {
    pool: Option<ThreadPool>, // None when running on the caller's thread
    partials: Vec<Mutex<Vec<NVec3>>>, // one force buffer per worker
    threads: usize,
}

impl StepScheduler {
    /// Start a pool of `threads` workers for the lifetime of a run
    /// A single thread runs everything sequentially and builds no pool
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(SimError::NoThreads);
        }
        if threads == 1 {
            return Ok(Self {
                pool: None,
                partials: Vec::new(),
                threads,
            });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("gravsim-worker-{i}"))
            .build()?;
        let partials = (0..threads).map(|_| Mutex::new(Vec::new())).collect();
        Ok(Self {
            pool: Some(pool),
            partials,
            threads,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Net force on every body, written into `out`
    /// Equal to `ForceSet::accumulate_forces` up to floating-point reassociation
    pub fn compute_forces(&self, forces: &ForceSet, sys: &System, out: &mut [NVec3]) {
        assert_eq!(out.len(), sys.bodies.len(), "force buffer must hold one vector per body");

        let Some(pool) = &self.pool else {
            forces.accumulate_forces(sys, out);
            return;
        };

        let n = sys.bodies.len();
        let bodies = &sys.bodies[..];
        let rows = n.div_ceil(2);
        let partials = &self.partials[..];

        pool.install(|| {
            (0..rows).into_par_iter().for_each(|k| {
                let slot = rayon::current_thread_index().unwrap_or(0) % partials.len();
                let mut local = partials[slot].lock().unwrap_or_else(PoisonError::into_inner);
                if local.len() != n {
                    local.clear();
                    local.resize(n, NVec3::zeros());
                }
                accumulate_row(forces, bodies, k, &mut local);
                let mirror = n - 1 - k;
                if mirror != k {
                    accumulate_row(forces, bodies, mirror, &mut local);
                }
            });
        });

        // sum the worker buffers, leaving them zeroed for the next step
        out.fill(NVec3::zeros());
        for partial in partials {
            let mut local = partial.lock().unwrap_or_else(PoisonError::into_inner);
            if local.len() != n {
                continue;
            }
            for (o, l) in out.iter_mut().zip(local.iter_mut()) {
                *o += *l;
                *l = NVec3::zeros();
            }
        }
    }

    /// Advance every body by `dt` with the finished forces, then advance `sys.t`
    pub fn integrate(&self, sys: &mut System, forces: &[NVec3], dt: f64) {
        assert_eq!(forces.len(), sys.bodies.len(), "force buffer must hold one vector per body");

        match &self.pool {
            None => {
                for (b, f) in sys.bodies.iter_mut().zip(forces) {
                    integrate_body(b, f, dt);
                }
            }
            Some(pool) => pool.install(|| {
                sys.bodies
                    .par_iter_mut()
                    .zip(forces.par_iter())
                    .for_each(|(b, f)| integrate_body(b, f, dt));
            }),
        }

        sys.t += dt;
    }

    /// One full step: force phase, barrier, integration phase, barrier
    pub fn step(&self, forces: &ForceSet, sys: &mut System, force_buf: &mut [NVec3], dt: f64) {
        self.compute_forces(forces, sys, force_buf);
        self.integrate(sys, force_buf, dt);
    }
}

/// Row `i` of the pair triangle: every pair (i, j) with j < i
fn accumulate_row(forces: &ForceSet, bodies: &[Body], i: usize, local: &mut [NVec3]) {
    let bi = &bodies[i];
    for (j, bj) in bodies[..i].iter().enumerate() {
        let f = forces.pair_force(bi, bj);
        local[i] += f;
        local[j] -= f;
    }
}
