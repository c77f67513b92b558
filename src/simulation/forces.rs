//! Force contributors for the n-body engine
//!
//! Pairwise force laws implement [`PairForce`]; a [`ForceSet`] sums its terms
//! and accumulates the net force on every body, visiting each unordered pair
//! once and applying equal and opposite contributions

use crate::simulation::params::Physics;
use crate::simulation::states::{Body, NVec3, System};

/// Euclidean distance between two positions
pub fn distance(a: &NVec3, b: &NVec3) -> f64 {
    (b - a).norm()
}

/// |b - a|^2 + eps
pub fn softened_distance_squared(a: &NVec3, b: &NVec3, softening: f64) -> f64 {
    (b - a).norm_squared() + softening
}

/// Magnitude of the gravitational pull between two masses
/// `d2` is the softened squared distance; symmetric in `m1` and `m2`
#[allow(non_snake_case)]
pub fn gravitation(m1: f64, m2: f64, d2: f64, G: f64) -> f64 {
    G * (m1 * m2) / d2
}

/// A pairwise force law
/// Returns the force on `bi` due to `bj`; implementations must be pure so that
/// pair_force(bj, bi) == -pair_force(bi, bj)
pub trait PairForce {
    fn pair_force(&self, bi: &Body, bj: &Body) -> NVec3;
}

/// Newtonian gravity with softening
/// The direction vector is normalised by the softened distance, so coincident
/// bodies feel a zero (finite) force
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitional constant
    pub softening: f64, // added to |r|^2
}

impl NewtonianGravity {
    pub fn new(physics: Physics) -> Self {
        Self {
            G: physics.G,
            softening: physics.softening,
        }
    }
}

impl PairForce for NewtonianGravity {
    fn pair_force(&self, bi: &Body, bj: &Body) -> NVec3 {
        // r points from i to j, i is pulled along +r
        let r = bj.x - bi.x;
        let d2 = r.norm_squared() + self.softening;
        let magnitude = gravitation(bi.m, bj.m, d2, self.G);

        // F = |F| * r / |r_soft|
        (magnitude / d2.sqrt()) * r
    }
}

/// Collection of pairwise force terms
/// Contributions of all terms are summed into a single force per body
pub struct ForceSet {
    terms: Vec<Box<dyn PairForce + Send + Sync>>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Force set holding only softened Newtonian gravity
    pub fn gravity(physics: Physics) -> Self {
        Self::new().with(NewtonianGravity::new(physics))
    }

    /// Add a force term
    pub fn with(mut self, term: impl PairForce + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum of every term's force on `bi` due to `bj`
    pub fn pair_force(&self, bi: &Body, bj: &Body) -> NVec3 {
        self.terms
            .iter()
            .fold(NVec3::zeros(), |acc, term| acc + term.pair_force(bi, bj))
    }

    /// Compute net forces for all bodies in `sys`
    /// - `out` is zeroed, then each pair force is evaluated once and applied
    ///   as +F to body i and -F to body j
    pub fn accumulate_forces(&self, sys: &System, out: &mut [NVec3]) {
        assert_eq!(out.len(), sys.bodies.len(), "force buffer must hold one vector per body");

        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }

        let n = sys.bodies.len();
        // Each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &sys.bodies[i];
            for j in (i + 1)..n {
                let f = self.pair_force(bi, &sys.bodies[j]);
                out[i] += f;
                out[j] -= f;
            }
        }
    }
}

/// Gravitational potential energy, -G m_i m_j / |r_soft| over all pairs
pub fn potential_energy(sys: &System, physics: &Physics) -> f64 {
    let n = sys.bodies.len();
    let mut energy = 0.0;
    for i in 0..n {
        let bi = &sys.bodies[i];
        for bj in &sys.bodies[(i + 1)..] {
            let d = softened_distance_squared(&bi.x, &bj.x, physics.softening).sqrt();
            energy -= physics.G * bi.m * bj.m / d;
        }
    }
    energy
}
