//! Fixed-step semi-implicit (symplectic) Euler integrator
//!
//! Velocities are kicked with forces evaluated at the start of the step, then
//! positions drift with the already-updated velocities

use super::forces::ForceSet;
use super::states::{Body, NVec3, System};

/// Advance a single body by one step of size `dt` under `force`
/// v_n+1 = v_n + (F / m) dt
/// x_n+1 = x_n + v_n+1 dt
#[inline]
pub fn integrate_body(body: &mut Body, force: &NVec3, dt: f64) {
    body.v += (*force / body.m) * dt;
    body.x += body.v * dt;
}

/// Advance the whole system by one step on the calling thread
/// `force_buf` is scratch space with one slot per body; it is overwritten
pub fn semi_implicit_euler(sys: &mut System, forces: &ForceSet, force_buf: &mut [NVec3], dt: f64) {
    if sys.bodies.is_empty() {
        return;
    }

    // F_n from x_n, all pairs finished before any body moves
    forces.accumulate_forces(sys, force_buf);

    for (b, f) in sys.bodies.iter_mut().zip(force_buf.iter()) {
        integrate_body(b, f, dt);
    }

    sys.t += dt;
}
