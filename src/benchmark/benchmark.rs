use std::time::Instant;

use crate::simulation::forces::ForceSet;
use crate::simulation::params::Physics;
use crate::simulation::scheduler::StepScheduler;
use crate::simulation::states::{Body, NVec3, System};
use crate::error::Result;

/// Helper to build a deterministic system of size `n`
pub fn make_system(n: usize) -> Result<System> {
    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0e9,
                (i_f * 0.13).cos() * 5.0e9,
                (i_f * 0.07).sin() * 5.0e9,
            );
            Body::new(1.0e24, x, NVec3::zeros())
        })
        .collect();
    System::new(bodies)
}

/// Time one force evaluation, sequential vs parallel
pub fn bench_forces(threads: usize) -> Result<()> {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let forces = ForceSet::gravity(Physics::default());
    let serial = StepScheduler::new(1)?;
    let parallel = StepScheduler::new(threads)?;

    for n in ns {
        let sys = make_system(n)?;
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        parallel.compute_forces(&forces, &sys, &mut out);

        let t0 = Instant::now();
        serial.compute_forces(&forces, &sys, &mut out);
        let dt_serial = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        parallel.compute_forces(&forces, &sys, &mut out);
        let dt_parallel = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, 1 thread = {:8.6} s, {threads} threads = {:8.6} s, speedup = {:5.2}",
            dt_serial,
            dt_parallel,
            dt_serial / dt_parallel
        );
    }
    Ok(())
}

/// Per-step time for `n` bodies against thread count
/// Paste output directly into a spreadsheet to graph
pub fn bench_threads(n: usize, max_threads: usize) -> Result<()> {
    let forces = ForceSet::gravity(Physics::default());
    let template = make_system(n)?;
    let steps = if n <= 1000 { 20 } else { 3 };

    println!("threads,step_ms");
    for threads in 1..=max_threads.max(1) {
        let scheduler = StepScheduler::new(threads)?;
        let mut sys = template.clone();
        let mut buf = vec![NVec3::zeros(); n];

        let t0 = Instant::now();
        for _ in 0..steps {
            scheduler.step(&forces, &mut sys, &mut buf, 1.0);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", threads, ms);
    }
    Ok(())
}
