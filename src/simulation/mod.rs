pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod scenario;
pub mod scheduler;
pub mod snapshot;
pub mod observer;
