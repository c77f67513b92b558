pub mod simulation;
pub mod configuration;
pub mod matrix;
pub mod error;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3, INPUT_COLS};
pub use simulation::forces::{distance, gravitation, potential_energy, softened_distance_squared, ForceSet, NewtonianGravity, PairForce};
pub use simulation::integrator::{integrate_body, semi_implicit_euler};
pub use simulation::params::{Parameters, Physics, GRAVITATIONAL_CONSTANT, SOFTENING};
pub use simulation::scenario::Scenario;
pub use simulation::scheduler::StepScheduler;
pub use simulation::snapshot::SnapshotRecorder;
pub use simulation::observer::{ProgressLog, StepObserver};
pub use simulation::engine::{Engine, EngineState};

pub use configuration::config::{is_yaml_path, resolve_threads, BodyConfig, PhysicsConfig, ScenarioConfig};

pub use matrix::Matrix;
pub use error::{Result, SimError};

pub use benchmark::benchmark::{bench_forces, bench_threads, make_system};
