pub mod flight_errors;
pub mod launch;
pub mod orchestrator;
pub mod report;
pub mod result;

pub use flight_errors::FlightError;
pub use launch::LaunchConfig;
pub use orchestrator::{run_flight, run_flight_seeded, run_flight_with, TrajectoryIntegrator};
pub use report::FlightReport;
pub use result::{EventKind, FlightEvent, FlightResult, FlightSample, TerminationReason, Trajectory};
