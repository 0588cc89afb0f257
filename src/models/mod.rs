pub mod motor;
pub mod rocket;
pub mod state;

pub use motor::{build_motor, GrainGeometry, GrainParameters, MotorDescriptor, MotorGeometry, ThrustCurve};
pub use rocket::{
    build_rocket, AerodynamicSurface, Airframe, CoordinateSystemOrientation, MountedMotor, NoseCone,
    NoseKind, RocketAssembly, RocketDescriptor, TrapezoidalFins,
};
pub use state::FlightState;
