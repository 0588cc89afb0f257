pub mod drag;
pub mod dynamics;
pub mod gravity;

pub use dynamics::{EquationsOfMotion, PointMassDynamics};
