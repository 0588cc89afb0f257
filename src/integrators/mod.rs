pub mod point_mass;
pub mod rk4;

pub use point_mass::PointMassIntegrator;
pub use rk4::rk4_step;
