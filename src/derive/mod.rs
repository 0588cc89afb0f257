pub mod design_errors;
pub mod parameters;

pub use design_errors::DesignError;
pub use parameters::{
    derive_drag_area, derive_grain_density, DerivedMotorParameters, DerivedParachute,
    DerivedRecoveryParameters,
};
