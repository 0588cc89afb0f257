use super::design_errors::DesignError;
use crate::config::design::{MotorDesign, ParachuteDesign};
use crate::constants::PI;

/// Minimum number of recovery devices on a vehicle (drogue + main).
pub const MIN_RECOVERY_DEVICES: usize = 2;

/// Rejects zero, negative and NaN values.
pub(crate) fn require_positive(parameter: &'static str, value: f64) -> Result<f64, DesignError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(DesignError::NonPositive { parameter, value })
    }
}

pub(crate) fn require_non_negative(
    parameter: &'static str,
    value: f64,
) -> Result<f64, DesignError> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(DesignError::Negative { parameter, value })
    }
}

/// Annular cross-section of a hollow cylindrical grain.
pub fn grain_annulus_area(outer_radius: f64, inner_radius: f64) -> f64 {
    PI * (outer_radius.powi(2) - inner_radius.powi(2))
}

/// Propellant density from the measured propellant mass and the grain stack geometry:
/// `m / (n · π(R² - r²) · L)`.
pub fn derive_grain_density(
    propellant_mass: f64,
    grain_count: u32,
    outer_radius: f64,
    inner_radius: f64,
    grain_length: f64,
) -> Result<f64, DesignError> {
    require_positive("propellant_mass", propellant_mass)?;
    if grain_count == 0 {
        return Err(DesignError::NonPositive {
            parameter: "grain_count",
            value: 0.0,
        });
    }
    require_positive("grain_length", grain_length)?;
    require_non_negative("grain_inner_radius", inner_radius)?;
    if !(outer_radius > inner_radius) {
        return Err(DesignError::InvalidGrainRadii {
            outer: outer_radius,
            inner: inner_radius,
        });
    }

    let grain_volume = grain_annulus_area(outer_radius, inner_radius) * grain_length;
    Ok(propellant_mass / (grain_count as f64 * grain_volume))
}

/// Drag area of a circular canopy: `cd · π(d/2)²`.
pub fn derive_drag_area(cd: f64, diameter: f64) -> Result<f64, DesignError> {
    require_positive("parachute_diameter", diameter)?;
    require_positive("parachute_cd", cd)?;
    Ok(cd * PI * (diameter / 2.0).powi(2))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMotorParameters {
    pub grain_density: f64, // kg/m³
}

impl DerivedMotorParameters {
    pub fn from_design(motor: &MotorDesign) -> Result<Self, DesignError> {
        let grain_density = derive_grain_density(
            motor.propellant_mass,
            motor.grain_count,
            motor.grain_outer_radius,
            motor.grain_inner_radius,
            motor.grain_length,
        )?;
        Ok(Self { grain_density })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedParachute {
    pub name: String,
    pub drag_area: f64, // m²
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecoveryParameters {
    pub parachutes: Vec<DerivedParachute>,
}

impl DerivedRecoveryParameters {
    pub fn from_design(parachutes: &[ParachuteDesign]) -> Result<Self, DesignError> {
        if parachutes.len() < MIN_RECOVERY_DEVICES {
            return Err(DesignError::TooFewRecoveryDevices {
                required: MIN_RECOVERY_DEVICES,
                count: parachutes.len(),
            });
        }

        let parachutes = parachutes
            .iter()
            .map(|p| {
                Ok(DerivedParachute {
                    name: p.name.clone(),
                    drag_area: derive_drag_area(p.cd, p.diameter)?,
                })
            })
            .collect::<Result<Vec<_>, DesignError>>()?;

        Ok(Self { parachutes })
    }

    pub fn drag_area(&self, name: &str) -> Option<f64> {
        self.parachutes
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.drag_area)
    }
}
