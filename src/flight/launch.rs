use crate::config::design::FlightDesign;
use crate::derive::parameters::require_positive;
use crate::derive::DesignError;
use nalgebra as na;

/// Rail geometry and run bound. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchConfig {
    pub rail_length: f64, // m
    pub inclination: f64, // deg above the horizon
    pub heading: f64,     // deg clockwise from north
    pub max_time: f64,    // s
}

impl LaunchConfig {
    pub fn new(
        rail_length: f64,
        inclination: f64,
        heading: f64,
        max_time: f64,
    ) -> Result<Self, DesignError> {
        require_positive("rail_length", rail_length)?;
        require_positive("max_time", max_time)?;
        if !(inclination > 0.0 && inclination <= 90.0) {
            return Err(DesignError::OutOfRange {
                parameter: "inclination",
                value: inclination,
                min: 0.0,
                max: 90.0,
            });
        }
        if !(0.0..360.0).contains(&heading) {
            return Err(DesignError::OutOfRange {
                parameter: "heading",
                value: heading,
                min: 0.0,
                max: 360.0,
            });
        }

        Ok(Self {
            rail_length,
            inclination,
            heading,
            max_time,
        })
    }

    pub fn from_design(design: &FlightDesign) -> Result<Self, DesignError> {
        Self::new(
            design.rail_length,
            design.inclination,
            design.heading,
            design.max_time,
        )
    }

    /// Unit vector along the rail in the pad's east/north/up frame.
    pub fn rail_direction(&self) -> na::Vector3<f64> {
        let inclination = self.inclination.to_radians();
        let heading = self.heading.to_radians();
        na::Vector3::new(
            inclination.cos() * heading.sin(),
            inclination.cos() * heading.cos(),
            inclination.sin(),
        )
    }
}
