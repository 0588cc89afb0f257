use super::drag::drag_force;
use super::gravity::gravity_acceleration;
use crate::atmosphere::AtmosphereModel;
use crate::constants::SPEED_EPSILON;
use crate::models::{FlightState, RocketDescriptor};
use nalgebra as na;

pub trait EquationsOfMotion {
    type State;

    fn compute_derivative(&self, state: &Self::State) -> Self::State;
}

/// Three degree of freedom point mass: thrust, drag and gravity.
///
/// While on the rail all motion is projected onto the rail axis and the
/// vehicle cannot slide back down. Off the rail the thrust follows the
/// inertial velocity.
pub struct PointMassDynamics<'a> {
    rocket: &'a RocketDescriptor,
    atmosphere: &'a dyn AtmosphereModel,
    launch_elevation: f64,
    rail_direction: na::Vector3<f64>,
    on_rail: bool,
    recovery_drag_area: f64,
}

impl<'a> PointMassDynamics<'a> {
    pub fn new(
        rocket: &'a RocketDescriptor,
        atmosphere: &'a dyn AtmosphereModel,
        launch_elevation: f64,
        rail_direction: na::Vector3<f64>,
    ) -> Self {
        Self {
            rocket,
            atmosphere,
            launch_elevation,
            rail_direction,
            on_rail: true,
            recovery_drag_area: 0.0,
        }
    }

    pub fn off_rail(mut self, off_rail: bool) -> Self {
        self.on_rail = !off_rail;
        self
    }

    /// CD·S of the deployed recovery devices, added to the airframe's.
    pub fn with_recovery_drag_area(mut self, drag_area: f64) -> Self {
        self.recovery_drag_area = drag_area;
        self
    }

    pub fn air_relative_velocity(&self, state: &FlightState) -> na::Vector3<f64> {
        state.velocity - self.atmosphere.wind(self.launch_elevation + state.altitude_agl())
    }

    fn thrust_axis(&self, state: &FlightState) -> na::Vector3<f64> {
        if self.on_rail || state.speed() < SPEED_EPSILON {
            self.rail_direction
        } else {
            state.velocity.normalize()
        }
    }
}

impl EquationsOfMotion for PointMassDynamics<'_> {
    type State = FlightState;

    fn compute_derivative(&self, state: &FlightState) -> FlightState {
        let t = state.time;
        let altitude = self.launch_elevation + state.altitude_agl();
        let mass = self.rocket.total_mass(t);

        let drag_area =
            self.rocket.drag_coefficient(t) * self.rocket.reference_area() + self.recovery_drag_area;
        let drag = drag_force(
            drag_area,
            self.atmosphere.density(altitude),
            &self.air_relative_velocity(state),
        );
        let thrust = self.thrust_axis(state) * self.rocket.motor().thrust(t);

        let mut acceleration = (thrust + drag) / mass + gravity_acceleration(altitude);

        if self.on_rail {
            let along_rail = acceleration.dot(&self.rail_direction);
            let speed_along_rail = state.velocity.dot(&self.rail_direction);
            acceleration = if speed_along_rail <= 0.0 && along_rail < 0.0 {
                na::Vector3::zeros()
            } else {
                self.rail_direction * along_rail
            };
        }

        FlightState {
            time: 1.0,
            position: state.velocity,
            velocity: acceleration,
        }
    }
}
