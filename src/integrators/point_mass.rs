use super::rk4::rk4_step;
use crate::atmosphere::{AtmosphereModel, EnvironmentDescriptor};
use crate::constants::{DEFAULT_TIME_STEP, SPEED_EPSILON};
use crate::derive::parameters::require_positive;
use crate::derive::DesignError;
use crate::flight::{
    EventKind, FlightEvent, FlightSample, LaunchConfig, TerminationReason, Trajectory,
    TrajectoryIntegrator,
};
use crate::models::{FlightState, RocketDescriptor};
use crate::physics::PointMassDynamics;
use crate::recovery::{RecoveryEvaluator, SensorSample};
use rand::Rng;
use tracing::{debug, info};

const TIME_EPSILON: f64 = 1e-9; // s

/// Fixed-step RK4 point-mass integrator.
///
/// The step is never longer than the fastest recovery sampling period, so
/// every device sees every one of its ticks.
#[derive(Debug, Clone, Copy)]
pub struct PointMassIntegrator {
    max_time_step: f64,
}

impl Default for PointMassIntegrator {
    fn default() -> Self {
        Self {
            max_time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl PointMassIntegrator {
    pub fn new(max_time_step: f64) -> Result<Self, DesignError> {
        require_positive("max_time_step", max_time_step)?;
        Ok(Self { max_time_step })
    }

    pub fn time_step(&self, rocket: &RocketDescriptor) -> f64 {
        rocket
            .parachutes
            .iter()
            .map(|p| p.sampling_period())
            .fold(self.max_time_step, f64::min)
    }
}

fn flight_sample(
    state: &FlightState,
    dynamics: &PointMassDynamics,
    environment: &EnvironmentDescriptor,
) -> FlightSample {
    let altitude_asl = environment.site.elevation + state.altitude_agl();
    let air_velocity = dynamics.air_relative_velocity(state);
    let air_speed = air_velocity.magnitude();

    let angle_of_attack = if air_speed < SPEED_EPSILON || state.speed() < SPEED_EPSILON {
        0.0
    } else {
        (state.velocity.dot(&air_velocity) / (state.speed() * air_speed))
            .clamp(-1.0, 1.0)
            .acos()
    };

    FlightSample {
        time: state.time,
        position: state.position,
        velocity: state.velocity,
        altitude_asl,
        mach_number: air_speed / environment.speed_of_sound(altitude_asl),
        angle_of_attack,
    }
}

fn sensor_sample(state: &FlightState, rocket: &RocketDescriptor) -> SensorSample {
    SensorSample {
        time: state.time,
        altitude_agl: state.altitude_agl(),
        vertical_velocity: state.vertical_velocity(),
        motor_burning: rocket.motor().is_burning(state.time),
    }
}

impl TrajectoryIntegrator for PointMassIntegrator {
    fn integrate<R: Rng>(
        &self,
        rocket: &RocketDescriptor,
        environment: &EnvironmentDescriptor,
        launch: &LaunchConfig,
        recovery: &mut RecoveryEvaluator<R>,
    ) -> Trajectory {
        let dt = self.time_step(rocket);
        let rail = launch.rail_direction();
        let elevation = environment.site.elevation;
        let burn_time = rocket.burnout_time();
        debug!(dt, "integrating point-mass trajectory");

        let mut samples = Vec::with_capacity((launch.max_time / dt).min(1e6) as usize + 1);
        let mut events = Vec::new();
        let mut on_rail = true;
        let mut burned_out = false;
        let mut state = FlightState::at_rest(0.0);

        let dynamics = PointMassDynamics::new(rocket, environment, elevation, rail);
        samples.push(flight_sample(&state, &dynamics, environment));
        events.extend(
            recovery
                .poll(&sensor_sample(&state, rocket))
                .iter()
                .filter_map(FlightEvent::from_transition),
        );

        let termination = loop {
            let remaining = launch.max_time - state.time;
            if remaining <= TIME_EPSILON {
                break TerminationReason::MaxTime;
            }

            let dynamics = PointMassDynamics::new(rocket, environment, elevation, rail)
                .off_rail(!on_rail)
                .with_recovery_drag_area(recovery.deployed_drag_area());
            let next = rk4_step(&dynamics, &state, dt.min(remaining));

            if on_rail && next.position.dot(&rail) >= launch.rail_length {
                on_rail = false;
                info!(
                    time = next.time,
                    speed = next.speed(),
                    "left the launch rail"
                );
                events.push(FlightEvent::new(next.time, EventKind::RailDeparture));
            }

            if !burned_out && next.time >= burn_time {
                burned_out = true;
                events.push(FlightEvent::new(burn_time, EventKind::Burnout));
            }

            let (vz0, vz1) = (state.vertical_velocity(), next.vertical_velocity());
            if !on_rail && vz0 > 0.0 && vz1 <= 0.0 {
                let fraction = vz0 / (vz0 - vz1);
                let apogee = state.lerp(&next, fraction);
                info!(
                    time = apogee.time,
                    altitude_agl = apogee.altitude_agl(),
                    "apogee"
                );
                events.push(FlightEvent::new(apogee.time, EventKind::Apogee));
            }

            if !on_rail && next.altitude_agl() <= 0.0 && vz1 < 0.0 {
                let (z0, z1) = (state.altitude_agl(), next.altitude_agl());
                let fraction = if z0 > z1 { z0 / (z0 - z1) } else { 1.0 };
                let impact = state.lerp(&next, fraction);
                samples.push(flight_sample(&impact, &dynamics, environment));
                events.push(FlightEvent::new(impact.time, EventKind::GroundImpact));
                break TerminationReason::GroundImpact;
            }

            state = next;
            samples.push(flight_sample(&state, &dynamics, environment));
            events.extend(
                recovery
                    .poll(&sensor_sample(&state, rocket))
                    .iter()
                    .filter_map(FlightEvent::from_transition),
            );
        };

        Trajectory {
            samples,
            events,
            termination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::LaunchSite;
    use crate::config::RaiderX;
    use crate::derive::{DerivedMotorParameters, DerivedRecoveryParameters};
    use crate::models::{build_rocket, MotorDescriptor};
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    fn raider_x() -> RocketDescriptor {
        let design = RaiderX::design();
        let derived = DerivedMotorParameters::from_design(&design.motor).unwrap();
        let motor = MotorDescriptor::from_design(&design.motor, &derived).unwrap();
        let recovery = DerivedRecoveryParameters::from_design(&design.parachutes).unwrap();
        build_rocket(&design, motor, &recovery).unwrap()
    }

    fn environment() -> EnvironmentDescriptor {
        EnvironmentDescriptor::standard(
            LaunchSite::new(35.5, -102.3, 971.1),
            Epoch::from_gregorian_utc_hms(2025, 10, 12, 18, 0, 0),
        )
    }

    #[test]
    fn step_follows_fastest_sampling_rate() {
        let rocket = raider_x();
        assert_relative_eq!(PointMassIntegrator::default().time_step(&rocket), 1.0 / 105.0);
        let coarse = PointMassIntegrator::new(0.005).unwrap();
        assert_eq!(coarse.time_step(&rocket), 0.005);
        assert!(PointMassIntegrator::new(0.0).is_err());
    }

    #[test]
    fn short_time_bound_stops_airborne() {
        let rocket = raider_x();
        let launch = LaunchConfig::new(5.1816, 84.0, 90.0, 2.0).unwrap();
        let mut recovery = RecoveryEvaluator::seeded(&rocket.parachutes, 1).unwrap();

        let trajectory =
            PointMassIntegrator::default().integrate(&rocket, &environment(), &launch, &mut recovery);

        assert_eq!(trajectory.termination, TerminationReason::MaxTime);
        let last = trajectory.samples.last().unwrap();
        assert_relative_eq!(last.time, 2.0, epsilon = 1e-9);
        assert!(last.altitude_agl() > 50.0);
        assert!(last.position.x > 0.0, "heading 90 flies east");
        assert_eq!(trajectory.events[0].kind, EventKind::RailDeparture);
    }

    #[test]
    fn still_air_has_no_angle_of_attack() {
        let rocket = raider_x();
        let launch = LaunchConfig::new(5.1816, 84.0, 90.0, 3.0).unwrap();
        let mut recovery = RecoveryEvaluator::seeded(&rocket.parachutes, 1).unwrap();

        let trajectory =
            PointMassIntegrator::default().integrate(&rocket, &environment(), &launch, &mut recovery);

        assert!(trajectory.samples.iter().all(|s| s.angle_of_attack < 1e-6));
        let fastest = trajectory
            .samples
            .iter()
            .map(|s| s.mach_number)
            .fold(0.0, f64::max);
        assert!(fastest > 0.3 && fastest < 2.0, "mach {fastest}");
    }
}
