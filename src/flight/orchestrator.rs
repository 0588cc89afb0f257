use super::flight_errors::FlightError;
use super::launch::LaunchConfig;
use super::result::{FlightResult, TerminationReason, Trajectory};
use crate::atmosphere::EnvironmentDescriptor;
use crate::integrators::PointMassIntegrator;
use crate::models::RocketDescriptor;
use crate::recovery::RecoveryEvaluator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Integrates a vehicle from the pad until it lands or runs out of time.
///
/// Implementations must poll `recovery` once per step, in increasing time
/// order, and add the deployed drag area from then on.
pub trait TrajectoryIntegrator {
    fn integrate<R: Rng>(
        &self,
        rocket: &RocketDescriptor,
        environment: &EnvironmentDescriptor,
        launch: &LaunchConfig,
        recovery: &mut RecoveryEvaluator<R>,
    ) -> Trajectory;
}

/// Flies `rocket` off a rail of the given length and attitude with the
/// default point-mass integrator and unseeded sensor noise.
pub fn run_flight(
    rocket: &RocketDescriptor,
    environment: &EnvironmentDescriptor,
    launch_rail_length: f64,
    inclination: f64,
    heading: f64,
    max_time: f64,
) -> Result<FlightResult, FlightError> {
    let launch = LaunchConfig::new(launch_rail_length, inclination, heading, max_time)?;
    let recovery = RecoveryEvaluator::new(&rocket.parachutes, StdRng::from_entropy())?;
    Ok(run_flight_with(
        rocket,
        environment,
        &launch,
        &PointMassIntegrator::default(),
        recovery,
    ))
}

/// Same as [`run_flight`] with reproducible sensor noise.
pub fn run_flight_seeded(
    rocket: &RocketDescriptor,
    environment: &EnvironmentDescriptor,
    launch: &LaunchConfig,
    seed: u64,
) -> Result<FlightResult, FlightError> {
    let recovery = RecoveryEvaluator::seeded(&rocket.parachutes, seed)?;
    Ok(run_flight_with(
        rocket,
        environment,
        launch,
        &PointMassIntegrator::default(),
        recovery,
    ))
}

pub fn run_flight_with<I: TrajectoryIntegrator, R: Rng>(
    rocket: &RocketDescriptor,
    environment: &EnvironmentDescriptor,
    launch: &LaunchConfig,
    integrator: &I,
    mut recovery: RecoveryEvaluator<R>,
) -> FlightResult {
    info!(
        atmosphere = %environment.mode(),
        rail_length = launch.rail_length,
        inclination = launch.inclination,
        heading = launch.heading,
        "starting flight"
    );

    let trajectory = integrator.integrate(rocket, environment, launch, &mut recovery);
    let result = FlightResult::new(*launch, trajectory, recovery.outcomes(), recovery.anomalies());

    match result.termination {
        TerminationReason::GroundImpact => {
            info!(flight_time = result.flight_time(), "flight ended at ground impact")
        }
        TerminationReason::MaxTime => warn!(
            max_time = launch.max_time,
            "flight stopped at max time without ground impact; results are suspect"
        ),
    }
    for anomaly in &result.anomalies {
        warn!(%anomaly, "recovery anomaly");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::LaunchSite;
    use crate::config::RaiderX;
    use crate::derive::{DerivedMotorParameters, DerivedRecoveryParameters};
    use crate::flight::result::{EventKind, FlightEvent, FlightSample};
    use crate::models::{build_rocket, MotorDescriptor};
    use crate::recovery::{DeploymentState, RecoveryAnomaly, SensorSample};
    use hifitime::Epoch;
    use nalgebra as na;

    /// Replays a fixed altitude series through the recovery evaluator.
    struct ScriptedIntegrator {
        altitudes: Vec<f64>,
        dt: f64,
    }

    impl TrajectoryIntegrator for ScriptedIntegrator {
        fn integrate<R: Rng>(
            &self,
            _rocket: &RocketDescriptor,
            _environment: &EnvironmentDescriptor,
            _launch: &LaunchConfig,
            recovery: &mut RecoveryEvaluator<R>,
        ) -> Trajectory {
            let mut samples = Vec::new();
            let mut events = Vec::new();
            let mut previous = self.altitudes[0];
            for (i, &altitude) in self.altitudes.iter().enumerate() {
                let time = 10.0 + i as f64 * self.dt;
                let vertical_velocity = (altitude - previous) / self.dt;
                previous = altitude;
                let sensor = SensorSample {
                    time,
                    altitude_agl: altitude,
                    vertical_velocity: if i == 0 { 1.0 } else { vertical_velocity },
                    motor_burning: false,
                };
                events.extend(
                    recovery
                        .poll(&sensor)
                        .iter()
                        .filter_map(FlightEvent::from_transition),
                );
                samples.push(FlightSample {
                    time,
                    position: na::Vector3::new(0.0, 0.0, altitude),
                    velocity: na::Vector3::new(0.0, 0.0, vertical_velocity),
                    altitude_asl: altitude,
                    mach_number: 0.0,
                    angle_of_attack: 0.0,
                });
            }
            Trajectory {
                samples,
                events,
                termination: TerminationReason::MaxTime,
            }
        }
    }

    fn raider_x() -> RocketDescriptor {
        let mut design = RaiderX::design();
        for chute in &mut design.parachutes {
            chute.noise = (0.0, 0.0, 0.0);
            chute.sampling_rate = 10.0;
        }
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
    fn recovery_status_is_collected_after_the_run() {
        let rocket = raider_x();
        let integrator = ScriptedIntegrator {
            altitudes: vec![100.0, 150.0, 200.0, 199.0, 150.0, 120.0, 100.0, 90.0, 80.0],
            dt: 0.1,
        };
        let launch = LaunchConfig::new(5.0, 84.0, 90.0, 600.0).unwrap();
        let recovery = RecoveryEvaluator::seeded(&rocket.parachutes, 7).unwrap();

        let result = run_flight_with(&rocket, &environment(), &launch, &integrator, recovery);

        assert!(result.is_suspect());
        assert_eq!(
            result.recovery[0].state,
            DeploymentState::Triggered { at: 10.3 }
        );
        assert_eq!(result.events.len(), 2, "{:?}", result.events);
        assert_eq!(
            result.events[0].kind,
            EventKind::ParachuteTriggered {
                device: "reefed".to_string()
            }
        );
        // main triggered at the first descending sample below 305 m
        assert_eq!(result.events[1].time, 10.0 + 3.0 * 0.1);
        assert_eq!(result.anomalies.len(), 2);
        assert!(matches!(
            result.anomalies[0],
            RecoveryAnomaly::NotDeployed { .. }
        ));
    }

    #[test]
    fn invalid_launch_is_a_design_error() {
        let rocket = raider_x();
        let err = run_flight(&rocket, &environment(), 5.0, 84.0, 400.0, 600.0).unwrap_err();
        assert!(matches!(err, FlightError::Design(_)));
    }
}
