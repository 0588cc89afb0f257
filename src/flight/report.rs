use super::result::{EventKind, FlightResult};
use crate::atmosphere::EnvironmentDescriptor;
use crate::models::RocketDescriptor;
use crate::recovery::DeploymentState;
use std::fmt;

/// Human-readable flight summary.
pub struct FlightReport<'a> {
    pub rocket: &'a RocketDescriptor,
    pub environment: &'a EnvironmentDescriptor,
    pub result: &'a FlightResult,
}

impl<'a> FlightReport<'a> {
    pub fn new(
        rocket: &'a RocketDescriptor,
        environment: &'a EnvironmentDescriptor,
        result: &'a FlightResult,
    ) -> Self {
        Self {
            rocket,
            environment,
            result,
        }
    }
}

impl fmt::Display for FlightReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let env = self.environment;
        let result = self.result;
        let launch = &result.launch;

        writeln!(f, "Launch")?;
        writeln!(
            f,
            "  Site: {:.4}° lat, {:.4}° lon, {:.1} m MSL",
            env.site.latitude, env.site.longitude, env.site.elevation
        )?;
        writeln!(f, "  Date: {}", env.epoch)?;
        writeln!(f, "  Atmosphere: {}", env.mode())?;
        writeln!(
            f,
            "  Rail: {:.3} m, inclination {:.1}°, heading {:.1}°",
            launch.rail_length, launch.inclination, launch.heading
        )?;
        writeln!(
            f,
            "  Liftoff mass: {:.3} kg, burnout mass: {:.3} kg",
            self.rocket.total_mass(0.0),
            self.rocket.dry_mass()
        )?;

        writeln!(f, "\nFlight")?;
        if let Some(t) = result.event_time(&EventKind::RailDeparture) {
            let speed = result.sample_at(t).map_or(0.0, |s| s.speed());
            writeln!(f, "  Rail departure: t = {t:.3} s at {speed:.2} m/s")?;
        }
        if let Some(t) = result.event_time(&EventKind::Burnout) {
            let altitude = result.sample_at(t).map_or(0.0, |s| s.altitude_agl());
            writeln!(f, "  Burnout: t = {t:.3} s at {altitude:.1} m AGL")?;
        }
        if let Some(apogee) = result.apogee() {
            writeln!(
                f,
                "  Apogee: t = {:.3} s, {:.1} m AGL ({:.1} m MSL)",
                apogee.time,
                apogee.altitude_agl(),
                apogee.altitude_asl
            )?;
        }
        if let Some(fastest) = result.max_speed() {
            writeln!(
                f,
                "  Max speed: {:.2} m/s at t = {:.3} s, max Mach {:.3}",
                fastest.speed(),
                fastest.time,
                result.max_mach()
            )?;
        }

        writeln!(f, "\nRecovery")?;
        for outcome in &result.recovery {
            match outcome.state {
                DeploymentState::Armed => {
                    writeln!(f, "  {} ({}): never triggered", outcome.device, outcome.trigger)?
                }
                DeploymentState::Triggered { at } => writeln!(
                    f,
                    "  {} ({}): triggered t = {at:.3} s, not deployed",
                    outcome.device, outcome.trigger
                )?,
                DeploymentState::Deployed {
                    triggered_at,
                    deployed_at,
                } => writeln!(
                    f,
                    "  {} ({}): triggered t = {triggered_at:.3} s, deployed t = {deployed_at:.3} s",
                    outcome.device, outcome.trigger
                )?,
            }
        }

        writeln!(f, "\nTermination: {}", result.termination)?;
        if let Some(last) = result.final_sample() {
            writeln!(
                f,
                "  t = {:.3} s, {:.2} m/s, {:.1} m downrange",
                last.time,
                last.speed(),
                last.horizontal_range()
            )?;
        }
        if result.is_suspect() {
            writeln!(f, "  WARNING: no ground impact before max time; results are suspect")?;
        }

        if result.anomalies.is_empty() {
            write!(f, "\nAnomalies: none")
        } else {
            writeln!(f, "\nAnomalies:")?;
            for anomaly in &result.anomalies {
                writeln!(f, "  - {anomaly}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::LaunchSite;
    use crate::config::RaiderX;
    use crate::derive::{DerivedMotorParameters, DerivedRecoveryParameters};
    use crate::flight::{FlightEvent, FlightSample, LaunchConfig, TerminationReason, Trajectory};
    use crate::models::{build_rocket, MotorDescriptor};
    use crate::recovery::{RecoveryAnomaly, RecoveryOutcome, Trigger};
    use hifitime::Epoch;
    use nalgebra as na;

    #[test]
    fn report_lists_anomalies_and_suspect_runs() {
        let design = RaiderX::design();
        let derived = DerivedMotorParameters::from_design(&design.motor).unwrap();
        let motor = MotorDescriptor::from_design(&design.motor, &derived).unwrap();
        let recovery = DerivedRecoveryParameters::from_design(&design.parachutes).unwrap();
        let rocket = build_rocket(&design, motor, &recovery).unwrap();
        let environment = EnvironmentDescriptor::standard(
            LaunchSite::new(35.5, -102.3, 971.1),
            Epoch::from_gregorian_utc_hms(2025, 10, 12, 18, 0, 0),
        );

        let trajectory = Trajectory {
            samples: vec![FlightSample {
                time: 600.0,
                position: na::Vector3::new(30.0, 40.0, 800.0),
                velocity: na::Vector3::new(0.0, 0.0, -5.0),
                altitude_asl: 1_771.1,
                mach_number: 0.015,
                angle_of_attack: 0.0,
            }],
            events: vec![FlightEvent::new(12.0, EventKind::Apogee)],
            termination: TerminationReason::MaxTime,
        };
        let result = FlightResult::new(
            LaunchConfig::new(5.1816, 84.0, 90.0, 600.0).unwrap(),
            trajectory,
            vec![RecoveryOutcome {
                device: "main".to_string(),
                trigger: Trigger::Altitude(305.0),
                state: DeploymentState::Armed,
                samples_evaluated: 10,
            }],
            vec![RecoveryAnomaly::NeverTriggered {
                device: "main".to_string(),
                trigger: Trigger::Altitude(305.0),
            }],
        );

        let text = FlightReport::new(&rocket, &environment, &result).to_string();
        assert!(text.contains("Atmosphere: Standard Atmosphere"));
        assert!(text.contains("main (305.0 m AGL): never triggered"));
        assert!(text.contains("Termination: max time reached"));
        assert!(text.contains("50.0 m downrange"));
        assert!(text.contains("results are suspect"));
        assert!(text.contains("Anomalies:\n  - "));
    }
}
