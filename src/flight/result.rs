use super::launch::LaunchConfig;
use crate::recovery::{DeploymentState, DeploymentTransition, RecoveryAnomaly, RecoveryOutcome};
use nalgebra as na;
use std::fmt;

/// One row of the integrated trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    pub time: f64,                  // s
    pub position: na::Vector3<f64>, // m, east/north/up from the pad
    pub velocity: na::Vector3<f64>, // m/s
    pub altitude_asl: f64,          // m
    pub mach_number: f64,
    pub angle_of_attack: f64, // rad
}

impl FlightSample {
    pub fn altitude_agl(&self) -> f64 {
        self.position.z
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn horizontal_range(&self) -> f64 {
        self.position.xy().magnitude()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    RailDeparture,
    Burnout,
    Apogee,
    ParachuteTriggered { device: String },
    ParachuteDeployed { device: String },
    GroundImpact,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventKind::RailDeparture => write!(f, "rail departure"),
            EventKind::Burnout => write!(f, "burnout"),
            EventKind::Apogee => write!(f, "apogee"),
            EventKind::ParachuteTriggered { device } => write!(f, "'{device}' triggered"),
            EventKind::ParachuteDeployed { device } => write!(f, "'{device}' deployed"),
            EventKind::GroundImpact => write!(f, "ground impact"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
}

impl FlightEvent {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    /// Event for a recovery transition, stamped with the time it took effect.
    pub fn from_transition(transition: &DeploymentTransition) -> Option<Self> {
        let device = transition.device.clone();
        match transition.state {
            DeploymentState::Armed => None,
            DeploymentState::Triggered { at } => {
                Some(Self::new(at, EventKind::ParachuteTriggered { device }))
            }
            DeploymentState::Deployed { deployed_at, .. } => {
                Some(Self::new(deployed_at, EventKind::ParachuteDeployed { device }))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    GroundImpact,
    /// Hit the time bound while still airborne.
    MaxTime,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TerminationReason::GroundImpact => write!(f, "ground impact"),
            TerminationReason::MaxTime => write!(f, "max time reached"),
        }
    }
}

/// Raw integrator output.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub samples: Vec<FlightSample>,
    pub events: Vec<FlightEvent>,
    pub termination: TerminationReason,
}

/// A finished run: the trajectory plus the recovery system's final status.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightResult {
    pub launch: LaunchConfig,
    pub samples: Vec<FlightSample>,
    /// Sorted by time.
    pub events: Vec<FlightEvent>,
    pub termination: TerminationReason,
    pub recovery: Vec<RecoveryOutcome>,
    pub anomalies: Vec<RecoveryAnomaly>,
}

impl FlightResult {
    pub fn new(
        launch: LaunchConfig,
        trajectory: Trajectory,
        recovery: Vec<RecoveryOutcome>,
        anomalies: Vec<RecoveryAnomaly>,
    ) -> Self {
        let Trajectory {
            samples,
            mut events,
            termination,
        } = trajectory;
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        Self {
            launch,
            samples,
            events,
            termination,
            recovery,
            anomalies,
        }
    }

    /// A run that stopped on the time bound never came down and should not
    /// be trusted.
    pub fn is_suspect(&self) -> bool {
        self.termination == TerminationReason::MaxTime
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    pub fn event(&self, kind: &EventKind) -> Option<&FlightEvent> {
        self.events.iter().find(|e| &e.kind == kind)
    }

    pub fn event_time(&self, kind: &EventKind) -> Option<f64> {
        self.event(kind).map(|e| e.time)
    }

    /// Highest sample reached.
    pub fn apogee(&self) -> Option<&FlightSample> {
        self.samples
            .iter()
            .max_by(|a, b| a.altitude_agl().total_cmp(&b.altitude_agl()))
    }

    pub fn max_speed(&self) -> Option<&FlightSample> {
        self.samples
            .iter()
            .max_by(|a, b| a.speed().total_cmp(&b.speed()))
    }

    pub fn max_mach(&self) -> f64 {
        self.samples.iter().map(|s| s.mach_number).fold(0.0, f64::max)
    }

    pub fn final_sample(&self) -> Option<&FlightSample> {
        self.samples.last()
    }

    /// Nearest sample at or after `time`.
    pub fn sample_at(&self, time: f64) -> Option<&FlightSample> {
        let index = self.samples.partition_point(|s| s.time < time);
        self.samples.get(index).or_else(|| self.samples.last())
    }

    pub fn flight_time(&self) -> f64 {
        self.final_sample().map_or(0.0, |s| s.time)
    }
}
