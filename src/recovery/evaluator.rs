use super::deployment::{DeploymentState, DeploymentTransition, DeviceMonitor};
use super::device::RecoveryDevice;
use super::trigger::{SensorSample, Trigger};
use crate::derive::DesignError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Final status of one device after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryOutcome {
    pub device: String,
    pub trigger: Trigger,
    pub state: DeploymentState,
    pub samples_evaluated: usize,
}

/// A device that did not finish deploying before the flight ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryAnomaly {
    NeverTriggered { device: String, trigger: Trigger },
    NotDeployed { device: String, triggered_at: f64 },
}

impl fmt::Display for RecoveryAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecoveryAnomaly::NeverTriggered { device, trigger } => write!(
                f,
                "parachute '{}' never triggered ({} condition not met before flight end)",
                device, trigger
            ),
            RecoveryAnomaly::NotDeployed {
                device,
                triggered_at,
            } => write!(
                f,
                "parachute '{}' triggered at t={:.3}s but had not deployed when the flight ended",
                device, triggered_at
            ),
        }
    }
}

/// Recovery decision logic consulted by the integrator at every step.
///
/// The random source is injected so noisy runs are reproducible.
pub struct RecoveryEvaluator<R: Rng = StdRng> {
    monitors: Vec<DeviceMonitor>,
    rng: R,
}

impl RecoveryEvaluator<StdRng> {
    pub fn seeded(devices: &[RecoveryDevice], seed: u64) -> Result<Self, DesignError> {
        Self::new(devices, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecoveryEvaluator<R> {
    pub fn new(devices: &[RecoveryDevice], rng: R) -> Result<Self, DesignError> {
        let monitors = devices
            .iter()
            .cloned()
            .map(DeviceMonitor::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { monitors, rng })
    }

    pub fn monitors(&self) -> &[DeviceMonitor] {
        &self.monitors
    }

    /// Finishes pending deployments, then runs every device whose sampling
    /// tick has come up. Devices are visited in the rocket's order.
    pub fn poll(&mut self, sample: &SensorSample) -> Vec<DeploymentTransition> {
        let mut transitions = Vec::new();
        for monitor in &mut self.monitors {
            if let Some(t) = monitor.advance(sample.time) {
                transitions.push(t);
            }
            if monitor.is_due(sample.time) {
                if let Some(t) = monitor.evaluate(sample, &mut self.rng) {
                    transitions.push(t);
                }
            }
        }
        transitions
    }

    /// Sum of CD·S over fully deployed devices.
    pub fn deployed_drag_area(&self) -> f64 {
        self.monitors
            .iter()
            .filter(|m| m.is_deployed())
            .map(|m| m.device().drag_area)
            .sum()
    }

    pub fn outcomes(&self) -> Vec<RecoveryOutcome> {
        self.monitors
            .iter()
            .map(|m| RecoveryOutcome {
                device: m.device().name.clone(),
                trigger: m.device().trigger,
                state: m.state(),
                samples_evaluated: m.samples_evaluated(),
            })
            .collect()
    }

    pub fn anomalies(&self) -> Vec<RecoveryAnomaly> {
        self.monitors
            .iter()
            .filter_map(|m| match m.state() {
                DeploymentState::Armed => Some(RecoveryAnomaly::NeverTriggered {
                    device: m.device().name.clone(),
                    trigger: m.device().trigger,
                }),
                DeploymentState::Triggered { at } => Some(RecoveryAnomaly::NotDeployed {
                    device: m.device().name.clone(),
                    triggered_at: at,
                }),
                DeploymentState::Deployed { .. } => None,
            })
            .collect()
    }
}
