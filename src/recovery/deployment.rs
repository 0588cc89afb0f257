use super::device::RecoveryDevice;
use super::noise::CorrelatedNoise;
use super::trigger::{SensorSample, TriggerCondition};
use crate::derive::DesignError;
use rand::Rng;
use std::fmt;
use tracing::info;

/// Slack when comparing a sample time against the sampling schedule.
const SCHEDULE_EPSILON: f64 = 1e-9;

/// One-shot deployment lifecycle: `Armed -> Triggered -> Deployed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeploymentState {
    Armed,
    Triggered { at: f64 },
    Deployed { triggered_at: f64, deployed_at: f64 },
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeploymentState::Armed => write!(f, "Armed"),
            DeploymentState::Triggered { at } => write!(f, "Triggered (t={:.3}s)", at),
            DeploymentState::Deployed { deployed_at, .. } => {
                write!(f, "Deployed (t={:.3}s)", deployed_at)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentTransition {
    pub device: String,
    pub state: DeploymentState,
    /// Measured altitude the trigger saw, noise included.
    pub sensed_altitude: Option<f64>,
}

/// Runtime status of one recovery device. Owns the device's noise process and
/// is the only place its deployment state changes.
#[derive(Debug, Clone)]
pub struct DeviceMonitor {
    device: RecoveryDevice,
    state: DeploymentState,
    noise: CorrelatedNoise,
    next_sample_time: f64,
    samples_evaluated: usize,
}

impl DeviceMonitor {
    pub fn new(device: RecoveryDevice) -> Result<Self, DesignError> {
        let noise = device.noise.process()?;
        Ok(Self {
            device,
            state: DeploymentState::Armed,
            noise,
            next_sample_time: 0.0,
            samples_evaluated: 0,
        })
    }

    pub fn device(&self) -> &RecoveryDevice {
        &self.device
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub fn samples_evaluated(&self) -> usize {
        self.samples_evaluated
    }

    pub fn is_deployed(&self) -> bool {
        matches!(self.state, DeploymentState::Deployed { .. })
    }

    /// Whether the device's sampling clock has a tick at or before `time`.
    pub fn is_due(&self, time: f64) -> bool {
        time + SCHEDULE_EPSILON >= self.next_sample_time
    }

    fn transition_to(&mut self, new_state: DeploymentState) {
        if self.state != new_state {
            info!(
                device = %self.device.name,
                "recovery transition: {} -> {}", self.state, new_state
            );
            self.state = new_state;
        }
    }

    /// Feeds one sensor sample through the noise model and the trigger.
    ///
    /// Only an armed device looks at samples; once triggered the decision is
    /// final and later samples are ignored.
    pub fn evaluate<R: Rng + ?Sized>(
        &mut self,
        sample: &SensorSample,
        rng: &mut R,
    ) -> Option<DeploymentTransition> {
        if self.state != DeploymentState::Armed {
            return None;
        }

        let period = self.device.sampling_period();
        self.next_sample_time = (self.next_sample_time + period).max(sample.time + period);
        self.samples_evaluated += 1;

        let sensed = SensorSample {
            altitude_agl: sample.altitude_agl + self.noise.sample(rng),
            ..*sample
        };

        if self.device.trigger.evaluate(&sensed) {
            self.transition_to(DeploymentState::Triggered { at: sample.time });
            Some(DeploymentTransition {
                device: self.device.name.clone(),
                state: self.state,
                sensed_altitude: Some(sensed.altitude_agl),
            })
        } else {
            None
        }
    }

    /// Completes deployment once the lag since triggering has elapsed.
    pub fn advance(&mut self, time: f64) -> Option<DeploymentTransition> {
        let DeploymentState::Triggered { at } = self.state else {
            return None;
        };

        let deployed_at = at + self.device.lag;
        if time + SCHEDULE_EPSILON < deployed_at {
            return None;
        }

        self.transition_to(DeploymentState::Deployed {
            triggered_at: at,
            deployed_at,
        });
        Some(DeploymentTransition {
            device: self.device.name.clone(),
            state: self.state,
            sensed_altitude: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::{NoiseParameters, Trigger};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f64 = 0.1;

    fn monitor(trigger: Trigger, lag: f64) -> DeviceMonitor {
        let device =
            RecoveryDevice::new("chute", 1.4, trigger, 1.0 / DT, lag, NoiseParameters::NONE)
                .unwrap();
        DeviceMonitor::new(device).unwrap()
    }

    /// Samples with vertical velocity from finite differences of the altitude series.
    fn samples(altitudes: &[f64], burnout_index: usize) -> Vec<SensorSample> {
        altitudes
            .iter()
            .enumerate()
            .map(|(i, &altitude_agl)| SensorSample {
                time: i as f64 * DT,
                altitude_agl,
                vertical_velocity: if i == 0 {
                    0.0
                } else {
                    (altitude_agl - altitudes[i - 1]) / DT
                },
                motor_burning: i < burnout_index,
            })
            .collect()
    }

    /// Runs the monitor over the samples and returns the index where it triggered.
    fn run(monitor: &mut DeviceMonitor, samples: &[SensorSample]) -> Option<usize> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut triggered = None;
        for (i, s) in samples.iter().enumerate() {
            monitor.advance(s.time);
            if monitor.is_due(s.time) && monitor.evaluate(s, &mut rng).is_some() {
                assert!(triggered.is_none(), "triggered twice");
                triggered = Some(i);
            }
        }
        triggered
    }

    #[test]
    fn apogee_triggers_at_first_descent_sample() {
        let altitudes = [0.0, 50.0, 100.0, 150.0, 200.0, 199.0, 150.0, 100.0, 50.0];
        let mut m = monitor(Trigger::Apogee, 5.0);
        assert_eq!(run(&mut m, &samples(&altitudes, 2)), Some(5));
        assert_eq!(m.state(), DeploymentState::Triggered { at: 5.0 * DT });
    }

    #[test]
    fn apogee_waits_for_burnout() {
        // velocity dips at index 2 while the motor is still burning
        let altitudes = [0.0, 50.0, 49.0, 120.0, 200.0, 250.0, 240.0, 200.0];
        let mut m = monitor(Trigger::Apogee, 0.0);
        assert_eq!(run(&mut m, &samples(&altitudes, 4)), Some(6));
    }

    #[test]
    fn deploys_exactly_lag_after_trigger() {
        let mut m = monitor(Trigger::Apogee, 1.5);
        let mut rng = StdRng::seed_from_u64(0);
        let peak = SensorSample {
            time: 12.0,
            altitude_agl: 2000.0,
            vertical_velocity: -0.2,
            motor_burning: false,
        };
        assert!(m.evaluate(&peak, &mut rng).is_some());

        assert!(m.advance(13.4).is_none());
        assert_eq!(m.state(), DeploymentState::Triggered { at: 12.0 });

        let t = m.advance(13.5).unwrap();
        assert_eq!(
            t.state,
            DeploymentState::Deployed {
                triggered_at: 12.0,
                deployed_at: 13.5
            }
        );
        assert!(m.is_deployed());
        assert!(m.advance(20.0).is_none());
    }

    #[test]
    fn samples_after_trigger_do_not_change_state() {
        let mut m = monitor(Trigger::Altitude(305.0), 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        let below = SensorSample {
            time: 30.0,
            altitude_agl: 300.0,
            vertical_velocity: -20.0,
            motor_burning: false,
        };
        assert!(m.evaluate(&below, &mut rng).is_some());
        let evaluated = m.samples_evaluated();

        for k in 1..20 {
            let climbing = SensorSample {
                time: 30.0 + k as f64 * DT,
                altitude_agl: 400.0,
                vertical_velocity: 15.0,
                motor_burning: false,
            };
            assert!(m.evaluate(&climbing, &mut rng).is_none());
            assert!(m.evaluate(&below, &mut rng).is_none());
        }
        assert_eq!(m.state(), DeploymentState::Triggered { at: 30.0 });
        assert_eq!(m.samples_evaluated(), evaluated);
    }

    #[test]
    fn altitude_triggers_once_at_first_crossing() {
        let altitudes = [500.0, 450.0, 400.0, 350.0, 310.0, 300.0, 290.0, 310.0, 280.0];
        let mut m = monitor(Trigger::Altitude(305.0), 0.5);
        assert_eq!(run(&mut m, &samples(&altitudes, 0)), Some(5));
    }

    #[test]
    fn ascending_touch_does_not_trigger() {
        let altitudes = [0.0, 100.0, 200.0, 300.0, 305.0, 400.0, 600.0];
        let mut m = monitor(Trigger::Altitude(305.0), 0.5);
        assert_eq!(run(&mut m, &samples(&altitudes, 0)), None);
        assert_eq!(m.state(), DeploymentState::Armed);
    }

    #[test]
    fn respects_sampling_rate() {
        let device =
            RecoveryDevice::new("slow", 1.0, Trigger::Apogee, 2.0, 0.0, NoiseParameters::NONE)
                .unwrap();
        let mut m = DeviceMonitor::new(device).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut evaluated = 0;
        for i in 0..100 {
            let s = SensorSample {
                time: i as f64 * 0.01,
                altitude_agl: 10.0 * i as f64,
                vertical_velocity: 50.0,
                motor_burning: true,
            };
            if m.is_due(s.time) {
                m.evaluate(&s, &mut rng);
                evaluated += 1;
            }
        }
        // ticks at 0.0 and 0.5 s
        assert_eq!(evaluated, 2);
    }

    #[test]
    fn noisy_crossing_still_triggers_once() {
        let device = RecoveryDevice::new(
            "main",
            8.87,
            Trigger::Altitude(305.0),
            105.0,
            1.5,
            (0.0, 8.3, 0.5).into(),
        )
        .unwrap();
        let mut m = DeviceMonitor::new(device).unwrap();
        let mut rng = StdRng::seed_from_u64(2025);
        let dt = 1.0 / 105.0;
        let mut transitions = 0;

        // 20 m/s descent from 400 m to the ground
        for i in 0..2100 {
            let time = i as f64 * dt;
            let s = SensorSample {
                time,
                altitude_agl: 400.0 - 20.0 * time,
                vertical_velocity: -20.0,
                motor_burning: false,
            };
            if m.advance(time).is_some() {
                transitions += 1;
            }
            if m.is_due(time) {
                if let Some(t) = m.evaluate(&s, &mut rng) {
                    transitions += 1;
                    // noise can only move the trigger a few sigma around the threshold
                    assert!((s.altitude_agl - 305.0).abs() < 60.0, "triggered at {}", s.altitude_agl);
                    assert!(t.sensed_altitude.unwrap() < 305.0);
                }
            }
        }
        assert_eq!(transitions, 2);
        assert!(m.is_deployed());
    }
}
