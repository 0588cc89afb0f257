pub mod deployment;
pub mod device;
pub mod evaluator;
pub mod noise;
pub mod trigger;

pub use deployment::{DeploymentState, DeploymentTransition, DeviceMonitor};
pub use device::{NoiseParameters, RecoveryDevice};
pub use evaluator::{RecoveryAnomaly, RecoveryEvaluator, RecoveryOutcome};
pub use noise::CorrelatedNoise;
pub use trigger::{SensorSample, Trigger, TriggerCondition};
