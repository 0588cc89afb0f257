use thiserror::Error;

/// Invalid physical configuration. These are raised while descriptors are
/// being built and stop the run; nothing downstream clamps or repairs them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("`{parameter}` must be positive, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("`{parameter}` must not be negative, got {value}")]
    Negative { parameter: &'static str, value: f64 },

    #[error("`{parameter}` must be finite, got {value}")]
    NonFinite { parameter: &'static str, value: f64 },

    #[error("`{parameter}` must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("grain outer radius ({outer} m) must exceed inner radius ({inner} m)")]
    InvalidGrainRadii { outer: f64, inner: f64 },

    #[error("thrust curve is empty")]
    EmptyThrustCurve,

    #[error("thrust curve must start at t=0, first sample is at t={0}")]
    ThrustCurveStart(f64),

    #[error("thrust curve time must be strictly increasing (sample {index} at t={time})")]
    ThrustCurveNotIncreasing { index: usize, time: f64 },

    #[error("thrust curve sample {index} has negative thrust {thrust} N")]
    NegativeThrust { index: usize, thrust: f64 },

    #[error("burn time {burn_time} s ends before the last thrust sample at {last_time} s")]
    BurnTimeBeforeCurveEnd { burn_time: f64, last_time: f64 },

    #[error("thrust curve does not burn out: final sample is {thrust} N")]
    NoBurnout { thrust: f64 },

    #[error("derived propellant mass {derived} kg does not match design value {expected} kg")]
    PropellantMassMismatch { expected: f64, derived: f64 },

    #[error("at least {required} recovery devices are required, got {count}")]
    TooFewRecoveryDevices { required: usize, count: usize },

    #[error("design lists {design} parachutes but {derived} have derived drag areas")]
    RecoveryDeviceCountMismatch { design: usize, derived: usize },

    #[error("parachute `{0}` has no derived drag area")]
    MissingDragArea(String),

    #[error("invalid trigger `{0}` (expected \"apogee\" or an altitude in meters)")]
    InvalidTrigger(String),

    #[error("rocket has no motor attached")]
    MotorNotAttached,
}
