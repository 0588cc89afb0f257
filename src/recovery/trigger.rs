use crate::config::design::TriggerSetting;
use crate::derive::DesignError;
use std::fmt;

/// What a flight computer sees at one sampling tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub time: f64,              // s since ignition
    pub altitude_agl: f64,      // m above the launch pad
    pub vertical_velocity: f64, // m/s, positive up
    pub motor_burning: bool,
}

/// Deployment condition consulted once per sampling tick while a device is armed.
pub trait TriggerCondition {
    fn evaluate(&self, sample: &SensorSample) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// First non-positive vertical velocity after motor burnout.
    Apogee,
    /// Descending below a height above ground level (m).
    Altitude(f64),
}

impl TriggerCondition for Trigger {
    fn evaluate(&self, sample: &SensorSample) -> bool {
        match *self {
            // Powered flight cannot peak; a sign flip there is noise.
            Trigger::Apogee => !sample.motor_burning && sample.vertical_velocity <= 0.0,
            Trigger::Altitude(threshold) => {
                sample.vertical_velocity < 0.0 && sample.altitude_agl < threshold
            }
        }
    }
}

impl TryFrom<&TriggerSetting> for Trigger {
    type Error = DesignError;

    fn try_from(setting: &TriggerSetting) -> Result<Self, Self::Error> {
        match setting {
            TriggerSetting::Keyword(word) if word.eq_ignore_ascii_case("apogee") => {
                Ok(Trigger::Apogee)
            }
            TriggerSetting::Keyword(word) => Err(DesignError::InvalidTrigger(word.clone())),
            TriggerSetting::Altitude(altitude) if *altitude > 0.0 && altitude.is_finite() => {
                Ok(Trigger::Altitude(*altitude))
            }
            TriggerSetting::Altitude(altitude) => {
                Err(DesignError::InvalidTrigger(altitude.to_string()))
            }
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Trigger::Apogee => write!(f, "apogee"),
            Trigger::Altitude(altitude) => write!(f, "{:.1} m AGL", altitude),
        }
    }
}
