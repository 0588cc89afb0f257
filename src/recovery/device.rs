use super::noise::CorrelatedNoise;
use super::trigger::Trigger;
use crate::config::design::ParachuteDesign;
use crate::derive::parameters::{require_non_negative, require_positive};
use crate::derive::DesignError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParameters {
    pub mean: f64,
    pub std_dev: f64,
    pub time_correlation: f64,
}

impl NoiseParameters {
    pub const NONE: NoiseParameters = NoiseParameters {
        mean: 0.0,
        std_dev: 0.0,
        time_correlation: 0.0,
    };

    pub fn process(&self) -> Result<CorrelatedNoise, DesignError> {
        CorrelatedNoise::new(self.mean, self.std_dev, self.time_correlation)
    }
}

impl From<(f64, f64, f64)> for NoiseParameters {
    fn from((mean, std_dev, time_correlation): (f64, f64, f64)) -> Self {
        Self {
            mean,
            std_dev,
            time_correlation,
        }
    }
}

/// Static description of a parachute. Runtime status lives in a `DeviceMonitor`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryDevice {
    pub name: String,
    pub drag_area: f64,     // CD·S, m²
    pub trigger: Trigger,
    pub sampling_rate: f64, // Hz
    pub lag: f64,           // s between trigger and full deployment
    pub noise: NoiseParameters,
}

impl RecoveryDevice {
    pub fn new(
        name: impl Into<String>,
        drag_area: f64,
        trigger: Trigger,
        sampling_rate: f64,
        lag: f64,
        noise: NoiseParameters,
    ) -> Result<Self, DesignError> {
        require_positive("parachute_drag_area", drag_area)?;
        require_positive("sampling_rate", sampling_rate)?;
        require_non_negative("deployment_lag", lag)?;
        noise.process()?;

        Ok(Self {
            name: name.into(),
            drag_area,
            trigger,
            sampling_rate,
            lag,
            noise,
        })
    }

    /// `drag_area` must already be derived from the design's cd and diameter.
    pub fn from_design(design: &ParachuteDesign, drag_area: f64) -> Result<Self, DesignError> {
        Self::new(
            design.name.clone(),
            drag_area,
            Trigger::try_from(&design.trigger)?,
            design.sampling_rate,
            design.lag,
            design.noise.into(),
        )
    }

    pub fn sampling_period(&self) -> f64 {
        1.0 / self.sampling_rate
    }
}
