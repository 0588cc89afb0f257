use crate::derive::parameters::require_non_negative;
use crate::derive::DesignError;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// First-order correlated sensor noise:
/// `x[k] = ρ·x[k-1] + sqrt(1-ρ²)·N(0, σ)`, reported as `μ + x[k]`.
///
/// The process keeps the configured mean and standard deviation in steady
/// state while consecutive samples are correlated with coefficient ρ.
#[derive(Debug, Clone)]
pub struct CorrelatedNoise {
    mean: f64,
    correlation: f64,
    innovation_scale: f64,
    normal: Normal<f64>,
    state: f64,
}

impl CorrelatedNoise {
    pub fn new(mean: f64, std_dev: f64, correlation: f64) -> Result<Self, DesignError> {
        if !mean.is_finite() {
            return Err(DesignError::NonFinite {
                parameter: "noise_mean",
                value: mean,
            });
        }
        require_non_negative("noise_std_dev", std_dev)?;
        if !(0.0..1.0).contains(&correlation) {
            return Err(DesignError::OutOfRange {
                parameter: "noise_time_correlation",
                value: correlation,
                min: 0.0,
                max: 1.0,
            });
        }
        let normal = Normal::new(0.0, std_dev).map_err(|_| DesignError::NonFinite {
            parameter: "noise_std_dev",
            value: std_dev,
        })?;

        Ok(Self {
            mean,
            correlation,
            innovation_scale: (1.0 - correlation * correlation).sqrt(),
            normal,
            state: 0.0,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        self.state =
            self.correlation * self.state + self.innovation_scale * self.normal.sample(rng);
        self.mean + self.state
    }
}
