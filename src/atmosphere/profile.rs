use super::forecast_errors::ForecastError;
use super::AtmosphereModel;
use nalgebra as na;

/// One pressure level of a gridded forecast, already reduced to the launch site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileLevel {
    pub height: f64,      // m MSL (geopotential height of the level)
    pub pressure: f64,    // Pa
    pub temperature: f64, // K
    pub wind_east: f64,   // m/s
    pub wind_north: f64,  // m/s
}

impl ProfileLevel {
    /// Builds a level from meteorological wind (speed, direction the wind blows FROM, deg).
    pub fn from_wind_direction(
        height: f64,
        pressure: f64,
        temperature: f64,
        wind_speed: f64,
        wind_from_deg: f64,
    ) -> Self {
        let direction = wind_from_deg.to_radians();
        Self {
            height,
            pressure,
            temperature,
            wind_east: -wind_speed * direction.sin(),
            wind_north: -wind_speed * direction.cos(),
        }
    }
}

/// Vertical profile interpolated between forecast levels. Temperature and wind
/// are linear in height and held constant beyond the outermost levels; pressure
/// is log-linear and extrapolated with the scale height of the nearest layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphericProfile {
    levels: Vec<ProfileLevel>,
}

impl AtmosphericProfile {
    pub fn new(mut levels: Vec<ProfileLevel>) -> Result<Self, ForecastError> {
        levels.retain(|l| {
            l.height.is_finite() && l.pressure > 0.0 && l.temperature > 0.0
        });
        levels.sort_by(|a, b| a.height.total_cmp(&b.height));
        levels.dedup_by(|a, b| a.height == b.height);

        if levels.len() < 2 {
            return Err(ForecastError::MissingForecastData(format!(
                "need at least 2 valid pressure levels, got {}",
                levels.len()
            )));
        }

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[ProfileLevel] {
        &self.levels
    }

    /// Bracketing levels and the fraction between them (may fall outside [0, 1]).
    fn bracket(&self, altitude: f64) -> (&ProfileLevel, &ProfileLevel, f64) {
        let upper = self
            .levels
            .iter()
            .position(|l| l.height > altitude)
            .unwrap_or(self.levels.len() - 1)
            .max(1);
        let below = &self.levels[upper - 1];
        let above = &self.levels[upper];
        let fraction = (altitude - below.height) / (above.height - below.height);
        (below, above, fraction)
    }

    fn lerp_clamped(&self, altitude: f64, value: impl Fn(&ProfileLevel) -> f64) -> f64 {
        let (below, above, fraction) = self.bracket(altitude);
        let fraction = fraction.clamp(0.0, 1.0);
        value(below) + (value(above) - value(below)) * fraction
    }
}

impl AtmosphereModel for AtmosphericProfile {
    fn pressure(&self, altitude_asl: f64) -> f64 {
        let (below, above, fraction) = self.bracket(altitude_asl);
        let ln_p = below.pressure.ln() + (above.pressure.ln() - below.pressure.ln()) * fraction;
        ln_p.exp()
    }

    fn temperature(&self, altitude_asl: f64) -> f64 {
        self.lerp_clamped(altitude_asl, |l| l.temperature)
    }

    fn wind(&self, altitude_asl: f64) -> na::Vector3<f64> {
        na::Vector3::new(
            self.lerp_clamped(altitude_asl, |l| l.wind_east),
            self.lerp_clamped(altitude_asl, |l| l.wind_north),
            0.0,
        )
    }
}
