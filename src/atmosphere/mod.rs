pub mod environment;
pub mod forecast_errors;
pub mod forecast_provider;
pub mod profile;
pub mod standard;

pub use environment::{build_environment, AtmosphericMode, EnvironmentDescriptor, LaunchSite};
pub use forecast_errors::ForecastError;
pub use forecast_provider::{ForecastProvider, GfsForecastProvider, OfflineProvider};
pub use profile::{AtmosphericProfile, ProfileLevel};
pub use standard::StandardAtmosphere;

use crate::constants::{GAMMA_AIR, R_AIR};
use nalgebra as na;

/// Atmospheric state as a function of altitude above mean sea level.
pub trait AtmosphereModel {
    fn pressure(&self, altitude_asl: f64) -> f64;
    fn temperature(&self, altitude_asl: f64) -> f64;

    /// Wind velocity (east, north, up) in m/s.
    fn wind(&self, _altitude_asl: f64) -> na::Vector3<f64> {
        na::Vector3::zeros()
    }

    fn density(&self, altitude_asl: f64) -> f64 {
        self.pressure(altitude_asl) / (R_AIR * self.temperature(altitude_asl))
    }

    fn speed_of_sound(&self, altitude_asl: f64) -> f64 {
        (GAMMA_AIR * R_AIR * self.temperature(altitude_asl)).sqrt()
    }
}
