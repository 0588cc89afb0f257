use super::forecast_provider::ForecastProvider;
use super::profile::AtmosphericProfile;
use super::standard::StandardAtmosphere;
use super::AtmosphereModel;
use hifitime::Epoch;
use nalgebra as na;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSite {
    pub latitude: f64,  // deg
    pub longitude: f64, // deg
    pub elevation: f64, // m MSL
}

impl LaunchSite {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

/// Atmosphere backing a run. Chosen once when the environment is built.
#[derive(Debug, Clone, PartialEq)]
pub enum AtmosphericMode {
    Forecast {
        source: String,
        profile: AtmosphericProfile,
    },
    StandardAtmosphere,
}

impl fmt::Display for AtmosphericMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AtmosphericMode::Forecast { source, profile } => {
                write!(f, "Forecast ({}, {} levels)", source, profile.levels().len())
            }
            AtmosphericMode::StandardAtmosphere => write!(f, "Standard Atmosphere"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentDescriptor {
    pub site: LaunchSite,
    pub epoch: Epoch,
    mode: AtmosphericMode,
}

impl EnvironmentDescriptor {
    pub fn new(site: LaunchSite, epoch: Epoch, mode: AtmosphericMode) -> Self {
        Self { site, epoch, mode }
    }

    pub fn standard(site: LaunchSite, epoch: Epoch) -> Self {
        Self::new(site, epoch, AtmosphericMode::StandardAtmosphere)
    }

    pub fn mode(&self) -> &AtmosphericMode {
        &self.mode
    }

    pub fn is_forecast(&self) -> bool {
        matches!(self.mode, AtmosphericMode::Forecast { .. })
    }

    fn model(&self) -> &dyn AtmosphereModel {
        match &self.mode {
            AtmosphericMode::Forecast { profile, .. } => profile,
            AtmosphericMode::StandardAtmosphere => &StandardAtmosphere,
        }
    }
}

impl AtmosphereModel for EnvironmentDescriptor {
    fn pressure(&self, altitude_asl: f64) -> f64 {
        self.model().pressure(altitude_asl)
    }

    fn temperature(&self, altitude_asl: f64) -> f64 {
        self.model().temperature(altitude_asl)
    }

    fn wind(&self, altitude_asl: f64) -> na::Vector3<f64> {
        self.model().wind(altitude_asl)
    }
}

/// Builds the launch environment, preferring the forecast.
///
/// The provider gets exactly one attempt. Any failure is logged and the
/// standard atmosphere is used for the rest of the run.
pub fn build_environment(
    site: LaunchSite,
    epoch: Epoch,
    provider: &dyn ForecastProvider,
) -> EnvironmentDescriptor {
    match provider.fetch(&site, epoch) {
        Ok(profile) => {
            info!(
                source = provider.source(),
                levels = profile.levels().len(),
                "using forecast atmosphere"
            );
            EnvironmentDescriptor::new(
                site,
                epoch,
                AtmosphericMode::Forecast {
                    source: provider.source().to_string(),
                    profile,
                },
            )
        }
        Err(e) => {
            warn!(
                source = provider.source(),
                "could not download forecast data ({}); using standard atmosphere instead", e
            );
            EnvironmentDescriptor::standard(site, epoch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{ForecastError, OfflineProvider, ProfileLevel};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    struct FailingProvider {
        calls: Cell<usize>,
    }

    impl ForecastProvider for FailingProvider {
        fn source(&self) -> &str {
            "failing"
        }

        fn fetch(&self, _: &LaunchSite, _: Epoch) -> Result<AtmosphericProfile, ForecastError> {
            self.calls.set(self.calls.get() + 1);
            Err(ForecastError::HttpStatus(503))
        }
    }

    struct FixedProvider;

    impl ForecastProvider for FixedProvider {
        fn source(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _: &LaunchSite, _: Epoch) -> Result<AtmosphericProfile, ForecastError> {
            AtmosphericProfile::new(vec![
                ProfileLevel::from_wind_direction(1_000.0, 90_000.0, 290.0, 5.0, 270.0),
                ProfileLevel::from_wind_direction(3_000.0, 70_000.0, 275.0, 15.0, 270.0),
            ])
        }
    }

    fn site() -> LaunchSite {
        LaunchSite::new(35.5, -102.3, 971.1)
    }

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc_hms(2025, 10, 12, 18, 0, 0)
    }

    #[test]
    fn failing_provider_falls_back_to_standard_atmosphere() {
        let provider = FailingProvider { calls: Cell::new(0) };
        let env = build_environment(site(), epoch(), &provider);

        assert_eq!(env.mode(), &AtmosphericMode::StandardAtmosphere);
        assert_eq!(provider.calls.get(), 1, "single attempt, no retry");
        assert_relative_eq!(env.pressure(0.0), 101_325.0);
    }

    #[test]
    fn offline_provider_falls_back() {
        let env = build_environment(site(), epoch(), &OfflineProvider);
        assert!(!env.is_forecast());
        assert_eq!(env.site, site());
        assert_eq!(env.epoch, epoch());
    }

    #[test]
    fn successful_forecast_is_recorded() {
        let env = build_environment(site(), epoch(), &FixedProvider);
        assert!(env.is_forecast());
        assert!(env.mode().to_string().starts_with("Forecast (fixed"));
        assert_relative_eq!(env.wind(2_000.0).x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(env.temperature(2_000.0), 282.5);
    }
}
