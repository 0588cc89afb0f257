//! Raw design inputs as measured or exported from the vehicle design tool.
//!
//! Nothing here is validated or converted: the records are the source of truth
//! and are only read by the derivation and builder stages.

use super::config_errors::ConfigError;
use crate::atmosphere::LaunchSite;
use crate::models::rocket::{CoordinateSystemOrientation, NoseKind};
use chrono::{DateTime, Utc};
use hifitime::Epoch;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDesignParameters {
    pub launch_site: LaunchSiteDesign,
    pub motor: MotorDesign,
    pub airframe: AirframeDesign,
    pub nose: NoseDesign,
    pub fins: FinDesign,
    pub parachutes: Vec<ParachuteDesign>,
    pub flight: FlightDesign,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LaunchSiteDesign {
    pub latitude: f64,  // deg
    pub longitude: f64, // deg
    pub elevation: f64, // m MSL
    pub datetime_utc: DateTime<Utc>,
}

impl LaunchSiteDesign {
    pub fn site(&self) -> LaunchSite {
        LaunchSite::new(self.latitude, self.longitude, self.elevation)
    }

    pub fn epoch(&self) -> Epoch {
        Epoch::from_unix_seconds(self.datetime_utc.timestamp() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotorDesign {
    /// (time s, thrust N) samples
    pub thrust_curve: Vec<(f64, f64)>,
    pub burn_time: f64,              // s
    pub dry_mass: f64,               // kg, motor after burnout
    pub propellant_mass: f64,        // kg
    pub dry_inertia: [f64; 3],       // kg·m², (I11, I22, I33)
    pub grain_count: u32,
    pub grain_outer_radius: f64,     // m
    pub grain_inner_radius: f64,     // m, initial
    pub grain_length: f64,           // m, initial
    pub grain_separation: f64,       // m
    pub center_of_mass_from_nozzle: f64, // m
    pub nozzle_radius: f64,          // m
    pub throat_radius: f64,          // m
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirframeDesign {
    pub radius: f64,                  // m
    pub length: f64,                  // m, nose tip from tail
    pub dry_mass: f64,                // kg, without motor
    pub dry_inertia: [f64; 3],        // kg·m²
    pub center_of_mass_from_tail: f64, // m
    pub power_off_drag: f64,
    pub power_on_drag: f64,
    #[serde(default)]
    pub motor_position: f64,          // m, nozzle plane from tail
    #[serde(default)]
    pub orientation: CoordinateSystemOrientation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NoseDesign {
    pub name: String,
    pub kind: NoseKind,
    pub length: f64,   // m
    pub position: f64, // m, nose tip from tail
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinDesign {
    pub name: String,
    pub count: u32,
    pub root_chord: f64, // m
    pub tip_chord: f64,  // m
    pub span: f64,       // m
    pub position: f64,   // m, root leading edge from tail
    #[serde(default)]
    pub cant_angle: f64, // deg
}

/// `"apogee"` or a deployment altitude in meters above ground level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TriggerSetting {
    Altitude(f64),
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParachuteDesign {
    pub name: String,
    pub cd: f64,
    pub diameter: f64, // m
    pub trigger: TriggerSetting,
    pub sampling_rate: f64, // Hz
    pub lag: f64,           // s
    /// (mean, standard deviation, time correlation)
    pub noise: (f64, f64, f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightDesign {
    pub rail_length: f64, // m
    pub inclination: f64, // deg from horizontal
    pub heading: f64,     // deg clockwise from north
    pub max_time: f64,    // s
}

impl RawDesignParameters {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
