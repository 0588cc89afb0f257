use super::AtmosphereModel;
use crate::constants::{G0, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMPERATURE, R_AIR, R_EARTH};

/// (geopotential base height m, base temperature K, lapse rate K/m)
const ISA_LAYERS: [(f64, f64, f64); 7] = [
    (0.0, ISA_SEA_LEVEL_TEMPERATURE, -0.0065),
    (11_000.0, 216.65, 0.0),
    (20_000.0, 216.65, 0.001),
    (32_000.0, 228.65, 0.0028),
    (47_000.0, 270.65, 0.0),
    (51_000.0, 270.65, -0.0028),
    (71_000.0, 214.65, -0.002),
];

/// ICAO/ISA 1976 standard atmosphere up to the mesosphere. Deterministic and
/// windless; used whenever no forecast is available.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StandardAtmosphere;

impl StandardAtmosphere {
    fn geopotential_height(altitude: f64) -> f64 {
        R_EARTH * altitude / (R_EARTH + altitude)
    }

    /// Layer index, base pressure and geopotential height for an altitude.
    fn layer(altitude: f64) -> (usize, f64, f64) {
        let h = Self::geopotential_height(altitude);
        let mut base_pressure = ISA_SEA_LEVEL_PRESSURE;
        let mut index = 0;

        while index + 1 < ISA_LAYERS.len() && h >= ISA_LAYERS[index + 1].0 {
            let (h0, t0, lapse) = ISA_LAYERS[index];
            let thickness = ISA_LAYERS[index + 1].0 - h0;
            base_pressure = Self::layer_pressure(base_pressure, t0, lapse, thickness);
            index += 1;
        }

        (index, base_pressure, h)
    }

    fn layer_pressure(base_pressure: f64, base_temperature: f64, lapse: f64, dh: f64) -> f64 {
        if lapse.abs() < 1e-12 {
            base_pressure * (-G0 * dh / (R_AIR * base_temperature)).exp()
        } else {
            let t = base_temperature + lapse * dh;
            base_pressure * (t / base_temperature).powf(-G0 / (lapse * R_AIR))
        }
    }
}

impl AtmosphereModel for StandardAtmosphere {
    fn pressure(&self, altitude_asl: f64) -> f64 {
        let (index, base_pressure, h) = Self::layer(altitude_asl);
        let (h0, t0, lapse) = ISA_LAYERS[index];
        Self::layer_pressure(base_pressure, t0, lapse, h - h0)
    }

    fn temperature(&self, altitude_asl: f64) -> f64 {
        let (index, _, h) = Self::layer(altitude_asl);
        let (h0, t0, lapse) = ISA_LAYERS[index];
        t0 + lapse * (h - h0)
    }
}
