pub const G0: f64 = 9.80665; // Standard gravity (m/s²)
pub const R_EARTH: f64 = 6.371e6; // Mean radius of Earth (m)

// Atmosphere
pub const R_AIR: f64 = 287.05287; // Specific gas constant of dry air (J/kg/K)
pub const GAMMA_AIR: f64 = 1.4; // Heat capacity ratio of air
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101_325.0; // Pa
pub const ISA_SEA_LEVEL_TEMPERATURE: f64 = 288.15; // K

// Numerics
pub const DEFAULT_TIME_STEP: f64 = 0.01; // s
pub const SPEED_EPSILON: f64 = 1e-9; // m/s, below this a direction is undefined

// Math
pub const PI: f64 = std::f64::consts::PI;
