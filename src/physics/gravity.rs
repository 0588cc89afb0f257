use crate::constants::{G0, R_EARTH};
use nalgebra as na;

/// Gravitational acceleration magnitude at a height above mean sea level.
pub fn gravity_magnitude(altitude_asl: f64) -> f64 {
    let ratio = R_EARTH / (R_EARTH + altitude_asl);
    G0 * ratio * ratio
}

/// Gravity in the local ENU frame; always straight down.
pub fn gravity_acceleration(altitude_asl: f64) -> na::Vector3<f64> {
    na::Vector3::new(0.0, 0.0, -gravity_magnitude(altitude_asl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(0.0, 9.80665; "gravity at sea level")]
    #[test_case(1_000.0, 9.80357; "gravity at 1 km altitude")]
    #[test_case(100_000.0, 9.5059; "gravity at 100 km altitude")]
    fn test_gravity_magnitude(altitude: f64, expected: f64) {
        assert_abs_diff_eq!(gravity_magnitude(altitude), expected, epsilon = 1e-3);
    }

    #[test]
    fn points_down() {
        let g = gravity_acceleration(971.1);
        assert_eq!(g.x, 0.0);
        assert_eq!(g.y, 0.0);
        assert!(g.z < -9.8);
    }
}
