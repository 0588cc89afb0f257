use crate::constants::SPEED_EPSILON;
use nalgebra as na;

/// Aerodynamic drag opposing the air-relative velocity.
///
/// `drag_area` is CD·S in m², `density` in kg/m³.
pub fn drag_force(
    drag_area: f64,
    density: f64,
    air_relative_velocity: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    let speed = air_relative_velocity.magnitude();
    if speed < SPEED_EPSILON {
        return na::Vector3::zeros();
    }

    -0.5 * density * drag_area * speed * air_relative_velocity
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(
        1.0, 1.2, na::Vector3::new(0.0, 0.0, -10.0),
        na::Vector3::new(0.0, 0.0, 60.0);
        "descent under canopy pushes up"
    )]
    #[test_case(
        0.5, 1.0, na::Vector3::new(3.0, 4.0, 0.0),
        na::Vector3::new(-3.75, -5.0, 0.0);
        "horizontal flow"
    )]
    #[test_case(
        8.8, 1.2, na::Vector3::zeros(),
        na::Vector3::zeros();
        "still air"
    )]
    fn test_drag_force(area: f64, rho: f64, v: na::Vector3<f64>, expected: na::Vector3<f64>) {
        assert_abs_diff_eq!(drag_force(area, rho, &v), expected, epsilon = 1e-12);
    }
}
