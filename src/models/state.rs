use nalgebra as na;

/// Translational state of the vehicle in the launch-pad ENU frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub time: f64,                  // s since ignition
    pub position: na::Vector3<f64>, // m, east/north/up from the pad
    pub velocity: na::Vector3<f64>, // m/s
}

impl FlightState {
    pub fn new(time: f64, position: na::Vector3<f64>, velocity: na::Vector3<f64>) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }

    /// Sitting on the pad.
    pub fn at_rest(time: f64) -> Self {
        Self::new(time, na::Vector3::zeros(), na::Vector3::zeros())
    }

    pub fn altitude_agl(&self) -> f64 {
        self.position.z
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.velocity.z
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// Straight-line blend towards `other`, used to pin events between steps.
    pub fn lerp(&self, other: &Self, fraction: f64) -> Self {
        *self + (*other + *self * -1.0) * fraction
    }
}

impl std::ops::Add for FlightState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        FlightState {
            time: self.time + other.time,
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
        }
    }
}

impl std::ops::Mul<f64> for FlightState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        FlightState {
            time: self.time * scalar,
            position: self.position * scalar,
            velocity: self.velocity * scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_midpoint() {
        let a = FlightState::new(1.0, na::Vector3::new(0.0, 0.0, 10.0), na::Vector3::new(0.0, 0.0, -2.0));
        let b = FlightState::new(2.0, na::Vector3::new(0.0, 0.0, -10.0), na::Vector3::new(0.0, 0.0, -4.0));
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.time, 1.5);
        assert_relative_eq!(mid.altitude_agl(), 0.0);
        assert_relative_eq!(mid.vertical_velocity(), -3.0);
    }
}
