use crate::physics::dynamics::EquationsOfMotion;
use std::ops::{Add, Mul};

/// Advances `state` by `dt` with the classic fourth-order Runge-Kutta scheme.
pub fn rk4_step<T>(eom: &T, state: &T::State, dt: f64) -> T::State
where
    T: EquationsOfMotion,
    T::State: Clone + Add<Output = T::State> + Mul<f64, Output = T::State>,
{
    let k1 = eom.compute_derivative(state);

    let state2 = state.clone() + k1.clone() * (dt / 2.0);
    let k2 = eom.compute_derivative(&state2);

    let state3 = state.clone() + k2.clone() * (dt / 2.0);
    let k3 = eom.compute_derivative(&state3);

    let state4 = state.clone() + k3.clone() * dt;
    let k4 = eom.compute_derivative(&state4);

    state.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightState;
    use approx::assert_relative_eq;
    use nalgebra as na;

    struct ConstantAcceleration(na::Vector3<f64>);

    impl EquationsOfMotion for ConstantAcceleration {
        type State = FlightState;

        fn compute_derivative(&self, state: &FlightState) -> FlightState {
            FlightState::new(1.0, state.velocity, self.0)
        }
    }

    struct Oscillator;

    impl EquationsOfMotion for Oscillator {
        type State = FlightState;

        fn compute_derivative(&self, state: &FlightState) -> FlightState {
            FlightState::new(1.0, state.velocity, -state.position)
        }
    }

    #[test]
    fn constant_acceleration_is_exact() {
        let eom = ConstantAcceleration(na::Vector3::new(0.0, 0.0, -9.8));
        let start = FlightState::new(0.0, na::Vector3::zeros(), na::Vector3::new(0.0, 0.0, 49.0));

        let mut state = start;
        for _ in 0..100 {
            state = rk4_step(&eom, &state, 0.05);
        }

        assert_relative_eq!(state.time, 5.0, epsilon = 1e-12);
        assert_relative_eq!(state.position.z, 49.0 * 5.0 - 0.5 * 9.8 * 25.0, epsilon = 1e-9);
        assert_relative_eq!(state.velocity.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn oscillator_keeps_phase() {
        let mut state = FlightState::new(0.0, na::Vector3::new(1.0, 0.0, 0.0), na::Vector3::zeros());
        let dt = 0.01;
        let steps = (std::f64::consts::PI / dt).round() as usize;
        for _ in 0..steps {
            state = rk4_step(&Oscillator, &state, dt);
        }

        // half a period later the mass sits at the opposite end
        assert_relative_eq!(state.position.x, (state.time).cos(), epsilon = 1e-8);
        assert!(state.position.x < -0.99);
    }
}
