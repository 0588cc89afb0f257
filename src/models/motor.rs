use crate::config::design::MotorDesign;
use crate::derive::parameters::{grain_annulus_area, require_non_negative, require_positive};
use crate::derive::{DerivedMotorParameters, DesignError};
use nalgebra as na;

/// Final thrust sample must be within this fraction of peak thrust to count as burnout.
const BURNOUT_THRUST_FRACTION: f64 = 1e-3;
/// Relative tolerance when checking the derived propellant mass against the design value.
const PROPELLANT_MASS_TOLERANCE: f64 = 1e-9;

/// Validated (time, thrust) samples. Time starts at 0 and is strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustCurve {
    samples: Vec<(f64, f64)>,
}

impl ThrustCurve {
    pub fn new(samples: Vec<(f64, f64)>) -> Result<Self, DesignError> {
        let (first_time, _) = *samples.first().ok_or(DesignError::EmptyThrustCurve)?;
        if first_time != 0.0 {
            return Err(DesignError::ThrustCurveStart(first_time));
        }

        for (index, &(time, thrust)) in samples.iter().enumerate() {
            if !(thrust >= 0.0) {
                return Err(DesignError::NegativeThrust { index, thrust });
            }
            if index > 0 && !(time > samples[index - 1].0) {
                return Err(DesignError::ThrustCurveNotIncreasing { index, time });
            }
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    pub fn last_time(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.0)
    }

    pub fn peak_thrust(&self) -> f64 {
        self.samples.iter().map(|s| s.1).fold(0.0, f64::max)
    }

    /// Linear interpolation; zero outside the curve.
    pub fn thrust(&self, time: f64) -> f64 {
        if time < 0.0 || time > self.last_time() {
            return 0.0;
        }
        let upper = self
            .samples
            .iter()
            .position(|&(t, _)| t >= time)
            .unwrap_or(self.samples.len() - 1);
        if upper == 0 {
            return self.samples[0].1;
        }
        let (t0, f0) = self.samples[upper - 1];
        let (t1, f1) = self.samples[upper];
        f0 + (f1 - f0) * (time - t0) / (t1 - t0)
    }

    /// Impulse delivered between ignition and `time` (trapezoidal rule).
    pub fn impulse_until(&self, time: f64) -> f64 {
        let mut impulse = 0.0;
        for pair in self.samples.windows(2) {
            let (t0, f0) = pair[0];
            let (t1, f1) = pair[1];
            if time <= t0 {
                break;
            }
            if time >= t1 {
                impulse += 0.5 * (f0 + f1) * (t1 - t0);
            } else {
                impulse += 0.5 * (f0 + self.thrust(time)) * (time - t0);
                break;
            }
        }
        impulse
    }

    pub fn total_impulse(&self) -> f64 {
        self.impulse_until(self.last_time())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainGeometry {
    pub count: u32,
    pub outer_radius: f64, // m
    pub inner_radius: f64, // m, initial
    pub length: f64,       // m, initial
    pub separation: f64,   // m
}

impl GrainGeometry {
    pub fn volume(&self) -> f64 {
        self.count as f64 * grain_annulus_area(self.outer_radius, self.inner_radius) * self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainParameters {
    pub geometry: GrainGeometry,
    pub density: f64, // kg/m³
}

/// Hardware and mass properties of the motor casing and nozzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorGeometry {
    pub burn_time: f64,                   // s
    pub dry_mass: f64,                    // kg
    pub dry_inertia: [f64; 3],            // kg·m², diagonal
    pub nozzle_radius: f64,               // m
    pub throat_radius: f64,               // m
    pub nozzle_position: f64,             // m, motor frame
    pub center_of_dry_mass_position: f64, // m from nozzle
    pub grains_center_of_mass_position: f64, // m from nozzle
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotorDescriptor {
    pub thrust_curve: ThrustCurve,
    pub grains: GrainParameters,
    pub geometry: MotorGeometry,
    propellant_mass: f64,
    total_impulse: f64,
}

impl MotorDescriptor {
    pub fn from_design(
        design: &MotorDesign,
        derived: &DerivedMotorParameters,
    ) -> Result<Self, DesignError> {
        let grains = GrainParameters {
            geometry: GrainGeometry {
                count: design.grain_count,
                outer_radius: design.grain_outer_radius,
                inner_radius: design.grain_inner_radius,
                length: design.grain_length,
                separation: design.grain_separation,
            },
            density: derived.grain_density,
        };
        let geometry = MotorGeometry {
            burn_time: design.burn_time,
            dry_mass: design.dry_mass,
            dry_inertia: design.dry_inertia,
            nozzle_radius: design.nozzle_radius,
            throat_radius: design.throat_radius,
            nozzle_position: 0.0,
            center_of_dry_mass_position: design.center_of_mass_from_nozzle,
            grains_center_of_mass_position: design.center_of_mass_from_nozzle,
        };

        let motor = build_motor(design.thrust_curve.clone(), grains, geometry)?;

        let expected = design.propellant_mass;
        let derived_mass = motor.propellant_mass();
        if (derived_mass - expected).abs() > PROPELLANT_MASS_TOLERANCE * expected.abs() {
            return Err(DesignError::PropellantMassMismatch {
                expected,
                derived: derived_mass,
            });
        }

        Ok(motor)
    }

    pub fn burn_time(&self) -> f64 {
        self.geometry.burn_time
    }

    pub fn dry_mass(&self) -> f64 {
        self.geometry.dry_mass
    }

    pub fn dry_inertia(&self) -> na::Matrix3<f64> {
        na::Matrix3::from_diagonal(&na::Vector3::from(self.geometry.dry_inertia))
    }

    pub fn propellant_mass(&self) -> f64 {
        self.propellant_mass
    }

    pub fn total_impulse(&self) -> f64 {
        self.total_impulse
    }

    pub fn average_thrust(&self) -> f64 {
        self.total_impulse / self.burn_time()
    }

    pub fn thrust(&self, time: f64) -> f64 {
        self.thrust_curve.thrust(time)
    }

    pub fn is_burning(&self, time: f64) -> bool {
        time >= 0.0 && time < self.burn_time()
    }

    /// Propellant left at `time`, consumed in proportion to delivered impulse.
    pub fn propellant_mass_at(&self, time: f64) -> f64 {
        if time >= self.burn_time() || self.total_impulse <= 0.0 {
            return 0.0;
        }
        let burned = self.thrust_curve.impulse_until(time) / self.total_impulse;
        self.propellant_mass * (1.0 - burned).clamp(0.0, 1.0)
    }

    pub fn total_mass(&self, time: f64) -> f64 {
        self.dry_mass() + self.propellant_mass_at(time)
    }
}

/// Assembles a motor from its thrust curve, grains and casing.
///
/// Propellant mass is not an input: it follows from grain density and volume,
/// so a density derived from a measured mass reproduces that mass.
pub fn build_motor(
    thrust_curve: Vec<(f64, f64)>,
    grains: GrainParameters,
    geometry: MotorGeometry,
) -> Result<MotorDescriptor, DesignError> {
    let thrust_curve = ThrustCurve::new(thrust_curve)?;

    require_positive("burn_time", geometry.burn_time)?;
    let last_time = thrust_curve.last_time();
    if geometry.burn_time < last_time {
        return Err(DesignError::BurnTimeBeforeCurveEnd {
            burn_time: geometry.burn_time,
            last_time,
        });
    }
    let (_, final_thrust) = thrust_curve.samples()[thrust_curve.samples().len() - 1];
    if final_thrust > BURNOUT_THRUST_FRACTION * thrust_curve.peak_thrust() {
        return Err(DesignError::NoBurnout {
            thrust: final_thrust,
        });
    }

    require_positive("motor_dry_mass", geometry.dry_mass)?;
    for value in geometry.dry_inertia {
        require_positive("motor_dry_inertia", value)?;
    }
    require_positive("nozzle_radius", geometry.nozzle_radius)?;
    require_positive("throat_radius", geometry.throat_radius)?;
    require_positive("grain_density", grains.density)?;
    require_non_negative("grain_separation", grains.geometry.separation)?;
    if !(grains.geometry.outer_radius > grains.geometry.inner_radius) {
        return Err(DesignError::InvalidGrainRadii {
            outer: grains.geometry.outer_radius,
            inner: grains.geometry.inner_radius,
        });
    }

    let propellant_mass = grains.density * grains.geometry.volume();
    require_positive("propellant_mass", propellant_mass)?;
    let total_impulse = thrust_curve.total_impulse();

    Ok(MotorDescriptor {
        thrust_curve,
        grains,
        geometry,
        propellant_mass,
        total_impulse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaiderX;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn raider_x_motor() -> MotorDescriptor {
        let design = RaiderX::design();
        let derived = DerivedMotorParameters::from_design(&design.motor).unwrap();
        MotorDescriptor::from_design(&design.motor, &derived).unwrap()
    }

    fn grains() -> GrainParameters {
        GrainParameters {
            geometry: GrainGeometry {
                count: 1,
                outer_radius: 0.02,
                inner_radius: 0.005,
                length: 0.1,
                separation: 0.0,
            },
            density: 1700.0,
        }
    }

    fn geometry(burn_time: f64) -> MotorGeometry {
        MotorGeometry {
            burn_time,
            dry_mass: 0.5,
            dry_inertia: [0.01, 0.01, 0.001],
            nozzle_radius: 0.01,
            throat_radius: 0.005,
            nozzle_position: 0.0,
            center_of_dry_mass_position: 0.1,
            grains_center_of_mass_position: 0.1,
        }
    }

    #[test]
    fn propellant_mass_round_trips() {
        let motor = raider_x_motor();
        assert_relative_eq!(motor.propellant_mass(), RaiderX::PROPELLANT_MASS, max_relative = 1e-12);
        assert_relative_eq!(motor.total_mass(0.0), 2.871 + 3.019, max_relative = 1e-12);
        assert_relative_eq!(motor.total_mass(motor.burn_time()), 2.871);
    }

    #[test]
    fn thrust_interpolates_and_stops_at_burnout() {
        let motor = raider_x_motor();
        assert_relative_eq!(motor.thrust(0.025), 0.5 * 1079.788, max_relative = 1e-12);
        assert_relative_eq!(motor.thrust(2.85), 1347.429, max_relative = 1e-12);
        assert_eq!(motor.thrust(4.53), 0.0);
        assert_eq!(motor.thrust(10.0), 0.0);
        assert!(motor.is_burning(4.52));
        assert!(!motor.is_burning(4.53));
    }

    #[test]
    fn propellant_burns_down_monotonically() {
        let motor = raider_x_motor();
        let mut previous = motor.propellant_mass_at(0.0);
        for i in 1..=100 {
            let m = motor.propellant_mass_at(i as f64 * 0.05);
            assert!(m <= previous);
            previous = m;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn m1260_total_impulse() {
        // M class, roughly 5.6 kNs
        let impulse = raider_x_motor().total_impulse();
        assert!(impulse > 5_120.0 && impulse < 10_240.0, "impulse {impulse}");
        assert_relative_eq!(raider_x_motor().average_thrust(), impulse / 4.53);
    }

    #[test]
    fn design_mass_mismatch_is_rejected() {
        let design = RaiderX::design();
        let derived = DerivedMotorParameters { grain_density: 1500.0 };
        let err = MotorDescriptor::from_design(&design.motor, &derived).unwrap_err();
        assert!(matches!(err, DesignError::PropellantMassMismatch { .. }));
    }

    #[test_case(vec![] => matches Err(DesignError::EmptyThrustCurve); "empty")]
    #[test_case(vec![(0.1, 10.0), (1.0, 0.0)] => matches Err(DesignError::ThrustCurveStart(_)); "late start")]
    #[test_case(vec![(0.0, 0.0), (0.5, 10.0), (0.5, 5.0), (1.0, 0.0)] => matches Err(DesignError::ThrustCurveNotIncreasing { index: 2, .. }); "repeated time")]
    #[test_case(vec![(0.0, 0.0), (0.5, -1.0), (1.0, 0.0)] => matches Err(DesignError::NegativeThrust { index: 1, .. }); "negative thrust")]
    #[test_case(vec![(0.0, 0.0), (0.5, 100.0), (1.0, 50.0)] => matches Err(DesignError::NoBurnout { .. }); "no burnout")]
    #[test_case(vec![(0.0, 0.0), (0.5, 100.0), (1.2, 0.0)] => matches Err(DesignError::BurnTimeBeforeCurveEnd { .. }); "burn time too short")]
    fn invalid_thrust_curves(curve: Vec<(f64, f64)>) -> Result<f64, DesignError> {
        build_motor(curve, grains(), geometry(1.0)).map(|m| m.total_impulse())
    }

    #[test]
    fn burn_time_may_exceed_curve() {
        let motor = build_motor(vec![(0.0, 0.0), (0.5, 100.0), (1.0, 0.0)], grains(), geometry(1.2)).unwrap();
        assert_relative_eq!(motor.total_impulse(), 50.0);
        assert_eq!(motor.dry_inertia()[(2, 2)], 0.001);
    }
}
