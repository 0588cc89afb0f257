use super::motor::MotorDescriptor;
use crate::config::design::{AirframeDesign, RawDesignParameters};
use crate::derive::parameters::{require_non_negative, require_positive};
use crate::derive::{DerivedRecoveryParameters, DesignError};
use crate::recovery::RecoveryDevice;
use nalgebra as na;
use crate::constants::PI;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoseKind {
    Ogive,
    Conical,
    VonKarman,
}

/// Direction in which axial positions grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystemOrientation {
    #[default]
    TailToNose,
    NoseToTail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoseCone {
    pub name: String,
    pub kind: NoseKind,
    pub length: f64,      // m
    pub position: f64,    // m, tip
    pub base_radius: f64, // m
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrapezoidalFins {
    pub name: String,
    pub count: u32,
    pub root_chord: f64, // m
    pub tip_chord: f64,  // m
    pub span: f64,       // m
    pub position: f64,   // m, root leading edge
    pub cant_angle: f64, // rad
}

impl TrapezoidalFins {
    /// Fins are spaced evenly around the body tube.
    pub fn angular_spacing(&self) -> f64 {
        2.0 * PI / self.count as f64
    }

    pub fn planform_area(&self) -> f64 {
        0.5 * (self.root_chord + self.tip_chord) * self.span
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AerodynamicSurface {
    NoseCone(NoseCone),
    TrapezoidalFins(TrapezoidalFins),
}

impl AerodynamicSurface {
    pub fn name(&self) -> &str {
        match self {
            AerodynamicSurface::NoseCone(n) => &n.name,
            AerodynamicSurface::TrapezoidalFins(f) => &f.name,
        }
    }

    pub fn position(&self) -> f64 {
        match self {
            AerodynamicSurface::NoseCone(n) => n.position,
            AerodynamicSurface::TrapezoidalFins(f) => f.position,
        }
    }
}

/// Bare vehicle: structure and payload without motor, surfaces or recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Airframe {
    pub radius: f64,                       // m
    pub length: f64,                       // m
    pub dry_mass: f64,                     // kg
    pub dry_inertia: [f64; 3],             // kg·m², diagonal
    pub center_of_mass_without_motor: f64, // m
    pub power_off_drag: f64,
    pub power_on_drag: f64,
    pub orientation: CoordinateSystemOrientation,
}

impl Airframe {
    pub fn from_design(design: &AirframeDesign) -> Self {
        Self {
            radius: design.radius,
            length: design.length,
            dry_mass: design.dry_mass,
            dry_inertia: design.dry_inertia,
            center_of_mass_without_motor: design.center_of_mass_from_tail,
            power_off_drag: design.power_off_drag,
            power_on_drag: design.power_on_drag,
            orientation: design.orientation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountedMotor {
    pub motor: MotorDescriptor,
    pub position: f64, // m, nozzle plane
}

/// Complete static vehicle. Immutable once assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct RocketDescriptor {
    pub airframe: Airframe,
    pub motor: MountedMotor,
    /// In attachment order.
    pub surfaces: Vec<AerodynamicSurface>,
    /// In attachment order.
    pub parachutes: Vec<RecoveryDevice>,
}

impl RocketDescriptor {
    pub fn reference_area(&self) -> f64 {
        PI * self.airframe.radius.powi(2)
    }

    pub fn motor(&self) -> &MotorDescriptor {
        &self.motor.motor
    }

    pub fn dry_mass(&self) -> f64 {
        self.airframe.dry_mass + self.motor().dry_mass()
    }

    pub fn total_mass(&self, time: f64) -> f64 {
        self.airframe.dry_mass + self.motor().total_mass(time)
    }

    pub fn dry_inertia(&self) -> na::Matrix3<f64> {
        na::Matrix3::from_diagonal(&na::Vector3::from(self.airframe.dry_inertia))
    }

    /// Airframe drag coefficient with or without thrust.
    pub fn drag_coefficient(&self, time: f64) -> f64 {
        if self.motor().is_burning(time) {
            self.airframe.power_on_drag
        } else {
            self.airframe.power_off_drag
        }
    }

    pub fn burnout_time(&self) -> f64 {
        self.motor().burn_time()
    }
}

/// Incremental assembly of a rocket. Parts are appended in call order.
#[derive(Debug, Clone)]
pub struct RocketAssembly {
    airframe: Airframe,
    motor: Option<MountedMotor>,
    surfaces: Vec<AerodynamicSurface>,
    parachutes: Vec<RecoveryDevice>,
}

impl RocketAssembly {
    pub fn new(airframe: Airframe) -> Result<Self, DesignError> {
        require_positive("rocket_radius", airframe.radius)?;
        require_positive("rocket_length", airframe.length)?;
        require_positive("rocket_dry_mass", airframe.dry_mass)?;
        for value in airframe.dry_inertia {
            require_positive("rocket_dry_inertia", value)?;
        }
        require_non_negative("power_off_drag", airframe.power_off_drag)?;
        require_non_negative("power_on_drag", airframe.power_on_drag)?;

        Ok(Self {
            airframe,
            motor: None,
            surfaces: Vec::new(),
            parachutes: Vec::new(),
        })
    }

    pub fn add_motor(&mut self, motor: MotorDescriptor, position: f64) -> &mut Self {
        self.motor = Some(MountedMotor { motor, position });
        self
    }

    pub fn add_nose(
        &mut self,
        name: impl Into<String>,
        kind: NoseKind,
        length: f64,
        position: f64,
    ) -> Result<&mut Self, DesignError> {
        require_positive("nose_length", length)?;
        self.surfaces.push(AerodynamicSurface::NoseCone(NoseCone {
            name: name.into(),
            kind,
            length,
            position,
            base_radius: self.airframe.radius,
        }));
        Ok(self)
    }

    /// `cant_angle` is in degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn add_trapezoidal_fins(
        &mut self,
        name: impl Into<String>,
        count: u32,
        root_chord: f64,
        tip_chord: f64,
        span: f64,
        position: f64,
        cant_angle: f64,
    ) -> Result<&mut Self, DesignError> {
        if count == 0 {
            return Err(DesignError::NonPositive {
                parameter: "fin_count",
                value: 0.0,
            });
        }
        require_positive("fin_root_chord", root_chord)?;
        require_non_negative("fin_tip_chord", tip_chord)?;
        require_positive("fin_span", span)?;

        self.surfaces
            .push(AerodynamicSurface::TrapezoidalFins(TrapezoidalFins {
                name: name.into(),
                count,
                root_chord,
                tip_chord,
                span,
                position,
                cant_angle: cant_angle.to_radians(),
            }));
        Ok(self)
    }

    pub fn add_parachute(&mut self, device: RecoveryDevice) -> &mut Self {
        self.parachutes.push(device);
        self
    }

    pub fn finish(self) -> Result<RocketDescriptor, DesignError> {
        let motor = self.motor.ok_or(DesignError::MotorNotAttached)?;
        Ok(RocketDescriptor {
            airframe: self.airframe,
            motor,
            surfaces: self.surfaces,
            parachutes: self.parachutes,
        })
    }
}

/// Attaches motor, nose cone, fins and parachutes, in that order, to the
/// design's airframe.
pub fn build_rocket(
    design: &RawDesignParameters,
    motor: MotorDescriptor,
    recovery: &DerivedRecoveryParameters,
) -> Result<RocketDescriptor, DesignError> {
    let mut assembly = RocketAssembly::new(Airframe::from_design(&design.airframe))?;

    assembly.add_motor(motor, design.airframe.motor_position);

    let nose = &design.nose;
    assembly.add_nose(nose.name.clone(), nose.kind, nose.length, nose.position)?;

    let fins = &design.fins;
    assembly.add_trapezoidal_fins(
        fins.name.clone(),
        fins.count,
        fins.root_chord,
        fins.tip_chord,
        fins.span,
        fins.position,
        fins.cant_angle,
    )?;

    if design.parachutes.len() != recovery.parachutes.len() {
        return Err(DesignError::RecoveryDeviceCountMismatch {
            design: design.parachutes.len(),
            derived: recovery.parachutes.len(),
        });
    }
    for chute in &design.parachutes {
        let drag_area = recovery
            .drag_area(&chute.name)
            .ok_or_else(|| DesignError::MissingDragArea(chute.name.clone()))?;
        assembly.add_parachute(RecoveryDevice::from_design(chute, drag_area)?);
    }

    assembly.finish()
}
