use super::design::{
    AirframeDesign, FinDesign, FlightDesign, LaunchSiteDesign, MotorDesign, NoseDesign,
    ParachuteDesign, RawDesignParameters, TriggerSetting,
};
use crate::models::rocket::{CoordinateSystemOrientation, NoseKind};
use chrono::{TimeZone, Utc};

/// RaiderX v1.8 flown at Boys Ranch near Amarillo, TX, on an SRProp M1260.
pub struct RaiderX;

impl RaiderX {
    // Launch site
    pub const LATITUDE: f64 = 35.5; // deg
    pub const LONGITUDE: f64 = -102.3; // deg
    pub const ELEVATION: f64 = 971.1; // m MSL

    // Motor
    pub const MOTOR_DRY_MASS: f64 = 2.871; // kg, after burnout
    pub const PROPELLANT_MASS: f64 = 3.019; // kg, liftoff minus burnout motor mass
    pub const MOTOR_DRY_INERTIA: [f64; 3] = [0.0697, 0.0697, 0.0034]; // kg·m², solid cylinder
    pub const GRAIN_COUNT: u32 = 3;
    pub const GRAIN_OUTER_RADIUS: f64 = 0.04; // m
    pub const GRAIN_INNER_RADIUS: f64 = 0.01; // m
    pub const GRAIN_LENGTH: f64 = 0.12; // m
    pub const GRAIN_SEPARATION: f64 = 0.005; // m
    pub const MOTOR_CG_FROM_NOZZLE: f64 = 0.267; // m
    pub const NOZZLE_RADIUS: f64 = 0.02; // m
    pub const THROAT_RADIUS: f64 = 0.011; // m
    pub const BURN_TIME: f64 = 4.53; // s

    // Airframe (tail at 0 m, nose tip at 2.5 m)
    pub const RADIUS: f64 = 0.051054; // m, 4 in airframe
    pub const LENGTH: f64 = 2.5; // m
    pub const DRY_MASS: f64 = 10.984; // kg, structure + payload
    pub const DRY_INERTIA: [f64; 3] = [5.72, 5.72, 0.015]; // kg·m², uniform cylinder
    pub const DRY_CG_FROM_TAIL: f64 = 0.998; // m
    pub const POWER_OFF_DRAG: f64 = 0.6;
    pub const POWER_ON_DRAG: f64 = 0.5;

    pub const NOSE_LENGTH: f64 = 0.4953; // m

    pub const FIN_COUNT: u32 = 3;
    pub const FIN_ROOT_CHORD: f64 = 0.3334; // m
    pub const FIN_TIP_CHORD: f64 = 0.0510; // m
    pub const FIN_SPAN: f64 = 0.1270; // m
    pub const FIN_ROOT_LEADING_EDGE_FROM_TAIL: f64 = 0.38; // m

    // Recovery
    pub const REEFED_CD: f64 = 1.2;
    pub const REEFED_DIAMETER: f64 = 1.2192; // m
    pub const MAIN_CD: f64 = 1.5;
    pub const MAIN_DIAMETER: f64 = 2.7432; // m
    pub const MAIN_DEPLOY_ALTITUDE: f64 = 305.0; // m AGL, 1000 ft
    pub const SAMPLING_RATE: f64 = 105.0; // Hz
    pub const DEPLOYMENT_LAG: f64 = 1.5; // s
    pub const SENSOR_NOISE: (f64, f64, f64) = (0.0, 8.3, 0.5);

    // Flight
    pub const RAIL_LENGTH: f64 = 5.1816; // m
    pub const INCLINATION: f64 = 84.0; // deg, 6 deg tilt from vertical
    pub const HEADING: f64 = 90.0; // deg, east
    pub const MAX_TIME: f64 = 600.0; // s

    /// SRProp M1260 approximation (time s, thrust N).
    pub const THRUST_CURVE: [(f64, f64); 38] = [
        (0.0, 0.0),
        (0.05, 1079.788),
        (0.1, 1088.74),
        (0.15, 1097.568),
        (0.2, 1106.256),
        (0.25, 1114.817),
        (0.3, 1123.25),
        (0.35, 1131.537),
        (0.4, 1139.693),
        (0.45, 1147.717),
        (0.6, 1170.926),
        (0.75, 1192.838),
        (0.9, 1213.417),
        (1.05, 1232.629),
        (1.2, 1250.441),
        (1.35, 1266.824),
        (1.5, 1281.753),
        (1.65, 1295.201),
        (1.8, 1307.148),
        (1.95, 1317.574),
        (2.1, 1326.462),
        (2.25, 1333.799),
        (2.4, 1339.572),
        (2.55, 1343.772),
        (2.7, 1346.392),
        (2.85, 1347.429),
        (3.0, 1346.88),
        (3.15, 1344.745),
        (3.3, 1341.029),
        (3.45, 1335.738),
        (3.6, 1328.878),
        (3.75, 1320.462),
        (3.9, 1310.502),
        (4.05, 1299.015),
        (4.2, 1286.018),
        (4.35, 1271.533),
        (4.5, 1255.583),
        (4.53, 0.0),
    ];

    pub fn design() -> RawDesignParameters {
        RawDesignParameters {
            launch_site: LaunchSiteDesign {
                latitude: Self::LATITUDE,
                longitude: Self::LONGITUDE,
                elevation: Self::ELEVATION,
                datetime_utc: Utc
                    .with_ymd_and_hms(2025, 10, 12, 18, 0, 0)
                    .single()
                    .expect("fixed calendar date"),
            },
            motor: MotorDesign {
                thrust_curve: Self::THRUST_CURVE.to_vec(),
                burn_time: Self::BURN_TIME,
                dry_mass: Self::MOTOR_DRY_MASS,
                propellant_mass: Self::PROPELLANT_MASS,
                dry_inertia: Self::MOTOR_DRY_INERTIA,
                grain_count: Self::GRAIN_COUNT,
                grain_outer_radius: Self::GRAIN_OUTER_RADIUS,
                grain_inner_radius: Self::GRAIN_INNER_RADIUS,
                grain_length: Self::GRAIN_LENGTH,
                grain_separation: Self::GRAIN_SEPARATION,
                center_of_mass_from_nozzle: Self::MOTOR_CG_FROM_NOZZLE,
                nozzle_radius: Self::NOZZLE_RADIUS,
                throat_radius: Self::THROAT_RADIUS,
            },
            airframe: AirframeDesign {
                radius: Self::RADIUS,
                length: Self::LENGTH,
                dry_mass: Self::DRY_MASS,
                dry_inertia: Self::DRY_INERTIA,
                center_of_mass_from_tail: Self::DRY_CG_FROM_TAIL,
                power_off_drag: Self::POWER_OFF_DRAG,
                power_on_drag: Self::POWER_ON_DRAG,
                motor_position: 0.0,
                orientation: CoordinateSystemOrientation::TailToNose,
            },
            nose: NoseDesign {
                name: "Fiberglass Nose".to_string(),
                kind: NoseKind::Ogive,
                length: Self::NOSE_LENGTH,
                position: Self::LENGTH,
            },
            fins: FinDesign {
                name: "Aluminum Fins".to_string(),
                count: Self::FIN_COUNT,
                root_chord: Self::FIN_ROOT_CHORD,
                tip_chord: Self::FIN_TIP_CHORD,
                span: Self::FIN_SPAN,
                position: Self::FIN_ROOT_LEADING_EDGE_FROM_TAIL,
                cant_angle: 0.0,
            },
            parachutes: vec![
                ParachuteDesign {
                    name: "reefed".to_string(),
                    cd: Self::REEFED_CD,
                    diameter: Self::REEFED_DIAMETER,
                    trigger: TriggerSetting::Keyword("apogee".to_string()),
                    sampling_rate: Self::SAMPLING_RATE,
                    lag: Self::DEPLOYMENT_LAG,
                    noise: Self::SENSOR_NOISE,
                },
                ParachuteDesign {
                    name: "main".to_string(),
                    cd: Self::MAIN_CD,
                    diameter: Self::MAIN_DIAMETER,
                    trigger: TriggerSetting::Altitude(Self::MAIN_DEPLOY_ALTITUDE),
                    sampling_rate: Self::SAMPLING_RATE,
                    lag: Self::DEPLOYMENT_LAG,
                    noise: Self::SENSOR_NOISE,
                },
            ],
            flight: FlightDesign {
                rail_length: Self::RAIL_LENGTH,
                inclination: Self::INCLINATION,
                heading: Self::HEADING,
                max_time: Self::MAX_TIME,
            },
        }
    }
}
