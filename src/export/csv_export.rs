use crate::flight::{FlightError, FlightResult};
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: [&str; 4] = [
    "Time (s)",
    "Altitude ASL (m)",
    "Mach Number",
    "Angle of Attack (deg)",
];

/// Writes one row per trajectory sample.
pub fn write_csv<W: Write>(writer: W, result: &FlightResult) -> Result<(), FlightError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;

    for sample in &result.samples {
        writer.write_record(&[
            format!("{:.4}", sample.time),
            format!("{:.3}", sample.altitude_asl),
            format!("{:.5}", sample.mach_number),
            format!("{:.4}", sample.angle_of_attack.to_degrees()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_csv(path: impl AsRef<Path>, result: &FlightResult) -> Result<(), FlightError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_csv(File::create(path)?, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{FlightSample, LaunchConfig, TerminationReason, Trajectory};
    use nalgebra as na;

    fn result() -> FlightResult {
        let sample = |time: f64, altitude: f64, mach: f64, aoa_deg: f64| FlightSample {
            time,
            position: na::Vector3::new(0.0, 0.0, altitude - 971.1),
            velocity: na::Vector3::zeros(),
            altitude_asl: altitude,
            mach_number: mach,
            angle_of_attack: aoa_deg.to_radians(),
        };
        FlightResult::new(
            LaunchConfig::new(5.1816, 84.0, 90.0, 600.0).unwrap(),
            Trajectory {
                samples: vec![sample(0.0, 971.1, 0.0, 0.0), sample(1.5, 1100.25, 0.42, 2.5)],
                events: Vec::new(),
                termination: TerminationReason::GroundImpact,
            },
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn writes_fixed_columns() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &result()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Time (s),Altitude ASL (m),Mach Number,Angle of Attack (deg)"
        );
        assert_eq!(lines[1], "0.0000,971.100,0.00000,0.0000");
        assert_eq!(lines[2], "1.5000,1100.250,0.42000,2.5000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn export_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("raidersim-csv-{}", std::process::id()));
        let path = dir.join("nested").join("flight.csv");

        export_csv(&path, &result()).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }
}
