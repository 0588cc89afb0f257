use crate::flight::{FlightError, FlightResult};
use nalgebra as na;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MARGIN: f64 = 60.0;
const MAX_POINTS: usize = 2_000;

/// Cabinet-style oblique projection: east to the right, up the page, north
/// receding at 30° with half scale.
fn project(point: &na::Vector3<f64>) -> (f64, f64) {
    let (sin, cos) = 30.0_f64.to_radians().sin_cos();
    (point.x + 0.5 * point.y * cos, point.z + 0.5 * point.y * sin)
}

struct Viewport {
    min: (f64, f64),
    scale: f64,
}

impl Viewport {
    fn fit(points: &[(f64, f64)]) -> Self {
        let (mut min_u, mut min_v, mut max_u, mut max_v) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
        for &(u, v) in points {
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
        let span_u = (max_u - min_u).max(1.0);
        let span_v = (max_v - min_v).max(1.0);
        let scale = ((WIDTH - 2.0 * MARGIN) / span_u).min((HEIGHT - 2.0 * MARGIN) / span_v);
        Self {
            min: (min_u, min_v),
            scale,
        }
    }

    fn to_screen(&self, (u, v): (f64, f64)) -> (f64, f64) {
        (
            MARGIN + (u - self.min.0) * self.scale,
            HEIGHT - MARGIN - (v - self.min.1) * self.scale,
        )
    }
}

/// Renders the 3-D trajectory as an SVG document.
pub fn render_trajectory_svg(result: &FlightResult) -> String {
    let stride = (result.samples.len() / MAX_POINTS).max(1);
    let mut path: Vec<na::Vector3<f64>> = result
        .samples
        .iter()
        .step_by(stride)
        .map(|s| s.position)
        .collect();
    if let Some(last) = result.final_sample() {
        if path.last() != Some(&last.position) {
            path.push(last.position);
        }
    }

    let projected: Vec<(f64, f64)> = path.iter().map(project).collect();
    let view = Viewport::fit(&projected);
    let origin = view.to_screen((0.0, 0.0));

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="16">Flight trajectory</text>"#,
        WIDTH / 2.0
    );

    let axis_length = 0.25 * (WIDTH - 2.0 * MARGIN) / view.scale;
    for (label, tip) in [
        ("East", na::Vector3::new(axis_length, 0.0, 0.0)),
        ("North", na::Vector3::new(0.0, axis_length, 0.0)),
        ("Up", na::Vector3::new(0.0, 0.0, axis_length)),
    ] {
        let (x, y) = view.to_screen(project(&tip));
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{x:.1}" y2="{y:.1}" stroke="#888" stroke-dasharray="4 3"/>"##,
            origin.0, origin.1
        );
        let _ = writeln!(svg, r##"<text x="{x:.1}" y="{y:.1}" fill="#555">{label}</text>"##);
    }

    let points: Vec<String> = projected
        .iter()
        .map(|&p| {
            let (x, y) = view.to_screen(p);
            format!("{x:.1},{y:.1}")
        })
        .collect();
    let _ = writeln!(
        svg,
        r##"<polyline fill="none" stroke="#1f77b4" stroke-width="2" points="{}"/>"##,
        points.join(" ")
    );

    if let Some(apogee) = result.apogee() {
        let (x, y) = view.to_screen(project(&apogee.position));
        let _ = writeln!(svg, r##"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="#d62728"/>"##);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}">Apogee {:.0} m AGL</text>"#,
            x + 8.0,
            y - 6.0,
            apogee.altitude_agl()
        );
    }
    if let Some(last) = result.final_sample() {
        let (x, y) = view.to_screen(project(&last.position));
        let _ = writeln!(svg, r##"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="#2ca02c"/>"##);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}">{} t = {:.1} s</text>"#,
            x + 8.0,
            y + 14.0,
            result.termination,
            last.time
        );
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn export_trajectory_plot(
    path: impl AsRef<Path>,
    result: &FlightResult,
) -> Result<(), FlightError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_trajectory_svg(result))?;
    Ok(())
}
