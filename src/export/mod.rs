pub mod csv_export;
pub mod trajectory_plot;

pub use csv_export::{export_csv, write_csv, CSV_HEADER};
pub use trajectory_plot::{export_trajectory_plot, render_trajectory_svg};
