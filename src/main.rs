use anyhow::{Context, Result};
use clap::Parser;
use raidersim::atmosphere::{
    build_environment, ForecastProvider, GfsForecastProvider, OfflineProvider,
};
use raidersim::config::{RaiderX, RawDesignParameters};
use raidersim::derive::{DerivedMotorParameters, DerivedRecoveryParameters};
use raidersim::export::{export_csv, export_trajectory_plot};
use raidersim::flight::{run_flight, run_flight_seeded, FlightReport, LaunchConfig};
use raidersim::models::{build_rocket, MotorDescriptor};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "raider-sim")]
#[command(about = "Single-stage solid rocket flight simulation with dual-deploy recovery")]
#[command(version)]
struct Args {
    /// Vehicle design file (TOML). Defaults to the built-in RaiderX.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Skip the forecast download and fly in the standard atmosphere
    #[arg(long)]
    offline: bool,

    /// Seed for recovery sensor noise
    #[arg(long)]
    seed: Option<u64>,

    /// Override the flight time bound (s)
    #[arg(long)]
    max_time: Option<f64>,

    #[arg(long, default_value = "boys_ranch_flight.csv")]
    csv_name: String,

    #[arg(long, default_value = "boys_ranch_trajectory.svg")]
    plot_name: String,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let design = match &args.config {
        Some(path) => RawDesignParameters::from_toml_file(path)
            .with_context(|| format!("loading design from {}", path.display()))?,
        None => RaiderX::design(),
    };

    let motor_parameters =
        DerivedMotorParameters::from_design(&design.motor).context("invalid motor design")?;
    let recovery_parameters = DerivedRecoveryParameters::from_design(&design.parachutes)
        .context("invalid recovery design")?;
    info!(
        grain_density = motor_parameters.grain_density,
        "derived propellant grain density (kg/m³)"
    );
    for chute in &recovery_parameters.parachutes {
        info!(parachute = %chute.name, drag_area = chute.drag_area, "derived drag area (m²)");
    }

    let motor = MotorDescriptor::from_design(&design.motor, &motor_parameters)
        .context("invalid motor design")?;
    let rocket =
        build_rocket(&design, motor, &recovery_parameters).context("invalid rocket design")?;

    let provider: Box<dyn ForecastProvider> = if args.offline {
        Box::new(OfflineProvider)
    } else {
        Box::new(GfsForecastProvider::new())
    };
    let environment = build_environment(
        design.launch_site.site(),
        design.launch_site.epoch(),
        provider.as_ref(),
    );

    let mut launch = LaunchConfig::from_design(&design.flight).context("invalid launch setup")?;
    if let Some(max_time) = args.max_time {
        launch = LaunchConfig::new(launch.rail_length, launch.inclination, launch.heading, max_time)
            .context("invalid --max-time")?;
    }

    let result = match args.seed {
        Some(seed) => run_flight_seeded(&rocket, &environment, &launch, seed)?,
        None => run_flight(
            &rocket,
            &environment,
            launch.rail_length,
            launch.inclination,
            launch.heading,
            launch.max_time,
        )?,
    };

    println!("{}", FlightReport::new(&rocket, &environment, &result));

    let csv_path = args.output_dir.join(&args.csv_name);
    export_csv(&csv_path, &result)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    let plot_path = args.output_dir.join(&args.plot_name);
    export_trajectory_plot(&plot_path, &result)
        .with_context(|| format!("writing {}", plot_path.display()))?;
    info!(csv = %csv_path.display(), plot = %plot_path.display(), "exported flight data");

    Ok(())
}
