use clap::Parser;
use std::path::PathBuf;

use vortexshed::analysis::{DetectionPolicy, PeakPeriodEstimator, StrouhalBatchRunner, SweepGrid};
use vortexshed::config::{FluidModel, SweepConfig};
use vortexshed::io::{ColumnSpec, DirectorySignalSource};
use vortexshed::output::{OutputFormat, create_formatter};

#[derive(Parser, Debug)]
#[command(name = "vortexshed")]
#[command(about = "Batch Strouhal number extraction from CFD monitor exports", long_about = None)]
struct Args {
    /// Directory containing monitor CSV files named <prefix>_Re<Re>_D<D>.csv
    data_dir: PathBuf,

    /// TOML sweep configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reynolds numbers to sweep (overrides the config file)
    #[arg(long, value_delimiter = ',')]
    re: Vec<f64>,

    /// Characteristic lengths in metres (overrides the config file)
    #[arg(long, value_delimiter = ',')]
    d: Vec<f64>,

    /// Dynamic viscosity in Pa·s
    #[arg(long)]
    mu: Option<f64>,

    /// Density in kg/m³
    #[arg(long)]
    rho: Option<f64>,

    /// Kinematic viscosity in m²/s; selects U0 = Re·nu/D instead of
    /// Re·mu/(rho·D)
    #[arg(long)]
    nu: Option<f64>,

    /// Peak detection policy: "prominence:1e-12", "height:1e-10", or a bare
    /// prominence value
    #[arg(long)]
    peaks: Option<DetectionPolicy>,

    /// Number of trailing peaks used for the period estimate
    #[arg(long)]
    trailing_window: Option<usize>,

    /// Monitor filename prefix
    #[arg(long, default_value = "Max_V_sur_Y")]
    prefix: String,

    /// Time column name override
    #[arg(long)]
    time_column: Option<String>,

    /// Velocity column name override
    #[arg(long)]
    velocity_column: Option<String>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = resolve_config(&args)?;

    log::info!(
        "sweeping {} Re values x {} D values under {}",
        config.grid.re_values.len(),
        config.grid.d_values.len(),
        args.data_dir.display()
    );

    let estimator =
        PeakPeriodEstimator::new(config.estimator.policy, config.estimator.trailing_window)?;
    let runner = StrouhalBatchRunner::new(estimator, config.fluid);

    let columns = ColumnSpec {
        time: args.time_column.clone(),
        value: args.velocity_column.clone(),
    };
    let source =
        DirectorySignalSource::new(args.data_dir.clone(), args.prefix.clone()).with_columns(columns);

    let records = runner.run(&config.grid, &source)?;

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    for record in &records {
        println!("{}", formatter.format(record));
    }

    log::info!(
        "{} of {} combinations resolved",
        records.len(),
        config.grid.combination_count()
    );

    Ok(())
}

/// Merge the optional config file with CLI overrides. CLI grids replace the
/// file's grids entirely; fluid flags replace the file's fluid model.
fn resolve_config(args: &Args) -> anyhow::Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig {
            grid: SweepGrid::new(Vec::new(), Vec::new()),
            fluid: FluidModel::default(),
            estimator: Default::default(),
        },
    };

    if !args.re.is_empty() {
        config.grid.re_values = args.re.clone();
    }
    if !args.d.is_empty() {
        config.grid.d_values = args.d.clone();
    }

    if let Some(nu) = args.nu {
        config.fluid = FluidModel::Kinematic { nu };
    } else if args.mu.is_some() || args.rho.is_some() {
        config.fluid = FluidModel::Dynamic {
            mu: args.mu.unwrap_or(vortexshed::constants::AIR_DYNAMIC_VISCOSITY),
            rho: args.rho.unwrap_or(vortexshed::constants::AIR_DENSITY),
        };
    }

    if let Some(policy) = args.peaks {
        config.estimator.policy = policy;
    }
    if let Some(window) = args.trailing_window {
        config.estimator.trailing_window = window;
    }

    config.validate()?;
    Ok(config)
}
