use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::PathBuf;

use vortexshed::analysis::{DetectionPolicy, PeakPeriodEstimator, find_peaks};
use vortexshed::config::FluidModel;
use vortexshed::constants::{AIR_DENSITY, AIR_DYNAMIC_VISCOSITY, DEFAULT_TRAILING_WINDOW};
use vortexshed::io::{ColumnSpec, combination_from_filename, load_signal};

#[derive(Parser, Debug)]
#[command(name = "analyze_probe")]
#[command(about = "Analyze monitor CSV exports for vortex shedding statistics", long_about = None)]
struct Args {
    /// Monitor CSV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Peak detection policy: "prominence:1e-12", "height:1e-10", or a bare
    /// prominence value
    #[arg(long, default_value = "prominence:1e-12")]
    peaks: DetectionPolicy,

    /// Number of trailing peaks used for the period estimate
    #[arg(long, default_value_t = DEFAULT_TRAILING_WINDOW)]
    trailing_window: usize,

    /// Dynamic viscosity in Pa·s
    #[arg(long, default_value_t = AIR_DYNAMIC_VISCOSITY)]
    mu: f64,

    /// Density in kg/m³
    #[arg(long, default_value_t = AIR_DENSITY)]
    rho: f64,

    /// Kinematic viscosity in m²/s; selects U0 = Re·nu/D instead of
    /// Re·mu/(rho·D)
    #[arg(long)]
    nu: Option<f64>,

    /// Time column name override
    #[arg(long)]
    time_column: Option<String>,

    /// Velocity column name override
    #[arg(long)]
    velocity_column: Option<String>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory to write per-file signal plots with detected peaks
    #[cfg(feature = "plot")]
    #[arg(long)]
    plot_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct ProbeAnalysis {
    filename: String,
    /// Reynolds number recovered from the filename, when encoded
    re: Option<f64>,
    /// Characteristic length recovered from the filename, when encoded
    d: Option<f64>,
    u0: Option<f64>,
    sample_count: usize,
    peak_count: usize,
    period_s: Option<f64>,
    frequency_hz: Option<f64>,
    strouhal: Option<f64>,
    /// Mean of all consecutive peak intervals, transient included
    interval_mean_s: Option<f64>,
    /// Standard deviation of all consecutive peak intervals
    interval_jitter_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
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

    let fluid = match args.nu {
        Some(nu) => FluidModel::Kinematic { nu },
        None => FluidModel::Dynamic {
            mu: args.mu,
            rho: args.rho,
        },
    };

    let results: Vec<ProbeAnalysis> = args
        .files
        .iter()
        .map(|path| analyze_file(path, &args, fluid))
        .collect();

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Csv => print_csv(&results),
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}

fn analyze_file(path: &PathBuf, args: &Args, fluid: FluidModel) -> ProbeAnalysis {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    match analyze_file_impl(path, args, fluid) {
        Ok(analysis) => analysis,
        Err(e) => ProbeAnalysis {
            filename,
            re: None,
            d: None,
            u0: None,
            sample_count: 0,
            peak_count: 0,
            period_s: None,
            frequency_hz: None,
            strouhal: None,
            interval_mean_s: None,
            interval_jitter_s: None,
            error: Some(e.to_string()),
        },
    }
}

fn analyze_file_impl(
    path: &PathBuf,
    args: &Args,
    fluid: FluidModel,
) -> anyhow::Result<ProbeAnalysis> {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let columns = ColumnSpec {
        time: args.time_column.clone(),
        value: args.velocity_column.clone(),
    };
    let signal = load_signal(path, &columns)?;

    let estimator = PeakPeriodEstimator::new(args.peaks, args.trailing_window)?;
    let estimate = estimator.estimate(&signal);

    // Files without encoded parameters still report period and frequency;
    // only the non-dimensionalization needs Re and D
    let combination = combination_from_filename(&filename);
    let (re, d) = match combination {
        Some(c) => (Some(c.re), Some(c.d)),
        None => {
            log::info!("{filename}: no _Re/_D parameters in filename");
            (None, None)
        }
    };

    let u0 = match (re, d) {
        (Some(re), Some(d)) => Some(fluid.free_stream_velocity(re, d)),
        _ => None,
    };
    let strouhal = match (estimate.frequency, d, u0) {
        (Some(f), Some(d), Some(u0)) => Some(f * d / u0),
        _ => None,
    };

    let peaks = find_peaks(signal.values(), args.peaks);
    let mut interval_stats: Stats<f64> = Stats::new();
    for pair in peaks.windows(2) {
        interval_stats.update(signal.times()[pair[1]] - signal.times()[pair[0]]);
    }
    let (interval_mean_s, interval_jitter_s) = if interval_stats.count > 0 {
        (Some(interval_stats.mean), Some(interval_stats.std_dev))
    } else {
        (None, None)
    };

    #[cfg(feature = "plot")]
    if let Some(dir) = &args.plot_dir {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "probe".to_string());
        let plot_path = dir.join(format!("{}_peaks.png", stem));
        vortexshed::plot::render_signal(&signal, &peaks, &plot_path)?;
        log::info!("wrote {}", plot_path.display());
    }

    Ok(ProbeAnalysis {
        filename,
        re,
        d,
        u0,
        sample_count: signal.len(),
        peak_count: estimate.peak_count,
        period_s: estimate.period,
        frequency_hz: estimate.frequency,
        strouhal,
        interval_mean_s,
        interval_jitter_s,
        error: None,
    })
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}

fn print_text(results: &[ProbeAnalysis]) {
    println!(
        "{:<40} {:>8} {:>6} {:>6} {:>10} {:>10} {:>10}",
        "File", "Re", "D", "Peaks", "Period", "Freq", "St"
    );
    println!("{}", "-".repeat(96));

    for result in results {
        if let Some(ref err) = result.error {
            println!("{:<40} ERROR: {}", result.filename, err);
            continue;
        }

        println!(
            "{:<40} {:>8} {:>6} {:>6} {:>10} {:>10} {:>10}",
            result.filename,
            opt(result.re, 0),
            opt(result.d, 2),
            result.peak_count,
            opt(result.period_s, 4),
            opt(result.frequency_hz, 4),
            opt(result.strouhal, 4),
        );
    }

    for result in results {
        if result.error.is_some() {
            continue;
        }
        if let (Some(mean), Some(jitter)) = (result.interval_mean_s, result.interval_jitter_s) {
            eprintln!();
            eprintln!("Peak interval statistics for {}:", result.filename);
            eprintln!("  All intervals: {:.4} ± {:.4} s", mean, jitter);
            if let Some(period) = result.period_s {
                eprintln!("  Trailing mean: {:.4} s", period);
            }
        }
    }
}

fn print_csv(results: &[ProbeAnalysis]) {
    println!(
        "filename,re,d,u0_m_per_s,sample_count,peak_count,period_s,frequency_hz,strouhal,interval_mean_s,interval_jitter_s,error"
    );
    for result in results {
        let field = |v: Option<f64>| v.map(|x| format!("{:.6}", x)).unwrap_or_default();
        println!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            result.filename,
            result.re.map(|v| format!("{}", v)).unwrap_or_default(),
            result.d.map(|v| format!("{}", v)).unwrap_or_default(),
            field(result.u0),
            result.sample_count,
            result.peak_count,
            field(result.period_s),
            field(result.frequency_hz),
            field(result.strouhal),
            field(result.interval_mean_s),
            field(result.interval_jitter_s),
            result.error.as_deref().unwrap_or(""),
        );
    }
}

fn print_json(results: &[ProbeAnalysis]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}
