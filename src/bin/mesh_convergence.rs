use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::PathBuf;

use vortexshed::analysis::relative_error_percent;
use vortexshed::io::{ColumnSpec, load_profile};

#[derive(Parser, Debug)]
#[command(name = "mesh_convergence")]
#[command(about = "Relative error of velocity profiles against a fine-mesh reference", long_about = None)]
struct Args {
    /// Fine-mesh reference profile CSV
    #[arg(short, long)]
    reference: PathBuf,

    /// Candidate profile CSVs to compare against the reference
    #[arg(required = true)]
    candidates: Vec<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Position column name override
    #[arg(long)]
    position_column: Option<String>,

    /// Velocity column name override
    #[arg(long)]
    velocity_column: Option<String>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// PNG path for a profile comparison plot (reference plus candidates)
    #[cfg(feature = "plot")]
    #[arg(long)]
    plot: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct ConvergenceAnalysis {
    filename: String,
    sample_count: usize,
    mean_error_pct: Option<f64>,
    max_error_pct: Option<f64>,
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

    let columns = ColumnSpec {
        time: args.position_column.clone(),
        value: args.velocity_column.clone(),
    };
    let reference = load_profile(&args.reference, &columns)?;
    log::info!(
        "reference {} with {} samples",
        args.reference.display(),
        reference.len()
    );

    let results: Vec<ConvergenceAnalysis> = args
        .candidates
        .iter()
        .map(|path| {
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            match analyze_candidate(path, &columns, &reference) {
                Ok((sample_count, stats)) => ConvergenceAnalysis {
                    filename,
                    sample_count,
                    mean_error_pct: Some(stats.mean),
                    max_error_pct: Some(stats.max),
                    error: None,
                },
                Err(e) => ConvergenceAnalysis {
                    filename,
                    sample_count: 0,
                    mean_error_pct: None,
                    max_error_pct: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    #[cfg(feature = "plot")]
    if let Some(path) = &args.plot {
        render_comparison(&args, &columns, &reference, path)?;
    }

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Csv => print_csv(&results),
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}

fn analyze_candidate(
    path: &PathBuf,
    columns: &ColumnSpec,
    reference: &vortexshed::Profile,
) -> anyhow::Result<(usize, Stats<f64>)> {
    let candidate = load_profile(path, columns)?;
    let errors = relative_error_percent(&candidate, reference)?;

    let mut stats: Stats<f64> = Stats::new();
    for error in &errors {
        stats.update(*error);
    }
    Ok((candidate.len(), stats))
}

#[cfg(feature = "plot")]
fn render_comparison(
    args: &Args,
    columns: &ColumnSpec,
    reference: &vortexshed::Profile,
    path: &PathBuf,
) -> anyhow::Result<()> {
    let candidates: Vec<vortexshed::Profile> = args
        .candidates
        .iter()
        .filter_map(|p| load_profile(p, columns).ok())
        .collect();
    let mut profiles: Vec<&vortexshed::Profile> = vec![reference];
    profiles.extend(candidates.iter());
    vortexshed::plot::render_profiles(&profiles, path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn print_text(results: &[ConvergenceAnalysis]) {
    println!(
        "{:<40} {:>8} {:>12} {:>12}",
        "File", "Samples", "MeanErr(%)", "MaxErr(%)"
    );
    println!("{}", "-".repeat(76));

    for result in results {
        if let Some(ref err) = result.error {
            println!("{:<40} ERROR: {}", result.filename, err);
            continue;
        }

        let mean = result
            .mean_error_pct
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "-".to_string());
        let max = result
            .max_error_pct
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<40} {:>8} {:>12} {:>12}",
            result.filename, result.sample_count, mean, max
        );
    }
}

fn print_csv(results: &[ConvergenceAnalysis]) {
    println!("filename,sample_count,mean_error_pct,max_error_pct,error");
    for result in results {
        let mean = result
            .mean_error_pct
            .map(|v| format!("{:.6}", v))
            .unwrap_or_default();
        let max = result
            .max_error_pct
            .map(|v| format!("{:.6}", v))
            .unwrap_or_default();
        println!(
            "{},{},{},{},{}",
            result.filename,
            result.sample_count,
            mean,
            max,
            result.error.as_deref().unwrap_or(""),
        );
    }
}

fn print_json(results: &[ConvergenceAnalysis]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}
