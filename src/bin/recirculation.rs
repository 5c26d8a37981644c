use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use vortexshed::analysis::recirculation_length;
use vortexshed::constants::DEFAULT_EXCLUSION_MARGIN;
use vortexshed::io::{ColumnSpec, load_profile};

#[derive(Parser, Debug)]
#[command(name = "recirculation")]
#[command(about = "Recirculation length from steady wake velocity profiles", long_about = None)]
struct Args {
    /// Wake profile CSVs to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Trailing-edge position in metres (start of the wake)
    #[arg(short, long)]
    trailing_edge: f64,

    /// Margin past the trailing edge excluded from the minimum search, in
    /// metres
    #[arg(short = 'm', long, default_value_t = DEFAULT_EXCLUSION_MARGIN)]
    exclusion_margin: f64,

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
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct RecirculationAnalysis {
    filename: String,
    sample_count: usize,
    length_m: Option<f64>,
    x_min_m: Option<f64>,
    u_min_m_per_s: Option<f64>,
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

    let results: Vec<RecirculationAnalysis> = args
        .files
        .iter()
        .map(|path| {
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            match analyze_wake(path, &columns, args.trailing_edge, args.exclusion_margin) {
                Ok((sample_count, result)) => RecirculationAnalysis {
                    filename,
                    sample_count,
                    length_m: Some(result.length),
                    x_min_m: Some(result.x_min),
                    u_min_m_per_s: Some(result.u_min),
                    error: None,
                },
                Err(e) => RecirculationAnalysis {
                    filename,
                    sample_count: 0,
                    length_m: None,
                    x_min_m: None,
                    u_min_m_per_s: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Csv => print_csv(&results),
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}

fn analyze_wake(
    path: &PathBuf,
    columns: &ColumnSpec,
    trailing_edge: f64,
    exclusion_margin: f64,
) -> anyhow::Result<(usize, vortexshed::analysis::Recirculation)> {
    let profile = load_profile(path, columns)?;
    let result = recirculation_length(&profile, trailing_edge, exclusion_margin)?;
    Ok((profile.len(), result))
}

fn print_text(results: &[RecirculationAnalysis]) {
    println!(
        "{:<40} {:>8} {:>10} {:>10} {:>12}",
        "File", "Samples", "Lr (m)", "x_min (m)", "u_min (m/s)"
    );
    println!("{}", "-".repeat(84));

    for result in results {
        if let Some(ref err) = result.error {
            println!("{:<40} ERROR: {}", result.filename, err);
            continue;
        }

        let field = |v: Option<f64>| {
            v.map(|x| format!("{:.4}", x))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:<40} {:>8} {:>10} {:>10} {:>12}",
            result.filename,
            result.sample_count,
            field(result.length_m),
            field(result.x_min_m),
            field(result.u_min_m_per_s),
        );
    }
}

fn print_csv(results: &[RecirculationAnalysis]) {
    println!("filename,sample_count,length_m,x_min_m,u_min_m_per_s,error");
    for result in results {
        let field = |v: Option<f64>| v.map(|x| format!("{:.6}", x)).unwrap_or_default();
        println!(
            "{},{},{},{},{},{}",
            result.filename,
            result.sample_count,
            field(result.length_m),
            field(result.x_min_m),
            field(result.u_min_m_per_s),
            result.error.as_deref().unwrap_or(""),
        );
    }
}

fn print_json(results: &[RecirculationAnalysis]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}
