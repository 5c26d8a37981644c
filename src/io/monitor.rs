//! STAR-CCM+ monitor CSV parsing and the directory-backed signal source.
//!
//! Monitor exports are plain comma-separated files with one header row. The
//! time column is named `Time`; the velocity column carries the full
//! instrument label (e.g. `Max_vitesse_au_point_y Monitor: ... (m/s)`), so
//! it is resolved by its unit tag rather than by exact name. Sweep data
//! files encode their parameters in the filename as `..._Re<Re>_D<D>.csv`.
//!
//! All paths are explicit; nothing here touches the process working
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::strouhal::{ParameterCombination, SignalSource};
use crate::error::{Result, ShedError};
use crate::signal::Signal;

/// Exact name of the monitor time column.
pub const TIME_COLUMN: &str = "Time";

/// Unit tag identifying a velocity column.
pub const VELOCITY_UNIT_TAG: &str = "(m/s)";

/// Optional explicit column names, overriding the instrument-label
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    pub time: Option<String>,
    pub value: Option<String>,
}

/// Load a monitor signal from a CSV file.
///
/// A missing file is an I/O error here; callers sweeping a sparse grid
/// should go through [`DirectorySignalSource`], which maps absence to
/// `None` instead.
pub fn load_signal(path: &Path, columns: &ColumnSpec) -> Result<Signal> {
    let text = fs::read_to_string(path).map_err(|source| ShedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_signal(&text, columns).map_err(|e| match e {
        ShedError::MalformedData(msg) => {
            ShedError::MalformedData(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parse a monitor CSV from its text content.
pub fn parse_signal(text: &str, columns: &ColumnSpec) -> Result<Signal> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| ShedError::MalformedData("missing header row".to_string()))?;
    let names = split_line(header);

    let time_index = resolve_time_column(&names, columns.time.as_deref())?;
    let value_index = resolve_value_column(&names, columns.value.as_deref(), time_index)?;

    let mut times = Vec::new();
    let mut values = Vec::new();
    for (row, line) in lines.enumerate() {
        let fields = split_line(line);
        times.push(parse_field(&fields, time_index, row)?);
        values.push(parse_field(&fields, value_index, row)?);
    }

    Signal::new(times, values)
}

/// Split one CSV line on commas, honoring double-quoted fields (instrument
/// labels contain commas, e.g. `Direction [1,0,0]`). Fields come back
/// trimmed with surrounding quotes removed.
pub(crate) fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields.iter().map(|f| f.trim().to_string()).collect()
}

pub(crate) fn parse_field(fields: &[String], index: usize, row: usize) -> Result<f64> {
    let field = fields.get(index).ok_or_else(|| {
        ShedError::MalformedData(format!(
            "row {} has {} fields, expected at least {}",
            row + 2,
            fields.len(),
            index + 1
        ))
    })?;
    field.parse().map_err(|_| {
        ShedError::MalformedData(format!("row {}: invalid number {:?}", row + 2, field))
    })
}

fn resolve_time_column(names: &[String], explicit: Option<&str>) -> Result<usize> {
    let wanted = explicit.unwrap_or(TIME_COLUMN);
    names
        .iter()
        .position(|n| n.as_str() == wanted)
        .ok_or_else(|| ShedError::MalformedData(format!("missing column {:?}", wanted)))
}

fn resolve_value_column(
    names: &[String],
    explicit: Option<&str>,
    time_index: usize,
) -> Result<usize> {
    if let Some(wanted) = explicit {
        return names
            .iter()
            .position(|n| n.as_str() == wanted)
            .ok_or_else(|| ShedError::MalformedData(format!("missing column {:?}", wanted)));
    }

    if let Some(index) = names.iter().position(|n| n.contains(VELOCITY_UNIT_TAG)) {
        return Ok(index);
    }

    // No unit tag anywhere; fall back to the first non-time column
    names
        .iter()
        .enumerate()
        .position(|(i, _)| i != time_index)
        .ok_or_else(|| ShedError::MalformedData("no velocity column".to_string()))
}

/// Recover `(Re, D)` from a filename of the form `..._Re<Re>_D<D>.csv`.
///
/// Returns `None` when the markers are missing or the numbers do not parse;
/// files without encoded parameters are a normal case (single-monitor
/// exports), not an error.
pub fn combination_from_filename(filename: &str) -> Option<ParameterCombination> {
    let re_start = filename.find("_Re")? + 3;
    let rest = &filename[re_start..];
    let d_marker = rest.find("_D")?;

    let re: f64 = rest[..d_marker].parse().ok()?;
    let d_str = &rest[d_marker + 2..];
    let d_str = d_str.strip_suffix(".csv").unwrap_or(d_str);
    let d: f64 = d_str.parse().ok()?;

    Some(ParameterCombination { re, d })
}

/// Format a sweep value the way the filenames encode it: integers without a
/// decimal point, everything else with the shortest round-trip form.
pub fn format_param(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Signal source over a directory of monitor exports named
/// `<prefix>_Re<Re>_D<D>.csv`.
///
/// A combination whose file does not exist yields `Ok(None)`; a file that
/// exists but does not parse is an error.
pub struct DirectorySignalSource {
    dir: PathBuf,
    prefix: String,
    columns: ColumnSpec,
}

impl DirectorySignalSource {
    pub fn new(dir: PathBuf, prefix: impl Into<String>) -> Self {
        Self {
            dir,
            prefix: prefix.into(),
            columns: ColumnSpec::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnSpec) -> Self {
        self.columns = columns;
        self
    }

    /// Path a combination's monitor export is expected at.
    pub fn path_for(&self, combination: ParameterCombination) -> PathBuf {
        self.dir.join(format!(
            "{}_Re{}_D{}.csv",
            self.prefix,
            format_param(combination.re),
            format_param(combination.d)
        ))
    }
}

impl SignalSource for DirectorySignalSource {
    fn fetch(&self, combination: ParameterCombination) -> Result<Option<Signal>> {
        let path = self.path_for(combination);
        if !path.exists() {
            return Ok(None);
        }
        load_signal(&path, &self.columns).map(Some)
    }
}
