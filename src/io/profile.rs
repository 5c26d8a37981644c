//! Line-probe CSV parsing for steady-state profiles.
//!
//! Probe exports label their columns with direction and unit, e.g.
//! `Line Probe: Direction [1,0,0] (m)` and
//! `Line Probe: Velocity: Magnitude (m/s)`. The position column is resolved
//! by its `(m)` unit tag, the velocity column by `(m/s)`.

use std::fs;
use std::path::Path;

use crate::error::{Result, ShedError};
use crate::io::monitor::{ColumnSpec, VELOCITY_UNIT_TAG, parse_field, split_line};
use crate::signal::Profile;

/// Unit tag identifying a position column.
pub const POSITION_UNIT_TAG: &str = "(m)";

/// Load a line-probe profile from a CSV file.
pub fn load_profile(path: &Path, columns: &ColumnSpec) -> Result<Profile> {
    let text = fs::read_to_string(path).map_err(|source| ShedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_profile(&text, columns).map_err(|e| match e {
        ShedError::MalformedData(msg) => {
            ShedError::MalformedData(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parse a line-probe CSV from its text content.
pub fn parse_profile(text: &str, columns: &ColumnSpec) -> Result<Profile> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| ShedError::MalformedData("missing header row".to_string()))?;
    let names = split_line(header);

    let position_index = resolve_position_column(&names, columns.time.as_deref())?;
    let value_index = resolve_value_column(&names, columns.value.as_deref(), position_index)?;

    let mut positions = Vec::new();
    let mut values = Vec::new();
    for (row, line) in lines.enumerate() {
        let fields = split_line(line);
        positions.push(parse_field(&fields, position_index, row)?);
        values.push(parse_field(&fields, value_index, row)?);
    }

    Profile::new(positions, values)
}

fn resolve_position_column(names: &[String], explicit: Option<&str>) -> Result<usize> {
    if let Some(wanted) = explicit {
        return names
            .iter()
            .position(|n| n.as_str() == wanted)
            .ok_or_else(|| ShedError::MalformedData(format!("missing column {:?}", wanted)));
    }

    // A velocity header also contains "(m)" as a substring of "(m/s)",
    // so exclude those
    names
        .iter()
        .position(|n| n.contains(POSITION_UNIT_TAG) && !n.contains(VELOCITY_UNIT_TAG))
        .map_or(Ok(0), Ok)
}

fn resolve_value_column(
    names: &[String],
    explicit: Option<&str>,
    position_index: usize,
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

    names
        .iter()
        .enumerate()
        .position(|(i, _)| i != position_index)
        .ok_or_else(|| ShedError::MalformedData("no velocity column".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE_HEADER: &str =
        r#""Line Probe: Direction [1,0,0] (m)","Line Probe: Velocity: Magnitude (m/s)""#;

    #[test]
    fn test_parse_profile_instrument_columns() {
        let text = format!("{}\n0.0,1.2\n0.5,0.8\n1.0,1.1\n", PROBE_HEADER);
        let profile = parse_profile(&text, &ColumnSpec::default()).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.positions(), &[0.0, 0.5, 1.0]);
        assert_eq!(profile.values(), &[1.2, 0.8, 1.1]);
    }

    #[test]
    fn test_parse_profile_plain_columns() {
        let text = "x,u\n0.0,1.0\n1.0,2.0\n";
        let profile = parse_profile(text, &ColumnSpec::default()).unwrap();
        assert_eq!(profile.positions(), &[0.0, 1.0]);
        assert_eq!(profile.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_parse_profile_rejects_unsorted_positions() {
        let text = format!("{}\n0.5,1.0\n0.0,2.0\n", PROBE_HEADER);
        assert!(matches!(
            parse_profile(&text, &ColumnSpec::default()),
            Err(ShedError::NonIncreasingAxis { .. })
        ));
    }
}
