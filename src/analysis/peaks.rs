//! Local-maximum detection for probe signals.
//!
//! Finds every sample that is strictly greater than its neighbors (or the
//! midpoint of a plateau bounded by strictly lower neighbors) and filters
//! the candidates through a configurable policy: minimum prominence or
//! minimum height. Endpoints are never peaks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShedError};

/// Which local maxima survive detection.
///
/// Prominence measures how far a peak rises above the higher of its two
/// bounding valleys, which makes it robust against a drifting baseline;
/// height compares the raw sample value against a floor. Both policies feed
/// the same downstream period estimation.
///
/// # Parsing formats
/// - `prominence:1e-12` - minimum prominence
/// - `height:1e-10` - minimum raw height
/// - `1e-12` - bare number, treated as minimum prominence
///
/// # Example
/// ```
/// use vortexshed::analysis::DetectionPolicy;
///
/// let policy: DetectionPolicy = "height:1e-10".parse().unwrap();
/// assert_eq!(policy, DetectionPolicy::MinHeight(1e-10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPolicy {
    /// Keep peaks whose prominence is at least this value
    MinProminence(f64),
    /// Keep peaks whose sample value is at least this value
    MinHeight(f64),
}

impl DetectionPolicy {
    /// Check the threshold for well-formedness.
    ///
    /// Prominence must be positive and finite; height must be finite (a
    /// negative floor is meaningful for signals oscillating around zero).
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::MinProminence(p) if !(p.is_finite() && p > 0.0) => Err(ShedError::Policy(
                format!("prominence must be positive and finite, got {p}"),
            )),
            Self::MinHeight(h) if !h.is_finite() => {
                Err(ShedError::Policy(format!("height must be finite, got {h}")))
            }
            _ => Ok(()),
        }
    }
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self::MinProminence(crate::constants::DEFAULT_MIN_PROMINENCE)
    }
}

impl fmt::Display for DetectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MinProminence(p) => write!(f, "prominence:{p:e}"),
            Self::MinHeight(h) => write!(f, "height:{h:e}"),
        }
    }
}

impl FromStr for DetectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let policy = if let Some(num) = s.strip_prefix("prominence:") {
            let p: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid prominence: {}", s))?;
            Self::MinProminence(p)
        } else if let Some(num) = s.strip_prefix("height:") {
            let h: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid height: {}", s))?;
            Self::MinHeight(h)
        } else {
            let p: f64 = s
                .parse()
                .map_err(|_| format!("invalid detection policy: {}", s))?;
            Self::MinProminence(p)
        };

        policy.validate().map_err(|e| e.to_string())?;
        Ok(policy)
    }
}

/// Find the indices of all local maxima passing the policy, in increasing
/// order.
///
/// A plateau bounded by strictly lower neighbors counts as a single peak at
/// its midpoint. The policy threshold is assumed well-formed (see
/// [`DetectionPolicy::validate`]); a nonsensical threshold only changes
/// which candidates survive.
pub fn find_peaks(values: &[f64], policy: DetectionPolicy) -> Vec<usize> {
    let n = values.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < n - 1 {
        if values[i - 1] < values[i] {
            // Rising edge; absorb any plateau at this level
            let mut j = i;
            while j + 1 < n && values[j + 1] == values[i] {
                j += 1;
            }
            if j + 1 < n && values[j + 1] < values[i] {
                let mid = (i + j) / 2;
                if passes(values, mid, policy) {
                    peaks.push(mid);
                }
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }

    peaks
}

fn passes(values: &[f64], peak: usize, policy: DetectionPolicy) -> bool {
    match policy {
        DetectionPolicy::MinHeight(h) => values[peak] >= h,
        DetectionPolicy::MinProminence(p) => prominence(values, peak) >= p,
    }
}

/// Prominence of the local maximum at `peak`: its height above the higher
/// of the two lowest valleys separating it from taller terrain (or from the
/// signal edge).
pub fn prominence(values: &[f64], peak: usize) -> f64 {
    let peak_value = values[peak];

    let mut left_min = peak_value;
    let mut i = peak;
    while i > 0 {
        i -= 1;
        if values[i] > peak_value {
            break;
        }
        if values[i] < left_min {
            left_min = values[i];
        }
    }

    let mut right_min = peak_value;
    let mut j = peak;
    while j + 1 < values.len() {
        j += 1;
        if values[j] > peak_value {
            break;
        }
        if values[j] < right_min {
            right_min = values[j];
        }
    }

    peak_value - left_min.max(right_min)
}
