//! Steady-state line-probe analyses: mesh-convergence relative error and
//! recirculation length.

use crate::error::{Result, ShedError};
use crate::signal::Profile;

/// Pointwise relative error of `candidate` against `reference`, in percent.
///
/// Profiles must have equal length and come from the same probe line; a
/// length mismatch is a precondition violation. Where the reference velocity
/// is zero the error is IEEE infinity, as the elementwise division dictates.
pub fn relative_error_percent(candidate: &Profile, reference: &Profile) -> Result<Vec<f64>> {
    if candidate.len() != reference.len() {
        return Err(ShedError::LengthMismatch {
            axis: candidate.len(),
            values: reference.len(),
        });
    }

    Ok(candidate
        .values()
        .iter()
        .zip(reference.values())
        .map(|(u, u_ref)| 100.0 * (u - u_ref).abs() / u_ref.abs())
        .collect())
}

/// Location and value of the wake velocity minimum past the trailing edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recirculation {
    /// Recirculation length in metres, x_min - trailing edge
    pub length: f64,
    /// Position of the velocity minimum in metres
    pub x_min: f64,
    /// Velocity magnitude at the minimum in m/s
    pub u_min: f64,
}

/// Measure the recirculation length behind a bluff body.
///
/// Searches for the velocity minimum among samples with
/// `x >= trailing_edge + exclusion_margin`; the margin skips the attached
/// near-wake dip right at the body. The length is the distance from the
/// trailing edge to that minimum.
pub fn recirculation_length(
    profile: &Profile,
    trailing_edge: f64,
    exclusion_margin: f64,
) -> Result<Recirculation> {
    let search_start = trailing_edge + exclusion_margin;

    let mut minimum: Option<(f64, f64)> = None;
    for (&x, &u) in profile.positions().iter().zip(profile.values()) {
        if x < search_start {
            continue;
        }
        match minimum {
            Some((_, u_min)) if u >= u_min => {}
            _ => minimum = Some((x, u)),
        }
    }

    let (x_min, u_min) = minimum.ok_or(ShedError::EmptySearchRegion(search_start))?;
    Ok(Recirculation {
        length: x_min - trailing_edge,
        x_min,
        u_min,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn profile(positions: Vec<f64>, values: Vec<f64>) -> Profile {
        Profile::new(positions, values).unwrap()
    }

    #[test]
    fn test_relative_error_values() {
        let reference = profile(vec![0.0, 1.0, 2.0], vec![2.0, 4.0, 5.0]);
        let candidate = profile(vec![0.0, 1.0, 2.0], vec![2.2, 3.0, 5.0]);

        let errors = relative_error_percent(&candidate, &reference).unwrap();
        assert_relative_eq!(errors[0], 10.0, max_relative = 1e-9);
        assert_relative_eq!(errors[1], 25.0, max_relative = 1e-9);
        assert_relative_eq!(errors[2], 0.0);
    }

    #[test]
    fn test_relative_error_rejects_length_mismatch() {
        let reference = profile(vec![0.0, 1.0], vec![2.0, 4.0]);
        let candidate = profile(vec![0.0, 1.0, 2.0], vec![2.0, 4.0, 5.0]);
        assert!(matches!(
            relative_error_percent(&candidate, &reference),
            Err(ShedError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_relative_error_zero_reference_is_infinite() {
        let reference = profile(vec![0.0, 1.0], vec![0.0, 1.0]);
        let candidate = profile(vec![0.0, 1.0], vec![0.5, 1.0]);
        let errors = relative_error_percent(&candidate, &reference).unwrap();
        assert!(errors[0].is_infinite());
    }

    #[test]
    fn test_recirculation_length() {
        // Dip at x=0.52 inside the margin, true minimum at x=0.9
        let wake = profile(
            vec![0.40, 0.52, 0.60, 0.70, 0.80, 0.90, 1.00, 1.10],
            vec![0.80, 0.05, 0.30, 0.20, 0.15, 0.10, 0.25, 0.60],
        );

        let result = recirculation_length(&wake, 0.5, 0.05).unwrap();
        assert_relative_eq!(result.x_min, 0.9);
        assert_relative_eq!(result.u_min, 0.10);
        assert_relative_eq!(result.length, 0.4, max_relative = 1e-9);
    }

    #[test]
    fn test_recirculation_first_minimum_wins_ties() {
        let wake = profile(vec![0.6, 0.7, 0.8], vec![0.2, 0.1, 0.1]);
        let result = recirculation_length(&wake, 0.5, 0.05).unwrap();
        assert_relative_eq!(result.x_min, 0.7);
    }

    #[test]
    fn test_recirculation_empty_region() {
        let wake = profile(vec![0.0, 0.1, 0.2], vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            recirculation_length(&wake, 0.5, 0.05),
            Err(ShedError::EmptySearchRegion(_))
        ));
    }
}
