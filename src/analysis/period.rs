//! Asymptotic shedding period estimation from detected peaks.
//!
//! Transient startup peaks are rejected by construction: only the last few
//! peak-to-peak intervals enter the mean, so the estimate reflects the
//! settled periodic regime rather than the initial transient. Averaging a
//! handful of intervals (instead of using a single one) smooths out the
//! discretization jitter of where each crest lands on the sampling grid.

use crate::analysis::peaks::{DetectionPolicy, find_peaks};
use crate::constants::DEFAULT_TRAILING_WINDOW;
use crate::error::{Result, ShedError};
use crate::signal::Signal;

/// Result of one period estimation.
///
/// `period` and `frequency` are present only when at least `trailing_window`
/// peaks were detected; `peak_count` always reports the total number of
/// peaks found in the full signal, not just the trailing ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodEstimate {
    /// Mean trailing peak-to-peak interval in seconds
    pub period: Option<f64>,
    /// Shedding frequency in Hz (1 / period)
    pub frequency: Option<f64>,
    /// Total number of detected peaks
    pub peak_count: usize,
}

impl PeriodEstimate {
    /// Whether enough peaks were found to resolve a period.
    pub fn sufficient(&self) -> bool {
        self.period.is_some()
    }
}

/// Estimates the asymptotic oscillation period of a probe signal.
///
/// # Example
/// ```
/// use vortexshed::Signal;
/// use vortexshed::analysis::{DetectionPolicy, PeakPeriodEstimator};
///
/// let times: Vec<f64> = (0..2000).map(|i| i as f64 * 0.01).collect();
/// let values: Vec<f64> = times
///     .iter()
///     .map(|t| (2.0 * std::f64::consts::PI * 0.5 * t).sin())
///     .collect();
/// let signal = Signal::new(times, values).unwrap();
///
/// let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
/// let estimate = estimator.estimate(&signal);
/// assert!((estimate.frequency.unwrap() - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PeakPeriodEstimator {
    policy: DetectionPolicy,
    trailing_window: usize,
}

impl PeakPeriodEstimator {
    /// Create an estimator.
    ///
    /// # Arguments
    /// * `policy` - Which local maxima count as peaks
    /// * `trailing_window` - How many of the most recent peaks to average
    ///   over (at least 2, giving at least one interval)
    pub fn new(policy: DetectionPolicy, trailing_window: usize) -> Result<Self> {
        policy.validate()?;
        if trailing_window < 2 {
            return Err(ShedError::TrailingWindow(trailing_window));
        }
        Ok(Self {
            policy,
            trailing_window,
        })
    }

    pub fn policy(&self) -> DetectionPolicy {
        self.policy
    }

    pub fn trailing_window(&self) -> usize {
        self.trailing_window
    }

    /// Estimate the asymptotic period of `signal`.
    ///
    /// Pure and total: an unresolvable signal yields an estimate with
    /// `sufficient() == false`, never an error.
    pub fn estimate(&self, signal: &Signal) -> PeriodEstimate {
        let peaks = find_peaks(signal.values(), self.policy);
        let peak_count = peaks.len();

        if peak_count < self.trailing_window {
            return PeriodEstimate {
                period: None,
                frequency: None,
                peak_count,
            };
        }

        let times = signal.times();
        let trailing = &peaks[peak_count - self.trailing_window..];
        let interval_sum: f64 = trailing
            .windows(2)
            .map(|pair| times[pair[1]] - times[pair[0]])
            .sum();
        let period = interval_sum / (self.trailing_window - 1) as f64;

        PeriodEstimate {
            period: Some(period),
            frequency: Some(1.0 / period),
            peak_count,
        }
    }
}

impl Default for PeakPeriodEstimator {
    fn default() -> Self {
        Self {
            policy: DetectionPolicy::default(),
            trailing_window: DEFAULT_TRAILING_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sine_signal(frequency: f64, sample_rate: f64, duration: f64) -> Signal {
        let n = (duration * sample_rate) as usize;
        let times: Vec<f64> = (0..n).map(|i| i as f64 / sample_rate).collect();
        let values: Vec<f64> = times
            .iter()
            .map(|t| (2.0 * PI * frequency * t).sin())
            .collect();
        Signal::new(times, values).unwrap()
    }

    #[test]
    fn test_sine_frequency_recovery() {
        // Crests do not land exactly on the sampling grid
        let signal = sine_signal(0.47, 80.0, 30.0);
        let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
        let estimate = estimator.estimate(&signal);

        assert!(estimate.sufficient());
        // Each crest lands within one sample spacing of the true crest
        assert_relative_eq!(estimate.frequency.unwrap(), 0.47, max_relative = 0.01);
    }

    #[test]
    fn test_insufficient_peaks_reports_count() {
        // Two shedding cycles, window of 4
        let signal = sine_signal(0.5, 100.0, 4.0);
        let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
        let estimate = estimator.estimate(&signal);

        assert!(!estimate.sufficient());
        assert_eq!(estimate.period, None);
        assert_eq!(estimate.frequency, None);
        assert_eq!(estimate.peak_count, 2);
    }

    #[test]
    fn test_trailing_window_excludes_transient() {
        // Slow startup oscillation settling into a faster periodic regime:
        // continuous phase, 0.2 Hz for the first 15 s, then 0.5 Hz
        let sample_rate = 200.0;
        let n = (60.0 * sample_rate) as usize;
        let mut phase = 0.0;
        let mut times = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f64 / sample_rate;
            let f = if t < 15.0 { 0.2 } else { 0.5 };
            phase += 2.0 * PI * f / sample_rate;
            times.push(t);
            values.push(phase.sin());
        }
        let signal = Signal::new(times, values).unwrap();

        let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
        let estimate = estimator.estimate(&signal);

        assert!(estimate.sufficient());
        assert_relative_eq!(estimate.frequency.unwrap(), 0.5, max_relative = 0.01);
    }

    #[test]
    fn test_window_invariance_on_exact_periodicity() {
        let signal = sine_signal(0.5, 100.0, 30.0);
        let mut periods = Vec::new();
        for window in 2..=8 {
            let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), window).unwrap();
            let estimate = estimator.estimate(&signal);
            periods.push(estimate.period.unwrap());
        }
        for period in &periods {
            assert_relative_eq!(*period, periods[0], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let signal = sine_signal(0.31, 60.0, 40.0);
        let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
        let first = estimator.estimate(&signal);
        let second = estimator.estimate(&signal);
        assert_eq!(first, second);
    }

    #[test]
    fn test_flat_signal_is_insufficient() {
        let times: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let values = vec![2.5; 100];
        let signal = Signal::new(times, values).unwrap();

        let estimator = PeakPeriodEstimator::new(DetectionPolicy::default(), 4).unwrap();
        let estimate = estimator.estimate(&signal);

        assert!(!estimate.sufficient());
        assert_eq!(estimate.peak_count, 0);
    }

    #[test]
    fn test_rejects_degenerate_window() {
        assert!(matches!(
            PeakPeriodEstimator::new(DetectionPolicy::default(), 1),
            Err(ShedError::TrailingWindow(1))
        ));
        assert!(matches!(
            PeakPeriodEstimator::new(DetectionPolicy::default(), 0),
            Err(ShedError::TrailingWindow(0))
        ));
    }

    #[test]
    fn test_rejects_malformed_policy() {
        assert!(PeakPeriodEstimator::new(DetectionPolicy::MinProminence(-1.0), 4).is_err());
    }
}
