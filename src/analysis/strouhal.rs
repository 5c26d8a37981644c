//! Batch Strouhal number extraction over a parameter sweep.
//!
//! The sweep grid is the Cartesian product of Reynolds numbers and
//! characteristic lengths, iterated Re-outer / D-inner; the output table
//! preserves that order. Combinations with no signal on disk or with too few
//! peaks are skipped silently: sweeps over partially simulated grids are the
//! normal case, not a failure.

use serde::{Deserialize, Serialize};

use crate::analysis::period::PeakPeriodEstimator;
use crate::config::FluidModel;
use crate::error::Result;
use crate::signal::Signal;

/// One point of the sweep grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterCombination {
    /// Reynolds number
    pub re: f64,
    /// Characteristic length in metres
    pub d: f64,
}

/// The Reynolds-number and characteristic-length grids to sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepGrid {
    pub re_values: Vec<f64>,
    pub d_values: Vec<f64>,
}

impl SweepGrid {
    pub fn new(re_values: Vec<f64>, d_values: Vec<f64>) -> Self {
        Self {
            re_values,
            d_values,
        }
    }

    /// Total number of combinations in the Cartesian product.
    pub fn combination_count(&self) -> usize {
        self.re_values.len() * self.d_values.len()
    }

    /// Iterate the grid in output order: Re outer, D inner.
    pub fn combinations(&self) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.re_values.iter().flat_map(move |&re| {
            self.d_values
                .iter()
                .map(move |&d| ParameterCombination { re, d })
        })
    }
}

/// One resolved row of the sweep result table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrouhalRecord {
    /// Reynolds number
    pub re: f64,
    /// Characteristic length in metres
    pub d: f64,
    /// Derived free-stream velocity in m/s
    pub u0: f64,
    /// Mean trailing shedding period in seconds
    pub period: f64,
    /// Shedding frequency in Hz
    pub frequency: f64,
    /// Strouhal number, f·D/U0
    pub strouhal: f64,
}

/// Capability that supplies the monitored signal for a combination.
///
/// Absence (`Ok(None)`) is an expected outcome on a sparse grid and makes
/// the runner skip the combination; malformed data is an error and aborts
/// the sweep.
pub trait SignalSource {
    fn fetch(&self, combination: ParameterCombination) -> Result<Option<Signal>>;
}

/// Runs the sweep: derives the free-stream velocity per combination,
/// estimates the shedding period, and accumulates Strouhal records.
pub struct StrouhalBatchRunner {
    estimator: PeakPeriodEstimator,
    fluid: FluidModel,
}

impl StrouhalBatchRunner {
    pub fn new(estimator: PeakPeriodEstimator, fluid: FluidModel) -> Self {
        Self { estimator, fluid }
    }

    /// Sweep the full grid against `source`.
    ///
    /// The returned table holds one record per combination that had both a
    /// signal and enough peaks, in grid iteration order. An entirely
    /// unresolvable sweep yields an empty table, not an error.
    pub fn run(&self, grid: &SweepGrid, source: &dyn SignalSource) -> Result<Vec<StrouhalRecord>> {
        let mut records = Vec::new();

        for combination in grid.combinations() {
            let ParameterCombination { re, d } = combination;

            let Some(signal) = source.fetch(combination)? else {
                log::debug!("no signal for Re={re} D={d}, skipping");
                continue;
            };

            let estimate = self.estimator.estimate(&signal);
            let (Some(period), Some(frequency)) = (estimate.period, estimate.frequency) else {
                log::debug!(
                    "insufficient peaks for Re={re} D={d} ({} found, need {}), skipping",
                    estimate.peak_count,
                    self.estimator.trailing_window()
                );
                continue;
            };

            let u0 = self.fluid.free_stream_velocity(re, d);
            records.push(StrouhalRecord {
                re,
                d,
                u0,
                period,
                frequency,
                strouhal: frequency * d / u0,
            });
        }

        Ok(records)
    }
}
