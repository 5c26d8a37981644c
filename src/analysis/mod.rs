pub mod peaks;
pub mod period;
pub mod profile;
pub mod strouhal;

pub use peaks::{DetectionPolicy, find_peaks, prominence};
pub use period::{PeakPeriodEstimator, PeriodEstimate};
pub use profile::{Recirculation, recirculation_length, relative_error_percent};
pub use strouhal::{
    ParameterCombination, SignalSource, StrouhalBatchRunner, StrouhalRecord, SweepGrid,
};
