//! Numeric defaults for the shedding analysis
//!
//! These constants define the default detection threshold, trailing window,
//! and fluid properties used when a configuration does not override them.

/// Default minimum peak prominence. Chosen to reject floating-point and
/// solver round-off ripple while accepting any physically real oscillation
/// amplitude.
pub const DEFAULT_MIN_PROMINENCE: f64 = 1e-12;

/// Default number of trailing peaks used for the period estimate.
/// Three intervals are enough to average out sampling jitter once the
/// shedding has settled into its periodic regime.
pub const DEFAULT_TRAILING_WINDOW: usize = 4;

/// Dynamic viscosity of air at ambient conditions, in Pa·s.
pub const AIR_DYNAMIC_VISCOSITY: f64 = 1.8e-5;

/// Density of air at ambient conditions, in kg/m³.
pub const AIR_DENSITY: f64 = 1.225;

/// Kinematic viscosity of air at ambient conditions, in m²/s.
pub const AIR_KINEMATIC_VISCOSITY: f64 = 1.47e-5;

/// Default exclusion margin past the trailing edge when searching for the
/// recirculation minimum, in metres. Skips the attached near-wake dip.
pub const DEFAULT_EXCLUSION_MARGIN: f64 = 0.05;
