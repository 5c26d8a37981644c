//! Synthetic shedding signals and CSV fixtures shared by integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use vortexshed::Signal;

/// Header STAR-CCM+ writes for a point-probe velocity monitor.
pub const MONITOR_HEADER: &str =
    "Time,Max_vitesse_au_point_y Monitor: Max_vitesse_au_point_y Monitor (m/s)";

/// A settled shedding signal: a pure sine at `shedding_hz` riding on a mean
/// velocity, with the amplitude ramping up over `transient_s` seconds.
pub fn shedding_signal(
    duration_s: f64,
    sample_rate_hz: f64,
    shedding_hz: f64,
    transient_s: f64,
) -> Signal {
    let n = (duration_s * sample_rate_hz) as usize;
    let mut times = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / sample_rate_hz;
        let envelope = if t < transient_s { t / transient_s } else { 1.0 };
        times.push(t);
        values.push(1.0 + 0.4 * envelope * (2.0 * std::f64::consts::PI * shedding_hz * t).sin());
    }
    Signal::new(times, values).expect("synthetic signal is well-formed")
}

/// A signal whose oscillation settles from `startup_hz` into `settled_hz`
/// after `switch_s` seconds, with continuous phase. The trailing window
/// should recover `settled_hz` even though a global interval average would
/// be biased by the startup portion.
pub fn two_stage_signal(
    duration_s: f64,
    sample_rate_hz: f64,
    startup_hz: f64,
    settled_hz: f64,
    switch_s: f64,
) -> Signal {
    let n = (duration_s * sample_rate_hz) as usize;
    let mut phase = 0.0;
    let mut times = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / sample_rate_hz;
        let f = if t < switch_s { startup_hz } else { settled_hz };
        phase += 2.0 * std::f64::consts::PI * f / sample_rate_hz;
        times.push(t);
        values.push(1.0 + 0.4 * phase.sin());
    }
    Signal::new(times, values).expect("synthetic signal is well-formed")
}

/// Write a signal as a STAR-CCM+ style monitor CSV.
pub fn write_monitor_csv(path: &Path, signal: &Signal) {
    let mut text = String::from(MONITOR_HEADER);
    text.push('\n');
    for (t, v) in signal.times().iter().zip(signal.values()) {
        text.push_str(&format!("{},{}\n", t, v));
    }
    fs::write(path, text).expect("failed to write fixture CSV");
}

/// Create a fresh scratch directory unique to `label`.
pub fn scratch_dir(label: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("vortexshed_{}_{}", label, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}
