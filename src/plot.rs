//! PNG rendering of analysis results (feature `plot`).
//!
//! Purely presentational: a signal trace with detected-peak markers, and a
//! multi-profile comparison. Output matches what the solver team previously
//! produced by hand for reports; nothing here feeds back into the analysis.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{Result, ShedError};
use crate::signal::{Profile, Signal};

const WIDTH: u32 = 960;
const HEIGHT: u32 = 540;
const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([200, 200, 200]);
const TRACE: Rgb<u8> = Rgb([0, 100, 200]);
const MARKER: Rgb<u8> = Rgb([220, 30, 30]);

// Series colors for profile comparisons, cycled in order
const SERIES: [Rgb<u8>; 4] = [
    Rgb([0, 100, 200]),
    Rgb([220, 120, 0]),
    Rgb([0, 150, 70]),
    Rgb([150, 60, 180]),
];

/// Render a probe signal with its detected peaks marked.
///
/// # Arguments
/// * `signal` - The monitored signal
/// * `peaks` - Indices of detected peaks into the signal (may be empty)
/// * `path` - Output PNG path
pub fn render_signal(signal: &Signal, peaks: &[usize], path: &Path) -> Result<()> {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    draw_frame(&mut img);

    let mapper = Mapper::new(signal.times(), signal.values());
    draw_polyline(&mut img, signal.times(), signal.values(), &mapper, TRACE);

    for &peak in peaks {
        let (x, y) = mapper.map(signal.times()[peak], signal.values()[peak]);
        draw_cross(&mut img, x, y);
    }

    img.save(path)
        .map_err(|e| ShedError::Render(e.to_string()))
}

/// Render several profiles on shared axes for visual comparison.
pub fn render_profiles(profiles: &[&Profile], path: &Path) -> Result<()> {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    draw_frame(&mut img);

    let all_x: Vec<f64> = profiles
        .iter()
        .flat_map(|p| p.positions().iter().copied())
        .collect();
    let all_u: Vec<f64> = profiles
        .iter()
        .flat_map(|p| p.values().iter().copied())
        .collect();
    let mapper = Mapper::new(&all_x, &all_u);

    for (i, profile) in profiles.iter().enumerate() {
        let color = SERIES[i % SERIES.len()];
        draw_polyline(&mut img, profile.positions(), profile.values(), &mapper, color);
    }

    img.save(path)
        .map_err(|e| ShedError::Render(e.to_string()))
}

/// Maps data coordinates onto the plot area.
struct Mapper {
    x_min: f64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl Mapper {
    fn new(xs: &[f64], ys: &[f64]) -> Self {
        let (x_min, x_max) = bounds(xs);
        let (y_min, y_max) = bounds(ys);
        Self {
            x_min,
            x_span: (x_max - x_min).max(f64::MIN_POSITIVE),
            y_min,
            y_span: (y_max - y_min).max(f64::MIN_POSITIVE),
        }
    }

    fn map(&self, x: f64, y: f64) -> (i64, i64) {
        let plot_w = (WIDTH - 2 * MARGIN) as f64;
        let plot_h = (HEIGHT - 2 * MARGIN) as f64;
        let px = MARGIN as f64 + (x - self.x_min) / self.x_span * plot_w;
        // Image rows grow downward
        let py = MARGIN as f64 + (1.0 - (y - self.y_min) / self.y_span) * plot_h;
        (px.round() as i64, py.round() as i64)
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

fn draw_frame(img: &mut RgbImage) {
    for x in MARGIN..WIDTH - MARGIN {
        img.put_pixel(x, MARGIN, AXIS);
        img.put_pixel(x, HEIGHT - MARGIN, AXIS);
    }
    for y in MARGIN..=HEIGHT - MARGIN {
        img.put_pixel(MARGIN, y, AXIS);
        img.put_pixel(WIDTH - MARGIN, y, AXIS);
    }
}

fn draw_polyline(img: &mut RgbImage, xs: &[f64], ys: &[f64], mapper: &Mapper, color: Rgb<u8>) {
    let mut previous: Option<(i64, i64)> = None;
    for (&x, &y) in xs.iter().zip(ys) {
        let point = mapper.map(x, y);
        if let Some(from) = previous {
            draw_segment(img, from, point, color);
        }
        previous = Some(point);
    }
}

fn draw_segment(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: Rgb<u8>) {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let steps = dx.abs().max(dy.abs()).max(1);
    for s in 0..=steps {
        put_pixel_checked(img, a.0 + dx * s / steps, a.1 + dy * s / steps, color);
    }
}

fn draw_cross(img: &mut RgbImage, x: i64, y: i64) {
    for offset in -3..=3 {
        put_pixel_checked(img, x + offset, y + offset, MARKER);
        put_pixel_checked(img, x + offset, y - offset, MARKER);
    }
}

fn put_pixel_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if (0..WIDTH as i64).contains(&x) && (0..HEIGHT as i64).contains(&y) {
        img.put_pixel(x as u32, y as u32, color);
    }
}
