//! Rainfall bar chart rendering.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::config::{CHART_HEIGHT, CHART_WIDTH};
use crate::model::WeatherSeries;

/// Opacity of the bar outline and fill; the fill is the more
/// transparent of the two.
const ALPHA_BORDER: u8 = 0xcc;
const ALPHA_FILL: u8 = 0x66;

const PADDING: u32 = 10;
/// Gap between adjacent bars, in pixels.
const BAR_GAP: u32 = 2;

/// Display color for a precipitation intensity, as the rain-radar
/// scale steps it: ascending thresholds with exclusive upper bounds,
/// so a value sitting exactly on a threshold takes the next bucket.
pub fn level_color(rainfall: f64) -> [u8; 3] {
    if rainfall < 1.0 {
        [0xcc, 0xff, 0xff]
    } else if rainfall < 2.0 {
        [0x66, 0xff, 0xff]
    } else if rainfall < 4.0 {
        [0x00, 0xcc, 0xff]
    } else if rainfall < 8.0 {
        [0x00, 0x99, 0xff]
    } else if rainfall < 12.0 {
        [0x33, 0x66, 0xff]
    } else if rainfall < 16.0 {
        [0x33, 0xff, 0x00]
    } else if rainfall < 24.0 {
        [0x33, 0xcc, 0x00]
    } else if rainfall < 32.0 {
        [0x19, 0x99, 0x00]
    } else if rainfall < 40.0 {
        [0xff, 0xff, 0x00]
    } else if rainfall < 48.0 {
        [0xff, 0xcc, 0x00]
    } else if rainfall < 56.0 {
        [0xff, 0x99, 0x00]
    } else if rainfall < 64.0 {
        [0xff, 0x50, 0x66]
    } else if rainfall < 80.0 {
        [0xff, 0x00, 0x00]
    } else {
        [0xb7, 0x00, 0x14]
    }
}

/// Render the series as a fixed-size PNG bar chart: one bar per
/// sample, height relative to the series maximum, bucket color with a
/// stronger border and a lighter fill.
pub fn render(series: &WeatherSeries) -> Result<Vec<u8>> {
    let mut img = RgbaImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, Rgba([0xff, 0xff, 0xff, 0xff]));

    let samples = series.samples();
    let max = samples.iter().map(|s| s.rainfall).fold(0.0_f64, f64::max);
    let plot_width = CHART_WIDTH - 2 * PADDING;
    let plot_height = CHART_HEIGHT - 2 * PADDING;
    let slot = plot_width / samples.len() as u32;

    if max > 0.0 {
        for (i, sample) in samples.iter().enumerate() {
            let bar_height = ((sample.rainfall / max) * f64::from(plot_height)).round() as u32;
            if bar_height == 0 {
                continue;
            }
            let x0 = PADDING + i as u32 * slot;
            let x1 = x0 + slot.saturating_sub(BAR_GAP).max(1);
            let y1 = CHART_HEIGHT - PADDING;
            let y0 = y1 - bar_height;
            draw_bar(&mut img, sample.rainfall, x0, y0, x1, y1);
        }
    }

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).context("Failed to encode rainfall chart PNG")?;
    Ok(buf.into_inner())
}

fn draw_bar(img: &mut RgbaImage, rainfall: f64, x0: u32, y0: u32, x1: u32, y1: u32) {
    let [r, g, b] = level_color(rainfall);
    let border = Rgba([r, g, b, ALPHA_BORDER]);
    let fill = Rgba([r, g, b, ALPHA_FILL]);

    for x in x0..x1 {
        for y in y0..y1 {
            let on_edge = x == x0 || x == x1 - 1 || y == y0 || y == y1 - 1;
            img.put_pixel(x, y, if on_edge { border } else { fill });
        }
    }
}
