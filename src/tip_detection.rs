// src/tip_detection.rs
//
// Colored tip-marker localization. Converts the frame to HSV, masks the
// configured hue/saturation/value range, and returns the centroid of the
// masked pixels. Zero masked pixels is an explicit "not found" — the
// centroid of an empty set must never become a coordinate.

use crate::types::{Frame, MarkerConfig};

/// Convert RGB to HSV.
/// Returns (H: 0-360, S: 0-100, V: 0-255).
#[inline]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let r_n = r / 255.0;
    let g_n = g / 255.0;
    let b_n = b / 255.0;

    let max = r_n.max(g_n).max(b_n);
    let min = r_n.min(g_n).min(b_n);
    let delta = max - min;

    let h = if delta < 1e-6 {
        0.0
    } else if (max - r_n).abs() < 1e-6 {
        60.0 * (((g_n - b_n) / delta) % 6.0)
    } else if (max - g_n).abs() < 1e-6 {
        60.0 * (((b_n - r_n) / delta) + 2.0)
    } else {
        60.0 * (((r_n - g_n) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max < 1e-6 {
        0.0
    } else {
        (delta / max) * 100.0
    };

    let v = max * 255.0;

    (h, s, v)
}

/// Locate the tip marker, or report it absent when no pixel falls inside
/// the configured HSV range.
pub fn locate_tip(frame: &Frame, config: &MarkerConfig) -> Option<(f32, f32)> {
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut count = 0u64;

    for y in 0..frame.height {
        for x in 0..frame.width {
            let idx = (y * frame.width + x) * 3;
            let (h, s, v) = rgb_to_hsv(
                frame.data[idx] as f32,
                frame.data[idx + 1] as f32,
                frame.data[idx + 2] as f32,
            );

            if h >= config.hue_min
                && h <= config.hue_max
                && s >= config.saturation_min
                && v >= config.value_min
            {
                sum_x += x as f64;
                sum_y += y as f64;
                count += 1;
            }
        }
    }

    if count == 0 {
        return None;
    }

    Some((
        (sum_x / count as f64) as f32,
        (sum_y / count as f64) as f32,
    ))
}
