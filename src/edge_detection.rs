// src/edge_detection.rs
//
// Silhouette edge extraction for one frame: grayscale → 5×5 Gaussian blur →
// fixed binary threshold → Sobel gradients → non-maximum suppression →
// dual-threshold hysteresis. Operates on raw RGB buffers; no OpenCV here so
// the whole stage is unit-testable on synthetic frames.

use crate::types::{EdgeConfig, Frame};

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// 5-tap binomial approximation of a Gaussian, applied separably.
const GAUSS_5: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
const GAUSS_5_SUM: f32 = 16.0;

/// Binary edge map, row-major, 255 = edge pixel.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl EdgeMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    /// All edge pixels as (column, row) pairs in scan order.
    pub fn points(&self) -> Vec<(usize, usize)> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_set(x, y) {
                    points.push((x, y));
                }
            }
        }
        points
    }
}

/// Extract the thresholded edge map of a frame. Always succeeds; a frame
/// with no silhouette simply yields an all-empty map.
pub fn extract_edges(frame: &Frame, config: &EdgeConfig) -> EdgeMap {
    let gray = to_grayscale(&frame.data, frame.width, frame.height);
    let blurred = gaussian_blur_5x5(&gray, frame.width, frame.height);
    let binary = threshold(&blurred, config.binary_threshold);
    detect_edges(
        &binary,
        frame.width,
        frame.height,
        config.edge_low_threshold,
        config.edge_high_threshold,
    )
}

/// ITU-R BT.601 luma.
fn to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = Vec::with_capacity(width * height);
    for pixel in rgb.chunks_exact(3) {
        let g = (0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32) as u8;
        gray.push(g);
    }
    gray
}

fn gaussian_blur_5x5(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, weight) in GAUSS_5.iter().enumerate() {
                let sx = (x + k).saturating_sub(2).min(width - 1);
                acc += src[y * width + sx] as f32 * weight;
            }
            horizontal[y * width + x] = acc / GAUSS_5_SUM;
        }
    }

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, weight) in GAUSS_5.iter().enumerate() {
                let sy = (y + k).saturating_sub(2).min(height - 1);
                acc += horizontal[sy * width + x] * weight;
            }
            out[y * width + x] = (acc / GAUSS_5_SUM).round() as u8;
        }
    }
    out
}

fn threshold(src: &[u8], cutoff: u8) -> Vec<u8> {
    src.iter().map(|&v| if v > cutoff { 255 } else { 0 }).collect()
}

/// Sobel gradient magnitude, 4-direction non-maximum suppression, then
/// hysteresis: pixels at or above `high` seed edges, pixels at or above
/// `low` join when 8-connected to a seed.
fn detect_edges(binary: &[u8], width: usize, height: usize, low: f32, high: f32) -> EdgeMap {
    let mut map = EdgeMap::new(width, height);
    if width < 3 || height < 3 {
        return map;
    }

    let mut gx = vec![0.0f32; width * height];
    let mut gy = vec![0.0f32; width * height];
    let mut mag = vec![0.0f32; width * height];

    for y in 0..height {
        let ys = [y.saturating_sub(1), y, (y + 1).min(height - 1)];
        for x in 0..width {
            let xs = [x.saturating_sub(1), x, (x + 1).min(width - 1)];
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for ky in 0..3 {
                for kx in 0..3 {
                    let sample = binary[ys[ky] * width + xs[kx]] as f32;
                    sum_x += sample * SOBEL_X[ky][kx];
                    sum_y += sample * SOBEL_Y[ky][kx];
                }
            }
            let idx = y * width + x;
            gx[idx] = sum_x;
            gy[idx] = sum_y;
            mag[idx] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    // 0 = not an edge, 1 = weak candidate, 2 = strong seed.
    let mut labels = vec![0u8; width * height];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * width + x;
            let m = mag[idx];
            if m < low {
                continue;
            }

            let mut angle_deg = gy[idx].atan2(gx[idx]).to_degrees();
            if angle_deg < 0.0 {
                angle_deg += 180.0;
            }
            let (n1, n2) = if !(22.5..157.5).contains(&angle_deg) {
                (idx - 1, idx + 1)
            } else if angle_deg < 67.5 {
                (idx - width + 1, idx + width - 1)
            } else if angle_deg < 112.5 {
                (idx - width, idx + width)
            } else {
                (idx - width - 1, idx + width + 1)
            };

            // Keep ties so a symmetric two-pixel ridge from the binarized
            // input survives on both sides.
            if m < mag[n1] || m < mag[n2] {
                continue;
            }

            labels[idx] = if m >= high { 2 } else { 1 };
        }
    }

    // Grow weak candidates connected to strong seeds.
    let mut stack: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, &l)| l == 2)
        .map(|(i, _)| i)
        .collect();
    for &idx in &stack {
        map.data[idx] = 255;
    }
    while let Some(idx) = stack.pop() {
        let x = idx % width;
        let y = idx / width;
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let nidx = ny * width + nx;
                if labels[nidx] == 1 && map.data[nidx] == 0 {
                    map.data[nidx] = 255;
                    stack.push(nidx);
                }
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: usize, height: usize, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Frame {
            data,
            width,
            height,
            timestamp_ms: 0.0,
        }
    }

    #[test]
    fn test_blank_frame_gives_empty_map() {
        let frame = solid_frame(64, 64, [0, 0, 0]);
        let edges = extract_edges(&frame, &EdgeConfig::default());
        assert!(edges.points().is_empty());
    }

    #[test]
    fn test_uniform_bright_frame_gives_empty_map() {
        // No intensity transitions, so no gradient anywhere.
        let frame = solid_frame(64, 64, [255, 255, 255]);
        let edges = extract_edges(&frame, &EdgeConfig::default());
        assert!(edges.points().is_empty());
    }

    #[test]
    fn test_vertical_bar_produces_edges_at_boundaries() {
        let width = 64;
        let height = 64;
        let mut frame = solid_frame(width, height, [0, 0, 0]);
        // White bar spanning columns 20..=40.
        for y in 0..height {
            for x in 20..=40 {
                let idx = (y * width + x) * 3;
                frame.data[idx] = 255;
                frame.data[idx + 1] = 255;
                frame.data[idx + 2] = 255;
            }
        }

        let edges = extract_edges(&frame, &EdgeConfig::default());
        let points = edges.points();
        assert!(!points.is_empty());
        // All edges cluster around the two bar boundaries; none inside the
        // flat interior or the flat background.
        for &(x, _) in &points {
            let near_left = (17..=23).contains(&x);
            let near_right = (37..=43).contains(&x);
            assert!(near_left || near_right, "unexpected edge at column {x}");
        }
    }

    #[test]
    fn test_grayscale_weights() {
        let frame = solid_frame(4, 4, [255, 0, 0]);
        let gray = to_grayscale(&frame.data, 4, 4);
        // Pure red maps to luma ≈ 76, well under the binary threshold.
        assert_eq!(gray[0], 76);
    }
}
