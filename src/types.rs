// src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub marker: MarkerConfig,
    #[serde(default)]
    pub fit: FitConfig,
    #[serde(default)]
    pub tangent: TangentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub save_annotated: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            input_dir: "data/video".to_string(),
            output_dir: "data/output".to_string(),
            save_annotated: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Binarization threshold on the blurred grayscale image [0, 255].
    pub binary_threshold: u8,
    /// Hysteresis thresholds on Sobel gradient magnitude.
    pub edge_low_threshold: f32,
    pub edge_high_threshold: f32,
    /// Row sampling stride for curve reduction.
    pub row_stride: usize,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            binary_threshold: 127,
            edge_low_threshold: 50.0,
            edge_high_threshold: 150.0,
            row_stride: 2,
        }
    }
}

/// HSV range for the tip marker. Hue in degrees [0, 360), saturation in
/// percent [0, 100], value in [0, 255] — the conventions of `rgb_to_hsv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub hue_min: f32,
    pub hue_max: f32,
    pub saturation_min: f32,
    pub value_min: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            hue_min: 0.0,
            hue_max: 20.0,
            saturation_min: 20.0,
            value_min: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Gauss-Newton iteration cap.
    pub max_iterations: usize,
    /// Fitted radii outside [min, max] are flagged implausible.
    pub min_radius_px: f64,
    pub max_radius_px: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            min_radius_px: 5.0,
            max_radius_px: 600.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TangentConfig {
    /// Number of per-frame radial slopes held for smoothing.
    pub slope_history: usize,
    /// Display length of the tangent arrow in pixels.
    pub arrow_length: f32,
}

impl Default for TangentConfig {
    fn default() -> Self {
        Self {
            slope_history: 5,
            arrow_length: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/cv_output.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "catheter_curvature=info".to_string(),
        }
    }
}

/// One video frame as raw RGB bytes, row-major, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub timestamp_ms: f64,
}

/// Fitted circle in pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct CircleModel {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl CircleModel {
    pub fn curvature(&self) -> f64 {
        1.0 / self.radius
    }
}

/// Tip tangent: unit direction anchored at the tip, plus the display
/// endpoint at the configured arrow length.
#[derive(Debug, Clone, Copy)]
pub struct TangentDirection {
    pub dx: f32,
    pub dy: f32,
    pub end_x: f32,
    pub end_y: f32,
}

/// Everything estimated for one frame. Geometry fields are absent when the
/// reduced curve had fewer than 3 points; arc length and tangent are absent
/// whenever the tip marker was not found or the slope was undefined.
#[derive(Debug, Clone, Default)]
pub struct FrameResult {
    pub circle: Option<CircleModel>,
    /// False when the fitted radius fell outside the configured bounds.
    pub plausible: bool,
    pub base: Option<(f32, f32)>,
    pub tip: Option<(f32, f32)>,
    pub arc_length: Option<f64>,
    pub tangent: Option<TangentDirection>,
    /// Reduced-curve points, kept for the overlay.
    pub curve_points: Vec<(f32, f32)>,
}
