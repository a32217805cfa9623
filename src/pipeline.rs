// src/pipeline.rs
//
// Per-frame orchestrator. Wires the stages in their fixed order:
//
//   Frame → edge_detection → curve_extraction ─┐
//   Frame → tip_detection ─────────────────────┼→ circle_fit → arc length
//                                              │              → slope smoothing
//                                              │              → tangent
//
// Single entry point: call process_frame() each frame. The pipeline owns
// the slope smoother, the only cross-frame state, so frames must be fed in
// order by a single caller.

use crate::circle_fit::fit_circle;
use crate::curve_extraction::{locate_base, reduce_edge_rows};
use crate::edge_detection::{extract_edges, EdgeMap};
use crate::smoother::SlopeSmoother;
use crate::tip_detection::locate_tip;
use crate::tip_geometry::{arc_length, tangent_at_tip};
use crate::types::{Config, Frame, FrameResult};
use tracing::debug;

/// Everything produced for one frame: the numeric result for the CSV sink
/// plus the edge map kept for the annotated edges video.
pub struct ProcessedFrame {
    pub result: FrameResult,
    pub edges: EdgeMap,
}

pub struct CurvaturePipeline {
    config: Config,
    smoother: SlopeSmoother,
}

impl CurvaturePipeline {
    pub fn new(config: Config) -> Self {
        let window = config.tangent.slope_history;
        Self {
            config,
            smoother: SlopeSmoother::new(window),
        }
    }

    /// Run all stages on one frame. Per-frame anomalies (no edges, no
    /// marker, degenerate fit, undefined slope) surface as absent fields,
    /// never as errors; the run always continues.
    pub fn process_frame(&mut self, frame: &Frame) -> ProcessedFrame {
        let edges = extract_edges(frame, &self.config.edge);
        let tip = locate_tip(frame, &self.config.marker);

        let edge_points = edges.points();
        let base = locate_base(&edge_points);
        let curve = reduce_edge_rows(&edges, self.config.edge.row_stride);

        let mut result = FrameResult {
            tip,
            base,
            curve_points: curve,
            ..Default::default()
        };

        let circle = match fit_circle(&result.curve_points, self.config.fit.max_iterations) {
            Some(c) => c,
            None => {
                debug!(
                    "frame at {:.0}ms: {} curve point(s), skipping fit",
                    frame.timestamp_ms,
                    result.curve_points.len()
                );
                return ProcessedFrame { result, edges };
            }
        };

        result.plausible = circle.radius >= self.config.fit.min_radius_px
            && circle.radius <= self.config.fit.max_radius_px;
        if !result.plausible {
            debug!(
                "frame at {:.0}ms: implausible fit radius {:.1}px",
                frame.timestamp_ms, circle.radius
            );
        }
        result.circle = Some(circle);

        if let (Some(base), Some(tip)) = (base, tip) {
            let witness = result
                .curve_points
                .get(result.curve_points.len() / 2)
                .copied();
            result.arc_length = Some(arc_length(&circle, base, tip, witness));
        }

        // The smoother only observes frames where the tip exists; a missing
        // marker leaves the history untouched.
        if let Some(tip) = tip {
            if let Some(smoothed) = self.smoother.update(&circle, tip) {
                result.tangent = tangent_at_tip(smoothed, tip, self.config.tangent.arrow_length);
            }
        }

        ProcessedFrame { result, edges }
    }
}
