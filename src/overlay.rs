// src/overlay.rs
//
// Annotated output rendering: the raw frame with the fitted circle and
// per-frame measurements, and the edge map with the tip tangent arrow.
// Purely a visualization sink — numeric output never depends on this.

use crate::edge_detection::EdgeMap;
use crate::types::FrameResult;
use anyhow::Result;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
};

const CURVE_COLOR: (f64, f64, f64) = (204.0, 255.0, 204.0);
const CIRCLE_COLOR: (f64, f64, f64) = (255.0, 204.0, 204.0);
const ANCHOR_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);
const TIP_COLOR: (f64, f64, f64) = (206.0, 0.0, 88.0);
const TEXT_COLOR: (f64, f64, f64) = (204.0, 229.0, 255.0);

fn scalar(bgr: (f64, f64, f64)) -> core::Scalar {
    core::Scalar::new(bgr.0, bgr.1, bgr.2, 0.0)
}

/// Render the raw frame annotated with the reduced curve, base and tip
/// anchors, the fitted circle (suppressed when implausible), and the
/// per-frame measurement text.
pub fn draw_frame_overlay(frame: &[u8], height: i32, result: &FrameResult) -> Result<Mat> {
    let mat = Mat::from_slice(frame)?;
    let mat = mat.reshape(3, height)?;

    let mut bgr_mat = Mat::default();
    imgproc::cvt_color(&mat, &mut bgr_mat, imgproc::COLOR_RGB2BGR, 0)?;
    let mut output = bgr_mat.try_clone()?;

    for &(x, y) in &result.curve_points {
        imgproc::circle(
            &mut output,
            core::Point::new(x as i32, y as i32),
            1,
            scalar(CURVE_COLOR),
            1,
            imgproc::LINE_8,
            0,
        )?;
    }

    for anchor in [result.base, result.tip].into_iter().flatten() {
        imgproc::circle(
            &mut output,
            core::Point::new(anchor.0 as i32, anchor.1 as i32),
            1,
            scalar(ANCHOR_COLOR),
            5,
            imgproc::LINE_8,
            0,
        )?;
    }

    if let Some(circle) = result.circle {
        if result.plausible {
            imgproc::circle(
                &mut output,
                core::Point::new(circle.cx as i32, circle.cy as i32),
                circle.radius as i32,
                scalar(CIRCLE_COLOR),
                2,
                imgproc::LINE_8,
                0,
            )?;
        }

        let mut lines = vec![
            format!("Radius: {:.2} px", circle.radius),
            format!("Curvature: {:.2}", circle.curvature()),
        ];
        if let Some(arc) = result.arc_length {
            lines.push(format!("Arc Length: {:.2}", arc));
        }
        for (i, line) in lines.iter().enumerate() {
            imgproc::put_text(
                &mut output,
                line,
                core::Point::new(10, 50 + 40 * i as i32),
                imgproc::FONT_HERSHEY_SIMPLEX,
                0.5,
                scalar(TEXT_COLOR),
                1,
                imgproc::LINE_AA,
                false,
            )?;
        }
    }

    Ok(output)
}

/// Render the edge map in color with the tip point and tangent arrow.
pub fn draw_edges_overlay(edges: &EdgeMap, result: &FrameResult) -> Result<Mat> {
    let mat = Mat::from_slice(&edges.data)?;
    let mat = mat.reshape(1, edges.height as i32)?;

    let mut output = Mat::default();
    imgproc::cvt_color(&mat, &mut output, imgproc::COLOR_GRAY2BGR, 0)?;

    if let Some(tip) = result.tip {
        imgproc::circle(
            &mut output,
            core::Point::new(tip.0 as i32, tip.1 as i32),
            1,
            scalar(TIP_COLOR),
            5,
            imgproc::LINE_8,
            0,
        )?;

        if let Some(tangent) = result.tangent {
            imgproc::arrowed_line(
                &mut output,
                core::Point::new(tip.0 as i32, tip.1 as i32),
                core::Point::new(tangent.end_x as i32, tangent.end_y as i32),
                scalar(TIP_COLOR),
                2,
                imgproc::LINE_8,
                0,
                0.2,
            )?;
        }
    }

    Ok(output)
}
