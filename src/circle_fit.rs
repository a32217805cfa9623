// src/circle_fit.rs
//
// Geometric circle fit: minimize Σ (‖pᵢ − c‖ − r)² over (cx, cy, r) by
// Gauss-Newton iteration on the normal equations, with light damping for
// near-degenerate point configurations. The initial guess is recomputed
// from the points every frame; there is no warm start and no retry.
//
// Near-collinear inputs can converge to a very large (or even negative)
// radius. That is not an error here — plausibility is judged against the
// configured radius bounds by the caller.

use crate::types::CircleModel;
use nalgebra::{Matrix3, Vector3};

/// Fit a circle to the reduced curve. Returns `None` when fewer than 3
/// points are given; otherwise always yields a model, plausible or not.
pub fn fit_circle(points: &[(f32, f32)], max_iterations: usize) -> Option<CircleModel> {
    if points.len() < 3 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x: f64 = points.iter().map(|p| p.0 as f64).sum::<f64>() / n;
    let mean_y: f64 = points.iter().map(|p| p.1 as f64).sum::<f64>() / n;
    let var_x: f64 = points
        .iter()
        .map(|p| {
            let d = p.0 as f64 - mean_x;
            d * d
        })
        .sum::<f64>()
        / n;

    // (mean x, mean y, std x) — std 0 means all points share one column;
    // a unit floor keeps the first Jacobian finite.
    let mut params = Vector3::new(mean_x, mean_y, var_x.sqrt().max(1.0));

    for _ in 0..max_iterations.max(1) {
        let mut h = Matrix3::<f64>::zeros();
        let mut g = Vector3::<f64>::zeros();

        for &(px, py) in points {
            let dx = params[0] - px as f64;
            let dy = params[1] - py as f64;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= 1e-12 {
                continue;
            }

            // Residual ‖p − c‖ − r, Jacobian wrt (cx, cy, r).
            let residual = dist - params[2];
            let j = Vector3::new(dx / dist, dy / dist, -1.0);
            h += j * j.transpose();
            g += j * residual;
        }

        h += Matrix3::<f64>::identity() * 1e-9;

        let step = match h.lu().solve(&(-g)) {
            Some(s) if s.iter().all(|v| v.is_finite()) => s,
            _ => break,
        };

        params += step;

        if step.norm() < 1e-9 {
            break;
        }
    }

    if !params.iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(CircleModel {
        cx: params[0],
        cy: params[1],
        radius: params[2],
    })
}
