// src/tip_geometry.rs
//
// Arc length along the fitted circle between base and tip, and the tip's
// tangent direction from the smoothed radial slope.
//
// Branch convention: of the two arcs joining base and tip, the physical one
// is the arc the robot body lies on, witnessed by the reduced curve's
// midpoint. Without a witness the minor arc is used.

use crate::types::{CircleModel, TangentDirection};
use std::f64::consts::{FRAC_PI_2, PI};

#[inline]
fn angle_about(circle: &CircleModel, point: (f32, f32)) -> f64 {
    (point.1 as f64 - circle.cy).atan2(point.0 as f64 - circle.cx)
}

/// Wrap an angle difference into [0, 2π).
#[inline]
fn wrap_positive(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}

/// Arc length between base and tip along the fitted circle.
///
/// The angular separation is resolved to the arc containing `witness`
/// (the reduced curve's midpoint) when one is given, otherwise to the
/// minor arc.
pub fn arc_length(
    circle: &CircleModel,
    base: (f32, f32),
    tip: (f32, f32),
    witness: Option<(f32, f32)>,
) -> f64 {
    let base_angle = angle_about(circle, base);
    let tip_angle = angle_about(circle, tip);

    // Sweep from base to tip in [0, 2π); the complementary arc is the rest.
    let forward = wrap_positive(tip_angle - base_angle);
    let minor = forward.min(2.0 * PI - forward);

    let separation = match witness {
        Some(w) => {
            let witness_offset = wrap_positive(angle_about(circle, w) - base_angle);
            // Does the witness lie on the forward sweep?
            let on_forward = witness_offset <= forward;
            if (forward <= PI) == on_forward {
                minor
            } else {
                2.0 * PI - minor
            }
        }
        None => minor,
    };

    circle.radius * separation
}

/// Tangent direction at the tip from the smoothed radial slope.
///
/// The tangent is perpendicular to the radius, so its slope is the negative
/// reciprocal of the radial slope; a smoothed slope of exactly zero has no
/// reciprocal and yields `None`. The direction angle follows the fixed
/// convention atan(m) − π/2 for image coordinates (y down).
pub fn tangent_at_tip(
    smoothed_slope: f64,
    tip: (f32, f32),
    arrow_length: f32,
) -> Option<TangentDirection> {
    if smoothed_slope == 0.0 {
        return None;
    }

    let theta = smoothed_slope.atan() - FRAC_PI_2;
    let dx = theta.cos() as f32;
    let dy = theta.sin() as f32;

    Some(TangentDirection {
        dx,
        dy,
        end_x: tip.0 + arrow_length * dx,
        end_y: tip.1 + arrow_length * dy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle(cx: f64, cy: f64, radius: f64) -> CircleModel {
        CircleModel { cx, cy, radius }
    }

    fn on_circle(c: &CircleModel, angle_deg: f64) -> (f32, f32) {
        let a = angle_deg.to_radians();
        (
            (c.cx + c.radius * a.cos()) as f32,
            (c.cy + c.radius * a.sin()) as f32,
        )
    }

    #[test]
    fn test_semicircle_arc() {
        let c = circle(100.0, 100.0, 50.0);
        let len = arc_length(&c, on_circle(&c, 180.0), on_circle(&c, 0.0), None);
        assert_relative_eq!(len, PI * 50.0, max_relative = 1e-6);
    }

    #[test]
    fn test_arc_linear_in_radius() {
        for &r in &[10.0, 20.0, 80.0] {
            let c = circle(0.0, 0.0, r);
            let len = arc_length(&c, on_circle(&c, 90.0), on_circle(&c, 0.0), None);
            assert_relative_eq!(len, r * FRAC_PI_2, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_arc_monotone_in_separation() {
        let c = circle(0.0, 0.0, 40.0);
        let mut previous = 0.0;
        for deg in [10.0, 45.0, 90.0, 135.0, 170.0] {
            let len = arc_length(&c, on_circle(&c, 0.0), on_circle(&c, deg), None);
            assert!(len > previous);
            previous = len;
        }
    }

    #[test]
    fn test_witness_selects_major_arc() {
        let c = circle(0.0, 0.0, 30.0);
        let base = on_circle(&c, 0.0);
        let tip = on_circle(&c, 90.0);

        // Witness inside the short sweep: minor arc.
        let minor = arc_length(&c, base, tip, Some(on_circle(&c, 45.0)));
        assert_relative_eq!(minor, 30.0 * FRAC_PI_2, max_relative = 1e-6);

        // Witness on the far side: the long way around.
        let major = arc_length(&c, base, tip, Some(on_circle(&c, 225.0)));
        assert_relative_eq!(major, 30.0 * 3.0 * FRAC_PI_2, max_relative = 1e-6);
    }

    #[test]
    fn test_tangent_unit_direction() {
        let t = tangent_at_tip(1.0, (10.0, 10.0), 50.0).unwrap();
        let norm = (t.dx * t.dx + t.dy * t.dy).sqrt();
        assert_relative_eq!(norm, 1.0, max_relative = 1e-6);
        // atan(1) − π/2 = −π/4: pointing up-right in image coordinates.
        assert_relative_eq!(t.dx, std::f32::consts::FRAC_1_SQRT_2, max_relative = 1e-4);
        assert_relative_eq!(t.dy, -std::f32::consts::FRAC_1_SQRT_2, max_relative = 1e-4);
        assert_relative_eq!(t.end_x, 10.0 + 50.0 * t.dx, max_relative = 1e-6);
    }

    #[test]
    fn test_zero_slope_has_no_tangent() {
        assert!(tangent_at_tip(0.0, (5.0, 5.0), 50.0).is_none());
    }
}
