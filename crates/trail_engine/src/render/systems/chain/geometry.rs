//! Billboard axis math for chain geometry
//!
//! Computes the lateral axis of each ribbon quad edge: either derived from
//! the view direction each frame (camera-facing chains, which fake a tube)
//! or from a per-element orientation applied to a fixed base normal
//! (planar ribbons with caller-controlled twist, e.g. sword trails).

use crate::foundation::math::{Quat, Vec3};

/// Below this squared length a cross product is considered degenerate
const DEGENERATE_EPS: f32 = 1.0e-6;

/// Chain tangent at an element given its neighbours' positions
///
/// Interior elements span from the previous to the next element; the chain
/// ends fall back to their single neighbour. An isolated element has no
/// meaningful tangent (no quad is emitted for it) and gets a unit X axis.
pub fn chain_tangent(prev: Option<Vec3>, position: Vec3, next: Option<Vec3>) -> Vec3 {
    match (prev, next) {
        (Some(p), Some(n)) => n - p,
        (None, Some(n)) => n - position,
        (Some(p), None) => position - p,
        (None, None) => Vec3::x(),
    }
}

/// Lateral axis of a camera-facing element
///
/// Normalized cross product of the view vector (eye minus element) and the
/// chain tangent, producing a quad edge perpendicular to both the view ray
/// and the chain's local direction. When the view ray is parallel to the
/// tangent the cross degenerates and any perpendicular of the tangent is
/// used instead.
pub fn camera_facing_lateral(eye_position: Vec3, position: Vec3, tangent: Vec3) -> Vec3 {
    let view = eye_position - position;
    let lateral = view.cross(&tangent);
    let len_sq = lateral.norm_squared();
    if len_sq > DEGENERATE_EPS {
        lateral / len_sq.sqrt()
    } else {
        perpendicular_to(tangent)
    }
}

/// Lateral axis of a fixed-orientation element
///
/// The configured base normal rotated by the element's orientation,
/// independent of any camera.
pub fn oriented_lateral(normal_base: Vec3, orientation: &Quat) -> Vec3 {
    orientation.transform_vector(&normal_base)
}

/// Any unit vector perpendicular to `v`
fn perpendicular_to(v: Vec3) -> Vec3 {
    let axis = if v.x.abs() < 0.9 * v.norm() {
        Vec3::x()
    } else {
        Vec3::y()
    };
    let perp = v.cross(&axis);
    let len_sq = perp.norm_squared();
    if len_sq > DEGENERATE_EPS {
        perp / len_sq.sqrt()
    } else {
        Vec3::y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tangent_interior_spans_neighbours() {
        let tangent = chain_tangent(
            Some(Vec3::new(0.0, 0.0, 0.0)),
            Vec3::new(1.0, 5.0, 0.0),
            Some(Vec3::new(2.0, 0.0, 0.0)),
        );
        // interior tangent ignores the element's own position
        assert_eq!(tangent, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_tangent_at_chain_ends() {
        let first = chain_tangent(None, Vec3::zeros(), Some(Vec3::new(0.0, 3.0, 0.0)));
        assert_eq!(first, Vec3::new(0.0, 3.0, 0.0));

        let last = chain_tangent(Some(Vec3::new(0.0, 1.0, 0.0)), Vec3::zeros(), None);
        assert_eq!(last, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_camera_facing_lateral_is_unit_and_perpendicular() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let pos = Vec3::new(1.0, 0.0, 0.0);
        let tangent = Vec3::new(1.0, 0.0, 0.0);

        let lateral = camera_facing_lateral(eye, pos, tangent);
        assert_relative_eq!(lateral.norm(), 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(lateral.dot(&tangent), 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(lateral.dot(&(eye - pos)), 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_camera_facing_lateral_follows_the_camera() {
        let pos = Vec3::zeros();
        let tangent = Vec3::new(1.0, 0.0, 0.0);

        let from_front = camera_facing_lateral(Vec3::new(0.0, 0.0, 5.0), pos, tangent);
        let from_above = camera_facing_lateral(Vec3::new(0.0, 5.0, 0.0), pos, tangent);
        assert!((from_front - from_above).norm() > 0.5);
    }

    #[test]
    fn test_oriented_lateral_ignores_camera_entirely() {
        let quarter_turn = Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2);
        let lateral = oriented_lateral(Vec3::x(), &quarter_turn);
        assert_relative_eq!(lateral.x, 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(lateral.y, 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(lateral.z, 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_identity_orientation_yields_base_normal() {
        let lateral = oriented_lateral(Vec3::x(), &Quat::identity());
        assert_eq!(lateral, Vec3::x());
    }

    #[test]
    fn test_degenerate_view_falls_back_to_a_perpendicular() {
        // eye straight along the tangent: cross product vanishes
        let tangent = Vec3::new(1.0, 0.0, 0.0);
        let lateral = camera_facing_lateral(Vec3::new(10.0, 0.0, 0.0), Vec3::zeros(), tangent);
        assert_relative_eq!(lateral.norm(), 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(lateral.dot(&tangent), 0.0, epsilon = 1.0e-6);
    }
}
