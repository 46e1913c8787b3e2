//! Joint angle calculation using the dot product
//!
//! The angle at `vertex` between the segments `vertex→p1` and `vertex→p2`.

use super::Point3;

/// Angle at `vertex` in degrees, in `[0, 180]`
///
/// cos(θ) = (v1 · v2) / (|v1| × |v2|), clamped to [-1, 1] before `acos`
/// so near-parallel vectors cannot push it out of domain.
///
/// Returns `0.0` when `vertex` coincides with either endpoint, or when the
/// input is not finite. Never returns NaN.
pub fn angle(p1: Point3, vertex: Point3, p2: Point3) -> f32 {
    try_angle(p1, vertex, p2).unwrap_or(0.0)
}

/// Like [`angle`], but `None` for degenerate geometry instead of `0.0`
///
/// Lets callers tell a zero-length segment apart from a fully folded joint.
pub fn try_angle(p1: Point3, vertex: Point3, p2: Point3) -> Option<f32> {
    let v1 = p1 - vertex;
    let v2 = p2 - vertex;

    let mag1 = v1.norm();
    let mag2 = v2.norm();

    if mag1 == 0.0 || mag2 == 0.0 {
        return None;
    }

    let cos_angle = v1.dot(v2) / (mag1 * mag2);
    if !cos_angle.is_finite() {
        return None;
    }

    Some(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}
