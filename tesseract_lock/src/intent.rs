//! Drag-to-rotation intent inference
//!
//! A 2D drag cannot determine a 4D rotation plane, so the mapping below is a
//! fixed set of heuristics. It consults only the key's public planes; whether
//! an inferred plane may actually rotate is decided later by
//! [`crate::security::authorize`].

use crate::rotation::Plane;
use crate::security::{PermissionKeySpec, PlaneSet};

/// Radians of rotation per pixel of drag
pub const ROTATION_SENSITIVITY: f32 = 0.005;
/// How much larger one drag component must be to count as dominant
pub const DOMINANCE_RATIO: f32 = 1.2;
/// Share of a diagonal W-mode drag that goes into ZW
pub const DIAGONAL_ZW_FACTOR: f32 = 0.7;
/// Share of a diagonal 3D drag that goes into XZ
pub const XZ_BLEND_FACTOR: f32 = 0.2;

/// A candidate rotation in one plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationIntent {
    pub plane: Plane,
    pub angle: f32,
}

impl RotationIntent {
    pub fn new(plane: Plane, angle: f32) -> Self {
        Self { plane, angle }
    }
}

/// Map a drag delta to rotation intents on the key's public planes
pub fn infer_intents(dx: f32, dy: f32, w_mode: bool, spec: &PermissionKeySpec) -> Vec<RotationIntent> {
    if w_mode {
        infer_w_intent(dx, dy, spec.public_planes).into_iter().collect()
    } else {
        infer_3d_intents(dx, dy, spec.public_planes)
    }
}

/// Ordinary drags decompose into up to three simultaneous 3D rotations
fn infer_3d_intents(dx: f32, dy: f32, public: PlaneSet) -> Vec<RotationIntent> {
    let k = ROTATION_SENSITIVITY;
    let mut out = Vec::with_capacity(3);
    if public.contains(Plane::Xy) && dx != 0.0 {
        out.push(RotationIntent::new(Plane::Xy, dx * k));
    }
    if public.contains(Plane::Yz) && dy != 0.0 {
        out.push(RotationIntent::new(Plane::Yz, dy * k));
    }
    if public.contains(Plane::Xz) && dx.abs() > 0.0 && dy.abs() > 0.0 {
        out.push(RotationIntent::new(Plane::Xz, XZ_BLEND_FACTOR * (dx + dy) * k));
    }
    out
}

/// W-mode drags resolve to at most one hidden-plane rotation
fn infer_w_intent(dx: f32, dy: f32, public: PlaneSet) -> Option<RotationIntent> {
    let k = ROTATION_SENSITIVITY;
    let w_public = public.hidden();
    if w_public.is_empty() || (dx == 0.0 && dy == 0.0) {
        return None;
    }

    let magnitude = dx.hypot(dy);
    let (ax, ay) = (dx.abs(), dy.abs());

    // A lone public XW absorbs every W-mode drag, whatever its direction.
    if w_public == PlaneSet::of(&[Plane::Xw]) {
        // zero drags returned above, so the dominant component is non-zero
        let dominant = if ax >= ay { dx } else { dy };
        let sign = dominant.signum();
        return Some(RotationIntent::new(Plane::Xw, sign * magnitude * k));
    }

    if ax > ay * DOMINANCE_RATIO && w_public.contains(Plane::Xw) {
        return Some(RotationIntent::new(Plane::Xw, dx * k));
    }
    if ay > ax * DOMINANCE_RATIO && w_public.contains(Plane::Yw) {
        return Some(RotationIntent::new(Plane::Yw, dy * k));
    }
    if w_public.contains(Plane::Zw) {
        let sign = if dx * dy >= 0.0 { 1.0 } else { -1.0 };
        return Some(RotationIntent::new(
            Plane::Zw,
            sign * magnitude * k * DIAGONAL_ZW_FACTOR,
        ));
    }

    let plane = w_public.iter().next()?;
    let sign = if dx >= 0.0 { 1.0 } else { -1.0 };
    Some(RotationIntent::new(plane, magnitude * k * sign))
}
