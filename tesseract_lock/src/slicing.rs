//! Hyperplane cross-sections
//!
//! Intersects every edge of a rotated polytope with the hyperplane
//! `w = slice_w`. The result is an unconnected point cloud, one point per
//! crossing edge, in edge order.

use glam::Vec3;

use crate::polytope::Polytope4D;

/// Intersect the edges of `rotated` with `w = slice_w`.
///
/// Only edges whose endpoints lie strictly on opposite sides contribute; an
/// endpoint sitting exactly on the hyperplane yields no point.
pub fn slice_polytope(rotated: &Polytope4D, slice_w: f32) -> Vec<Vec3> {
    let mut points = Vec::new();
    for edge in &rotated.edges {
        let v1 = rotated.vertices[edge.v1];
        let v2 = rotated.vertices[edge.v2];
        let crosses = (v1.w < slice_w && v2.w > slice_w) || (v2.w < slice_w && v1.w > slice_w);
        if !crosses {
            continue;
        }
        let t = (slice_w - v1.w) / (v2.w - v1.w);
        points.push(v1.truncate().lerp(v2.truncate(), t));
    }
    points
}
