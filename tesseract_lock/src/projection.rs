//! 4D → 3D → 2D projection pipeline
//!
//! Rotated vertices are first perspective-divided along W, scaled into scene
//! units, then handed to the [`ScreenCamera`] for the final 3D → 2D step.

use std::collections::BTreeMap;

use common::{ScreenCamera, ScreenPoint};
use glam::{Vec2, Vec3, Vec4};

use crate::constants::{SCENE_SCALE, W_CAMERA_DISTANCE};
use crate::polytope::{cell_id, Edge4D, Polytope4D};

/// Project a 4D point to 3D with perspective along W
pub fn project_to_3d(v: Vec4, w_distance: f32) -> Vec3 {
    let perspective = w_distance / (w_distance - v.w);
    v.truncate() * perspective
}

/// One projected vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    pub point: Vec2,
    pub depth: f32,
    /// W coordinate of the vertex that was projected
    pub w: f32,
}

impl ProjectedVertex {
    /// Brightness hint derived from W
    pub fn luma(&self) -> f32 {
        w_luma(self.w)
    }
}

/// One projected edge, ready to stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedEdge {
    pub edge: Edge4D,
    pub p1: Vec2,
    pub p2: Vec2,
    /// Mean endpoint depth, the back-to-front sort key
    pub depth: f32,
    pub w_avg: f32,
}

impl ProjectedEdge {
    /// Opacity hint: far edges fade, never below 0.1
    pub fn fade(&self) -> f32 {
        (1.0 - self.depth / (SCENE_SCALE * 8.0)).max(0.1)
    }
}

/// Map W to a luma factor in [0.4, 1.0]
pub fn w_luma(w: f32) -> f32 {
    const W_MAX: f32 = 2.0;
    let t = ((w + W_MAX) / (2.0 * W_MAX)).clamp(0.0, 1.0);
    0.4 + 0.6 * t.powf(0.7)
}

/// Full projection of a single 4D point
pub fn project_vertex(v: Vec4, camera: &ScreenCamera) -> ProjectedVertex {
    let p3d = project_to_3d(v, W_CAMERA_DISTANCE) * SCENE_SCALE;
    let ScreenPoint { point, depth } = camera.project(p3d);
    ProjectedVertex { point, depth, w: v.w }
}

/// Project already-rotated vertices
pub fn project_vertices(rotated: &[Vec4], camera: &ScreenCamera) -> Vec<ProjectedVertex> {
    rotated.iter().map(|&v| project_vertex(v, camera)).collect()
}

/// Build edge strokes sorted far-to-near, so nearer edges draw last
pub fn project_edges(edges: &[Edge4D], projected: &[ProjectedVertex]) -> Vec<ProjectedEdge> {
    let mut out: Vec<ProjectedEdge> = edges
        .iter()
        .map(|&edge| {
            let a = projected[edge.v1];
            let b = projected[edge.v2];
            ProjectedEdge {
                edge,
                p1: a.point,
                p2: b.point,
                depth: (a.depth + b.depth) / 2.0,
                w_avg: (a.w + b.w) / 2.0,
            }
        })
        .collect();
    out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    out
}

/// Screen-space centroid of the vertices in each cell
pub fn cell_centroids(rotated: &[Vec4], projected: &[ProjectedVertex]) -> BTreeMap<u8, Vec2> {
    let mut acc: BTreeMap<u8, (Vec2, u32)> = BTreeMap::new();
    for (v, p) in rotated.iter().zip(projected) {
        let entry = acc.entry(cell_id(*v)).or_insert((Vec2::ZERO, 0));
        entry.0 += p.point;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(cell, (sum, count))| (cell, sum / count as f32))
        .collect()
}

/// Project slice points (already in 3D, no W perspective) onto the screen
pub fn project_slice(points: &[Vec3], camera: &ScreenCamera) -> Vec<Vec2> {
    points
        .iter()
        .map(|&p| camera.project(p * SCENE_SCALE).point)
        .collect()
}

/// Wireframe output of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<ProjectedVertex>,
    /// Sorted by descending depth
    pub edges: Vec<ProjectedEdge>,
    pub cell_centroids: BTreeMap<u8, Vec2>,
}

/// Project a rotated polytope into a wireframe
pub fn project_polytope(rotated: &Polytope4D, camera: &ScreenCamera) -> Wireframe {
    let vertices = project_vertices(&rotated.vertices, camera);
    let edges = project_edges(&rotated.edges, &vertices);
    let cell_centroids = cell_centroids(&rotated.vertices, &vertices);
    Wireframe {
        vertices,
        edges,
        cell_centroids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Plane, RotationState};
    use proptest::prelude::*;

    fn camera() -> ScreenCamera {
        ScreenCamera::new(SCENE_SCALE, 1.0)
    }

    #[test]
    fn w_perspective() {
        let p = project_to_3d(Vec4::new(1.0, 2.0, 3.0, 0.0), 4.0);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
        // w = 2 doubles, w = -4 halves
        let p = project_to_3d(Vec4::new(1.0, 1.0, 1.0, 2.0), 4.0);
        assert_eq!(p, Vec3::splat(2.0));
        let p = project_to_3d(Vec4::new(1.0, 1.0, 1.0, -4.0), 4.0);
        assert_eq!(p, Vec3::splat(0.5));
    }

    #[test]
    fn vertex_projection_matches_pipeline() {
        let cam = camera();
        let v = Vec4::new(1.0, 1.0, 1.0, 0.0);
        let pv = project_vertex(v, &cam);
        // scene point (120, 120, 120); camera at z = 600 looking down -Z
        assert!((pv.depth - 480.0).abs() < 1e-3);
        assert!((pv.point.x - -120.0 * 600.0 / 480.0).abs() < 1e-2);
        assert!((pv.point.y - 120.0 * 600.0 / 480.0).abs() < 1e-2);
        assert_eq!(pv.w, 0.0);
    }

    #[test]
    fn zoom_moves_camera_closer() {
        let v = Vec4::new(0.0, 1.0, 0.0, 0.0);
        let far = project_vertex(v, &ScreenCamera::new(SCENE_SCALE, 1.0));
        let near = project_vertex(v, &ScreenCamera::new(SCENE_SCALE, 2.0));
        assert!(near.depth < far.depth);
        assert!(near.point.y > far.point.y);
    }

    #[test]
    fn edges_sorted_back_to_front() {
        let cam = camera();
        let mut rotation = RotationState::default();
        rotation.add(Plane::Xy, 0.4);
        rotation.add(Plane::Yz, -0.9);
        let rotated = Polytope4D::tesseract().rotated(&rotation);
        let frame = project_polytope(&rotated, &cam);
        assert_eq!(frame.edges.len(), 32);
        assert!(frame.edges.windows(2).all(|w| w[0].depth >= w[1].depth));
        for e in &frame.edges {
            let a = frame.vertices[e.edge.v1].depth;
            let b = frame.vertices[e.edge.v2].depth;
            assert_eq!(e.depth, (a + b) / 2.0);
            let (wa, wb) = (rotated.vertices[e.edge.v1].w, rotated.vertices[e.edge.v2].w);
            assert_eq!(e.w_avg, (wa + wb) / 2.0);
        }
        for (pv, v) in frame.vertices.iter().zip(&rotated.vertices) {
            assert_eq!(pv.w, v.w);
            assert_eq!(pv.luma(), w_luma(v.w));
            assert!((0.4..=1.0).contains(&pv.luma()));
        }
    }

    #[test]
    fn centroids_group_by_cell() {
        let cam = camera();
        let rotated = Polytope4D::tesseract();
        let frame = project_polytope(&rotated, &cam);
        // 16 sign patterns fold into 4 cell ids
        assert_eq!(frame.cell_centroids.keys().copied().collect::<Vec<_>>(), vec![0, 1, 4, 5]);
        let total: f32 = frame.cell_centroids.values().map(|c| c.length()).sum();
        assert!(total.is_finite());
    }

    #[test]
    fn luma_range() {
        assert!((w_luma(-2.0) - 0.4).abs() < 1e-6);
        assert!((w_luma(2.0) - 1.0).abs() < 1e-6);
        assert!((w_luma(-10.0) - 0.4).abs() < 1e-6);
        assert!(w_luma(0.0) > 0.4 && w_luma(0.0) < 1.0);
    }

    #[test]
    fn fade_has_floor() {
        let e = ProjectedEdge {
            edge: Edge4D::new(0, 1),
            p1: Vec2::ZERO,
            p2: Vec2::ZERO,
            depth: 10_000.0,
            w_avg: 0.0,
        };
        assert_eq!(e.fade(), 0.1);
    }

    #[test]
    fn slice_points_use_scene_scale() {
        let cam = camera();
        let pts = project_slice(&[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)], &cam);
        assert_eq!(pts[0], Vec2::ZERO);
        assert!((pts[1].y - 120.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn projection_is_idempotent(a in -3.0f32..3.0, b in -3.0f32..3.0, zoom in 0.2f32..5.0) {
            let cam = ScreenCamera::new(SCENE_SCALE, zoom);
            let mut rotation = RotationState::default();
            rotation.add(Plane::Xw, a);
            rotation.add(Plane::Yz, b);
            let rotated = Polytope4D::cell_16().rotated(&rotation);
            let first = project_polytope(&rotated, &cam);
            let second = project_polytope(&Polytope4D::cell_16().rotated(&rotation), &cam);
            prop_assert_eq!(first, second);
        }
    }
}
