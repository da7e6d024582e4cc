//! Screen camera for projecting 3D scene points onto the 2D viewport

use glam::{Vec2, Vec3};

/// Smallest zoom the camera accepts
pub const ZOOM_MIN: f32 = 0.2;
/// Largest zoom the camera accepts
pub const ZOOM_MAX: f32 = 5.0;
/// Zoom change per unit of mouse-wheel delta
pub const WHEEL_ZOOM_FACTOR: f32 = -0.001;
/// Focal length of the final perspective division
pub const FOCAL_LENGTH: f32 = 600.0;
/// Camera-space depth floor, keeps the perspective division finite
pub const DEPTH_FLOOR: f32 = 1.0;

/// A point after projection onto the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub point: Vec2,
    /// Camera-space depth (distance along the forward axis)
    pub depth: f32,
}

/// Perspective camera sitting on the +Z axis and looking at the origin.
///
/// The orthonormal basis is rebuilt from a constant up vector whenever the
/// zoom changes; nothing else about the camera is persistent.
#[derive(Debug, Clone)]
pub struct ScreenCamera {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    zoom: f32,
    scene_scale: f32,
}

impl ScreenCamera {
    pub fn new(scene_scale: f32, zoom: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            zoom: 1.0,
            scene_scale,
        };
        camera.set_zoom(zoom);
        camera
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, clamped to `[ZOOM_MIN, ZOOM_MAX]`
    pub fn set_zoom(&mut self, zoom: f32) {
        let clamped = if zoom.is_finite() {
            zoom.clamp(ZOOM_MIN, ZOOM_MAX)
        } else {
            1.0
        };
        if clamped != zoom {
            log::debug!("zoom {zoom} clamped to {clamped}");
        }
        self.zoom = clamped;
        self.update_basis();
    }

    /// Apply a mouse-wheel delta
    pub fn zoom_by_wheel(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta * WHEEL_ZOOM_FACTOR);
    }

    fn update_basis(&mut self) {
        self.position = Vec3::new(0.0, 0.0, self.scene_scale * 5.0 / self.zoom);
        self.forward = (Vec3::ZERO - self.position).normalize_or_zero();
        self.right = Vec3::Y.cross(self.forward).normalize_or_zero();
        self.up = self.forward.cross(self.right).normalize_or_zero();
    }

    /// Express a world-space point in camera space (right, up, forward)
    pub fn to_camera_space(&self, p: Vec3) -> Vec3 {
        let v = p - self.position;
        Vec3::new(v.dot(self.right), v.dot(self.up), v.dot(self.forward))
    }

    /// Project a world-space point onto the viewport
    pub fn project(&self, p: Vec3) -> ScreenPoint {
        let c = self.to_camera_space(p);
        let perspective = FOCAL_LENGTH / c.z.max(DEPTH_FLOOR);
        ScreenPoint {
            point: Vec2::new(c.x * perspective, c.y * perspective),
            depth: c.z,
        }
    }
}
