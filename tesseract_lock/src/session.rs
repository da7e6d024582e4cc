//! Interactive session: the state threaded through every tick
//!
//! A [`Session`] owns the polytope, rotation state, camera, credential
//! lifecycle and carved path. User input mutates it directly, so an accepted
//! rotation is visible to the very next [`Session::tick`].

use common::ScreenCamera;
use glam::{Vec2, Vec3};
use serde_json::Value;

use crate::carver::PathCarver;
use crate::config::SessionConfig;
use crate::constants::SCENE_SCALE;
use crate::credential::{Acquisition, CredentialLifecycle, CredentialVerifier};
use crate::error::Result;
use crate::intent::infer_intents;
use crate::polytope::{Polytope4D, Shape};
use crate::projection::{project_polytope, project_slice, Wireframe};
use crate::rotation::RotationState;
use crate::security::{authorize_all, Decision, PermissionKeySpec, TRAINING_W_ONLY};
use crate::slicing::slice_polytope;

/// Output of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Full 1-skeleton, when slicing is off
    Wireframe(Wireframe),
    /// Cross-section at the current slice position
    Slice {
        points: Vec<Vec3>,
        screen: Vec<Vec2>,
    },
}

impl Frame {
    pub fn is_slice(&self) -> bool {
        matches!(self, Frame::Slice { .. })
    }
}

pub struct Session {
    polytope: Polytope4D,
    rotation: RotationState,
    camera: ScreenCamera,
    credential: CredentialLifecycle,
    carver: PathCarver,
    slice_w: f32,
    slicing: bool,
    w_mode: bool,
    ticks: u64,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let initial = config.initial_key_spec()?;
        Ok(Self {
            polytope: Polytope4D::new(config.shape),
            rotation: RotationState::default(),
            camera: ScreenCamera::new(SCENE_SCALE, config.zoom),
            credential: CredentialLifecycle::new(initial, TRAINING_W_ONLY),
            carver: PathCarver::new(),
            slice_w: config.slice_w,
            slicing: config.slicing,
            w_mode: false,
            ticks: 0,
        })
    }

    pub fn polytope(&self) -> &Polytope4D {
        &self.polytope
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn camera(&self) -> &ScreenCamera {
        &self.camera
    }

    pub fn key_spec(&self) -> &PermissionKeySpec {
        self.credential.active_spec()
    }

    pub fn credential(&self) -> &CredentialLifecycle {
        &self.credential
    }

    pub fn carver(&self) -> &PathCarver {
        &self.carver
    }

    pub fn slice_w(&self) -> f32 {
        self.slice_w
    }

    pub fn is_slicing(&self) -> bool {
        self.slicing
    }

    pub fn w_mode(&self) -> bool {
        self.w_mode
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Swap the displayed polytope; rotation carries over
    pub fn select_shape(&mut self, shape: Shape) {
        if self.polytope.shape != shape {
            log::info!("shape {} -> {}", self.polytope.shape, shape);
            self.polytope = Polytope4D::new(shape);
        }
    }

    /// Hold or release the W modifier
    pub fn set_w_mode(&mut self, held: bool) {
        self.w_mode = held;
    }

    /// Handle a drag delta: infer intents, then authorize each one
    pub fn drag(&mut self, dx: f32, dy: f32) -> Vec<Decision> {
        let spec = self.credential.active_spec();
        let intents = infer_intents(dx, dy, self.w_mode, spec);
        authorize_all(&intents, spec, &mut self.rotation)
    }

    pub fn zoom_by_wheel(&mut self, delta: f32) {
        self.camera.zoom_by_wheel(delta);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.camera.set_zoom(zoom);
    }

    pub fn set_slice_w(&mut self, slice_w: f32) {
        self.slice_w = slice_w;
    }

    pub fn set_slicing(&mut self, slicing: bool) {
        self.slicing = slicing;
    }

    pub fn start_carving(&mut self) {
        self.carver.start();
    }

    pub fn stop_carving(&mut self) {
        self.carver.stop();
    }

    pub fn clear_carving(&mut self) {
        self.carver.clear();
    }

    pub fn reset_rotation(&mut self) {
        self.rotation.reset();
    }

    /// Present a parsed credential payload
    pub fn present_credential<V: CredentialVerifier + ?Sized>(
        &mut self,
        verifier: &V,
        payload: Option<&Value>,
    ) -> Acquisition {
        self.credential.present(verifier, payload)
    }

    /// Present raw key-file bytes (size and content type are checked first)
    pub fn present_key_file<V: CredentialVerifier + ?Sized>(
        &mut self,
        verifier: &V,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Acquisition {
        self.credential.present_file(verifier, bytes, content_type)
    }

    /// Recompute geometry for the current state.
    ///
    /// While slicing, the cross-section is also offered to the carver.
    pub fn tick(&mut self) -> Frame {
        self.ticks += 1;
        let rotated = self.polytope.rotated(&self.rotation);

        if !self.slicing {
            let wireframe = project_polytope(&rotated, &self.camera);
            log::trace!(
                "tick {}: {} edges projected",
                self.ticks,
                wireframe.edges.len()
            );
            return Frame::Wireframe(wireframe);
        }

        let points = slice_polytope(&rotated, self.slice_w);
        self.carver.record(&points, self.slicing);
        let screen = project_slice(&points, &self.camera);
        log::trace!(
            "tick {}: slice at w={} has {} points",
            self.ticks,
            self.slice_w,
            points.len()
        );
        Frame::Slice { points, screen }
    }

    /// Carved path as OBJ vertex lines
    pub fn export_obj(&self) -> String {
        self.carver.to_obj()
    }
}
