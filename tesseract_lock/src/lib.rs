//! Dimensional Lock: 4D Polytope Viewer Core
//!
//! Rotates 4D polytopes, projects them down to the screen and slices them
//! with a moving hyperplane. Rotation into the hidden W axis is gated by a
//! dimensional key:
//!
//! - **Polytopes**: the 8-cell (tesseract) and 16-cell
//! - **Rotation**: six-plane rotation state, applied in one fixed order
//! - **Projection**: 4D → 3D perspective on W, then camera projection to 2D
//! - **Slicing & carving**: hyperplane cross-sections accumulated over time
//! - **Access control**: drag → intent inference → authorization against
//!   the active key spec, plus the credential lifecycle that upgrades it

pub mod error;
pub mod rotation;
pub mod polytope;
pub mod projection;
pub mod slicing;
pub mod intent;
pub mod security;
pub mod credential;
pub mod carver;
pub mod config;
pub mod session;

pub use error::{CredentialError, Error, Result};
pub use session::{Frame, Session};

/// Scene constants for the projection pipeline
pub mod constants {
    /// Distance of the 4D eye from the origin along W
    pub const W_CAMERA_DISTANCE: f32 = 4.0;

    /// World units per model unit
    pub const SCENE_SCALE: f32 = 120.0;
}
