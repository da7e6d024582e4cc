//! Rotation in 4D
//!
//! In 4D there are six coordinate planes of rotation: XY, XZ, YZ, XW, YW, ZW.
//! Plane rotations do not commute, so every caller goes through
//! [`RotationState::rotate`], which applies them in [`ROTATION_ORDER`].

use std::fmt;
use std::str::FromStr;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A coordinate plane of rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plane {
    Xy,
    Xz,
    Yz,
    Xw,
    Yw,
    Zw,
}

/// Order in which plane rotations are composed: XY, YZ, XZ, XW, YW, ZW
pub const ROTATION_ORDER: [Plane; 6] = [
    Plane::Xy,
    Plane::Yz,
    Plane::Xz,
    Plane::Xw,
    Plane::Yw,
    Plane::Zw,
];

impl Plane {
    pub const ALL: [Plane; 6] = [
        Plane::Xy,
        Plane::Xz,
        Plane::Yz,
        Plane::Xw,
        Plane::Yw,
        Plane::Zw,
    ];

    /// Planes that rotate into the hidden W axis
    pub const HIDDEN: [Plane; 3] = [Plane::Xw, Plane::Yw, Plane::Zw];

    /// Vector component indices (x=0, y=1, z=2, w=3) spanned by the plane
    pub const fn axes(self) -> (usize, usize) {
        match self {
            Plane::Xy => (0, 1),
            Plane::Xz => (0, 2),
            Plane::Yz => (1, 2),
            Plane::Xw => (0, 3),
            Plane::Yw => (1, 3),
            Plane::Zw => (2, 3),
        }
    }

    /// Whether the plane involves the W axis
    pub const fn is_hidden(self) -> bool {
        matches!(self, Plane::Xw | Plane::Yw | Plane::Zw)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Plane::Xy => "XY",
            Plane::Xz => "XZ",
            Plane::Yz => "YZ",
            Plane::Xw => "XW",
            Plane::Yw => "YW",
            Plane::Zw => "ZW",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Plane {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Plane::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownPlane(s.to_string()))
    }
}

/// Angle (radians) for each of the six rotation planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    angles: [f32; 6],
}

impl RotationState {
    /// Initial tilt applied in the ZW plane
    pub const INITIAL_ZW: f32 = 0.5;

    /// All planes at zero
    pub fn identity() -> Self {
        Self { angles: [0.0; 6] }
    }

    pub fn angle(&self, plane: Plane) -> f32 {
        self.angles[plane.index()]
    }

    pub fn set(&mut self, plane: Plane, angle: f32) {
        self.angles[plane.index()] = angle;
    }

    /// Accumulate a rotation in one plane
    pub fn add(&mut self, plane: Plane, delta: f32) {
        self.angles[plane.index()] += delta;
    }

    /// Restore the initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply the compound rotation to a 4D point
    pub fn rotate(&self, p: Vec4) -> Vec4 {
        let mut result = p;
        for plane in ROTATION_ORDER {
            let angle = self.angle(plane);
            if angle == 0.0 {
                continue;
            }
            let (s, c) = angle.sin_cos();
            let (i, j) = plane.axes();
            let a = result[i];
            let b = result[j];
            result[i] = a * c - b * s;
            result[j] = a * s + b * c;
        }
        result
    }

    /// Rotate every vertex, leaving the input untouched
    pub fn apply(&self, vertices: &[Vec4]) -> Vec<Vec4> {
        vertices.iter().map(|&v| self.rotate(v)).collect()
    }
}

impl Default for RotationState {
    fn default() -> Self {
        let mut state = Self::identity();
        state.set(Plane::Zw, Self::INITIAL_ZW);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_only_tilts_zw() {
        let state = RotationState::default();
        for plane in Plane::ALL {
            let expected = if plane == Plane::Zw { 0.5 } else { 0.0 };
            assert_eq!(state.angle(plane), expected);
        }
    }

    #[test]
    fn reset_restores_default() {
        let mut state = RotationState::default();
        state.add(Plane::Xy, 1.0);
        state.add(Plane::Zw, -3.0);
        state.reset();
        assert_eq!(state, RotationState::default());
    }

    #[test]
    fn quarter_turns_move_axes() {
        let mut state = RotationState::identity();
        state.set(Plane::Xw, FRAC_PI_2);
        assert!(close(state.rotate(Vec4::X), Vec4::W));
        assert!(close(state.rotate(Vec4::W), -Vec4::X));
        assert!(close(state.rotate(Vec4::Y), Vec4::Y));
    }

    #[test]
    fn order_is_xy_then_yz() {
        // XY first sends X to Y, then YZ sends that Y to Z.
        let mut state = RotationState::identity();
        state.set(Plane::Xy, FRAC_PI_2);
        state.set(Plane::Yz, FRAC_PI_2);
        assert!(close(state.rotate(Vec4::X), Vec4::Z));
    }

    #[test]
    fn identity_is_exact() {
        let state = RotationState::identity();
        let p = Vec4::new(0.3, -1.25, 7.0, 2.5);
        assert_eq!(state.rotate(p), p);
    }

    #[test]
    fn parses_labels() {
        assert_eq!("xw".parse::<Plane>().unwrap(), Plane::Xw);
        assert_eq!("ZW".parse::<Plane>().unwrap(), Plane::Zw);
        assert!(matches!("XQ".parse::<Plane>(), Err(Error::UnknownPlane(_))));
        assert_eq!(Plane::Yw.to_string(), "YW");
    }

    #[test]
    fn hidden_planes_contain_w() {
        for plane in Plane::ALL {
            assert_eq!(plane.is_hidden(), plane.label().contains('W'));
        }
    }

    proptest! {
        #[test]
        fn rotation_preserves_length(
            angles in prop::array::uniform6(-6.3f32..6.3),
            p in prop::array::uniform4(-2.0f32..2.0),
        ) {
            let mut state = RotationState::identity();
            for (plane, angle) in Plane::ALL.into_iter().zip(angles) {
                state.set(plane, angle);
            }
            let v = Vec4::from_array(p);
            let r = state.rotate(v);
            prop_assert!((r.length() - v.length()).abs() < 1e-4);
            prop_assert_eq!(r, state.rotate(v));
        }
    }
}
