//! Built-in 4D polytopes
//!
//! Vertex order is fixed per shape: edge lookups and cell ids key off the
//! vertex index, so the generators must stay deterministic.

use std::fmt;
use std::str::FromStr;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rotation::RotationState;

/// Edge connecting two vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge4D {
    pub v1: usize,
    pub v2: usize,
}

impl Edge4D {
    pub fn new(v1: usize, v2: usize) -> Self {
        Self { v1, v2 }
    }

    /// Orientation-independent identity of the edge
    pub fn key(&self) -> (usize, usize) {
        (self.v1.min(self.v2), self.v1.max(self.v2))
    }
}

/// The supported polytopes.
///
/// Config files and the CLI share one parser, so names are matched
/// case-insensitively in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Shape {
    /// Tesseract (hypercube)
    #[default]
    EightCell,
    /// Hexadecachoron (cross-polytope)
    SixteenCell,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::EightCell, Shape::SixteenCell];

    pub fn name(self) -> &'static str {
        match self {
            Shape::EightCell => "8-cell",
            Shape::SixteenCell => "16-cell",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "8-cell" | "tesseract" => Ok(Shape::EightCell),
            "16-cell" | "sixteen-cell" => Ok(Shape::SixteenCell),
            _ => Err(Error::UnknownShape(s.to_string())),
        }
    }
}

impl TryFrom<String> for Shape {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Shape> for String {
    fn from(shape: Shape) -> Self {
        shape.name().to_string()
    }
}

/// A 4D polytope: vertices plus the edges of its 1-skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct Polytope4D {
    pub shape: Shape,
    pub vertices: Vec<Vec4>,
    pub edges: Vec<Edge4D>,
}

impl Polytope4D {
    pub fn new(shape: Shape) -> Self {
        match shape {
            Shape::EightCell => Self::tesseract(),
            Shape::SixteenCell => Self::cell_16(),
        }
    }

    /// Create a tesseract (4D hypercube)
    pub fn tesseract() -> Self {
        let mut vertices = Vec::with_capacity(16);

        // Index bits are x=8, y=4, z=2, w=1; a set bit means +1.
        for &x in &[-1.0f32, 1.0] {
            for &y in &[-1.0f32, 1.0] {
                for &z in &[-1.0f32, 1.0] {
                    for &w in &[-1.0f32, 1.0] {
                        vertices.push(Vec4::new(x, y, z, w));
                    }
                }
            }
        }

        // 32 edges: sign vectors at Hamming distance 1
        let mut edges = Vec::with_capacity(32);
        for i in 0..16usize {
            for j in (i + 1)..16 {
                if (i ^ j).count_ones() == 1 {
                    edges.push(Edge4D::new(i, j));
                }
            }
        }

        Self {
            shape: Shape::EightCell,
            vertices,
            edges,
        }
    }

    /// Create a 16-cell (4D cross-polytope, dual of tesseract)
    pub fn cell_16() -> Self {
        let mut vertices = Vec::with_capacity(8);
        for axis in [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W] {
            vertices.push(axis);
            vertices.push(-axis);
        }

        // 24 edges: every pair except antipodes
        let mut edges = Vec::with_capacity(24);
        for i in 0..vertices.len() {
            for j in (i + 1)..vertices.len() {
                if vertices[i] != -vertices[j] {
                    edges.push(Edge4D::new(i, j));
                }
            }
        }

        Self {
            shape: Shape::SixteenCell,
            vertices,
            edges,
        }
    }

    pub fn name(&self) -> &'static str {
        self.shape.name()
    }

    /// Copy of this polytope with every vertex transformed by `rotation`
    pub fn rotated(&self, rotation: &RotationState) -> Self {
        Self {
            shape: self.shape,
            vertices: rotation.apply(&self.vertices),
            edges: self.edges.clone(),
        }
    }
}

/// Classify a vertex by the signs of its coordinates.
///
/// Non-negative coordinates count as 1. The W sign selects the upper bit and
/// the parity of the X, Y and Z signs the lower one.
pub fn cell_id(v: Vec4) -> u8 {
    let bit = |c: f32| u8::from(c >= 0.0);
    (bit(v.w) << 2) | (bit(v.x) ^ bit(v.y) ^ bit(v.z))
}
