//! Common utilities for the tesseract viewer
//!
//! This crate provides the shared screen camera used to take scene points
//! from 3D camera space down to viewport coordinates.

pub mod camera;

pub use camera::*;
