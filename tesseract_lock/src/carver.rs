//! Path carving: accumulate slices over time into a 3D point-cloud object

use glam::Vec3;

/// Ordered record of carved slices
#[derive(Debug, Clone, Default)]
pub struct PathCarver {
    carving: bool,
    slices: Vec<Vec<Vec3>>,
}

impl PathCarver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new carve, discarding any previous path
    pub fn start(&mut self) {
        self.slices.clear();
        self.carving = true;
        log::info!("carving started");
    }

    /// Stop carving; the accumulated path is kept
    pub fn stop(&mut self) {
        self.carving = false;
        log::info!("carving stopped with {} slices", self.slices.len());
    }

    /// Drop the accumulated path without changing the carving flag
    pub fn clear(&mut self) {
        self.slices.clear();
        log::info!("carved path cleared");
    }

    pub fn is_carving(&self) -> bool {
        self.carving
    }

    /// Offer one tick's slice.
    ///
    /// Appended only while carving and slicing are both active and the slice
    /// is non-empty. Returns whether it was kept.
    pub fn record(&mut self, slice: &[Vec3], slicing: bool) -> bool {
        if !(self.carving && slicing) || slice.is_empty() {
            return false;
        }
        self.slices.push(slice.to_vec());
        log::trace!("carved slice {} ({} points)", self.slices.len(), slice.len());
        true
    }

    pub fn slices(&self) -> &[Vec<Vec3>] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// All carved points, slice by slice, in recorded order
    pub fn export(&self) -> Vec<Vec3> {
        self.slices.iter().flatten().copied().collect()
    }

    /// Vertices-only OBJ text: one `v x y z` line per point, 4 decimals
    pub fn to_obj(&self) -> String {
        self.export()
            .iter()
            .map(|p| format!("v {:.4} {:.4} {:.4}", p.x, p.y, p.z))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
