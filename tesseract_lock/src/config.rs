//! Session configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::polytope::Shape;
use crate::security::PermissionKeySpec;

/// Startup settings for a [`crate::session::Session`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default)]
    pub shape: Shape,

    #[serde(default = "default_zoom")]
    pub zoom: f32,

    #[serde(default)]
    pub slice_w: f32,

    #[serde(default)]
    pub slicing: bool,

    /// Id of the built-in key spec active before any credential is presented
    #[serde(default = "default_key_spec")]
    pub key_spec: String,
}

fn default_zoom() -> f32 {
    1.0
}

fn default_key_spec() -> String {
    "no-key-training".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            zoom: default_zoom(),
            slice_w: 0.0,
            slicing: false,
            key_spec: default_key_spec(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(Error::InvalidConfig(format!("zoom must be positive, got {}", self.zoom)));
        }
        if !self.slice_w.is_finite() {
            return Err(Error::InvalidConfig(format!("sliceW must be finite, got {}", self.slice_w)));
        }
        self.initial_key_spec().map(|_| ())
    }

    /// Resolve the configured key spec id
    pub fn initial_key_spec(&self) -> Result<PermissionKeySpec> {
        PermissionKeySpec::named(&self.key_spec)
    }
}
