//! Dimensional key specs and the authorization step
//!
//! A key spec carries two independent plane sets:
//!
//! - `public_planes`: what intent inference may ever propose (the UI reveals
//!   the axis exists)
//! - `allowed`: what an intent may actually change in the rotation state
//!
//! A plane can be public without being allowed, and allowed without being
//! public. Authorization only ever consults `allowed`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::intent::RotationIntent;
use crate::rotation::{Plane, RotationState};

/// Compact set of rotation planes
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Plane>", into = "Vec<Plane>")]
pub struct PlaneSet(u8);

impl PlaneSet {
    pub const EMPTY: PlaneSet = PlaneSet(0);

    pub const fn of(planes: &[Plane]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < planes.len() {
            bits |= 1 << planes[i] as u8;
            i += 1;
        }
        PlaneSet(bits)
    }

    pub const fn contains(self, plane: Plane) -> bool {
        self.0 & (1 << plane as u8) != 0
    }

    pub fn insert(&mut self, plane: Plane) {
        self.0 |= 1 << plane as u8;
    }

    pub fn remove(&mut self, plane: Plane) {
        self.0 &= !(1 << plane as u8);
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in canonical plane order (XY, XZ, YZ, XW, YW, ZW)
    pub fn iter(self) -> impl Iterator<Item = Plane> {
        Plane::ALL.into_iter().filter(move |&p| self.contains(p))
    }

    /// Whether every member of `other` is also in `self`
    pub const fn is_superset(self, other: PlaneSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// The W planes in this set
    pub fn hidden(self) -> PlaneSet {
        PlaneSet(self.0 & PlaneSet::of(&Plane::HIDDEN).0)
    }
}

impl From<Vec<Plane>> for PlaneSet {
    fn from(planes: Vec<Plane>) -> Self {
        PlaneSet::of(&planes)
    }
}

impl From<PlaneSet> for Vec<Plane> {
    fn from(set: PlaneSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Plane> for PlaneSet {
    fn from_iter<I: IntoIterator<Item = Plane>>(iter: I) -> Self {
        let mut set = PlaneSet::EMPTY;
        for plane in iter {
            set.insert(plane);
        }
        set
    }
}

impl fmt::Debug for PlaneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// How the surrounding UI reacts to a denied intent.
///
/// The rotation state is left untouched in every mode; only the denial
/// feedback differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    Block,
    #[default]
    Clamp,
    Ghost,
}

fn default_true() -> bool {
    true
}

/// A dimensional key: which planes are visible and which are granted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionKeySpec {
    pub id: Cow<'static, str>,
    pub allowed: PlaneSet,
    pub public_planes: PlaneSet,
    #[serde(default)]
    pub lock_mode: LockMode,
    #[serde(default = "default_true")]
    pub conceal_hidden: bool,
}

const THREE_D: [Plane; 3] = [Plane::Xy, Plane::Xz, Plane::Yz];
const THREE_D_AND_XW: [Plane; 4] = [Plane::Xy, Plane::Xz, Plane::Yz, Plane::Xw];

/// Default training key: 3D planes granted, XW visible but locked
pub const NO_KEY: PermissionKeySpec = PermissionKeySpec {
    id: Cow::Borrowed("no-key-training"),
    allowed: PlaneSet::of(&THREE_D),
    public_planes: PlaneSet::of(&THREE_D_AND_XW),
    lock_mode: LockMode::Clamp,
    conceal_hidden: true,
};

/// Issued once the training credential is presented: XW unlocked
pub const TRAINING_W_ONLY: PermissionKeySpec = PermissionKeySpec {
    id: Cow::Borrowed("training-w-only"),
    allowed: PlaneSet::of(&THREE_D_AND_XW),
    public_planes: PlaneSet::of(&THREE_D_AND_XW),
    lock_mode: LockMode::Clamp,
    conceal_hidden: true,
};

/// Every plane granted, but only the training planes exposed
pub const INTERNAL_W_PLUS: PermissionKeySpec = PermissionKeySpec {
    id: Cow::Borrowed("internal-w-plus"),
    allowed: PlaneSet::of(&Plane::ALL),
    public_planes: PlaneSet::of(&THREE_D_AND_XW),
    lock_mode: LockMode::Clamp,
    conceal_hidden: true,
};

impl PermissionKeySpec {
    pub const BUILT_IN: [&'static PermissionKeySpec; 3] = [&NO_KEY, &TRAINING_W_ONLY, &INTERNAL_W_PLUS];

    /// Look up a built-in spec by id
    pub fn named(id: &str) -> Result<Self> {
        Self::BUILT_IN
            .into_iter()
            .find(|spec| spec.id == id)
            .cloned()
            .ok_or_else(|| Error::UnknownKeySpec(id.to_string()))
    }

    /// Parse and validate a spec from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: PermissionKeySpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidKeySpec("id must not be empty".into()));
        }
        Ok(())
    }

    pub fn allows(&self, plane: Plane) -> bool {
        self.allowed.contains(plane)
    }

    pub fn is_public(&self, plane: Plane) -> bool {
        self.public_planes.contains(plane)
    }
}

impl Default for PermissionKeySpec {
    fn default() -> Self {
        NO_KEY
    }
}

/// Outcome of authorizing one intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub plane: Plane,
    pub accepted: bool,
    /// Angle added to the rotation state (0 when denied)
    pub angle_applied: f32,
    /// Angle the intent asked for
    pub angle_requested: f32,
}

impl Decision {
    /// Whether the decision involves the hidden W axis
    pub fn hidden_axis(&self) -> bool {
        self.plane.is_hidden()
    }

    /// Capability identifier reported to telemetry
    pub fn capability_id(&self) -> String {
        format!("rotate_{}", self.plane)
    }

    pub fn result_label(&self) -> &'static str {
        if self.accepted {
            "allowed"
        } else {
            "denied"
        }
    }
}

/// Authorize a single intent, mutating `rotation` only when it is allowed
pub fn authorize(
    intent: RotationIntent,
    spec: &PermissionKeySpec,
    rotation: &mut RotationState,
) -> Decision {
    let accepted = spec.allows(intent.plane);
    if accepted {
        rotation.add(intent.plane, intent.angle);
    }
    let decision = Decision {
        plane: intent.plane,
        accepted,
        angle_applied: if accepted { intent.angle } else { 0.0 },
        angle_requested: intent.angle,
    };
    log::debug!(
        "telemetry plane={} cap_id={} result={} hidden_axis={} key={}",
        decision.plane,
        decision.capability_id(),
        decision.result_label(),
        decision.hidden_axis(),
        spec.id
    );
    decision
}

/// Authorize each intent independently, in order
pub fn authorize_all(
    intents: &[RotationIntent],
    spec: &PermissionKeySpec,
    rotation: &mut RotationState,
) -> Vec<Decision> {
    intents
        .iter()
        .map(|&intent| authorize(intent, spec, rotation))
        .collect()
}
