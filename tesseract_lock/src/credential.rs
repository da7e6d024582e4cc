//! Credential intake and the key-acquisition lifecycle
//!
//! The verifier is a plain predicate over an opaque JSON payload. A positive
//! verdict moves the lifecycle from [`CredentialState::NoCredential`] to
//! [`CredentialState::Acquired`] exactly once, swapping the active key spec.
//! Everything else leaves the lifecycle untouched.

use serde_json::Value;

use crate::error::CredentialError;
use crate::security::{PermissionKeySpec, NO_KEY, TRAINING_W_ONLY};

/// Largest credential payload accepted, in bytes
pub const MAX_KEY_FILE_SIZE: usize = 64 * 1024;

/// Signature carried by the training key
pub const TRAINING_KEY_SIGNATURE: &str = "valid-training-key";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Decides whether a credential payload is genuine
pub trait CredentialVerifier {
    /// `Err` means the verifier itself failed; callers treat it as a denial
    fn verify(&self, payload: &Value) -> Result<bool, CredentialError>;
}

/// Accepts any JSON object whose `signature` is the training signature
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingKeyVerifier;

impl CredentialVerifier for TrainingKeyVerifier {
    fn verify(&self, payload: &Value) -> Result<bool, CredentialError> {
        Ok(verify_key(Some(payload)))
    }
}

/// Reference predicate. A missing payload never verifies.
pub fn verify_key(payload: Option<&Value>) -> bool {
    match payload {
        Some(Value::Object(map)) => {
            matches!(map.get("signature"), Some(Value::String(s)) if s == TRAINING_KEY_SIGNATURE)
        }
        _ => false,
    }
}

/// Check size and content type, then parse the raw key file.
///
/// An absent content type is accepted; the JSON parse decides.
pub fn parse_key_file(bytes: &[u8], content_type: Option<&str>) -> Result<Value, CredentialError> {
    if bytes.len() > MAX_KEY_FILE_SIZE {
        return Err(CredentialError::PayloadTooLarge {
            size: bytes.len(),
            max: MAX_KEY_FILE_SIZE,
        });
    }
    if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
        if ct != JSON_CONTENT_TYPE {
            return Err(CredentialError::UnsupportedContentType(ct.to_string()));
        }
    }
    serde_json::from_slice(bytes).map_err(|e| CredentialError::Malformed(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialState {
    #[default]
    NoCredential,
    Acquired,
}

/// Result of presenting a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// Credential accepted; the active spec was replaced
    Granted,
    /// A credential was already held; nothing changed
    AlreadyHeld,
    /// Verification failed; nothing changed
    Denied(Option<CredentialError>),
}

impl Acquisition {
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquisition::Granted)
    }
}

/// Two-state key lifecycle owning the active key spec
#[derive(Debug, Clone)]
pub struct CredentialLifecycle {
    state: CredentialState,
    active: PermissionKeySpec,
    granted: PermissionKeySpec,
}

impl CredentialLifecycle {
    /// Start on `initial`; a grant switches to `granted`.
    ///
    /// The transition is only armed when `granted` strictly widens the
    /// allowed planes of `initial`. Otherwise the lifecycle starts out
    /// acquired, so a valid credential can never narrow the active spec.
    pub fn new(initial: PermissionKeySpec, granted: PermissionKeySpec) -> Self {
        let widens = granted.allowed.is_superset(initial.allowed) && granted.allowed != initial.allowed;
        let state = if widens {
            CredentialState::NoCredential
        } else {
            log::debug!(
                "key spec {} is not narrower than {}, credential transition disarmed",
                initial.id,
                granted.id
            );
            CredentialState::Acquired
        };
        Self {
            state,
            active: initial,
            granted,
        }
    }

    pub fn state(&self) -> CredentialState {
        self.state
    }

    pub fn has_credential(&self) -> bool {
        self.state == CredentialState::Acquired
    }

    pub fn active_spec(&self) -> &PermissionKeySpec {
        &self.active
    }

    /// Present an already-parsed payload to `verifier`
    pub fn present<V: CredentialVerifier + ?Sized>(
        &mut self,
        verifier: &V,
        payload: Option<&Value>,
    ) -> Acquisition {
        if self.has_credential() {
            log::debug!("credential already held, ignoring");
            return Acquisition::AlreadyHeld;
        }
        let verdict = match payload {
            Some(p) => verifier.verify(p),
            None => Ok(false),
        };
        match verdict {
            Ok(true) => {
                self.grant();
                Acquisition::Granted
            }
            Ok(false) => {
                log::warn!("credential rejected: invalid key signature");
                Acquisition::Denied(None)
            }
            Err(e) => {
                log::warn!("credential rejected: {e}");
                Acquisition::Denied(Some(e))
            }
        }
    }

    /// Prevalidate and parse raw key-file bytes, then present them
    pub fn present_file<V: CredentialVerifier + ?Sized>(
        &mut self,
        verifier: &V,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Acquisition {
        if self.has_credential() {
            return Acquisition::AlreadyHeld;
        }
        match parse_key_file(bytes, content_type) {
            Ok(payload) => self.present(verifier, Some(&payload)),
            Err(e) => {
                log::warn!("key import failed: {e}");
                Acquisition::Denied(Some(e))
            }
        }
    }

    fn grant(&mut self) {
        log::info!("credential acquired: key spec {} -> {}", self.active.id, self.granted.id);
        self.active = self.granted.clone();
        self.state = CredentialState::Acquired;
    }
}

impl Default for CredentialLifecycle {
    fn default() -> Self {
        Self::new(NO_KEY, TRAINING_W_ONLY)
    }
}
