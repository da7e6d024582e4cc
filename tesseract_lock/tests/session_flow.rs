//! End-to-end flow through the public session API: locked W rotation,
//! credential acquisition, unlocked rotation, then a carved slice sweep.

use glam::Vec3;
use serde_json::json;

use tesseract_lock::config::SessionConfig;
use tesseract_lock::credential::{Acquisition, CredentialState, TrainingKeyVerifier};
use tesseract_lock::intent::ROTATION_SENSITIVITY;
use tesseract_lock::polytope::{Polytope4D, Shape};
use tesseract_lock::rotation::{Plane, RotationState};
use tesseract_lock::slicing::slice_polytope;
use tesseract_lock::{Frame, Session};

fn default_session() -> Session {
    Session::new(&SessionConfig::default()).expect("default config is valid")
}

#[test]
fn training_walkthrough() {
    let mut session = default_session();

    // 1. plain 3D drag
    let decisions = session.drag(10.0, -10.0);
    let planes: Vec<Plane> = decisions.iter().map(|d| d.plane).collect();
    assert!(planes.contains(&Plane::Xy) && planes.contains(&Plane::Yz));
    assert!(decisions.iter().all(|d| d.accepted && !d.hidden_axis()));
    assert_eq!(session.rotation().angle(Plane::Xy), 10.0 * ROTATION_SENSITIVITY);

    // 2. W drag without a key: XW is visible but denied
    session.set_w_mode(true);
    let locked = *session.rotation();
    let decisions = session.drag(20.0, 5.0);
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].plane, Plane::Xw);
    assert!(!decisions[0].accepted);
    assert_eq!(decisions[0].result_label(), "denied");
    assert_eq!(*session.rotation(), locked);

    // 3. bad credentials change nothing
    for payload in [json!({ "signature": "invalid" }), json!({}), json!(null), json!("x"), json!(123)] {
        let outcome = session.present_credential(&TrainingKeyVerifier, Some(&payload));
        assert_eq!(outcome, Acquisition::Denied(None));
    }
    assert_eq!(session.present_credential(&TrainingKeyVerifier, None), Acquisition::Denied(None));
    assert_eq!(session.credential().state(), CredentialState::NoCredential);
    assert_eq!(*session.rotation(), locked);

    // 4. the training key
    let key = json!({ "signature": "valid-training-key" });
    assert_eq!(
        session.present_credential(&TrainingKeyVerifier, Some(&key)),
        Acquisition::Granted
    );
    assert_eq!(
        session.present_credential(&TrainingKeyVerifier, Some(&key)),
        Acquisition::AlreadyHeld
    );

    // 5. the same W drag now rotates
    let decisions = session.drag(20.0, 5.0);
    assert!(decisions[0].accepted);
    assert_eq!(decisions[0].result_label(), "allowed");
    let expected = (20.0f32).hypot(5.0) * ROTATION_SENSITIVITY;
    assert_eq!(session.rotation().angle(Plane::Xw), expected);

    // YW stays out of reach: never inferred, never applied
    for (dx, dy) in [(1.0, 30.0), (-4.0, -40.0)] {
        for d in session.drag(dx, dy) {
            assert_eq!(d.plane, Plane::Xw);
        }
    }
    assert_eq!(session.rotation().angle(Plane::Yw), 0.0);
}

#[test]
fn carved_sweep_matches_on_screen_slices() {
    let config = SessionConfig {
        shape: Shape::EightCell,
        slicing: true,
        ..SessionConfig::default()
    };
    let mut session = Session::new(&config).unwrap();
    session.drag(14.0, -6.0);
    session.start_carving();

    let mut shown: Vec<(f32, Vec<Vec3>)> = Vec::new();
    for step in 0..=40 {
        let w = -2.0 + 0.1 * step as f32;
        session.set_slice_w(w);
        match session.tick() {
            Frame::Slice { points, screen } => {
                assert_eq!(points.len(), screen.len());
                if !points.is_empty() {
                    shown.push((w, points));
                }
            }
            Frame::Wireframe(_) => panic!("slicing is on"),
        }
    }
    session.stop_carving();

    assert!(!shown.is_empty());
    let carved = session.carver().slices();
    assert_eq!(carved.len(), shown.len());

    // carving rotates through the same routine as the display
    let rotated = session.polytope().rotated(session.rotation());
    for ((w, points), slice) in shown.iter().zip(carved) {
        assert_eq!(points, slice);
        assert_eq!(&slice_polytope(&rotated, *w), slice);
    }

    let flat: Vec<Vec3> = shown.iter().flat_map(|(_, points)| points.iter().copied()).collect();
    assert_eq!(session.carver().export(), flat);
    let obj = session.export_obj();
    assert_eq!(obj.lines().count(), flat.len());
    assert!(obj.lines().all(|l| l.starts_with("v ") && l.split(' ').count() == 4));

    session.clear_carving();
    assert!(session.carver().is_empty());
    assert!(!session.carver().is_carving());
    assert!(session.is_slicing());
}

#[test]
fn internal_key_grants_hidden_planes_it_never_exposes() {
    let config = SessionConfig {
        key_spec: "internal-w-plus".into(),
        ..SessionConfig::default()
    };
    let mut session = Session::new(&config).unwrap();
    session.set_w_mode(true);
    // vertical drag: only XW is public, so it still collapses onto XW
    let decisions = session.drag(2.0, 40.0);
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].plane, Plane::Xw);
    assert!(decisions[0].accepted);
    assert_eq!(session.rotation().angle(Plane::Yw), 0.0);
    assert_eq!(session.rotation().angle(Plane::Zw), RotationState::INITIAL_ZW);

    // the training key never narrows a wider starting grant
    let key = json!({ "signature": "valid-training-key" });
    assert_eq!(
        session.present_credential(&TrainingKeyVerifier, Some(&key)),
        Acquisition::AlreadyHeld
    );
    assert_eq!(session.key_spec().id, "internal-w-plus");
    assert!(session.key_spec().allows(Plane::Zw));
    assert!(session.key_spec().allows(Plane::Yw));
}

#[test]
fn unknown_names_fail_fast() {
    assert!("24-cell".parse::<Shape>().unwrap_err().is_configuration());
    let config = SessionConfig {
        key_spec: "root".into(),
        ..SessionConfig::default()
    };
    let err = Session::new(&config).err().expect("unknown key spec");
    assert!(err.is_configuration());
}

#[test]
fn closed_form_counts() {
    for shape in Shape::ALL {
        let p = Polytope4D::new(shape);
        let (v, e) = match shape {
            Shape::EightCell => (16, 32),
            Shape::SixteenCell => (8, 24),
        };
        assert_eq!(p.vertices.len(), v);
        assert_eq!(p.edges.len(), e);
    }
}
