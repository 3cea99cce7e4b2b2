// Host-side tests for the session orchestration and gesture-control lifecycle.

use cloud_core::constants::*;
use cloud_core::{
    ConfigError, FrameStream, GestureControl, HandFrame, HandTracker, Landmark, Pattern,
    ParseColorError, Rgb, Session, SessionConfig, TrackerError, TrackerStatus,
};
use std::sync::mpsc::{channel, Sender};

fn session(count: usize) -> Session {
    let config = SessionConfig {
        particle_count: count,
        seed: Some(42),
        ..SessionConfig::default()
    };
    Session::new(config).unwrap()
}

/// Wide pinch with the palm at the image centre.
fn open_hand() -> HandFrame {
    let mut lm = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    lm[WRIST] = Landmark::new(0.5, 0.7, 0.0);
    lm[THUMB_TIP] = Landmark::new(0.4, 0.3, 0.0);
    lm[INDEX_TIP] = Landmark::new(0.64, 0.3, 0.0);
    HandFrame::new(lm)
}

fn hand_at(px: f32, py: f32) -> HandFrame {
    let mut lm = [Landmark::new(px, py, 0.0); LANDMARK_COUNT];
    lm[WRIST] = Landmark::new(px, py + 0.2, 0.0);
    lm[INDEX_TIP] = Landmark::new(px + 0.1, py, 0.0);
    HandFrame::new(lm)
}

#[test]
fn new_session_starts_as_scattered_sphere() {
    let s = session(500);
    assert_eq!(s.pattern(), Pattern::Sphere);
    assert_eq!(s.particle_count(), 500);
    assert!(!s.gesture_enabled());
    let f = s.frame();
    assert_eq!(f.positions.len(), 1500);
    assert_eq!(f.colors.len(), 1500);
    assert_eq!(f.sizes.len(), 500);
    assert_eq!(f.scale, 1.0);
    assert!(f.positions.iter().all(|v| v.abs() <= ENTRY_SCATTER));
}

#[test]
fn invalid_config_is_rejected() {
    let config = SessionConfig {
        particle_count: 0,
        ..SessionConfig::default()
    };
    assert!(matches!(Session::new(config), Err(ConfigError::NoParticles)));
}

#[test]
fn seeded_sessions_are_reproducible() {
    let mut a = session(200);
    let mut b = session(200);
    a.select_pattern(Pattern::Galaxy);
    b.select_pattern(Pattern::Galaxy);
    assert_eq!(a.engine().targets(), b.engine().targets());
    assert_eq!(a.frame().colors, b.frame().colors);
}

#[test]
fn selecting_a_pattern_retargets_and_tilts() {
    let mut s = session(300);
    s.select_pattern(Pattern::Torus);
    assert_eq!(s.pattern(), Pattern::Torus);
    assert!(s.frame().positions.iter().all(|v| v.abs() <= ENTRY_SCATTER));
    for _ in 0..600 {
        s.tick();
    }
    let tilt = s.engine().tilt();
    assert!((tilt[0] - TORUS_IDLE_TILT[0]).abs() < 1e-3);
    assert!((tilt[1] - TORUS_IDLE_TILT[1]).abs() < 1e-3);
    for (p, t) in s.engine().positions().iter().zip(s.engine().targets()) {
        assert!((p - t).abs() < 1e-3);
    }
}

#[test]
fn idle_tilt_yields_to_a_hand_and_returns_after_loss() {
    let mut s = session(50);
    s.select_pattern(Pattern::Torus);
    for _ in 0..600 {
        s.tick();
    }
    s.set_gesture_enabled(true);
    s.on_hand_frame(Some(&open_hand()));
    s.tick();
    let tilt = s.engine().tilt();
    assert!(tilt[0] > 0.5 * TORUS_IDLE_TILT[0], "tilt snapped to {:?}", tilt);
    for _ in 0..600 {
        s.on_hand_frame(Some(&open_hand()));
        s.tick();
    }
    let tilt = s.engine().tilt();
    assert!(tilt[0].abs() < 1e-3 && tilt[1].abs() < 1e-3, "{:?}", tilt);
    let rot = s.frame().rotation;
    assert!((rot[0] - s.state().rotation_x_current).abs() < 1e-3);

    s.on_hand_frame(None);
    for _ in 0..600 {
        s.tick();
    }
    let tilt = s.engine().tilt();
    assert!((tilt[0] - TORUS_IDLE_TILT[0]).abs() < 1e-3);
    assert!((tilt[1] - TORUS_IDLE_TILT[1]).abs() < 1e-3);
}

#[test]
fn tint_accepts_hex_and_reports_errors() {
    let mut s = session(10);
    assert_eq!(s.tint(), Rgb::WHITE);
    s.set_tint_hex("#ff0000").unwrap();
    assert_eq!(s.tint(), Rgb::new(1.0, 0.0, 0.0));
    s.set_tint_hex("0f0").unwrap();
    assert_eq!(s.frame().tint, Rgb::new(0.0, 1.0, 0.0));
    assert!(matches!(s.set_tint_hex("#12345"), Err(ParseColorError::Length(_))));
    assert!(matches!(s.set_tint_hex("#zzzzzz"), Err(ParseColorError::Digit(_))));
    // failed parses leave the tint alone
    assert_eq!(s.tint(), Rgb::new(0.0, 1.0, 0.0));
}

#[test]
fn frames_are_ignored_while_gestures_are_off() {
    let mut s = session(10);
    s.on_hand_frame(Some(&open_hand()));
    assert!(!s.state().hand_detected);
    assert_eq!(s.state().scale_target, REST_SCALE);

    s.set_gesture_enabled(true);
    s.on_hand_frame(Some(&open_hand()));
    assert!(s.state().hand_detected);
    assert!(s.state().scale_target > REST_SCALE);
}

#[test]
fn disabling_gestures_resets_targets() {
    let mut s = session(10);
    s.set_gesture_enabled(true);
    s.on_hand_frame(Some(&open_hand()));
    s.on_hand_frame(Some(&hand_at(0.9, 0.1)));
    for _ in 0..30 {
        s.tick();
    }
    s.set_gesture_enabled(false);
    let st = s.state();
    assert_eq!(st.scale_target, REST_SCALE);
    assert_eq!(st.rotation_x_target, 0.0);
    assert_eq!(st.rotation_y_target, 0.0);
    assert!(!st.hand_detected);
    assert!(st.scale_current > REST_SCALE);
}

#[test]
fn rotation_profile_switch_reaches_extractor() {
    let mut s = session(10);
    s.set_rotation_profile(cloud_core::RotationProfile::Asymmetric);
    assert_eq!(s.extractor().limits().max_rot_y, ASYMMETRIC_MAX_ROT_Y);
    assert_eq!(
        s.config().gesture.rotation,
        cloud_core::RotationProfile::Asymmetric
    );
}

/// Scripted tracker: `ready` replays a canned result, `start` hands out a
/// channel whose sender the test keeps.
struct ScriptedTracker {
    ready: Result<(), TrackerError>,
    sender: Option<Sender<Option<HandFrame>>>,
    stopped: bool,
}

impl ScriptedTracker {
    fn new(ready: Result<(), TrackerError>) -> Self {
        Self {
            ready,
            sender: None,
            stopped: false,
        }
    }

    fn send(&self, frame: Option<HandFrame>) {
        self.sender.as_ref().unwrap().send(frame).unwrap();
    }
}

impl HandTracker for ScriptedTracker {
    async fn ready(&mut self) -> Result<(), TrackerError> {
        self.ready.clone()
    }

    fn start(&mut self) -> Result<FrameStream, TrackerError> {
        let (tx, rx) = channel();
        self.sender = Some(tx);
        Ok(rx)
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.sender = None;
    }
}

#[test]
fn pump_applies_only_the_newest_frame() {
    let mut s = session(10);
    let mut control = GestureControl::new(ScriptedTracker::new(Ok(())));
    pollster::block_on(control.enable()).unwrap();
    s.set_gesture_enabled(true);
    assert_eq!(control.status(), TrackerStatus::Running);
    assert_eq!(control.pump(&mut s), 0);

    // acquisition frame, then two more; only the last should land
    control.tracker().send(Some(open_hand()));
    assert_eq!(control.pump(&mut s), 1);
    control.tracker().send(Some(hand_at(0.0, 0.5)));
    control.tracker().send(Some(hand_at(1.0, 0.5)));
    assert_eq!(control.pump(&mut s), 2);
    assert!(s.state().rotation_y_target > 0.0);
}

#[test]
fn empty_frame_releases_the_hand() {
    let mut s = session(10);
    let mut control = GestureControl::new(ScriptedTracker::new(Ok(())));
    pollster::block_on(control.enable()).unwrap();
    s.set_gesture_enabled(true);
    control.tracker().send(Some(open_hand()));
    control.pump(&mut s);
    assert!(s.state().hand_detected);

    control.tracker().send(None);
    control.pump(&mut s);
    assert!(!s.state().hand_detected);
    assert_eq!(s.state().scale_target, REST_SCALE);
}

#[test]
fn library_failure_marks_tracker_unavailable() {
    let mut control = GestureControl::new(ScriptedTracker::new(Err(TrackerError::LibraryLoad(
        "script blocked".into(),
    ))));
    let err = pollster::block_on(control.enable()).unwrap_err();
    assert!(matches!(err, TrackerError::LibraryLoad(_)));
    assert_eq!(control.status(), TrackerStatus::Unavailable);
    // later attempts fail fast without retrying the load
    assert_eq!(
        pollster::block_on(control.enable()),
        Err(TrackerError::NotReady)
    );
}

#[test]
fn not_ready_can_be_retried() {
    let mut control = GestureControl::new(ScriptedTracker::new(Err(TrackerError::NotReady)));
    assert!(pollster::block_on(control.enable()).is_err());
    assert_eq!(control.status(), TrackerStatus::Idle);
    control.tracker_mut().ready = Ok(());
    assert!(pollster::block_on(control.enable()).is_ok());
    assert_eq!(control.status(), TrackerStatus::Running);
}

#[test]
fn closed_stream_goes_idle_and_rests() {
    let mut s = session(10);
    let mut control = GestureControl::new(ScriptedTracker::new(Ok(())));
    pollster::block_on(control.enable()).unwrap();
    s.set_gesture_enabled(true);
    control.tracker().send(Some(open_hand()));
    control.tracker_mut().sender = None;
    assert_eq!(control.pump(&mut s), 1);
    assert_eq!(control.status(), TrackerStatus::Idle);
    assert!(!s.state().hand_detected);
    assert!(control.tracker().stopped);
    assert!(!s.gesture_enabled());
    assert_eq!(control.pump(&mut s), 0);
}

#[test]
fn disable_stops_tracker_and_session_gestures() {
    let mut s = session(10);
    let mut control = GestureControl::new(ScriptedTracker::new(Ok(())));
    pollster::block_on(control.enable()).unwrap();
    s.set_gesture_enabled(true);
    control.disable(&mut s);
    assert!(control.tracker().stopped);
    assert_eq!(control.status(), TrackerStatus::Idle);
    assert!(!s.gesture_enabled());
    assert_eq!(control.pump(&mut s), 0);
}
