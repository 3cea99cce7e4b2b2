use crate::bridge;
use crate::dom;
use crate::tracker::JsTracker;
use cloud_core::{GestureControl, RotationProfile, Session, SessionConfig, TrackerStatus};
use js_sys::{Function, Promise};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

const UNAVAILABLE_NOTICE: &str =
    "Hand tracking could not be loaded. The animation keeps running without gesture control.";

struct Inner {
    session: Session,
    control: Option<GestureControl<JsTracker>>,
}

fn js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

/// Point-cloud session driven from JS.
///
/// JS owns the render loop: call `tick()` once per animation frame, then read
/// `positions()`, `rotation()` and `scale()` into its own scene.
#[wasm_bindgen]
pub struct ParticleCloud {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl ParticleCloud {
    #[wasm_bindgen(constructor)]
    pub fn new(particle_count: Option<u32>) -> Result<ParticleCloud, JsValue> {
        let mut config = SessionConfig::default();
        if let Some(n) = particle_count {
            config.particle_count = n as usize;
        }
        let session = Session::new(config).map_err(|e| js_err(e.into()))?;
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                session,
                control: None,
            })),
        })
    }

    /// Apply the newest tracker frame, then advance one smoothing step.
    pub fn tick(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if let Some(control) = inner.control.as_mut() {
            control.pump(&mut inner.session);
        }
        inner.session.tick();
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.inner.borrow().session.particle_count() as u32
    }

    pub fn positions(&self) -> Vec<f32> {
        self.inner.borrow().session.frame().positions.to_vec()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.inner.borrow().session.frame().colors.to_vec()
    }

    pub fn sizes(&self) -> Vec<f32> {
        self.inner.borrow().session.frame().sizes.to_vec()
    }

    /// Cloud rotation as `[x, y, z]` Euler angles.
    pub fn rotation(&self) -> Vec<f32> {
        self.inner.borrow().session.frame().rotation.to_vec()
    }

    pub fn tint(&self) -> Vec<f32> {
        self.inner.borrow().session.tint().to_array().to_vec()
    }

    pub fn scale(&self) -> f32 {
        self.inner.borrow().session.state().scale_current
    }

    #[wasm_bindgen(js_name = patternName)]
    pub fn pattern_name(&self) -> String {
        self.inner.borrow().session.pattern().name().to_string()
    }

    #[wasm_bindgen(js_name = gestureEnabled)]
    pub fn gesture_enabled(&self) -> bool {
        self.inner.borrow().session.gesture_enabled()
    }

    #[wasm_bindgen(js_name = selectPattern)]
    pub fn select_pattern(&self, name: &str) -> Result<(), JsValue> {
        let pattern = bridge::parse_pattern(name).map_err(js_err)?;
        self.inner.borrow_mut().session.select_pattern(pattern);
        Ok(())
    }

    /// `points` holds interleaved `x, y` pixel coordinates of the drawing.
    #[wasm_bindgen(js_name = setCustomPoints)]
    pub fn set_custom_points(&self, width: u32, height: u32, points: &[u32]) -> Result<(), JsValue> {
        let sample = bridge::decode_points(width, height, points).map_err(js_err)?;
        self.inner.borrow_mut().session.select_custom(&sample);
        Ok(())
    }

    #[wasm_bindgen(js_name = setCustomImage)]
    pub fn set_custom_image(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
        step: u32,
    ) -> Result<(), JsValue> {
        let sample = bridge::decode_image(width, height, rgba, step).map_err(js_err)?;
        self.inner.borrow_mut().session.select_custom(&sample);
        Ok(())
    }

    #[wasm_bindgen(js_name = setTint)]
    pub fn set_tint(&self, hex: &str) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .session
            .set_tint_hex(hex)
            .map_err(|e| js_err(e.into()))
    }

    #[wasm_bindgen(js_name = setAsymmetricRotation)]
    pub fn set_asymmetric_rotation(&self, asymmetric: bool) {
        let profile = if asymmetric {
            RotationProfile::Asymmetric
        } else {
            RotationProfile::Symmetric
        };
        self.inner.borrow_mut().session.set_rotation_profile(profile);
    }

    /// Hand the session a JS tracker. `ready` resolves when the detection
    /// library and camera are up; `on_stop` is called on detach.
    ///
    /// The returned promise rejects if the tracker never becomes ready; the
    /// animation keeps running either way.
    #[wasm_bindgen(js_name = attachTracker)]
    pub fn attach_tracker(&self, ready: Promise, on_stop: Option<Function>) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let previous = inner.borrow_mut().control.take();
            if let Some(mut old) = previous {
                old.disable(&mut inner.borrow_mut().session);
            }

            // No RefCell borrow is held across this await.
            let mut control = GestureControl::new(JsTracker::new(ready, on_stop));
            let result = control.enable().await;

            let mut guard = inner.borrow_mut();
            match result {
                Ok(()) => {
                    dom::hide_notice();
                    guard.session.set_gesture_enabled(true);
                    guard.control = Some(control);
                    Ok(JsValue::TRUE)
                }
                Err(e) => {
                    if control.status() == TrackerStatus::Unavailable {
                        if let Err(err) = dom::show_notice(UNAVAILABLE_NOTICE) {
                            log::error!("could not show notice: {:?}", err);
                        }
                    }
                    Err(JsValue::from_str(&e.to_string()))
                }
            }
        })
    }

    /// Stop the tracker and let the cloud settle back to rest.
    #[wasm_bindgen(js_name = detachTracker)]
    pub fn detach_tracker(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        match inner.control.take() {
            Some(mut control) => control.disable(&mut inner.session),
            None => inner.session.set_gesture_enabled(false),
        }
    }

    /// Landmarks for one camera frame: 63 floats, or empty for no hand.
    #[wasm_bindgen(js_name = pushLandmarks)]
    pub fn push_landmarks(&self, data: &[f32]) -> Result<(), JsValue> {
        let frame = bridge::decode_landmarks(data).map_err(|e| {
            log::warn!("[tracker] {:#}", e);
            js_err(e)
        })?;
        if let Some(control) = self.inner.borrow().control.as_ref() {
            control.tracker().push(frame);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = pushNoHand)]
    pub fn push_no_hand(&self) {
        if let Some(control) = self.inner.borrow().control.as_ref() {
            control.tracker().push(None);
        }
    }
}
