use cloud_core::{FrameStream, HandFrame, HandTracker, TrackerError};
use js_sys::{Function, Promise};
use std::sync::mpsc::{channel, Sender};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Hand tracker running in JS (detection library plus camera).
///
/// JS resolves `ready` once the library has loaded and the camera is open,
/// then pushes each frame's landmarks through [`JsTracker::push`].
pub struct JsTracker {
    ready: Option<Promise>,
    on_stop: Option<Function>,
    sender: Option<Sender<Option<HandFrame>>>,
}

impl JsTracker {
    pub fn new(ready: Promise, on_stop: Option<Function>) -> Self {
        Self {
            ready: Some(ready),
            on_stop,
            sender: None,
        }
    }

    pub fn push(&self, frame: Option<HandFrame>) {
        match &self.sender {
            Some(tx) => {
                if tx.send(frame).is_err() {
                    log::debug!("[tracker] frame dropped, stream detached");
                }
            }
            None => log::debug!("[tracker] frame before start, ignored"),
        }
    }
}

impl HandTracker for JsTracker {
    async fn ready(&mut self) -> Result<(), TrackerError> {
        let promise = self.ready.take().ok_or(TrackerError::NotReady)?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| TrackerError::LibraryLoad(describe(&e)))
    }

    fn start(&mut self) -> Result<FrameStream, TrackerError> {
        let (tx, rx) = channel();
        self.sender = Some(tx);
        Ok(rx)
    }

    fn stop(&mut self) {
        self.sender = None;
        if let Some(f) = &self.on_stop {
            if let Err(e) = f.call0(&JsValue::NULL) {
                log::warn!("[tracker] stop callback failed: {}", describe(&e));
            }
        }
    }
}

fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
