//! Mouse-driven stand-in for a camera hand tracker.
//!
//! The window feeds cursor and wheel input into a shared [`SimHand`]; a worker
//! thread samples it at camera rate and emits synthetic 21-landmark frames
//! over the same channel a real tracker would use.

use cloud_core::constants::{INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, THUMB_TIP, WRIST};
use cloud_core::{FrameStream, HandFrame, HandTracker, Landmark, TrackerError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const PALM_BASE: f32 = 0.15; // wrist to palm base, image units
const PINCH_MAX: f32 = 1.4;
const PINCH_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    /// Palm base in normalized image coordinates.
    pub palm: [f32; 2],
    /// Thumb-index gap over palm base length.
    pub pinch: f32,
    pub present: bool,
}

impl Default for SimHand {
    fn default() -> Self {
        Self {
            palm: [0.5, 0.5],
            pinch: 0.35,
            present: true,
        }
    }
}

impl SimHand {
    pub fn landmarks(&self) -> HandFrame {
        let [px, py] = self.palm;
        let gap = self.pinch * PALM_BASE;
        let mut lm = [Landmark::new(px, py, 0.0); LANDMARK_COUNT];
        lm[WRIST] = Landmark::new(px, py + PALM_BASE, 0.0);
        lm[MIDDLE_MCP] = Landmark::new(px, py, 0.0);
        lm[THUMB_TIP] = Landmark::new(px - gap * 0.5, py - 0.1, 0.0);
        lm[INDEX_TIP] = Landmark::new(px + gap * 0.5, py - 0.1, 0.0);
        HandFrame::new(lm)
    }
}

pub struct SimulatedTracker {
    hand: Arc<Mutex<SimHand>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedTracker {
    pub fn new() -> Self {
        Self {
            hand: Arc::new(Mutex::new(SimHand::default())),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    fn hand(&self) -> MutexGuard<'_, SimHand> {
        self.hand.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SimHand {
        *self.hand()
    }

    pub fn set_palm(&self, x: f32, y: f32) {
        self.hand().palm = [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)];
    }

    /// Positive `steps` open the pinch, negative close it.
    pub fn adjust_pinch(&self, steps: f32) {
        let mut hand = self.hand();
        hand.pinch = (hand.pinch + steps * PINCH_STEP).clamp(0.0, PINCH_MAX);
    }

    pub fn toggle_present(&self) -> bool {
        let mut hand = self.hand();
        hand.present = !hand.present;
        log::info!("[sim] hand {}", if hand.present { "shown" } else { "hidden" });
        hand.present
    }
}

impl Default for SimulatedTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HandTracker for SimulatedTracker {
    async fn ready(&mut self) -> Result<(), TrackerError> {
        Ok(())
    }

    fn start(&mut self) -> Result<FrameStream, TrackerError> {
        self.stop();
        self.stop.store(false, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel();
        let hand = Arc::clone(&self.hand);
        let stop = Arc::clone(&self.stop);
        let worker = thread::Builder::new()
            .name("sim-tracker".into())
            .spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    let sample = *hand.lock().unwrap_or_else(PoisonError::into_inner);
                    let frame = sample.present.then(|| sample.landmarks());
                    if tx.send(frame).is_err() {
                        break;
                    }
                    thread::sleep(FRAME_INTERVAL);
                }
            })
            .map_err(|e| TrackerError::LibraryLoad(e.to_string()))?;
        self.worker = Some(worker);
        Ok(rx)
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("[sim] tracker thread panicked");
            }
        }
    }
}

impl Drop for SimulatedTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
