//! Hand tracker capability and the gesture-control lifecycle around it.
//!
//! The core never loads a detection backend itself. Frontends implement
//! [`HandTracker`] (a simulated mouse hand natively, a JS bridge on the web)
//! and hand it to [`GestureControl`], which turns the tracker's frame stream
//! into [`Session::on_hand_frame`] calls on the render thread.

use crate::gesture::HandFrame;
use crate::session::Session;
use std::sync::mpsc::{Receiver, TryRecvError};
use thiserror::Error;

/// One message per camera frame; `None` when no hand is visible.
pub type FrameStream = Receiver<Option<HandFrame>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("hand tracking library failed to load: {0}")]
    LibraryLoad(String),
    #[error("hand tracker is not ready")]
    NotReady,
}

#[allow(async_fn_in_trait)]
pub trait HandTracker {
    /// Resolves once the detection backend is loaded and the camera is open.
    async fn ready(&mut self) -> Result<(), TrackerError>;

    /// Begin pushing frames. Dropping the returned stream detaches the callback.
    fn start(&mut self) -> Result<FrameStream, TrackerError>;

    /// Stop pushing frames and release the capture device.
    fn stop(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackerStatus {
    #[default]
    Idle,
    Running,
    /// The backend failed to load; gesture control stays off for the session.
    Unavailable,
}

pub struct GestureControl<T: HandTracker> {
    tracker: T,
    frames: Option<FrameStream>,
    status: TrackerStatus,
}

impl<T: HandTracker> GestureControl<T> {
    pub fn new(tracker: T) -> Self {
        Self {
            tracker,
            frames: None,
            status: TrackerStatus::Idle,
        }
    }

    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    /// Wait for the tracker and start its frame stream.
    ///
    /// The caller enables gesture handling on the session once this returns
    /// `Ok`; on error the animation carries on without gestures.
    pub async fn enable(&mut self) -> Result<(), TrackerError> {
        match self.status {
            TrackerStatus::Running => return Ok(()),
            TrackerStatus::Unavailable => return Err(TrackerError::NotReady),
            TrackerStatus::Idle => {}
        }
        let started = match self.tracker.ready().await {
            Ok(()) => self.tracker.start(),
            Err(e) => Err(e),
        };
        match started {
            Ok(frames) => {
                self.frames = Some(frames);
                self.status = TrackerStatus::Running;
                log::info!("[tracker] running");
                Ok(())
            }
            Err(e) => {
                if matches!(e, TrackerError::LibraryLoad(_)) {
                    self.status = TrackerStatus::Unavailable;
                }
                log::error!("[tracker] {}", e);
                Err(e)
            }
        }
    }

    /// Drain pending frames and apply only the newest one.
    ///
    /// Returns how many frames were received. Never blocks.
    pub fn pump(&mut self, session: &mut Session) -> usize {
        let Some(frames) = &self.frames else {
            return 0;
        };
        let mut latest = None;
        let mut received = 0;
        let mut disconnected = false;
        loop {
            match frames.try_recv() {
                Ok(frame) => {
                    latest = Some(frame);
                    received += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if let Some(frame) = latest {
            session.on_hand_frame(frame.as_ref());
        }
        if disconnected {
            log::warn!("[tracker] frame stream closed");
            self.tracker.stop();
            self.frames = None;
            self.status = TrackerStatus::Idle;
            session.set_gesture_enabled(false);
        }
        received
    }

    /// Stop the tracker, detach its stream and send the cloud back to rest.
    pub fn disable(&mut self, session: &mut Session) {
        if self.status == TrackerStatus::Running {
            self.tracker.stop();
            self.status = TrackerStatus::Idle;
        }
        self.frames = None;
        session.set_gesture_enabled(false);
    }
}
