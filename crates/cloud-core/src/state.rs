//! Gesture channels shared by the tracker callback and the render tick.
//!
//! One `GestureState` lives for the whole session and is passed by `&mut` to
//! both sides; nothing holds it across calls, so no locking is involved.
//!
//! * Producer: [`GestureExtractor`](crate::GestureExtractor) writes the
//!   `*_target` fields, `hand_detected` and `rotation_alpha` once per camera
//!   frame. It reads the rotation currents only on hand acquisition.
//! * Consumer: [`SmoothingEngine`](crate::SmoothingEngine) reads the targets
//!   and writes the `*_current` fields and `auto_rotation_angle` once per
//!   render tick.
//!
//! Writes are last-writer-wins; a camera frame that arrives between two ticks
//! simply replaces the targets the next tick will chase.

#[derive(Clone, Debug, PartialEq)]
pub struct GestureState {
    pub scale_target: f32,
    pub scale_current: f32,
    pub rotation_x_target: f32,
    pub rotation_x_current: f32,
    pub rotation_y_target: f32,
    pub rotation_y_current: f32,
    pub hand_detected: bool,
    /// Idle spin around the vertical axis, kept in `[0, 2π)`.
    pub auto_rotation_angle: f32,
    /// Smoothing factor the engine applies to the rotation channels.
    pub rotation_alpha: f32,
}

impl GestureState {
    pub fn new(rest_scale: f32, rotation_alpha: f32) -> Self {
        Self {
            scale_target: rest_scale,
            scale_current: rest_scale,
            rotation_x_target: 0.0,
            rotation_x_current: 0.0,
            rotation_y_target: 0.0,
            rotation_y_current: 0.0,
            hand_detected: false,
            auto_rotation_angle: 0.0,
            rotation_alpha,
        }
    }

    /// Point every target at its rest value; currents are left to settle.
    pub fn reset_targets(&mut self, rest_scale: f32) {
        self.scale_target = rest_scale;
        self.rotation_x_target = 0.0;
        self.rotation_y_target = 0.0;
        self.hand_detected = false;
    }
}
