//! Haptic feedback collaborators

use std::time::Duration;

/// Pulse length when a task is added
pub const ADD_PULSE: Duration = Duration::from_millis(400);

/// Pulse length when a task is checked or unchecked
pub const TOGGLE_PULSE: Duration = Duration::from_millis(200);

/// Best-effort vibration device
pub trait Haptics: Send + Sync {
    fn vibrate(&self, duration: Duration);
}

/// Haptics that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&self, _duration: Duration) {}
}

/// Haptics that only log each pulse
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHaptics;

impl Haptics for TracingHaptics {
    fn vibrate(&self, duration: Duration) {
        tracing::debug!(?duration, "vibrate");
    }
}
