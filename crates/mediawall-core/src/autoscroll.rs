//! Autoscroll frame driver
//!
//! Advances the scroll offset by elapsed wall time, not by a fixed per-tick
//! distance, so the perceived speed is independent of the frame rate. The
//! driver distinguishes a transient pause (hovering a tile) from being
//! stopped outright (selecting an item to view it).

use std::time::Instant;

/// Calibrates the speed multiplier to a comfortable pixels-per-millisecond
/// range: speed 1.0 moves 1px every 8ms.
const SPEED_DIVISOR: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct AutoscrollDriver {
    enabled: bool,
    paused: bool,
    speed: f64,
    last_frame: Option<Instant>,
}

impl Default for AutoscrollDriver {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AutoscrollDriver {
    pub fn new(speed: f64) -> Self {
        Self {
            enabled: false,
            paused: false,
            speed: speed.max(0.0),
            last_frame: None,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the next frame will actually move the viewport
    #[inline]
    pub fn is_scrolling(&self) -> bool {
        self.enabled && !self.paused
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// One-way stop for this interaction, e.g. the user selected an item.
    /// Unlike `pause`, scrolling stays off until explicitly re-enabled.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Transient suspension while hovering a tile
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance the frame clock and return the scroll delta for this frame.
    ///
    /// The clock advances even while paused or disabled so that re-enabling
    /// never applies the time spent idle as one large jump.
    pub fn frame(&mut self, now: Instant) -> f64 {
        let elapsed_ms = match self.last_frame {
            Some(last) => now.duration_since(last).as_secs_f64() * 1000.0,
            None => 0.0,
        };
        self.last_frame = Some(now);

        if self.enabled && !self.paused {
            self.speed * elapsed_ms / SPEED_DIVISOR
        } else {
            0.0
        }
    }

    /// Forget frame history. Called on unmount/remount so a fresh loop
    /// starts from the current offset with no carried momentum.
    pub fn reset_clock(&mut self) {
        self.last_frame = None;
    }
}
