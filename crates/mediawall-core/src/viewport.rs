//! Viewport virtualization
//!
//! Selects the subset of laid-out tiles worth keeping mounted, with a
//! generous spatial buffer so fast scrolling never outruns rendering.
//! Recomputes are throttled to a fixed cadence independent of how often the
//! scroll offset changes; between ticks only the newest offset is kept.

use std::time::{Duration, Instant};

use crate::layout::{Layout, Position};

/// Height of the load-more sentinel strip at the tail of the content
const SENTINEL_HEIGHT: f64 = 160.0;
/// How far above the end of content the sentinel is anchored
const SENTINEL_OFFSET: f64 = 100.0;

/// Indices of positions intersecting the buffered viewport window
pub fn visible_indices(
    positions: &[Position],
    scroll_top: f64,
    viewport_height: f64,
    buffer: f64,
) -> Vec<usize> {
    let min = scroll_top - buffer;
    let max = scroll_top + viewport_height + buffer;

    positions
        .iter()
        .enumerate()
        .filter(|(_, pos)| pos.top + pos.height > min && pos.top < max)
        .map(|(i, _)| i)
        .collect()
}

/// Whether the load-more sentinel intersects the buffered window.
///
/// The sentinel is a fixed strip anchored just above the end of content; it
/// owns no state of its own, the caller decides whether a fetch is due.
pub fn sentinel_visible(
    total_height: f64,
    scroll_top: f64,
    viewport_height: f64,
    buffer: f64,
) -> bool {
    let top = (total_height - SENTINEL_OFFSET).max(0.0);
    top + SENTINEL_HEIGHT > scroll_top - buffer && top < scroll_top + viewport_height + buffer
}

/// Throttled visible-set tracker.
///
/// `set_scroll` may be called on every scroll event; `update` recomputes at
/// most once per configured interval using the most recent offset.
#[derive(Debug)]
pub struct ViewportTracker {
    scroll_top: f64,
    viewport_height: f64,
    buffer: f64,
    interval: Duration,
    last_update: Option<Instant>,
    visible: Vec<usize>,
    dirty: bool,
}

impl ViewportTracker {
    pub fn new(viewport_height: f64, buffer: f64, interval: Duration) -> Self {
        Self {
            scroll_top: 0.0,
            viewport_height,
            buffer,
            interval,
            last_update: None,
            visible: Vec::new(),
            dirty: true,
        }
    }

    /// Record the newest scroll offset without recomputing
    pub fn set_scroll(&mut self, scroll_top: f64) {
        if scroll_top != self.scroll_top {
            self.scroll_top = scroll_top;
            self.dirty = true;
        }
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Resize the viewport; forces a recompute on the next tick
    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        if viewport_height != self.viewport_height {
            self.viewport_height = viewport_height;
            self.dirty = true;
        }
    }

    /// The item list changed out from under us; drop the throttle window so
    /// the next `update` recomputes immediately.
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.last_update = None;
    }

    /// Recompute the visible set if the cadence allows, returning it either way
    pub fn update(&mut self, layout: &Layout, now: Instant) -> &[usize] {
        let due = match self.last_update {
            Some(last) => now.duration_since(last) >= self.interval,
            None => true,
        };

        if self.dirty && due {
            self.visible = visible_indices(
                &layout.positions,
                self.scroll_top,
                self.viewport_height,
                self.buffer,
            );
            self.last_update = Some(now);
            self.dirty = false;
        }

        &self.visible
    }

    /// Most recently computed visible set
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Sentinel check against the current offset (not throttled; it is a
    /// single comparison)
    pub fn near_tail(&self, total_height: f64) -> bool {
        sentinel_visible(
            total_height,
            self.scroll_top,
            self.viewport_height,
            self.buffer,
        )
    }
}
