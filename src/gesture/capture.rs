//! Scoped ownership of gesture input.
//!
//! While the editor is mounted it holds a [`CaptureGuard`]. Any host event loop asks
//! [`GestureCapture::suppresses_default`] whether the platform default (page scroll, browser
//! pinch-zoom, native gesture recognizers) must be prevented for an event. Dropping the guard
//! releases the capture, whatever path the teardown takes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::gesture::tracker::GestureEvent;

/// Where an input event was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSite {
    /// The drawing surface itself.
    Surface,
    /// Anywhere in the hosting document.
    Document,
}

/// Platform gesture-recognizer events that never reach the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeGesture {
    /// Recognizer began a pinch/rotate gesture.
    Start,
    /// Recognizer updated a pinch/rotate gesture.
    Change,
}

/// Shared capture registry. Cloning shares the same holder count.
#[derive(Clone, Debug, Default)]
pub struct GestureCapture {
    holders: Arc<AtomicUsize>,
}

impl GestureCapture {
    /// Create an idle registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of gesture input until the returned guard is dropped.
    pub fn acquire(&self) -> CaptureGuard {
        let prev = self.holders.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(holders = prev + 1, "gesture capture acquired");
        CaptureGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    /// `true` while at least one guard is alive.
    pub fn is_active(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }

    /// Whether the platform default action for `event` at `site` must be prevented.
    pub fn suppresses_default(&self, event: &GestureEvent, site: InputSite) -> bool {
        if !self.is_active() {
            return false;
        }
        match (site, event) {
            (InputSite::Surface, GestureEvent::Wheel { .. }) => true,
            (InputSite::Surface, GestureEvent::TouchStart { touches })
            | (InputSite::Surface, GestureEvent::TouchMove { touches })
            | (InputSite::Document, GestureEvent::TouchMove { touches }) => touches.len() > 1,
            _ => false,
        }
    }

    /// Whether a native gesture-recognizer event must be prevented.
    pub fn suppresses_native(&self, _gesture: NativeGesture) -> bool {
        self.is_active()
    }
}

/// Live capture. Releases on drop.
#[derive(Debug)]
#[must_use = "gesture capture is released as soon as the guard is dropped"]
pub struct CaptureGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        let prev = self.holders.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!(holders = prev.saturating_sub(1), "gesture capture released");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/capture.rs"]
mod tests;
