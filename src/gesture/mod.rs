//! Pointer, touch and wheel input.

/// Scoped suppression of platform gesture handling.
pub mod capture;
/// Event-to-transform tracking.
pub mod tracker;
