//! Scene rasterization.

/// Rendered frame type.
pub mod backend;
/// `vello_cpu` compositor.
pub mod cpu;
/// Avatar fit geometry.
pub mod fit;
