//! Shared utilities: easing curves, frame timing and colour helpers.

/// Packed-hex and linear RGB colour helpers.
pub mod color;
/// Easing curves for weight and exposure ramps.
pub mod easing;
/// Wall-clock frame delta measurement.
pub mod frame_timing;
