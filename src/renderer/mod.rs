//! Render-one-frame seam.
//!
//! The engine never talks to a GPU directly. Each frame it gathers a
//! [`FrameInputs`] (exposure read fresh from the authority, bloom pass
//! parameters, lights) and hands it with the scene to a [`FrameRenderer`].

mod headless;

#[cfg(feature = "viewer")]
mod clear;

#[cfg(feature = "viewer")]
pub use clear::ClearRenderer;
pub use headless::HeadlessRenderer;

use crate::bloom::engine::BloomFrameParams;
use crate::lighting::{SceneLights, ToneMapping};
use crate::scene::SceneGraph;
use crate::util::color::Rgb;

/// Per-frame values consumed by a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Index of the frame being rendered.
    pub frame_index: u64,
    /// Clear colour after exposure and tone mapping.
    pub clear_color: Rgb,
    /// Exposure at the time of the frame.
    pub exposure: f32,
    /// Tone-mapping operator.
    pub tone_mapping: ToneMapping,
    /// Ambient and key light.
    pub lights: SceneLights,
    /// Bloom pass parameters.
    pub bloom: BloomFrameParams,
    /// Meshes with a non-black emissive contribution.
    pub glowing_materials: usize,
}

/// Draws one frame.
pub trait FrameRenderer {
    /// Failure to produce the frame.
    type Error;

    /// Draw `scene` with `inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the frame could not be drawn.
    fn render_frame(&mut self, inputs: &FrameInputs, scene: &SceneGraph) -> Result<(), Self::Error>;
}
