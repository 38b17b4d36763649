use std::convert::Infallible;

use super::{FrameInputs, FrameRenderer};
use crate::scene::SceneGraph;

/// Renderer that records every frame's inputs instead of drawing.
#[derive(Debug, Default, Clone)]
pub struct HeadlessRenderer {
    frames: Vec<FrameInputs>,
    max_frames: Option<usize>,
}

impl HeadlessRenderer {
    /// Keep only the latest `max_frames` frames.
    #[must_use]
    pub fn with_capacity_limit(max_frames: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_frames: Some(max_frames.max(1)),
        }
    }

    /// Recorded frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[FrameInputs] {
        &self.frames
    }

    /// Most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&FrameInputs> {
        self.frames.last()
    }
}

impl FrameRenderer for HeadlessRenderer {
    type Error = Infallible;

    fn render_frame(&mut self, inputs: &FrameInputs, scene: &SceneGraph) -> Result<(), Infallible> {
        log::trace!(
            "headless frame {}: {} nodes, exposure {:.3}",
            inputs.frame_index,
            scene.len(),
            inputs.exposure
        );
        self.frames.push(*inputs);
        if let Some(max) = self.max_frames {
            if self.frames.len() > max {
                let excess = self.frames.len() - max;
                let _ = self.frames.drain(..excess);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WorldEngine;
    use crate::options::Options;
    use crate::scene::rig::eye_rig;

    #[test]
    fn capacity_limit_keeps_latest() {
        let mut engine = WorldEngine::new(eye_rig(), &Options::default());
        let mut renderer = HeadlessRenderer::with_capacity_limit(2);
        for _ in 0..5 {
            engine.frame(0.016, &mut renderer).unwrap();
        }
        assert_eq!(renderer.frames().len(), 2);
        assert_eq!(renderer.last().unwrap().frame_index, 4);
    }

    #[test]
    fn frames_carry_current_exposure() {
        let mut engine = WorldEngine::new(eye_rig(), &Options::default());
        let mut renderer = HeadlessRenderer::default();
        let _ = engine.execute(crate::engine::WorldCommand::SetExposure(0.5));
        engine.frame(0.016, &mut renderer).unwrap();
        let frame = renderer.last().unwrap();
        assert_eq!(frame.exposure, 0.5);
        assert_eq!(frame.bloom.exposure, 0.5);
    }
}
