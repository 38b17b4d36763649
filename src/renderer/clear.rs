use super::{FrameInputs, FrameRenderer};
use crate::gpu::render_context::RenderContext;
use crate::scene::SceneGraph;

/// wgpu renderer that clears the swapchain with the frame's clear colour.
///
/// The clear colour already carries exposure and tone mapping, so exposure
/// changes from themes, light presets or the bloom center are visible on
/// the next frame.
pub struct ClearRenderer {
    context: RenderContext,
}

impl ClearRenderer {
    /// Renderer presenting to `context`'s surface.
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    /// Reconfigure the surface for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// The GPU context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

impl FrameRenderer for ClearRenderer {
    type Error = wgpu::SurfaceError;

    fn render_frame(
        &mut self,
        inputs: &FrameInputs,
        _scene: &SceneGraph,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let [r, g, b] = inputs.clear_color;

        let mut encoder = self.context.create_encoder();
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        }
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}
