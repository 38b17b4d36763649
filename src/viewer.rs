//! Standalone window backed by winit.
//!
//! ```no_run
//! # use iris_world::viewer::Viewer;
//! Viewer::builder()
//!     .with_title("Iris")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::engine::WorldEngine;
use crate::error::WorldError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::ClearRenderer;
use crate::scene::rig::eye_rig;
use crate::util::frame_timing::FrameTiming;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "Iris World".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing the eye rig.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), WorldError> {
        let event_loop = EventLoop::new().map_err(|e| WorldError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            renderer: None,
            timing: FrameTiming::default(),
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| WorldError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<WorldEngine>,
    renderer: Option<ClearRenderer>,
    timing: FrameTiming,
    options: Options,
    title: String,
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    /// Update every subsystem, then draw once.
    fn redraw(&mut self) {
        let dt = self.timing.tick();
        let (Some(engine), Some(renderer)) = (&mut self.engine, &mut self.renderer) else {
            return;
        };
        match engine.frame(dt, renderer) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                if let Some(w) = &self.window {
                    let (vp_w, vp_h) = viewport_size(w.inner_size());
                    renderer.resize(vp_w, vp_h);
                }
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        if self.timing.frames() % 600 == 0 {
            log::debug!("{:.1} fps", self.timing.fps());
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let context = match pollster::block_on(RenderContext::new(window.clone(), size)) {
            Ok(context) => context,
            Err(e) => {
                log::error!("Failed to initialize GPU: {}", WorldError::from(e));
                event_loop.exit();
                return;
            }
        };

        self.renderer = Some(ClearRenderer::new(context));
        self.engine = Some(WorldEngine::new(eye_rig(), &self.options));
        self.timing = FrameTiming::default();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(engine) = &mut self.engine {
                engine.dispose();
            }
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (vp_w, vp_h) = viewport_size(size);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(vp_w, vp_h);
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key_str = format!("{code:?}");
                if let Some(engine) = &mut self.engine {
                    if !engine.handle_key(&key_str) {
                        log::trace!("key {key_str} had no effect");
                    }
                }
            }

            _ => (),
        }
    }
}
