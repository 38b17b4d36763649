//! The world orchestrator.
//!
//! [`WorldEngine`] owns the scene and every subsystem that mutates it. The
//! frame contract is update-all-then-render-once: [`WorldEngine::update`]
//! advances animation, themes, the bloom pulse, the eye spin and the ring
//! reveal by the same `dt`, then [`WorldEngine::render`] hands one [`FrameInputs`] to a
//! [`FrameRenderer`].
//!
//! Ownership of shared state is fixed at construction:
//! - materials of classified meshes are written by the bloom coordination
//!   center only; the ring reveal writes node visibility, never materials;
//! - exposure has one writer handle, cloned into the theme animator, the
//!   light presets and the bloom center; everything else reads it.

mod command;
mod dispatch;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub use command::{KeyCommand, WorldCommand};

use crate::animation::AnimationTransitionController;
use crate::bloom::{BloomCoordinationCenter, BloomPreset, ObjectCategory, PostProcessBloom};
use crate::environment::ThemeAnimator;
use crate::exposure::{ExposureAuthority, ExposureReader};
use crate::eye::EyeRingRotation;
use crate::lighting::PbrPresetController;
use crate::options::{BackgroundOptions, KeybindingOptions, Options};
use crate::renderer::{FrameInputs, FrameRenderer};
use crate::reveal::RingReveal;
use crate::scene::rig::Rig;
use crate::scene::SceneGraph;
use crate::util::color::{scale, BLACK};

/// Owns the scene and drives every subsystem.
pub struct WorldEngine {
    scene: SceneGraph,
    animation: AnimationTransitionController,
    bloom_center: BloomCoordinationCenter,
    bloom: Rc<RefCell<PostProcessBloom>>,
    bloom_preset: BloomPreset,
    exposure: ExposureAuthority,
    themes: ThemeAnimator,
    lighting: PbrPresetController,
    eye: EyeRingRotation,
    reveal: RingReveal,
    background: BackgroundOptions,
    keybindings: KeybindingOptions,
    frame_index: u64,
}

impl std::fmt::Debug for WorldEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldEngine")
            .field("nodes", &self.scene.len())
            .field("animation", &self.animation.state())
            .field("security_state", &self.bloom_center.security_state())
            .field("exposure", &self.exposure.get_exposure())
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl WorldEngine {
    /// Wire every subsystem around `rig`.
    ///
    /// Meshes are classified and set to their category base materials, the
    /// configured security state is applied, the bloom engine is connected
    /// and synced, permanent actions fade in and the initial light preset is
    /// applied.
    #[must_use]
    pub fn new(rig: Rig, options: &Options) -> Self {
        let Rig { mut scene, clips } = rig;
        let exposure = ExposureAuthority::default();

        let bloom = Rc::new(RefCell::new(PostProcessBloom::new(options.bloom, exposure.reader())));
        let mut bloom_center = BloomCoordinationCenter::new(
            &options.materials,
            options.classification.classifier(),
            exposure.clone(),
        );
        let registered = bloom_center.register_all_objects(&scene);
        let _ = bloom_center.apply_defaults(&mut scene);
        bloom_center.set_security_state(options.materials.initial_state, &mut scene);
        let shared = Rc::clone(&bloom);
        bloom_center.connect_engine(shared);
        let _ = bloom_center.sync_objects();

        let mut animation = AnimationTransitionController::new(&clips, &options.animation);
        let started = animation.start_permanent_animations();

        let mut lighting = PbrPresetController::new(&options.lighting, exposure.clone());
        lighting.apply_preset(options.lighting.initial_preset);
        let themes = ThemeAnimator::new(&options.environment, exposure.clone());
        let eye = EyeRingRotation::new(&scene);
        let rings = bloom_center
            .objects(ObjectCategory::MagicRings)
            .iter()
            .map(|o| o.node)
            .collect();
        let mut reveal = RingReveal::new(rings, &options.reveal);
        reveal.set_force_show_all(options.reveal.force_show_all, &mut scene);

        log::info!(
            "world ready: {} nodes, {registered} meshes, {} clips, {started} permanent actions",
            scene.len(),
            clips.len()
        );

        Self {
            scene,
            animation,
            bloom_center,
            bloom,
            bloom_preset: BloomPreset::Normal,
            exposure,
            themes,
            lighting,
            eye,
            reveal,
            background: options.background,
            keybindings: options.keybindings.clone(),
            frame_index: 0,
        }
    }

    /// Advance every subsystem by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.animation.update(dt);
        if let Some(theme) = self.themes.update(dt) {
            log::debug!("theme {theme} settled");
        }
        self.bloom_center.update(dt, &mut self.scene);
        self.eye.update(dt, &mut self.scene);
        let _ = self.reveal.update(&mut self.scene);
    }

    /// Everything the renderer needs for one frame. Exposure is read now.
    #[must_use]
    pub fn frame_inputs(&self) -> FrameInputs {
        let exposure = self.exposure.get_exposure();
        let tone_mapping = self.lighting.tone_mapping();
        let clear = if self.background.follow_exposure {
            scale(self.background.color, exposure)
        } else {
            self.background.color
        };
        let glowing_materials = self
            .scene
            .meshes()
            .filter(|&(id, _)| self.scene.is_visible(id))
            .filter_map(|(_, node)| node.material.as_ref())
            .filter(|m| m.emissive_intensity > 0.0 && m.emissive != BLACK)
            .count();
        FrameInputs {
            frame_index: self.frame_index,
            clear_color: clear.map(|c| tone_mapping.apply(c)),
            exposure,
            tone_mapping,
            lights: self.lighting.lights(),
            bloom: self.bloom.borrow().frame_params(),
            glowing_materials,
        }
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error. The frame index does not advance.
    pub fn render<R: FrameRenderer>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        let inputs = self.frame_inputs();
        renderer.render_frame(&inputs, &self.scene)?;
        self.frame_index += 1;
        Ok(())
    }

    /// [`update`](Self::update) then [`render`](Self::render).
    ///
    /// # Errors
    ///
    /// As [`render`](Self::render).
    pub fn frame<R: FrameRenderer>(&mut self, dt: f32, renderer: &mut R) -> Result<(), R::Error> {
        self.update(dt);
        self.render(renderer)
    }

    /// Execute the command bound to `key`. Returns `false` when the key is
    /// unbound or the command was refused.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match self.keybindings.lookup(key) {
            Some(binding) => self.execute(binding.command()),
            None => false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Transition state machine.
    #[must_use]
    pub fn animation(&self) -> &AnimationTransitionController {
        &self.animation
    }

    /// Transition state machine, for callbacks and tuning.
    pub fn animation_mut(&mut self) -> &mut AnimationTransitionController {
        &mut self.animation
    }

    /// Material and bloom coordination.
    #[must_use]
    pub fn bloom_center(&self) -> &BloomCoordinationCenter {
        &self.bloom_center
    }

    /// Bloom pass parameters.
    #[must_use]
    pub fn bloom_engine(&self) -> Ref<'_, PostProcessBloom> {
        self.bloom.borrow()
    }

    /// Last bloom preset applied through a command.
    #[must_use]
    pub fn bloom_preset(&self) -> BloomPreset {
        self.bloom_preset
    }

    /// Read handle onto the exposure.
    #[must_use]
    pub fn exposure(&self) -> ExposureReader {
        self.exposure.reader()
    }

    /// Exposure themes.
    #[must_use]
    pub fn themes(&self) -> &ThemeAnimator {
        &self.themes
    }

    /// Light presets.
    #[must_use]
    pub fn lighting(&self) -> &PbrPresetController {
        &self.lighting
    }

    /// Eye-ring spin.
    #[must_use]
    pub fn eye(&self) -> &EyeRingRotation {
        &self.eye
    }

    /// Ring reveal.
    #[must_use]
    pub fn reveal(&self) -> &RingReveal {
        &self.reveal
    }

    /// Background settings.
    #[must_use]
    pub fn background(&self) -> BackgroundOptions {
        self.background
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// State of every subsystem as JSON, for a debug panel.
    #[must_use]
    pub fn debug_snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "frame": self.frame_index,
            "exposure": self.exposure.get_exposure(),
            "animation": self.animation.snapshot(),
            "health": self.animation.health_check(),
            "bloom": self.bloom_center.config_info(),
            "bloom_preset": self.bloom_preset,
            "theme": self.themes.status(),
            "lighting": self.lighting.debug_info(),
            "eye": {
                "enabled": self.eye.is_enabled(),
                "speed": self.eye.speed(),
            },
            "reveal": {
                "stats": self.reveal.stats(&self.scene),
                "rings": self.reveal.ring_info(&self.scene),
            },
        })
    }

    /// Stop every action, restore original materials and drop the bloom
    /// engine.
    pub fn dispose(&mut self) {
        self.animation.dispose();
        self.bloom_center.dispose(&mut self.scene);
        self.bloom_center.disconnect_engine();
        let _ = self.themes.stop_transition();
        log::info!("world disposed");
    }
}
