//! The single writer of classified materials.

use std::fmt;

use serde::Serialize;

use super::classifier::{ObjectCategory, ObjectClassifier};
use super::engine::{BloomObject, BloomParameter, SharedBloomEngine};
use super::materials::{
    CategoryMap, MaterialPropertyStore, MaterialPropertyValue, SecurityState,
};
use super::BloomError;
use crate::exposure::ExposureAuthority;
use crate::options::{BloomOptions, MaterialOptions};
use crate::scene::{Material, NodeId, SceneGraph};

/// A classified mesh and the material it had when first registered.
#[derive(Debug, Clone)]
pub struct RegisteredObject {
    /// Mesh name.
    pub name: String,
    /// Scene node.
    pub node: NodeId,
    snapshot: Material,
}

impl RegisteredObject {
    /// Material captured at registration.
    #[must_use]
    pub fn snapshot(&self) -> &Material {
        &self.snapshot
    }
}

/// Post-process values of the reveal-ring pass. The main pass lives in the
/// bloom engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PostProcessConfig {
    /// Luminance threshold.
    pub threshold: f32,
    /// Glow strength.
    pub strength: f32,
    /// Glow spread.
    pub radius: f32,
}

impl PostProcessConfig {
    const DEFAULT: Self = Self {
        threshold: 0.3,
        strength: 1.5,
        radius: 1.0,
    };

    fn field_mut(&mut self, name: &str) -> Option<&mut f32> {
        match name {
            "threshold" => Some(&mut self.threshold),
            "strength" => Some(&mut self.strength),
            "radius" => Some(&mut self.radius),
            _ => None,
        }
    }
}

/// Names and count of one category's objects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectGroupInfo {
    /// Registered objects.
    pub count: usize,
    /// Mesh names.
    pub objects: Vec<String>,
}

/// Snapshot of the center's configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    /// Current security state.
    pub security_state: SecurityState,
    /// Pass parameters reported by the attached engine.
    pub post_process: Option<BloomOptions>,
    /// Reveal-ring post-process values, once any were set.
    pub reveal_post_process: Option<PostProcessConfig>,
    /// Exposure read from the authority.
    pub exposure: f32,
    /// Registered objects per category.
    pub object_groups: CategoryMap<usize>,
    /// Whether a bloom engine is attached.
    pub engine_connected: bool,
    /// Whether `SCANNING` pulses.
    pub pulse_enabled: bool,
}

/// Coordinates classified meshes, security presets and the bloom engine.
pub struct BloomCoordinationCenter {
    classifier: Box<dyn ObjectClassifier>,
    store: MaterialPropertyStore,
    objects: CategoryMap<Vec<RegisteredObject>>,
    security_state: SecurityState,
    engine: Option<SharedBloomEngine>,
    exposure: ExposureAuthority,
    reveal_post_process: Option<PostProcessConfig>,
    clock: f32,
    pulse_enabled: bool,
    pulse_rate: f32,
}

impl fmt::Debug for BloomCoordinationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomCoordinationCenter")
            .field("security_state", &self.security_state)
            .field("objects", &self.object_count())
            .field("engine_connected", &self.engine.is_some())
            .finish_non_exhaustive()
    }
}

impl BloomCoordinationCenter {
    /// New center with no objects and no engine.
    #[must_use]
    pub fn new(
        options: &MaterialOptions,
        classifier: impl ObjectClassifier + 'static,
        exposure: ExposureAuthority,
    ) -> Self {
        Self {
            classifier: Box::new(classifier),
            store: options.store(),
            objects: CategoryMap::default(),
            security_state: SecurityState::Normal,
            engine: None,
            exposure,
            reveal_post_process: None,
            clock: 0.0,
            pulse_enabled: options.pulse_enabled,
            pulse_rate: options.pulse_rate,
        }
    }

    /// Attach the bloom engine that parameter changes are forwarded to.
    pub fn connect_engine(&mut self, engine: SharedBloomEngine) {
        self.engine = Some(engine);
        log::info!("bloom engine connected");
    }

    /// Detach the bloom engine.
    pub fn disconnect_engine(&mut self) {
        self.engine = None;
    }

    /// Whether a bloom engine is attached.
    #[must_use]
    pub fn is_engine_connected(&self) -> bool {
        self.engine.is_some()
    }

    /// Classify every mesh in `scene` and register the matches. A mesh that
    /// is already registered keeps its first snapshot; a mesh without a
    /// material is skipped. Returns how many meshes with a material were
    /// classified by this scan.
    pub fn register_all_objects(&mut self, scene: &SceneGraph) -> usize {
        let mut classified = 0;
        for (node, mesh) in scene.meshes() {
            let Some(category) = self.classifier.classify(&mesh.name) else {
                continue;
            };
            let Some(material) = mesh.material.as_ref() else {
                log::debug!("{} has no material, not registered", mesh.name);
                continue;
            };
            classified += 1;
            if self.category_of(node).is_some() {
                continue;
            }
            self.objects.get_mut(category).push(RegisteredObject {
                name: mesh.name.clone(),
                node,
                snapshot: material.clone(),
            });
            log::debug!("registered {category}.{}", mesh.name);
        }
        for (category, objects) in self.objects.iter() {
            if objects.is_empty() {
                log::warn!("no objects classified as {category}");
            }
        }
        log::info!("bloom center: {classified} objects classified");
        classified
    }

    /// Category a node was registered under.
    #[must_use]
    pub fn category_of(&self, node: NodeId) -> Option<ObjectCategory> {
        self.objects
            .iter()
            .find(|(_, objects)| objects.iter().any(|o| o.node == node))
            .map(|(category, _)| category)
    }

    /// Registered objects of one category.
    #[must_use]
    pub fn objects(&self, category: ObjectCategory) -> &[RegisteredObject] {
        self.objects.get(category)
    }

    /// Total registered objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.iter().map(|(_, o)| o.len()).sum()
    }

    /// Write every category's base config into its objects.
    pub fn apply_defaults(&self, scene: &mut SceneGraph) -> usize {
        let mut updated = 0;
        for (category, objects) in self.objects.iter() {
            let config = self.store.base(category);
            for object in objects {
                if let Some(material) = scene.material_mut(object.node) {
                    config.apply_to(material);
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Switch security state and apply its preset to every category it
    /// covers.
    pub fn set_security_state(&mut self, state: SecurityState, scene: &mut SceneGraph) {
        self.security_state = state;
        let mut touched = Vec::new();
        for (category, objects) in self.objects.iter() {
            let Some(config) = self.store.resolve(state, category) else {
                continue;
            };
            for object in objects {
                if let Some(material) = scene.material_mut(object.node) {
                    config.apply_to(material);
                }
            }
            touched.push(category.as_str());
        }
        log::info!("security state {state}: updated {}", touched.join(", "));
    }

    /// [`set_security_state`](Self::set_security_state) by name. Unknown
    /// names change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BloomError::UnknownSecurityState`] if `name` is not a
    /// security state.
    pub fn set_security_state_named(
        &mut self,
        name: &str,
        scene: &mut SceneGraph,
    ) -> Result<(), BloomError> {
        let Some(state) = SecurityState::parse(name) else {
            log::warn!("unknown security state '{name}'");
            return Err(BloomError::UnknownSecurityState(name.to_owned()));
        };
        self.set_security_state(state, scene);
        Ok(())
    }

    /// Current security state.
    #[must_use]
    pub fn security_state(&self) -> SecurityState {
        self.security_state
    }

    /// Write one property into every object of a category, bypassing
    /// presets. Returns how many materials were written.
    pub fn set_object_type_property(
        &self,
        category: ObjectCategory,
        value: MaterialPropertyValue,
        scene: &mut SceneGraph,
    ) -> usize {
        let mut updated = 0;
        for object in self.objects.get(category) {
            if let Some(material) = scene.material_mut(object.node) {
                value.apply_to(material);
                updated += 1;
            }
        }
        log::trace!("{category}: {value:?} on {updated} objects");
        updated
    }

    /// [`set_object_type_property`](Self::set_object_type_property) by
    /// names, as a UI slider would call it.
    ///
    /// # Errors
    ///
    /// Returns [`BloomError::UnknownCategory`] or
    /// [`BloomError::UnknownParameter`] if either name is unknown.
    pub fn set_object_type_property_named(
        &self,
        category: &str,
        property: &str,
        value: f64,
        scene: &mut SceneGraph,
    ) -> Result<usize, BloomError> {
        let Some(category) = ObjectCategory::parse(category) else {
            log::warn!("unknown object category '{category}'");
            return Err(BloomError::UnknownCategory(category.to_owned()));
        };
        let Some(value) = MaterialPropertyValue::parse(property, value) else {
            log::warn!("unknown material property '{property}'");
            return Err(BloomError::UnknownParameter(property.to_owned()));
        };
        Ok(self.set_object_type_property(category, value, scene))
    }

    /// Forward a bloom pass parameter to the attached engine.
    ///
    /// # Errors
    ///
    /// Returns [`BloomError::UnknownParameter`] if `name` is not a bloom
    /// parameter and [`BloomError::EngineNotConnected`] if no engine is
    /// attached.
    pub fn set_bloom_parameter(&self, name: &str, value: f32) -> Result<(), BloomError> {
        let Some(parameter) = BloomParameter::parse(name) else {
            log::warn!("unknown bloom parameter '{name}'");
            return Err(BloomError::UnknownParameter(name.to_owned()));
        };
        let Some(engine) = self.engine.as_ref() else {
            log::warn!("no bloom engine connected for {name}={value}");
            return Err(BloomError::EngineNotConnected);
        };
        engine.borrow_mut().update_bloom(parameter, value);
        Ok(())
    }

    /// Every registered object keyed `category.name`, in category order.
    #[must_use]
    pub fn bloom_objects(&self) -> Vec<BloomObject> {
        self.objects
            .iter()
            .flat_map(|(category, objects)| {
                objects.iter().map(move |o| BloomObject {
                    key: format!("{category}.{}", o.name),
                    category,
                    name: o.name.clone(),
                    node: o.node,
                })
            })
            .collect()
    }

    /// Push the registered objects to the attached engine. Returns how many
    /// were sent.
    ///
    /// # Errors
    ///
    /// Returns [`BloomError::EngineNotConnected`] if no engine is attached.
    pub fn sync_objects(&self) -> Result<usize, BloomError> {
        let Some(engine) = self.engine.as_ref() else {
            log::warn!("no bloom engine connected, objects not synced");
            return Err(BloomError::EngineNotConnected);
        };
        let objects = self.bloom_objects();
        let count = objects.len();
        engine.borrow_mut().set_bloom_objects(objects);
        log::info!("{count} bloom objects synced");
        Ok(count)
    }

    /// Put every registered material back to its snapshot.
    pub fn reset_to_original(&self, scene: &mut SceneGraph) -> usize {
        let mut restored = 0;
        for (_, objects) in self.objects.iter() {
            for object in objects {
                if let Some(material) = scene.material_mut(object.node) {
                    let version = material.version;
                    *material = object.snapshot.clone();
                    material.version = version;
                    material.mark_dirty();
                    restored += 1;
                }
            }
        }
        log::info!("{restored} original materials restored");
        restored
    }

    /// Advance the pulse clock. In `SCANNING` with pulsing enabled, eye
    /// rings and iris follow `base * (0.5 + 0.5 * sin(t * rate))`.
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        self.clock += dt;
        if !self.pulse_enabled || self.security_state != SecurityState::Scanning {
            return;
        }
        let pulse = 0.5 + 0.5 * (self.clock * self.pulse_rate).sin();
        for category in [ObjectCategory::EyeRings, ObjectCategory::Iris] {
            let base = self
                .store
                .resolve(SecurityState::Scanning, category)
                .unwrap_or_else(|| self.store.base(category))
                .emissive_intensity;
            let _ = self.set_object_type_property(
                category,
                MaterialPropertyValue::EmissiveIntensity(base * pulse),
                scene,
            );
        }
    }

    /// Turn the `SCANNING` pulse on or off.
    pub fn set_pulse_enabled(&mut self, enabled: bool) {
        self.pulse_enabled = enabled;
    }

    /// Route a post-process value. `exposure` goes to the exposure
    /// authority, `reveal_`-prefixed names go to the reveal-ring config and
    /// everything else goes to the bloom engine.
    ///
    /// # Errors
    ///
    /// [`BloomError::UnknownParameter`] for a name no target knows, and
    /// [`BloomError::EngineNotConnected`] for a main-pass parameter with no
    /// engine attached.
    pub fn set_post_process_parameter(&mut self, name: &str, value: f32) -> Result<(), BloomError> {
        if name == "exposure" {
            let _ = self.exposure.set_exposure(value);
            return Ok(());
        }
        let Some(field) = name.strip_prefix("reveal_") else {
            return self.set_bloom_parameter(name, value);
        };
        let reveal = self
            .reveal_post_process
            .get_or_insert(PostProcessConfig::DEFAULT);
        let Some(slot) = reveal.field_mut(field) else {
            log::warn!("unknown post-process parameter '{name}'");
            return Err(BloomError::UnknownParameter(name.to_owned()));
        };
        *slot = value;
        log::debug!("post-process {name} = {value}");
        Ok(())
    }

    /// Registered objects per category.
    #[must_use]
    pub fn objects_info(&self) -> CategoryMap<ObjectGroupInfo> {
        CategoryMap::from_fn(|category| {
            let objects = self.objects.get(category);
            ObjectGroupInfo {
                count: objects.len(),
                objects: objects.iter().map(|o| o.name.clone()).collect(),
            }
        })
    }

    /// Configuration snapshot.
    #[must_use]
    pub fn config_info(&self) -> ConfigInfo {
        ConfigInfo {
            security_state: self.security_state,
            post_process: self.engine.as_ref().map(|e| e.borrow().settings()),
            reveal_post_process: self.reveal_post_process,
            exposure: self.exposure.get_exposure(),
            object_groups: CategoryMap::from_fn(|c| self.objects.get(c).len()),
            engine_connected: self.engine.is_some(),
            pulse_enabled: self.pulse_enabled,
        }
    }

    /// The material targets.
    #[must_use]
    pub fn store(&self) -> &MaterialPropertyStore {
        &self.store
    }

    /// Restore original materials and forget every object.
    pub fn dispose(&mut self, scene: &mut SceneGraph) {
        let _ = self.reset_to_original(scene);
        self.objects = CategoryMap::default();
        log::info!("bloom center disposed");
    }
}
