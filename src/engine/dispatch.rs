use super::{WorldCommand, WorldEngine};
use crate::bloom::{BloomEngine, BloomParameter};
use crate::reveal::TriggerZone;

impl WorldEngine {
    /// Execute a command. Returns whether it took effect; refusals are
    /// logged by the subsystem that refused.
    pub fn execute(&mut self, command: WorldCommand) -> bool {
        match command {
            WorldCommand::RequestTransition => self.animation.request_transition().is_ok(),
            WorldCommand::ForceReturn => self.animation.force_return().is_ok(),
            WorldCommand::SetFadeDuration(seconds) => {
                self.animation.set_fade_duration(seconds);
                true
            }
            WorldCommand::SetTimeScale(scale) => {
                self.animation.set_time_scale(scale);
                true
            }

            WorldCommand::SetSecurityState(state) => {
                self.bloom_center.set_security_state(state, &mut self.scene);
                true
            }
            WorldCommand::SetObjectProperty { category, value } => {
                self.bloom_center
                    .set_object_type_property(category, value, &mut self.scene)
                    > 0
            }
            WorldCommand::ResetMaterials => {
                self.bloom_center.reset_to_original(&mut self.scene) > 0
            }
            WorldCommand::SetPulseEnabled(enabled) => {
                self.bloom_center.set_pulse_enabled(enabled);
                true
            }

            WorldCommand::SetBloomParameter { parameter, value } => self
                .bloom_center
                .set_bloom_parameter(parameter.as_str(), value)
                .is_ok(),
            WorldCommand::ApplyBloomPreset(preset) => {
                self.bloom.borrow_mut().apply_preset(preset);
                self.bloom_preset = preset;
                true
            }
            WorldCommand::CycleBloomPreset => {
                let next = self.bloom_preset.next();
                self.execute(WorldCommand::ApplyBloomPreset(next))
            }

            WorldCommand::SetExposure(value) => {
                if self.themes.is_transitioning() {
                    log::warn!("exposure {value} overrides the running theme transition");
                    let _ = self.themes.stop_transition();
                }
                let _ = self.lighting.set_exposure(value);
                true
            }
            WorldCommand::ChangeTheme { theme, duration } => {
                self.themes.change_theme(theme, duration).is_ok()
            }
            WorldCommand::CycleTheme => self.themes.cycle_themes().is_ok(),
            WorldCommand::StopThemeTransition => self.themes.stop_transition(),
            WorldCommand::ApplyLightPreset(preset) => {
                let _ = self.themes.stop_transition();
                self.lighting.apply_preset(preset);
                true
            }
            WorldCommand::CycleLightPreset => {
                let _ = self.themes.stop_transition();
                let _ = self.lighting.cycle_preset();
                true
            }
            WorldCommand::SetLightMultipliers {
                ambient,
                directional,
            } => {
                self.lighting.set_global_multipliers(ambient, directional);
                true
            }
            WorldCommand::SetToneMapping(mapping) => {
                self.lighting.set_tone_mapping(mapping);
                true
            }
            WorldCommand::SetBackground(color) => {
                self.background.color = color;
                true
            }

            WorldCommand::ToggleEyeRotation => {
                let _ = self.eye.toggle();
                true
            }
            WorldCommand::SetEyeRotationSpeed(speed) => {
                self.eye.set_speed(speed);
                true
            }

            WorldCommand::SetForceShowRings(force) => {
                self.reveal.set_force_show_all(force, &mut self.scene);
                true
            }
            WorldCommand::ToggleForceShowRings => {
                let _ = self.reveal.toggle_force_show_all(&mut self.scene);
                true
            }
            WorldCommand::SetRevealZone {
                center,
                radius,
                height,
            } => {
                if !center.is_finite() || !radius.is_finite() || !height.is_finite() {
                    log::warn!("ignoring non-finite reveal zone");
                    return false;
                }
                self.reveal.set_trigger_zone(TriggerZone::new(center, radius, height));
                let _ = self.reveal.update(&mut self.scene);
                true
            }
            WorldCommand::MoveRevealZone(delta) => {
                if !delta.is_finite() {
                    return false;
                }
                self.reveal.move_zone(delta);
                let _ = self.reveal.update(&mut self.scene);
                true
            }
            WorldCommand::ResetRevealZone => {
                self.reveal.reset_zone();
                let _ = self.reveal.update(&mut self.scene);
                true
            }
        }
    }

    /// Forward a bloom parameter straight to the engine, bypassing name
    /// parsing. Used by UI sliders bound to typed parameters.
    pub fn set_bloom(&self, parameter: BloomParameter, value: f32) {
        self.bloom.borrow_mut().update_bloom(parameter, value);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::bloom::{BloomPreset, MaterialPropertyValue, ObjectCategory};
    use crate::lighting::ToneMapping;
    use crate::options::Options;
    use crate::scene::rig::eye_rig;

    fn engine() -> WorldEngine {
        WorldEngine::new(eye_rig(), &Options::default())
    }

    #[test]
    fn bloom_commands_reach_the_engine() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::SetBloomParameter {
            parameter: BloomParameter::Strength,
            value: 2.0,
        }));
        assert_eq!(engine.bloom_engine().settings().strength, 2.0);

        assert!(engine.execute(WorldCommand::CycleBloomPreset));
        assert_eq!(engine.bloom_preset(), BloomPreset::Intense);
        assert_eq!(engine.bloom_engine().settings().threshold, 0.1);
    }

    #[test]
    fn object_property_writes_whole_category() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::SetObjectProperty {
            category: ObjectCategory::Arms,
            value: MaterialPropertyValue::Roughness(0.9),
        }));
        for object in engine.bloom_center().objects(ObjectCategory::Arms) {
            assert_eq!(engine.scene().material(object.node).unwrap().roughness, 0.9);
        }
    }

    #[test]
    fn direct_exposure_stops_theme_and_is_clamped() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::CycleTheme));
        assert!(engine.themes().is_transitioning());
        assert!(engine.execute(WorldCommand::SetExposure(5.0)));
        assert!(!engine.themes().is_transitioning());
        assert_eq!(engine.exposure().get_exposure(), 2.0);
    }

    #[test]
    fn theme_refused_while_running() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::CycleTheme));
        assert!(!engine.execute(WorldCommand::CycleTheme));
        assert!(engine.execute(WorldCommand::StopThemeTransition));
        assert!(!engine.execute(WorldCommand::StopThemeTransition));
    }

    #[test]
    fn light_and_eye_commands() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::SetToneMapping(ToneMapping::Reinhard)));
        assert_eq!(engine.frame_inputs().tone_mapping, ToneMapping::Reinhard);
        assert!(engine.execute(WorldCommand::SetLightMultipliers {
            ambient: 0.0,
            directional: 1.0,
        }));
        assert_eq!(engine.frame_inputs().lights.ambient_intensity, 0.0);

        assert!(engine.eye().is_enabled());
        assert!(engine.execute(WorldCommand::ToggleEyeRotation));
        assert!(!engine.eye().is_enabled());
        assert!(engine.execute(WorldCommand::SetEyeRotationSpeed(0.05)));
        assert_eq!(engine.eye().speed(), 0.05);
    }

    #[test]
    fn set_bloom_bypasses_parsing() {
        let engine = engine();
        engine.set_bloom(BloomParameter::Enabled, 0.0);
        assert!(!engine.frame_inputs().bloom.settings.enabled);
    }

    #[test]
    fn reveal_zone_commands() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::SetForceShowRings(false)));
        assert_eq!(engine.reveal().stats(engine.scene()).hidden, 0);

        assert!(engine.execute(WorldCommand::SetRevealZone {
            center: Vec3::new(0.0, 0.0, -1.0),
            radius: 0.1,
            height: 1.0,
        }));
        assert_eq!(engine.reveal().zone().radius, 0.5);
        let hidden: Vec<String> = engine
            .reveal()
            .ring_info(engine.scene())
            .into_iter()
            .filter(|ring| !ring.visible)
            .map(|ring| ring.name)
            .collect();
        assert_eq!(
            hidden,
            ["Ring_BloomArea_3", "Ring_BloomArea_4", "Ring_BloomArea_5"]
        );

        assert!(engine.execute(WorldCommand::MoveRevealZone(Vec3::new(0.0, 10.0, 0.0))));
        assert_eq!(engine.reveal().stats(engine.scene()).hidden, 0);
        assert!(!engine.execute(WorldCommand::MoveRevealZone(Vec3::NAN)));
        assert!(engine.execute(WorldCommand::ResetRevealZone));
        assert_eq!(engine.reveal().zone().center, Vec3::new(3.3, 3.4, 1.9));
    }

    #[test]
    fn background_follows_exposure() {
        let mut engine = engine();
        assert!(engine.execute(WorldCommand::SetBackground([0.2, 0.2, 0.2])));
        assert!(engine.execute(WorldCommand::SetExposure(2.0)));
        let clear = engine.frame_inputs().clear_color;
        assert!((clear[0] - 0.4).abs() < 1e-6);
    }
}
