//! Eased weight ramps between actions.
//!
//! Every ramp drives one action's weight from its value at ramp start to a
//! target over a duration. A crossfade is two ramps started together in
//! opposite directions. Ramps advance only through [`CrossfadeEngine::update`]
//! with an explicit `dt`, so a sequence of ticks always reproduces the same
//! weights.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::action::{ActionId, ActionMixer};
use crate::util::easing::EasingFunction;

/// One in-flight weight ramp.
#[derive(Debug, Clone)]
struct WeightRamp {
    action: ActionId,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    /// Weight written once the ramp lands, replacing `to`.
    settle_weight: Option<f32>,
}

impl WeightRamp {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// A ramp that reached its target on the last update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampCompleted {
    /// Action the ramp drove.
    pub action: ActionId,
    /// Weight the action was left at.
    pub weight: f32,
    /// Whether the action was stopped because the ramp faded it out.
    pub stopped: bool,
}

/// Book-keeping for a crossfade in flight, kept until swept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionRecord {
    /// Action fading out.
    #[serde(skip)]
    pub from: ActionId,
    /// Action fading in.
    #[serde(skip)]
    pub to: ActionId,
    /// Engine clock at the start of the crossfade, in seconds.
    pub started_at: f32,
    /// Crossfade length in seconds.
    pub duration: f32,
}

impl TransitionRecord {
    /// Seconds since the crossfade started, given the engine clock.
    #[must_use]
    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.started_at).max(0.0)
    }

    /// Whether the crossfade has run its full length.
    #[must_use]
    pub fn is_expired(&self, now: f32) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// Drives weight ramps on a mixer's actions.
#[derive(Debug, Clone)]
pub struct CrossfadeEngine {
    ramps: Vec<WeightRamp>,
    records: FxHashMap<ActionId, TransitionRecord>,
    clock: f32,
    easing: EasingFunction,
}

impl Default for CrossfadeEngine {
    fn default() -> Self {
        Self::new(EasingFunction::CROSSFADE)
    }
}

impl CrossfadeEngine {
    /// Engine using the given easing curve for every ramp.
    #[must_use]
    pub fn new(easing: EasingFunction) -> Self {
        Self {
            ramps: Vec::new(),
            records: FxHashMap::default(),
            clock: 0.0,
            easing,
        }
    }

    fn start_ramp(&mut self, ramp: WeightRamp) {
        // A newer ramp on the same action takes over from the old one.
        self.ramps.retain(|r| r.action != ramp.action);
        self.ramps.push(ramp);
    }

    /// Ramp an action's weight from its current value to `target`. A target
    /// of zero stops the action when the ramp lands.
    pub fn fade_to(
        &mut self,
        mixer: &ActionMixer,
        action: ActionId,
        target: f32,
        duration: f32,
    ) {
        let Some(current) = mixer.get(action) else {
            log::warn!("fade_to on unknown action {action:?}");
            return;
        };
        self.start_ramp(WeightRamp {
            action,
            from: current.weight(),
            to: target.clamp(0.0, 1.0),
            duration,
            elapsed: 0.0,
            settle_weight: None,
        });
    }

    /// Start an action from weight zero and ramp it up to `target`.
    pub fn fade_in(
        &mut self,
        mixer: &mut ActionMixer,
        action: ActionId,
        target: f32,
        duration: f32,
    ) {
        let Some(a) = mixer.get_mut(action) else {
            log::warn!("fade_in on unknown action {action:?}");
            return;
        };
        a.reset();
        a.play();
        a.set_weight(0.0);
        self.fade_to(mixer, action, target, duration);
    }

    /// Crossfade from `from` to `to` over `duration` seconds.
    ///
    /// `to` is rewound, started and set to weight zero. Then `from` ramps
    /// down to zero (and is stopped) while `to` ramps up to one. When
    /// `settle_weight` is set, `to` is put at that weight once its ramp
    /// lands instead of staying at one.
    pub fn crossfade(
        &mut self,
        mixer: &mut ActionMixer,
        from: ActionId,
        to: ActionId,
        duration: f32,
        settle_weight: Option<f32>,
    ) {
        let from_weight = match mixer.get(from) {
            Some(a) => a.weight(),
            None => {
                log::warn!("crossfade from unknown action {from:?}");
                return;
            }
        };
        let Some(target) = mixer.get_mut(to) else {
            log::warn!("crossfade to unknown action {to:?}");
            return;
        };
        target.reset();
        target.play();
        target.set_weight(0.0);

        self.start_ramp(WeightRamp {
            action: from,
            from: from_weight,
            to: 0.0,
            duration,
            elapsed: 0.0,
            settle_weight: None,
        });
        self.start_ramp(WeightRamp {
            action: to,
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
            settle_weight,
        });
        let _ = self.records.insert(
            from,
            TransitionRecord {
                from,
                to,
                started_at: self.clock,
                duration,
            },
        );
    }

    /// Advance every ramp by `dt` seconds and write the eased weights into
    /// the mixer. Returns the ramps that landed on this tick.
    pub fn update(&mut self, mixer: &mut ActionMixer, dt: f32) -> Vec<RampCompleted> {
        self.clock += dt;
        let easing = self.easing;
        let mut completed = Vec::new();

        self.ramps.retain_mut(|ramp| {
            ramp.elapsed += dt;
            let t = ramp.progress();
            let Some(action) = mixer.get_mut(ramp.action) else {
                return false;
            };
            action.set_weight(ramp.from + (ramp.to - ramp.from) * easing.evaluate(t));
            if t < 1.0 {
                return true;
            }

            let stopped = ramp.to <= 0.0;
            if stopped {
                action.set_weight(0.0);
                action.stop();
            } else if let Some(w) = ramp.settle_weight {
                action.set_weight(w);
            }
            completed.push(RampCompleted {
                action: ramp.action,
                weight: action.weight(),
                stopped,
            });
            false
        });
        completed
    }

    /// Whether a ramp is driving `action`.
    #[must_use]
    pub fn is_fading(&self, action: ActionId) -> bool {
        self.ramps.iter().any(|r| r.action == action)
    }

    /// Weight `action` will be left at once its ramp lands, or `None` when
    /// nothing drives it.
    #[must_use]
    pub fn target_weight(&self, action: ActionId) -> Option<f32> {
        self.ramps
            .iter()
            .find(|r| r.action == action)
            .map(|r| r.settle_weight.unwrap_or(r.to))
    }

    /// Number of ramps in flight.
    #[must_use]
    pub fn active_ramps(&self) -> usize {
        self.ramps.len()
    }

    /// Drop the ramp driving `action`, leaving its weight where it is.
    pub fn cancel(&mut self, action: ActionId) {
        self.ramps.retain(|r| r.action != action);
    }

    /// Seconds this engine has been advanced in total.
    #[must_use]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Crossfades started and not yet swept.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.values()
    }

    /// Drop records whose crossfade has run its full length. Returns how many
    /// were removed.
    pub fn sweep_records(&mut self) -> usize {
        let now = self.clock;
        let before = self.records.len();
        self.records.retain(|_, r| !r.is_expired(now));
        before - self.records.len()
    }

    /// Drop every ramp and record.
    pub fn clear(&mut self) {
        self.ramps.clear();
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::action::AnimationClip;

    fn two_actions() -> (ActionMixer, ActionId, ActionId) {
        let mut mixer = ActionMixer::new();
        let a = mixer.add(AnimationClip::new("a", 4.0));
        let b = mixer.add(AnimationClip::new("b", 4.0));
        let action = mixer.get_mut(a).unwrap();
        action.play();
        action.set_weight(1.0);
        (mixer, a, b)
    }

    fn run(engine: &mut CrossfadeEngine, mixer: &mut ActionMixer, secs: f32) -> Vec<RampCompleted> {
        let dt = 1.0 / 60.0;
        let mut done = Vec::new();
        let mut t = 0.0;
        while t < secs {
            done.extend(engine.update(mixer, dt));
            t += dt;
        }
        done
    }

    #[test]
    fn crossfade_hands_over_weight() {
        let (mut mixer, a, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.crossfade(&mut mixer, a, b, 1.5, None);
        assert_eq!(mixer.get(b).unwrap().weight(), 0.0);
        assert!(mixer.get(b).unwrap().is_running());

        let done = run(&mut engine, &mut mixer, 1.6);
        assert_eq!(done.len(), 2);
        let from = mixer.get(a).unwrap();
        assert!(from.weight() < 1e-6);
        assert!(!from.is_running());
        assert!((mixer.get(b).unwrap().weight() - 1.0).abs() < 1e-6);
        assert_eq!(engine.active_ramps(), 0);
    }

    #[test]
    fn ramp_follows_cubic_ease_out() {
        let (mut mixer, a, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.crossfade(&mut mixer, a, b, 1.0, None);
        let _ = engine.update(&mut mixer, 0.5);
        let expected = EasingFunction::CubicOut.evaluate(0.5);
        assert!((mixer.get(b).unwrap().weight() - expected).abs() < 1e-6);
        assert!((mixer.get(a).unwrap().weight() - (1.0 - expected)).abs() < 1e-6);
    }

    #[test]
    fn settle_weight_applied_after_landing() {
        let (mut mixer, a, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.crossfade(&mut mixer, a, b, 0.5, Some(0.4));
        let _ = engine.update(&mut mixer, 0.25);
        assert!(mixer.get(b).unwrap().weight() > 0.4);
        let done = engine.update(&mut mixer, 0.3);
        let landed = done.iter().find(|c| c.action == b).unwrap();
        assert_eq!(landed.weight, 0.4);
        assert_eq!(mixer.get(b).unwrap().weight(), 0.4);
    }

    #[test]
    fn newer_ramp_supersedes_older() {
        let (mut mixer, a, _) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.fade_to(&mixer, a, 0.0, 1.0);
        let _ = engine.update(&mut mixer, 0.5);
        engine.fade_to(&mixer, a, 1.0, 0.5);
        assert_eq!(engine.active_ramps(), 1);
        let _ = run(&mut engine, &mut mixer, 0.6);
        let action = mixer.get(a).unwrap();
        assert!((action.weight() - 1.0).abs() < 1e-6);
        assert!(action.is_running());
    }

    #[test]
    fn target_weight_reports_landing_value() {
        let (mut mixer, a, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        assert_eq!(engine.target_weight(a), None);
        engine.crossfade(&mut mixer, a, b, 1.0, Some(0.7));
        let _ = engine.update(&mut mixer, 0.3);
        assert_eq!(engine.target_weight(a), Some(0.0));
        assert_eq!(engine.target_weight(b), Some(0.7));
        let _ = engine.update(&mut mixer, 0.8);
        assert_eq!(engine.target_weight(b), None);
    }

    #[test]
    fn fade_in_starts_from_zero() {
        let (mut mixer, _, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.fade_in(&mut mixer, b, 1.0, 0.75);
        assert!(mixer.get(b).unwrap().is_running());
        let done = run(&mut engine, &mut mixer, 0.8);
        assert_eq!(done.len(), 1);
        assert!(!done[0].stopped);
    }

    #[test]
    fn zero_duration_lands_on_first_tick() {
        let (mut mixer, a, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.crossfade(&mut mixer, a, b, 0.0, None);
        let done = engine.update(&mut mixer, 0.0);
        assert_eq!(done.len(), 2);
        assert_eq!(mixer.get(b).unwrap().weight(), 1.0);
    }

    #[test]
    fn records_are_swept_after_duration() {
        let (mut mixer, a, b) = two_actions();
        let mut engine = CrossfadeEngine::default();
        engine.crossfade(&mut mixer, a, b, 1.0, None);
        let _ = engine.update(&mut mixer, 0.5);
        assert_eq!(engine.sweep_records(), 0);
        assert_eq!(engine.records().count(), 1);
        let _ = engine.update(&mut mixer, 0.6);
        assert_eq!(engine.sweep_records(), 1);
        assert_eq!(engine.records().count(), 0);
    }
}
