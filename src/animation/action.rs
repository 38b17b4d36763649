//! Weighted clip actions and the mixer that advances them.
//!
//! A [`WeightedAction`] is the playback state of one named clip: its blend
//! weight, time scale, loop mode and local time. The [`ActionMixer`] owns
//! every action, advances local time once per frame and reports which
//! play-once actions reached their end on that frame.

use serde::{Deserialize, Serialize};

/// A named animation clip as supplied by the asset loader.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name, unique within a model.
    pub name: String,
    /// Clip length in seconds at time scale 1.0.
    pub duration: f32,
}

impl AnimationClip {
    /// New clip with the given name and length in seconds.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}

/// How an action behaves when its local time reaches the clip end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Wrap around and keep playing.
    Repeat,
    /// Stop on the last frame and hold it.
    OnceAndHold,
}

/// Handle to an action inside an [`ActionMixer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(usize);

/// Playback state of one clip.
#[derive(Debug, Clone)]
pub struct WeightedAction {
    clip: AnimationClip,
    weight: f32,
    time_scale: f32,
    loop_mode: LoopMode,
    running: bool,
    time: f32,
}

impl WeightedAction {
    /// Wrap a clip: weight 0, time scale 1, repeating, stopped.
    #[must_use]
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            weight: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Repeat,
            running: false,
            time: 0.0,
        }
    }

    /// The wrapped clip.
    #[must_use]
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Clip name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Current blend weight in `[0, 1]`.
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Set the blend weight, clamped to `[0, 1]`. NaN is ignored.
    pub fn set_weight(&mut self, weight: f32) {
        if !weight.is_nan() {
            self.weight = weight.clamp(0.0, 1.0);
        }
    }

    /// Playback speed multiplier.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the playback speed multiplier.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    /// Loop behaviour at clip end.
    #[must_use]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Set the loop behaviour.
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Whether the action is currently advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Local clip time in seconds.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seconds of wall time a full play-through takes at the current scale.
    #[must_use]
    pub fn effective_duration(&self) -> f32 {
        if self.time_scale > 0.0 {
            self.clip.duration / self.time_scale
        } else {
            f32::INFINITY
        }
    }

    /// Start (or resume) advancing.
    pub fn play(&mut self) {
        self.running = true;
    }

    /// Halt and rewind. Weight is left untouched.
    pub fn stop(&mut self) {
        self.running = false;
        self.time = 0.0;
    }

    /// Rewind to the first frame without changing the running flag.
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Advance local time by `dt` seconds of wall time. Returns `true` on the
    /// frame a play-once action reaches its end.
    fn advance(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.time += dt * self.time_scale;
        let duration = self.clip.duration;
        match self.loop_mode {
            LoopMode::Repeat => {
                if duration > 0.0 {
                    self.time = self.time.rem_euclid(duration);
                }
                false
            }
            LoopMode::OnceAndHold => {
                if self.time >= duration {
                    self.time = duration;
                    self.running = false;
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Owns every action of one model and advances them together.
#[derive(Debug, Clone, Default)]
pub struct ActionMixer {
    actions: Vec<WeightedAction>,
    time: f32,
}

impl ActionMixer {
    /// Empty mixer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a clip in a new action and return its handle.
    pub fn add(&mut self, clip: AnimationClip) -> ActionId {
        let id = ActionId(self.actions.len());
        self.actions.push(WeightedAction::new(clip));
        id
    }

    /// Borrow an action.
    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&WeightedAction> {
        self.actions.get(id.0)
    }

    /// Mutably borrow an action.
    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut WeightedAction> {
        self.actions.get_mut(id.0)
    }

    /// Look up an action by clip name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.name() == name)
            .map(ActionId)
    }

    /// Iterate over `(handle, action)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &WeightedAction)> {
        self.actions.iter().enumerate().map(|(i, a)| (ActionId(i), a))
    }

    /// Apply `f` to every action.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut WeightedAction)) {
        for action in &mut self.actions {
            f(action);
        }
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the mixer holds no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Total mixer time in seconds.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance every running action by `dt` and return the actions that
    /// finished on this frame, in mixer order.
    pub fn update(&mut self, dt: f32) -> Vec<ActionId> {
        self.time += dt;
        self.actions
            .iter_mut()
            .enumerate()
            .filter_map(|(i, a)| a.advance(dt).then_some(ActionId(i)))
            .collect()
    }

    /// Stop every action and zero its weight.
    pub fn stop_all(&mut self) {
        for action in &mut self.actions {
            action.stop();
            action.weight = 0.0;
        }
    }

    /// Drop every action. Handles issued before become dangling.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_wraps_and_never_finishes() {
        let mut mixer = ActionMixer::new();
        let id = mixer.add(AnimationClip::new("loop", 1.0));
        mixer.get_mut(id).unwrap().play();
        for _ in 0..25 {
            assert!(mixer.update(0.1).is_empty());
        }
        let t = mixer.get(id).unwrap().time();
        assert!((t - 0.5).abs() < 1e-4, "time {t}");
        assert!(mixer.get(id).unwrap().is_running());
    }

    #[test]
    fn once_and_hold_reports_finish_once() {
        let mut mixer = ActionMixer::new();
        let id = mixer.add(AnimationClip::new("pose", 1.0));
        {
            let a = mixer.get_mut(id).unwrap();
            a.set_loop_mode(LoopMode::OnceAndHold);
            a.set_time_scale(0.5);
            a.play();
        }
        let mut finished = Vec::new();
        for _ in 0..30 {
            finished.extend(mixer.update(0.1));
        }
        assert_eq!(finished, vec![id]);
        let a = mixer.get(id).unwrap();
        assert!(!a.is_running());
        assert_eq!(a.time(), 1.0);
    }

    #[test]
    fn stopped_actions_do_not_advance() {
        let mut mixer = ActionMixer::new();
        let id = mixer.add(AnimationClip::new("idle", 1.0));
        let _ = mixer.update(0.5);
        assert_eq!(mixer.get(id).unwrap().time(), 0.0);
        assert_eq!(mixer.time(), 0.5);
    }

    #[test]
    fn weight_is_clamped() {
        let mut action = WeightedAction::new(AnimationClip::new("a", 1.0));
        action.set_weight(1.7);
        assert_eq!(action.weight(), 1.0);
        action.set_weight(-0.2);
        assert_eq!(action.weight(), 0.0);
        action.set_weight(f32::NAN);
        assert_eq!(action.weight(), 0.0);
    }

    #[test]
    fn effective_duration_uses_time_scale() {
        let mut action = WeightedAction::new(AnimationClip::new("ring", 2.0));
        action.set_time_scale(0.8);
        assert!((action.effective_duration() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn find_by_name() {
        let mut mixer = ActionMixer::new();
        let _ = mixer.add(AnimationClip::new("a", 1.0));
        let b = mixer.add(AnimationClip::new("b", 1.0));
        assert_eq!(mixer.find("b"), Some(b));
        assert_eq!(mixer.find("c"), None);
    }
}
