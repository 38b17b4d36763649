//! Permanent ⇄ pose transition state machine.
//!
//! The aggregate [`TransitionState`] only changes when every tracked limb
//! agrees: a pose transition becomes [`TransitionState::Pose`] once every
//! limb's fade-in has landed, and the return becomes
//! [`TransitionState::Permanent`] once the last limb's return crossfade has
//! landed. Each limb is tracked individually in between, so one limb
//! finishing early never flips the whole model.

use std::fmt;

use serde::Serialize;

use super::action::{ActionId, ActionMixer, AnimationClip, LoopMode, WeightedAction};
use super::crossfade::{CrossfadeEngine, RampCompleted};
use super::registry::{ActionGroup, ActionRegistry, Limb};
use crate::options::AnimationOptions;

/// Clamp range for fade duration and global time scale.
const TUNING_RANGE: (f32, f32) = (0.1, 3.0);

/// Aggregate state of the transition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    /// Continuous idle motion. Initial state.
    Permanent,
    /// Limbs are crossfading into their poses.
    TransitioningToPose,
    /// Every limb holds its pose.
    Pose,
    /// Limbs are crossfading back to their permanent actions.
    TransitioningToPermanent,
}

impl TransitionState {
    /// Whether a choreography is in flight.
    #[must_use]
    pub fn is_transitioning(self) -> bool {
        matches!(
            self,
            Self::TransitioningToPose | Self::TransitioningToPermanent
        )
    }
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Permanent => "permanent",
            Self::TransitioningToPose => "transitioning to pose",
            Self::Pose => "pose",
            Self::TransitioningToPermanent => "transitioning to permanent",
        };
        f.write_str(name)
    }
}

/// Why a transition request was not carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Another transition is in flight.
    Busy(TransitionState),
    /// The requested steady state is already held. Harmless.
    AlreadyInState(TransitionState),
    /// Pose or ring clips the transition needs were not found.
    MissingClips(String),
    /// `force_return` was called with nothing to return from.
    NothingToReturn,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy(state) => write!(f, "transition busy ({state})"),
            Self::AlreadyInState(state) => write!(f, "already in {state}"),
            Self::MissingClips(what) => write!(f, "missing clips: {what}"),
            Self::NothingToReturn => f.write_str("nothing to return from"),
        }
    }
}

impl std::error::Error for TransitionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LimbPhase {
    FadingIn,
    Holding,
    Returning,
}

#[derive(Debug, Clone, Copy)]
struct LimbTrack {
    limb: Limb,
    saved_weight: f32,
    phase: LimbPhase,
}

/// Read-only view of the controller for UI and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionSnapshot {
    /// Aggregate state.
    pub state: TransitionState,
    /// Whether a choreography is in flight.
    pub is_transitioning: bool,
    /// Limbs currently away from their permanent action.
    pub active_limbs: usize,
    /// Crossfade length in seconds.
    pub fade_duration: f32,
    /// Global time scale last applied.
    pub time_scale: f32,
}

/// Clip names per group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AvailableAnimations {
    /// Looping clips.
    pub permanent: Vec<String>,
    /// Held-pose clips.
    pub pose: Vec<String>,
    /// Ring reveal clips.
    pub ring: Vec<String>,
}

/// A crossfade in flight, by clip name.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecordInfo {
    /// Clip fading out.
    pub from: String,
    /// Clip fading in.
    pub to: String,
    /// Seconds since the crossfade started.
    pub elapsed: f32,
    /// Crossfade length in seconds.
    pub duration: f32,
}

type CompleteCallback = Box<dyn FnMut(TransitionState)>;
type FinishedCallback = Box<dyn FnMut(&str)>;

/// Drives the permanent ⇄ pose choreography over an [`ActionRegistry`].
pub struct AnimationTransitionController {
    registry: ActionRegistry,
    fades: CrossfadeEngine,
    state: TransitionState,
    tracks: Vec<LimbTrack>,
    fade_duration: f32,
    time_scale: f32,
    sync_time_scale: f32,
    grace_period: f32,
    grace_remaining: Option<f32>,
    on_transition_complete: Option<CompleteCallback>,
    on_animation_finished: Option<FinishedCallback>,
}

impl fmt::Debug for AnimationTransitionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationTransitionController")
            .field("state", &self.state)
            .field("active_limbs", &self.tracks.len())
            .field("fade_duration", &self.fade_duration)
            .field("time_scale", &self.time_scale)
            .finish_non_exhaustive()
    }
}

impl AnimationTransitionController {
    /// Build a controller over `clips`, grouped and tuned per `options`.
    #[must_use]
    pub fn new(clips: &[AnimationClip], options: &AnimationOptions) -> Self {
        let (lo, hi) = TUNING_RANGE;
        Self {
            registry: ActionRegistry::build(clips, options),
            fades: CrossfadeEngine::new(options.crossfade_easing),
            state: TransitionState::Permanent,
            tracks: Vec::new(),
            fade_duration: options.fade_duration.clamp(lo, hi),
            time_scale: options.initial_time_scale,
            sync_time_scale: options.sync_time_scale,
            grace_period: options.force_return_grace.max(0.0),
            grace_remaining: None,
            on_transition_complete: None,
            on_animation_finished: None,
        }
    }

    /// Fade every permanent action in from zero over half the fade
    /// duration. Returns how many were started.
    pub fn start_permanent_animations(&mut self) -> usize {
        let duration = self.fade_duration * 0.5;
        let ids = self.registry.group(ActionGroup::Permanent).to_vec();
        for id in &ids {
            self.fades
                .fade_in(self.registry.mixer_mut(), *id, 1.0, duration);
        }
        log::info!("started {} permanent animations", ids.len());
        ids.len()
    }

    /// Toggle between the two steady states.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Busy`] while a transition runs, otherwise
    /// as [`request_pose`](Self::request_pose) or
    /// [`request_permanent`](Self::request_permanent).
    pub fn request_transition(&mut self) -> Result<(), TransitionError> {
        match self.state {
            TransitionState::Permanent => self.request_pose(),
            TransitionState::Pose => self.request_permanent(),
            busy => {
                log::warn!("transition rejected: {busy} in progress");
                Err(TransitionError::Busy(busy))
            }
        }
    }

    /// Crossfade every paired limb into its pose and start the ring
    /// reveals. Only accepted from [`TransitionState::Permanent`].
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyInState`] when holding the pose,
    /// [`TransitionError::Busy`] while a transition runs and
    /// [`TransitionError::MissingClips`] if a pose clip is missing.
    pub fn request_pose(&mut self) -> Result<(), TransitionError> {
        match self.state {
            TransitionState::Permanent => {}
            TransitionState::Pose => {
                log::info!("pose requested while already holding it");
                return Err(TransitionError::AlreadyInState(self.state));
            }
            busy => {
                log::warn!("pose transition rejected: {busy} in progress");
                return Err(TransitionError::Busy(busy));
            }
        }
        self.check_pose_clips()?;

        self.state = TransitionState::TransitioningToPose;
        self.grace_remaining = None;
        let limbs = self.registry.limbs().to_vec();
        for limb in limbs {
            // A ramp still driving the limb (startup fade-in, a forced
            // return) decides the weight it settles at.
            let current = self
                .registry
                .mixer()
                .get(limb.permanent)
                .map_or(1.0, WeightedAction::weight);
            let saved_weight = self
                .fades
                .target_weight(limb.permanent)
                .filter(|w| *w > 0.0)
                .unwrap_or(current);
            self.fades.crossfade(
                self.registry.mixer_mut(),
                limb.permanent,
                limb.pose,
                self.fade_duration,
                None,
            );
            self.tracks.push(LimbTrack {
                limb,
                saved_weight,
                phase: LimbPhase::FadingIn,
            });
        }
        self.start_rings();
        log::info!(
            "pose transition started: {} limbs, fade {:.2}s",
            self.tracks.len(),
            self.fade_duration
        );
        Ok(())
    }

    /// Crossfade every held pose back to its permanent action. Only
    /// accepted from [`TransitionState::Pose`].
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyInState`] when already permanent
    /// and [`TransitionError::Busy`] while a transition runs.
    pub fn request_permanent(&mut self) -> Result<(), TransitionError> {
        match self.state {
            TransitionState::Pose => {}
            TransitionState::Permanent => {
                log::info!("permanent requested while already in it");
                return Err(TransitionError::AlreadyInState(self.state));
            }
            busy => {
                log::warn!("return rejected: {busy} in progress");
                return Err(TransitionError::Busy(busy));
            }
        }
        for index in 0..self.tracks.len() {
            self.start_return(index);
        }
        log::info!("return to permanent started");
        Ok(())
    }

    /// Escape hatch for a lost completion: start every outstanding return
    /// now, then force [`TransitionState::Permanent`] after the grace
    /// period whether or not the crossfades landed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NothingToReturn`] if no pose is held or
    /// pending.
    pub fn force_return(&mut self) -> Result<(), TransitionError> {
        if self.state == TransitionState::Permanent && self.tracks.is_empty() {
            return Err(TransitionError::NothingToReturn);
        }
        log::warn!("forcing return to permanent from {}", self.state);
        for index in 0..self.tracks.len() {
            if self.tracks[index].phase != LimbPhase::Returning {
                self.start_return(index);
            }
        }
        if self.tracks.is_empty() {
            self.finish_return();
        } else {
            self.state = TransitionState::TransitioningToPermanent;
            self.grace_remaining = Some(self.grace_period);
        }
        Ok(())
    }

    /// Advance one frame: the mixer first, then weight ramps, then the
    /// events both produced.
    pub fn update(&mut self, dt: f32) {
        let finished = self.registry.mixer_mut().update(dt);
        let landed = self.fades.update(self.registry.mixer_mut(), dt);

        for ramp in landed {
            self.on_ramp_landed(ramp);
        }
        for id in finished {
            self.on_action_finished(id);
        }

        if let Some(remaining) = self.grace_remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                log::warn!(
                    "grace period elapsed with {} limbs outstanding",
                    self.tracks.len()
                );
                self.finish_return();
            }
        }

        let swept = self.fades.sweep_records();
        if swept > 0 {
            log::trace!("swept {swept} transition records");
        }
    }

    fn check_pose_clips(&self) -> Result<(), TransitionError> {
        let missing = self.registry.missing_pairs();
        let reason = if let Some(pair) = missing.first() {
            Some(format!("{} -> {}", pair.permanent, pair.pose))
        } else if self.registry.limbs().is_empty() {
            Some("no paired pose clips".to_owned())
        } else if self.registry.group(ActionGroup::Ring).is_empty() {
            Some("no ring clips".to_owned())
        } else {
            None
        };
        match reason {
            Some(reason) => {
                log::error!("cannot start pose transition: {reason}");
                Err(TransitionError::MissingClips(reason))
            }
            None => Ok(()),
        }
    }

    fn start_rings(&mut self) {
        let sync = self.sync_time_scale;
        let rings = self.registry.group(ActionGroup::Ring).to_vec();
        let mixer = self.registry.mixer_mut();
        for id in rings {
            if let Some(ring) = mixer.get_mut(id) {
                ring.set_loop_mode(LoopMode::OnceAndHold);
                ring.reset();
                ring.play();
                ring.set_weight(1.0);
                ring.set_time_scale(sync);
            }
        }
    }

    fn start_return(&mut self, index: usize) {
        let Some(track) = self.tracks.get_mut(index) else {
            return;
        };
        track.phase = LimbPhase::Returning;
        let LimbTrack {
            limb, saved_weight, ..
        } = *track;
        self.fades.crossfade(
            self.registry.mixer_mut(),
            limb.pose,
            limb.permanent,
            self.fade_duration,
            Some(saved_weight),
        );
        self.state = TransitionState::TransitioningToPermanent;
    }

    fn on_ramp_landed(&mut self, ramp: RampCompleted) {
        if ramp.stopped {
            return;
        }
        if let Some(track) = self.tracks.iter_mut().find(|t| {
            t.phase == LimbPhase::FadingIn && t.limb.pose == ramp.action
        }) {
            track.phase = LimbPhase::Holding;
            let all_holding = self.tracks.iter().all(|t| t.phase == LimbPhase::Holding);
            if all_holding && self.state == TransitionState::TransitioningToPose {
                self.state = TransitionState::Pose;
                log::info!("pose reached");
            }
            return;
        }

        let before = self.tracks.len();
        self.tracks.retain(|t| {
            !(t.phase == LimbPhase::Returning && t.limb.permanent == ramp.action)
        });
        if self.tracks.len() < before
            && self.tracks.is_empty()
            && self.state == TransitionState::TransitioningToPermanent
        {
            self.finish_return();
        }
    }

    fn on_action_finished(&mut self, id: ActionId) {
        let name = self
            .registry
            .mixer()
            .get(id)
            .map(|a| a.name().to_owned())
            .unwrap_or_default();
        if let Some(callback) = self.on_animation_finished.as_mut() {
            callback(&name);
        }

        match self.registry.group_of(id) {
            Some(ActionGroup::Pose) => {
                let index = self.tracks.iter().position(|t| {
                    t.limb.pose == id && t.phase != LimbPhase::Returning
                });
                if let Some(index) = index {
                    log::debug!("pose '{name}' finished, returning limb");
                    self.start_return(index);
                }
            }
            Some(ActionGroup::Ring) => log::trace!("ring '{name}' finished"),
            _ => {}
        }
    }

    fn finish_return(&mut self) {
        self.tracks.clear();
        self.grace_remaining = None;
        self.state = TransitionState::Permanent;
        log::info!("back to permanent");
        if let Some(callback) = self.on_transition_complete.as_mut() {
            callback(self.state);
        }
    }

    /// Set the crossfade length, clamped to `[0.1, 3.0]` seconds.
    pub fn set_fade_duration(&mut self, seconds: f32) {
        let (lo, hi) = TUNING_RANGE;
        self.fade_duration = seconds.clamp(lo, hi);
    }

    /// Apply one time scale, clamped to `[0.1, 3.0]`, to every action.
    pub fn set_time_scale(&mut self, scale: f32) {
        let (lo, hi) = TUNING_RANGE;
        let scale = scale.clamp(lo, hi);
        self.time_scale = scale;
        self.registry
            .mixer_mut()
            .for_each_mut(|a| a.set_time_scale(scale));
    }

    /// Register the callback fired when the model is back to permanent.
    pub fn set_on_transition_complete(&mut self, callback: impl FnMut(TransitionState) + 'static) {
        self.on_transition_complete = Some(Box::new(callback));
    }

    /// Register the callback fired for every play-once action that ends.
    pub fn set_on_animation_finished(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_animation_finished = Some(Box::new(callback));
    }

    /// Aggregate state.
    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether a choreography is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// Snapshot for UI display.
    #[must_use]
    pub fn snapshot(&self) -> TransitionSnapshot {
        TransitionSnapshot {
            state: self.state,
            is_transitioning: self.is_transitioning(),
            active_limbs: self.tracks.len(),
            fade_duration: self.fade_duration,
            time_scale: self.time_scale,
        }
    }

    /// Crossfade length in seconds.
    #[must_use]
    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }

    /// Global time scale last applied.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Limbs currently away from their permanent action.
    #[must_use]
    pub fn active_limbs(&self) -> usize {
        self.tracks.len()
    }

    /// Clip names per group.
    #[must_use]
    pub fn available_animations(&self) -> AvailableAnimations {
        AvailableAnimations {
            permanent: self.registry.names(ActionGroup::Permanent),
            pose: self.registry.names(ActionGroup::Pose),
            ring: self.registry.names(ActionGroup::Ring),
        }
    }

    /// Crossfades started and not yet swept.
    #[must_use]
    pub fn transition_records(&self) -> Vec<TransitionRecordInfo> {
        let mixer = self.registry.mixer();
        let name = |id| {
            mixer
                .get(id)
                .map(|a| a.name().to_owned())
                .unwrap_or_default()
        };
        let now = self.fades.clock();
        let mut records: Vec<TransitionRecordInfo> = self
            .fades
            .records()
            .map(|r| TransitionRecordInfo {
                from: name(r.from),
                to: name(r.to),
                elapsed: r.elapsed(now),
                duration: r.duration,
            })
            .collect();
        records.sort_by(|a, b| a.from.cmp(&b.from));
        records
    }

    /// The action registry.
    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// The mixer holding every action.
    #[must_use]
    pub fn mixer(&self) -> &ActionMixer {
        self.registry.mixer()
    }

    /// The weight ramp engine.
    #[must_use]
    pub fn fades(&self) -> &CrossfadeEngine {
        &self.fades
    }

    /// Stop everything and release every action and callback.
    pub fn dispose(&mut self) {
        self.fades.clear();
        self.registry.clear();
        self.tracks.clear();
        self.grace_remaining = None;
        self.state = TransitionState::Permanent;
        self.on_transition_complete = None;
        self.on_animation_finished = None;
        log::info!("animation controller disposed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::scene::rig::eye_rig;
    use crate::util::easing::EasingFunction;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> AnimationTransitionController {
        let mut c = AnimationTransitionController::new(
            &eye_rig().clips,
            &AnimationOptions::default(),
        );
        let _ = c.start_permanent_animations();
        tick(&mut c, 1.0);
        c
    }

    fn tick(c: &mut AnimationTransitionController, secs: f32) {
        let steps = (secs / DT).ceil() as usize;
        for _ in 0..steps {
            c.update(DT);
        }
    }

    fn weight(c: &AnimationTransitionController, name: &str) -> f32 {
        let id = c.mixer().find(name).unwrap();
        c.mixer().get(id).unwrap().weight()
    }

    fn running(c: &AnimationTransitionController, name: &str) -> bool {
        let id = c.mixer().find(name).unwrap();
        c.mixer().get(id).unwrap().is_running()
    }

    #[test]
    fn permanent_animations_fade_in() {
        let c = controller();
        assert!((weight(&c, "Bras_R1_Mouv") - 1.0).abs() < 1e-6);
        assert!(running(&c, "Little_3_Mouv"));
        assert_eq!(c.state(), TransitionState::Permanent);
    }

    #[test]
    fn pose_crossfade_hands_weight_to_poses() {
        let mut c = controller();
        assert!(c.request_transition().is_ok());
        assert_eq!(c.state(), TransitionState::TransitioningToPose);
        let fade = c.fade_duration();
        tick(&mut c, fade + 0.05);

        for limb in ["Bras_R1_Mouv", "Bras_R2_Mouv"] {
            assert!(weight(&c, limb) < 1e-6);
            assert!(!running(&c, limb));
        }
        for pose in ["R1&R2_Pose", "R2&R1_Pose"] {
            assert!((weight(&c, pose) - 1.0).abs() < 1e-6);
        }
        // Unpaired limbs keep looping.
        assert!((weight(&c, "Bras_L1_Mouv") - 1.0).abs() < 1e-6);
        assert_eq!(c.state(), TransitionState::Pose);
    }

    #[test]
    fn crossfade_curve_comes_from_options() {
        let options = AnimationOptions {
            crossfade_easing: EasingFunction::Linear,
            ..AnimationOptions::default()
        };
        let mut c = AnimationTransitionController::new(&eye_rig().clips, &options);
        let _ = c.start_permanent_animations();
        tick(&mut c, 1.0);
        c.request_transition().unwrap();
        c.update(0.75);
        assert!((weight(&c, "R1&R2_Pose") - 0.5).abs() < 1e-4);
        assert!((weight(&c, "Bras_R1_Mouv") - 0.5).abs() < 1e-4);
    }

    #[test]
    fn rings_share_time_scale() {
        let mut c = controller();
        c.request_pose().unwrap();
        let opts = AnimationOptions::default();
        for id in c.registry().group(ActionGroup::Ring) {
            let ring = c.mixer().get(*id).unwrap();
            assert!(ring.is_running());
            assert_eq!(ring.weight(), 1.0);
            assert_eq!(ring.time_scale(), opts.sync_time_scale);
            assert_eq!(ring.time(), 0.0);
        }
    }

    #[test]
    fn second_request_is_rejected_without_side_effects() {
        let mut c = controller();
        c.request_transition().unwrap();
        let before = c.snapshot();
        let err = c.request_transition().unwrap_err();
        assert_eq!(err, TransitionError::Busy(TransitionState::TransitioningToPose));
        let after = c.snapshot();
        assert_eq!(before.state, after.state);
        assert_eq!(before.active_limbs, after.active_limbs);
    }

    #[test]
    fn same_steady_state_is_a_no_op() {
        let mut c = controller();
        assert_eq!(
            c.request_permanent(),
            Err(TransitionError::AlreadyInState(TransitionState::Permanent))
        );
        assert_eq!(c.state(), TransitionState::Permanent);
    }

    #[test]
    fn finished_poses_return_and_restore_saved_weight() {
        let mut c = controller();
        let r1 = c.mixer().find("Bras_R1_Mouv").unwrap();
        c.registry.mixer_mut().get_mut(r1).unwrap().set_weight(0.6);

        let completions = Rc::new(Cell::new(0));
        let seen = Rc::clone(&completions);
        c.set_on_transition_complete(move |state| {
            assert_eq!(state, TransitionState::Permanent);
            seen.set(seen.get() + 1);
        });

        c.request_transition().unwrap();
        // Pose clip: 3.2s at 0.8 → 4s, then a 1.5s return.
        tick(&mut c, 4.2);
        assert_eq!(c.state(), TransitionState::TransitioningToPermanent);
        tick(&mut c, 1.5);

        assert_eq!(c.state(), TransitionState::Permanent);
        assert_eq!(completions.get(), 1);
        assert_eq!(c.active_limbs(), 0);
        assert!((weight(&c, "Bras_R1_Mouv") - 0.6).abs() < 1e-6);
        assert!((weight(&c, "Bras_R2_Mouv") - 1.0).abs() < 1e-6);
        assert!(weight(&c, "R1&R2_Pose") < 1e-6);
        assert!(!running(&c, "R1&R2_Pose"));
    }

    #[test]
    fn manual_return_from_pose() {
        let mut c = controller();
        c.set_time_scale(0.1);
        c.request_transition().unwrap();
        tick(&mut c, 1.6);
        assert_eq!(c.state(), TransitionState::Pose);
        c.request_transition().unwrap();
        assert_eq!(c.state(), TransitionState::TransitioningToPermanent);
        tick(&mut c, 1.6);
        assert_eq!(c.state(), TransitionState::Permanent);
    }

    #[test]
    fn force_return_completes_after_grace() {
        let mut c = controller();
        c.set_fade_duration(3.0);
        c.request_transition().unwrap();
        tick(&mut c, 0.5);
        c.force_return().unwrap();
        assert_eq!(c.state(), TransitionState::TransitioningToPermanent);
        tick(&mut c, 0.15);
        assert_eq!(c.state(), TransitionState::Permanent);
        assert_eq!(c.active_limbs(), 0);
        assert_eq!(c.force_return(), Err(TransitionError::NothingToReturn));
    }

    #[test]
    fn transition_after_forced_return_restores_full_weight() {
        let mut c = controller();
        c.request_transition().unwrap();
        tick(&mut c, 0.5);
        c.force_return().unwrap();
        tick(&mut c, 0.15);
        assert_eq!(c.state(), TransitionState::Permanent);

        // The forced return's ramps are still running here.
        c.request_transition().unwrap();
        tick(&mut c, 10.0);
        assert_eq!(c.state(), TransitionState::Permanent);
        assert!((weight(&c, "Bras_R1_Mouv") - 1.0).abs() < 1e-6);
        assert!((weight(&c, "Bras_R2_Mouv") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn transition_during_startup_fade_restores_full_weight() {
        let mut c = AnimationTransitionController::new(
            &eye_rig().clips,
            &AnimationOptions::default(),
        );
        let _ = c.start_permanent_animations();
        tick(&mut c, 0.05);
        assert!(weight(&c, "Bras_R1_Mouv") < 1.0);

        c.request_transition().unwrap();
        tick(&mut c, 10.0);
        assert_eq!(c.state(), TransitionState::Permanent);
        assert!((weight(&c, "Bras_R1_Mouv") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_clips_abort_cleanly() {
        let clips: Vec<AnimationClip> = eye_rig()
            .clips
            .into_iter()
            .filter(|c| !c.name.contains("Ring"))
            .collect();
        let mut c = AnimationTransitionController::new(&clips, &AnimationOptions::default());
        let err = c.request_transition().unwrap_err();
        assert!(matches!(err, TransitionError::MissingClips(_)));
        assert_eq!(c.state(), TransitionState::Permanent);
        assert_eq!(c.active_limbs(), 0);
        assert_eq!(c.fades().active_ramps(), 0);
    }

    #[test]
    fn tuning_is_clamped() {
        let mut c = controller();
        c.set_fade_duration(10.0);
        assert_eq!(c.fade_duration(), 3.0);
        c.set_time_scale(0.0);
        assert_eq!(c.time_scale(), 0.1);
        assert!(c.mixer().iter().all(|(_, a)| a.time_scale() == 0.1));
    }

    #[test]
    fn finished_callback_names_clip() {
        let mut c = controller();
        let names = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = Rc::clone(&names);
        c.set_on_animation_finished(move |name| sink.borrow_mut().push(name.to_owned()));
        c.request_transition().unwrap();
        tick(&mut c, 4.2);
        let names = names.borrow();
        assert!(names.iter().any(|n| n == "Action_Ring"));
        assert!(names.iter().any(|n| n == "R1&R2_Pose"));
    }

    #[test]
    fn records_visible_during_crossfade() {
        let mut c = controller();
        c.request_transition().unwrap();
        tick(&mut c, 0.5);
        let records = c.transition_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].from, "Bras_R1_Mouv");
        assert!(records[0].elapsed > 0.4);
        tick(&mut c, 1.2);
        assert!(c.transition_records().is_empty());
    }

    #[test]
    fn available_animations_lists_groups() {
        let c = controller();
        let all = c.available_animations();
        assert_eq!(all.pose.len(), 2);
        assert_eq!(all.ring.len(), 8);
        assert_eq!(all.permanent.len(), 17);
    }

    #[test]
    fn dispose_empties_mixer() {
        let mut c = controller();
        c.dispose();
        assert!(c.mixer().is_empty());
        assert_eq!(c.state(), TransitionState::Permanent);
    }
}
