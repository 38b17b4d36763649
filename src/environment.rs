//! Exposure themes and the animator that moves between them.
//!
//! A theme change interpolates from the exposure the authority holds right
//! now to the theme's target with a cubic ease-in-out, writing through the
//! authority every frame. The final frame writes the target itself, so a
//! completed change always lands on it exactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::exposure::ExposureAuthority;
use crate::options::EnvironmentOptions;
use crate::util::easing::EasingFunction;

/// Named exposure theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeName {
    /// Dark, high-contrast glow.
    Night,
    /// Neutral.
    Day,
    /// Bright, intense glow.
    Bright,
}

impl ThemeName {
    /// Every theme, in cycle order.
    pub const ALL: [Self; 3] = [Self::Night, Self::Day, Self::Bright];

    /// Upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Night => "NIGHT",
            Self::Day => "DAY",
            Self::Bright => "BRIGHT",
        }
    }

    /// Parse a theme name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// The theme after this one in cycle order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Night => Self::Day,
            Self::Day => Self::Bright,
            Self::Bright => Self::Night,
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Target exposure.
    pub exposure: f32,
    /// Default transition length in milliseconds.
    pub duration_ms: u64,
    /// Suggested ambient light intensity.
    pub ambient_intensity: f32,
    /// Suggested directional light intensity.
    pub directional_intensity: f32,
    /// Short label for UI.
    pub description: String,
}

impl ThemeConfig {
    pub(crate) fn new(exposure: f32, ambient: f32, directional: f32, description: &str) -> Self {
        Self {
            exposure,
            duration_ms: 2000,
            ambient_intensity: ambient,
            directional_intensity: directional,
            description: description.to_owned(),
        }
    }

    /// Default transition length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Why a theme change was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// A theme transition is already running.
    TransitionInProgress,
    /// Theme name not recognised.
    UnknownTheme(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransitionInProgress => f.write_str("theme transition already in progress"),
            Self::UnknownTheme(name) => write!(f, "unknown theme '{name}'"),
        }
    }
}

impl std::error::Error for ThemeError {}

/// Outcome of an accepted theme change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChange {
    /// Interpolation scheduled.
    Started,
    /// The theme was already active at its target exposure.
    AlreadyActive,
}

#[derive(Debug, Clone, Copy)]
struct ThemeTransition {
    target: ThemeName,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// Current theme as reported to UI.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentTheme {
    /// Theme name. During a transition, the theme being moved to.
    pub name: ThemeName,
    /// Its configuration.
    pub config: ThemeConfig,
    /// Exposure read from the authority.
    pub exposure: f32,
    /// Whether a transition is running.
    pub is_transitioning: bool,
}

/// Detailed animator state.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeStatus {
    /// Current theme.
    pub current_theme: ThemeName,
    /// Exposure read from the authority.
    pub current_exposure: f32,
    /// Whether a transition is running.
    pub is_transitioning: bool,
    /// Transition progress in `[0, 1]`, when one is running.
    pub progress: Option<f32>,
    /// Every theme.
    pub available_themes: Vec<ThemeName>,
}

/// Drives the exposure authority between themes.
#[derive(Debug, Clone)]
pub struct ThemeAnimator {
    night: ThemeConfig,
    day: ThemeConfig,
    bright: ThemeConfig,
    current: ThemeName,
    exposure: ExposureAuthority,
    easing: EasingFunction,
    transition: Option<ThemeTransition>,
}

impl ThemeAnimator {
    /// Animator writing through `exposure`, starting on the configured
    /// initial theme. The exposure itself is left alone until a change.
    #[must_use]
    pub fn new(options: &EnvironmentOptions, exposure: ExposureAuthority) -> Self {
        Self {
            night: options.night.clone(),
            day: options.day.clone(),
            bright: options.bright.clone(),
            current: options.initial_theme,
            exposure,
            easing: options.easing,
            transition: None,
        }
    }

    /// Configuration of a theme.
    #[must_use]
    pub fn theme(&self, name: ThemeName) -> &ThemeConfig {
        match name {
            ThemeName::Night => &self.night,
            ThemeName::Day => &self.day,
            ThemeName::Bright => &self.bright,
        }
    }

    /// Start moving to `name` over `duration` (the theme's own length when
    /// `None`). Refused while another transition runs.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::TransitionInProgress`] if a change is already
    /// running.
    pub fn change_theme(
        &mut self,
        name: ThemeName,
        duration: Option<Duration>,
    ) -> Result<ThemeChange, ThemeError> {
        if self.transition.is_some() {
            log::warn!("theme change to {name} refused: transition in progress");
            return Err(ThemeError::TransitionInProgress);
        }
        let config = self.theme(name);
        let to = config.exposure;
        let from = self.exposure.get_exposure();
        if name == self.current && from == to {
            log::info!("already on theme {name}");
            return Ok(ThemeChange::AlreadyActive);
        }
        let duration = duration.unwrap_or_else(|| config.duration()).as_secs_f32();

        log::info!(
            "theme {} -> {name} over {duration:.2}s (exposure {from:.2} -> {to:.2})",
            self.current
        );
        self.current = name;
        if duration <= 0.0 {
            let _ = self.exposure.set_exposure(to);
            return Ok(ThemeChange::Started);
        }
        self.transition = Some(ThemeTransition {
            target: name,
            from,
            to,
            duration,
            elapsed: 0.0,
        });
        Ok(ThemeChange::Started)
    }

    /// [`change_theme`](Self::change_theme) by name.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownTheme`] for an unknown name, otherwise
    /// as [`change_theme`](Self::change_theme).
    pub fn change_theme_named(
        &mut self,
        name: &str,
        duration: Option<Duration>,
    ) -> Result<ThemeChange, ThemeError> {
        let Some(theme) = ThemeName::parse(name) else {
            log::warn!("unknown theme '{name}'");
            return Err(ThemeError::UnknownTheme(name.to_owned()));
        };
        self.change_theme(theme, duration)
    }

    /// Change over 500 ms.
    ///
    /// # Errors
    ///
    /// As [`change_theme`](Self::change_theme).
    pub fn quick_change_theme(&mut self, name: ThemeName) -> Result<ThemeChange, ThemeError> {
        self.change_theme(name, Some(Duration::from_millis(500)))
    }

    /// Change over 4 s.
    ///
    /// # Errors
    ///
    /// As [`change_theme`](Self::change_theme).
    pub fn slow_change_theme(&mut self, name: ThemeName) -> Result<ThemeChange, ThemeError> {
        self.change_theme(name, Some(Duration::from_millis(4000)))
    }

    /// Change to the next theme in cycle order.
    ///
    /// # Errors
    ///
    /// As [`change_theme`](Self::change_theme).
    pub fn cycle_themes(&mut self) -> Result<ThemeChange, ThemeError> {
        self.change_theme(self.current.next(), None)
    }

    /// Advance the running transition. Returns the theme reached when the
    /// transition completes on this tick.
    pub fn update(&mut self, dt: f32) -> Option<ThemeName> {
        let transition = self.transition.as_mut()?;
        transition.elapsed += dt;
        let t = (transition.elapsed / transition.duration).clamp(0.0, 1.0);
        if t < 1.0 {
            let eased = self.easing.evaluate(t);
            let value = transition.from + (transition.to - transition.from) * eased;
            let _ = self.exposure.set_exposure(value);
            log::trace!("theme progress {:.0}%: exposure {value:.3}", t * 100.0);
            return None;
        }
        let ThemeTransition { target, to, .. } = *transition;
        let _ = self.exposure.set_exposure(to);
        self.transition = None;
        log::info!("theme {target} reached, exposure {to}");
        Some(target)
    }

    /// Cancel the running transition, leaving exposure where it is.
    /// Returns whether anything was cancelled.
    pub fn stop_transition(&mut self) -> bool {
        let stopped = self.transition.take().is_some();
        if stopped {
            log::info!(
                "theme transition stopped at exposure {:.3}",
                self.exposure.get_exposure()
            );
        }
        stopped
    }

    /// Whether a transition is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Current theme.
    #[must_use]
    pub fn current_theme(&self) -> CurrentTheme {
        CurrentTheme {
            name: self.current,
            config: self.theme(self.current).clone(),
            exposure: self.exposure.get_exposure(),
            is_transitioning: self.is_transitioning(),
        }
    }

    /// Every theme with its configuration.
    #[must_use]
    pub fn available_themes(&self) -> Vec<(ThemeName, ThemeConfig)> {
        ThemeName::ALL
            .into_iter()
            .map(|t| (t, self.theme(t).clone()))
            .collect()
    }

    /// Detailed state.
    #[must_use]
    pub fn status(&self) -> ThemeStatus {
        ThemeStatus {
            current_theme: self.current,
            current_exposure: self.exposure.get_exposure(),
            is_transitioning: self.is_transitioning(),
            progress: self
                .transition
                .map(|t| (t.elapsed / t.duration).clamp(0.0, 1.0)),
            available_themes: ThemeName::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn animator() -> (ThemeAnimator, ExposureAuthority) {
        let authority = ExposureAuthority::default();
        let animator = ThemeAnimator::new(&EnvironmentOptions::default(), authority.clone());
        (animator, authority)
    }

    fn run(animator: &mut ThemeAnimator, secs: f32) -> Option<ThemeName> {
        let mut reached = None;
        for _ in 0..(secs / DT).ceil() as usize {
            reached = animator.update(DT).or(reached);
        }
        reached
    }

    #[test]
    fn night_lands_exactly_on_target() {
        let (mut animator, authority) = animator();
        let reader = authority.reader();
        assert_eq!(
            animator.change_theme(ThemeName::Night, None),
            Ok(ThemeChange::Started)
        );
        // Other components reading mid-flight must not disturb the result.
        for _ in 0..200 {
            let _ = reader.get_exposure();
            let _ = animator.update(DT);
        }
        assert!(!animator.is_transitioning());
        assert_eq!(authority.get_exposure(), 0.3);
    }

    #[test]
    fn second_change_is_refused() {
        let (mut animator, _) = animator();
        let _ = animator.change_theme(ThemeName::Bright, None).unwrap();
        assert_eq!(
            animator.change_theme(ThemeName::Night, None),
            Err(ThemeError::TransitionInProgress)
        );
        assert_eq!(animator.current_theme().name, ThemeName::Bright);
    }

    #[test]
    fn interpolation_is_monotonic_and_eased() {
        let (mut animator, authority) = animator();
        let _ = animator
            .change_theme(ThemeName::Bright, Some(Duration::from_secs(1)))
            .unwrap();
        let _ = animator.update(0.25);
        let quarter = authority.get_exposure();
        let expected = 1.0 + 0.8 * EasingFunction::CubicInOut.evaluate(0.25);
        assert!((quarter - expected).abs() < 1e-6);
        let _ = animator.update(0.5);
        assert!(authority.get_exposure() > quarter);
        assert_eq!(animator.update(0.5), Some(ThemeName::Bright));
        assert_eq!(authority.get_exposure(), 1.8);
    }

    #[test]
    fn configured_easing_shapes_the_ramp() {
        let authority = ExposureAuthority::default();
        let options = EnvironmentOptions {
            easing: EasingFunction::Linear,
            ..EnvironmentOptions::default()
        };
        let mut animator = ThemeAnimator::new(&options, authority.clone());
        let _ = animator
            .change_theme(ThemeName::Bright, Some(Duration::from_secs(1)))
            .unwrap();
        let _ = animator.update(0.25);
        assert!((authority.get_exposure() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn starts_from_current_authority_value() {
        let (mut animator, authority) = animator();
        let _ = authority.set_exposure(1.5);
        let _ = animator
            .change_theme(ThemeName::Night, Some(Duration::from_secs(1)))
            .unwrap();
        let _ = animator.update(0.001);
        assert!(authority.get_exposure() > 1.49);
    }

    #[test]
    fn stop_leaves_intermediate_value() {
        let (mut animator, authority) = animator();
        let _ = animator.change_theme(ThemeName::Night, None).unwrap();
        let _ = run(&mut animator, 1.0);
        let mid = authority.get_exposure();
        assert!(mid > 0.3 && mid < 1.0);
        assert!(animator.stop_transition());
        let _ = run(&mut animator, 2.0);
        assert_eq!(authority.get_exposure(), mid);
        assert!(!animator.stop_transition());
    }

    #[test]
    fn same_theme_at_target_is_a_no_op() {
        let (mut animator, _) = animator();
        assert_eq!(
            animator.change_theme(ThemeName::Day, None),
            Ok(ThemeChange::AlreadyActive)
        );
        assert!(!animator.is_transitioning());
    }

    #[test]
    fn quick_and_cycle() {
        let (mut animator, authority) = animator();
        let _ = animator.quick_change_theme(ThemeName::Night).unwrap();
        assert_eq!(run(&mut animator, 0.55), Some(ThemeName::Night));
        let _ = animator.cycle_themes().unwrap();
        assert_eq!(animator.status().current_theme, ThemeName::Day);
        assert_eq!(run(&mut animator, 2.1), Some(ThemeName::Day));
        assert_eq!(authority.get_exposure(), 1.0);
        assert_eq!(
            animator.change_theme_named("dusk", None),
            Err(ThemeError::UnknownTheme("dusk".into()))
        );
    }

    #[test]
    fn slow_change_reports_progress() {
        let (mut animator, _) = animator();
        let _ = animator.slow_change_theme(ThemeName::Bright).unwrap();
        let _ = animator.update(1.0);
        let progress = animator.status().progress.unwrap();
        assert!((progress - 0.25).abs() < 1e-6);
    }
}
