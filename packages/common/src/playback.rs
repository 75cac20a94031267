//! Player state machine with a single interstitial commercial.
//!
//! The machine is host-agnostic: callers feed it [`PlayerEvent`]s from
//! whatever media element they drive and carry out the returned
//! [`PlayerEffect`]s. Time for the controls overlay is passed in explicitly
//! so the machine never reads a clock itself.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::video::{Commercial, Video};

/// A commercial may start once playback is past this fraction of the video...
pub const COMMERCIAL_WINDOW_START: f64 = 0.05;
/// ...and before this one.
pub const COMMERCIAL_WINDOW_END: f64 = 0.10;
/// Controls stay visible this long after the last pointer activity.
pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_secs(3);
/// Seconds of playback after which a view is counted.
pub const VIEW_THRESHOLD_SECS: f64 = 5.0;
/// Step used by the skip buttons.
pub const SKIP_SECS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub is_muted: bool,
    pub is_fullscreen: bool,
    pub show_controls: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_muted: false,
            is_fullscreen: false,
            show_controls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    MainContent,
    Commercial { commercial: Commercial },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Play,
    Pause,
    TogglePlay,
    TimeUpdate(f64),
    DurationChange(f64),
    Seek(f64),
    SkipBackward,
    SkipForward,
    SetVolume(f64),
    ToggleMute,
    ToggleFullscreen,
    FullscreenChanged(bool),
    CommercialEnded,
    CommercialFailed,
    PointerActivity(Instant),
    PointerLeft,
    Tick(Instant),
}

/// Instructions for the host media layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEffect {
    PlayMain,
    PauseMain,
    SeekMain(f64),
    ApplyVolume { volume: f64, muted: bool },
    RequestFullscreen,
    ExitFullscreen,
    PlayCommercial { url: String },
    StopCommercial,
    /// Playback passed the view threshold; count one view.
    RecordView,
}

#[derive(Debug, Clone)]
pub struct Player {
    state: PlayerState,
    phase: Phase,
    commercials: Vec<Commercial>,
    commercial_played: bool,
    view_recorded: bool,
    controls_deadline: Option<Instant>,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl Player {
    pub fn new(commercials: Vec<Commercial>) -> Self {
        Self {
            state: PlayerState::default(),
            phase: Phase::MainContent,
            commercials,
            commercial_played: false,
            view_recorded: false,
            controls_deadline: None,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn commercial_played(&self) -> bool {
        self.commercial_played
    }

    pub fn showing_commercial(&self) -> bool {
        matches!(self.phase, Phase::Commercial { .. })
    }

    /// Apply one event. `rng` is only consulted when a commercial is picked.
    pub fn handle<R: Rng>(&mut self, event: PlayerEvent, rng: &mut R) -> Vec<PlayerEffect> {
        match event {
            PlayerEvent::Play => self.play(),
            PlayerEvent::Pause => self.pause(),
            PlayerEvent::TogglePlay => {
                if self.state.is_playing {
                    self.pause()
                } else {
                    self.play()
                }
            }
            PlayerEvent::TimeUpdate(t) => self.time_update(finite_or_zero(t), rng),
            PlayerEvent::DurationChange(d) => {
                self.state.duration = finite_or_zero(d).max(0.0);
                Vec::new()
            }
            PlayerEvent::Seek(t) => self.seek(t),
            PlayerEvent::SkipBackward => self.seek(self.state.current_time - SKIP_SECS),
            PlayerEvent::SkipForward => self.seek(self.state.current_time + SKIP_SECS),
            PlayerEvent::SetVolume(v) => {
                self.state.volume = finite_or_zero(v).clamp(0.0, 1.0);
                self.volume_effect()
            }
            PlayerEvent::ToggleMute => {
                self.state.is_muted = !self.state.is_muted;
                self.volume_effect()
            }
            PlayerEvent::ToggleFullscreen => {
                if self.state.is_fullscreen {
                    vec![PlayerEffect::ExitFullscreen]
                } else {
                    vec![PlayerEffect::RequestFullscreen]
                }
            }
            PlayerEvent::FullscreenChanged(on) => {
                self.state.is_fullscreen = on;
                Vec::new()
            }
            PlayerEvent::CommercialEnded => self.end_commercial(true),
            PlayerEvent::CommercialFailed => self.end_commercial(false),
            PlayerEvent::PointerActivity(now) => {
                self.state.show_controls = true;
                self.controls_deadline = Some(now + CONTROLS_HIDE_DELAY);
                Vec::new()
            }
            PlayerEvent::PointerLeft => {
                if self.state.is_playing {
                    self.state.show_controls = false;
                }
                Vec::new()
            }
            PlayerEvent::Tick(now) => {
                if self.controls_deadline.is_some_and(|deadline| now >= deadline) {
                    self.controls_deadline = None;
                    if self.state.is_playing {
                        self.state.show_controls = false;
                    }
                }
                Vec::new()
            }
        }
    }

    fn play(&mut self) -> Vec<PlayerEffect> {
        if self.showing_commercial() {
            return Vec::new();
        }
        self.state.is_playing = true;
        vec![PlayerEffect::PlayMain]
    }

    fn pause(&mut self) -> Vec<PlayerEffect> {
        self.state.is_playing = false;
        vec![PlayerEffect::PauseMain]
    }

    fn seek(&mut self, target: f64) -> Vec<PlayerEffect> {
        let mut target = finite_or_zero(target).max(0.0);
        if self.state.duration > 0.0 {
            target = target.min(self.state.duration);
        }
        self.state.current_time = target;
        vec![PlayerEffect::SeekMain(target)]
    }

    fn volume_effect(&self) -> Vec<PlayerEffect> {
        vec![PlayerEffect::ApplyVolume {
            volume: self.state.volume,
            muted: self.state.is_muted,
        }]
    }

    fn in_commercial_window(&self, t: f64) -> bool {
        let duration = self.state.duration;
        t > duration * COMMERCIAL_WINDOW_START && t < duration * COMMERCIAL_WINDOW_END
    }

    fn time_update<R: Rng>(&mut self, t: f64, rng: &mut R) -> Vec<PlayerEffect> {
        self.state.current_time = t;
        let mut effects = Vec::new();

        if !self.view_recorded && self.state.is_playing && t > VIEW_THRESHOLD_SECS {
            self.view_recorded = true;
            effects.push(PlayerEffect::RecordView);
        }

        if self.commercial_played
            || self.commercials.is_empty()
            || self.showing_commercial()
            || !self.in_commercial_window(t)
        {
            return effects;
        }

        let commercial = self.commercials[rng.random_range(0..self.commercials.len())].clone();
        self.commercial_played = true;
        self.state.is_playing = false;
        effects.push(PlayerEffect::PauseMain);
        effects.push(PlayerEffect::PlayCommercial {
            url: commercial.video_url.clone(),
        });
        self.phase = Phase::Commercial { commercial };
        effects
    }

    fn end_commercial(&mut self, resume: bool) -> Vec<PlayerEffect> {
        if !self.showing_commercial() {
            return Vec::new();
        }
        self.phase = Phase::MainContent;
        let mut effects = vec![PlayerEffect::StopCommercial];
        if resume {
            self.state.is_playing = true;
            effects.push(PlayerEffect::PlayMain);
        }
        effects
    }
}

/// Commercial window in seconds for a video of `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CommercialWindow {
    pub start: f64,
    pub end: f64,
}

impl CommercialWindow {
    pub fn for_duration(duration: u64) -> Self {
        let duration = duration as f64;
        Self {
            start: duration * COMMERCIAL_WINDOW_START,
            end: duration * COMMERCIAL_WINDOW_END,
        }
    }
}

/// What a client needs to run a playback session for one video.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct PlaybackPlan {
    pub video_id: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: u64,
    pub commercials: Vec<Commercial>,
    /// Absent when there is nothing to inject.
    pub commercial_window: Option<CommercialWindow>,
    pub controls_hide_after_ms: u64,
    pub view_threshold_secs: f64,
}

impl PlaybackPlan {
    pub fn new(video: &Video, commercials: &[Commercial]) -> Self {
        let commercial_window = (!commercials.is_empty() && video.duration > 0)
            .then(|| CommercialWindow::for_duration(video.duration));
        Self {
            video_id: video.id.clone(),
            video_url: video.video_url.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            duration: video.duration,
            commercials: commercials.to_vec(),
            commercial_window,
            controls_hide_after_ms: CONTROLS_HIDE_DELAY.as_millis() as u64,
            view_threshold_secs: VIEW_THRESHOLD_SECS,
        }
    }
}
