//! UI shell state: toasts, the score dialog and HUD text
//!
//! Everything here is plain state so it can be tested natively; the
//! DOM binding lives in `dom` (wasm32 only).

pub mod pages;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use crate::consts::{PLAYER_NAME_MAX_LEN, TOAST_SECONDS};
use crate::scores::{ScoreError, ScoreSubmission, validate_player_name};
use crate::sim::{ControlScheme, GameOverReport, GamePhase, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// CSS modifier class
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast-info",
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
    /// Seconds left on screen
    pub remaining: f32,
}

/// Timed, dismissible notifications
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u32,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            remaining: TOAST_SECONDS,
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u32 {
        self.push(ToastKind::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u32 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u32 {
        self.push(ToastKind::Error, message)
    }

    /// Age every toast; returns true if any expired
    pub fn update(&mut self, dt: f32) -> bool {
        let before = self.toasts.len();
        for toast in &mut self.toasts {
            toast.remaining -= dt;
        }
        self.toasts.retain(|t| t.remaining > 0.0);
        self.toasts.len() != before
    }

    pub fn dismiss(&mut self, id: u32) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

pub const SUBMIT_SUCCESS: &str = "Score submitted successfully!";
pub const SUBMIT_FAILURE: &str = "Failed to submit score";

/// Game-over score dialog
///
/// `Closed -> Open -> Submitting -> Closed`, falling back to `Open` when
/// the submission fails so the player can retry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScoreDialog {
    #[default]
    Closed,
    Open {
        report: GameOverReport,
        name: String,
    },
    Submitting {
        report: GameOverReport,
        name: String,
    },
}

impl ScoreDialog {
    pub fn open(&mut self, report: GameOverReport, name: &str) {
        *self = ScoreDialog::Open {
            report,
            name: cap_name(name),
        };
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ScoreDialog::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ScoreDialog::Submitting { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            ScoreDialog::Closed => "",
            ScoreDialog::Open { name, .. } | ScoreDialog::Submitting { name, .. } => name,
        }
    }

    pub fn report(&self) -> Option<GameOverReport> {
        match self {
            ScoreDialog::Closed => None,
            ScoreDialog::Open { report, .. } | ScoreDialog::Submitting { report, .. } => {
                Some(*report)
            }
        }
    }

    /// Mirror the name input; ignored while a submission is in flight
    pub fn set_name(&mut self, input: &str) {
        if let ScoreDialog::Open { name, .. } = self {
            *name = cap_name(input);
        }
    }

    /// Validate and move to `Submitting`
    ///
    /// Returns the request to send, or `None` when there is nothing to send
    /// (closed, already submitting, or the name was refused).
    pub fn begin_submit(&mut self, toasts: &mut ToastQueue) -> Option<ScoreSubmission> {
        let ScoreDialog::Open { report, name } = self else {
            return None;
        };
        let report = *report;
        let player_name = match validate_player_name(name) {
            Ok(n) => n,
            Err(e) => {
                toasts.error(e.to_string());
                return None;
            }
        };
        let request = ScoreSubmission {
            game: report.kind.name().to_string(),
            player_name: player_name.clone(),
            score: report.score,
        };
        *self = ScoreDialog::Submitting {
            report,
            name: player_name,
        };
        Some(request)
    }

    /// Apply the submission outcome; true when the game should reset
    ///
    /// The toast is raised even if the dialog was closed while the request
    /// was in flight.
    pub fn finish(&mut self, result: &Result<String, ScoreError>, toasts: &mut ToastQueue) -> bool {
        match result {
            Ok(_) => toasts.success(SUBMIT_SUCCESS),
            Err(_) => toasts.error(SUBMIT_FAILURE),
        };
        let ScoreDialog::Submitting { report, name } = self else {
            return false;
        };
        if result.is_ok() {
            *self = ScoreDialog::Closed;
            return true;
        }
        let (report, name) = (*report, std::mem::take(name));
        *self = ScoreDialog::Open { report, name };
        false
    }

    /// Close without submitting (not while a request is in flight)
    pub fn cancel(&mut self) {
        if !self.is_submitting() {
            *self = ScoreDialog::Closed;
        }
    }
}

fn cap_name(name: &str) -> String {
    name.chars().take(PLAYER_NAME_MAX_LEN).collect()
}

pub fn key_label(key: Key) -> &'static str {
    match key {
        Key::Up => "Up",
        Key::Down => "Down",
        Key::Left => "Left",
        Key::Right => "Right",
        Key::Action => "Space",
        Key::Pause => "P",
        Key::Restart => "R",
    }
}

/// Overlay text for the session phase, `None` while playing
pub fn phase_overlay(phase: GamePhase, controls: &ControlScheme) -> Option<String> {
    let pause = key_label(controls.pause_key);
    match phase {
        GamePhase::Ready if controls.pause_key == Key::Action => {
            Some("Press Space to start".to_string())
        }
        GamePhase::Ready => Some(format!("Press Space or {pause} to start")),
        GamePhase::Paused => Some(format!("Paused - press {pause} to resume")),
        GamePhase::GameOver => Some("Game Over - press R to play again".to_string()),
        GamePhase::Playing => None,
    }
}

/// Rolling frames-per-second over the last 60 frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    times: [f64; 60],
    index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            times: [0.0; 60],
            index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp in milliseconds
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.times[self.index] = time_ms;
        self.index = (self.index + 1) % self.times.len();

        // Oldest sample sits at the slot we write next
        let oldest = self.times[self.index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((self.times.len() - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
