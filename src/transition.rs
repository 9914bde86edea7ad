//! Fade transition state machine
//!
//! ```text
//! Idle ──request──▶ FadingOut ──progress ≥ 1──▶ (switch) ──▶ FadingIn ──progress ≥ 1──▶ Idle
//! ```
//!
//! The switch is instantaneous: [`Transition::advance`] hands the pending
//! screen back to the caller, who destroys the old screen and constructs the
//! new one before the frame continues.

use std::fmt;

use tracing::debug;

use crate::screen::{ScreenId, ScreenPayload};

/// Default seconds per fade phase
pub const DEFAULT_TRANSITION_SECONDS: f32 = 0.5;

/// Current phase of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    FadingOut,
    FadingIn,
}

/// Screen waiting for the outgoing fade to finish
pub struct PendingScreen {
    pub id: ScreenId,
    pub payload: Option<ScreenPayload>,
}

impl fmt::Debug for PendingScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingScreen")
            .field("id", &self.id)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

/// What the caller must do after [`Transition::advance`]
#[derive(Debug)]
pub enum TransitionStep {
    /// Nothing changed hands this frame
    Holding,
    /// The outgoing fade completed: swap to this screen now
    Switch(PendingScreen),
    /// The incoming fade completed; the machine is idle again
    Finished,
}

/// Fade-out / switch / fade-in state machine
///
/// At most one transition is in flight; requests made while one is running
/// are dropped, not queued.
#[derive(Debug)]
pub struct Transition {
    phase: TransitionPhase,
    progress: f32,
    duration: f32,
    pending: Option<PendingScreen>,
}

impl Transition {
    /// Creates an idle machine with `duration` seconds per phase
    pub fn new(duration: f32) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            progress: 0.0,
            duration,
            pending: None,
        }
    }

    /// Starts a transition to `id` unless one is already running
    ///
    /// Returns false when the request was dropped.
    pub fn request(&mut self, id: ScreenId, payload: Option<ScreenPayload>) -> bool {
        if self.is_transitioning() {
            debug!(
                requested = ?id,
                pending = ?self.pending_id(),
                "Transition already in progress, dropping request"
            );
            return false;
        }

        debug!(target_screen = ?id, duration = self.duration, "Transition requested");
        self.phase = TransitionPhase::FadingOut;
        self.progress = 0.0;
        self.pending = Some(PendingScreen { id, payload });
        true
    }

    /// Advances the current phase by `dt` seconds
    ///
    /// A non-positive duration counts as already complete, so a zero-length
    /// transition reports its switch and then finishes within the same call
    /// sequence (the caller sees `Switch`, and the machine is idle afterwards).
    pub fn advance(&mut self, dt: f32) -> TransitionStep {
        match self.phase {
            TransitionPhase::Idle => TransitionStep::Holding,
            TransitionPhase::FadingOut => {
                self.accumulate(dt);
                if self.progress < 1.0 {
                    return TransitionStep::Holding;
                }

                self.phase = TransitionPhase::FadingIn;
                self.progress = 0.0;
                let Some(pending) = self.pending.take() else {
                    // request() always sets a pending screen alongside FadingOut
                    self.finish();
                    return TransitionStep::Finished;
                };
                if self.duration <= 0.0 {
                    self.finish();
                }
                TransitionStep::Switch(pending)
            }
            TransitionPhase::FadingIn => {
                self.accumulate(dt);
                if self.progress < 1.0 {
                    return TransitionStep::Holding;
                }
                self.finish();
                TransitionStep::Finished
            }
        }
    }

    fn accumulate(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.progress = 1.0;
        } else {
            self.progress += dt / self.duration;
        }
    }

    fn finish(&mut self) {
        self.phase = TransitionPhase::Idle;
        self.progress = 0.0;
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// True during the outgoing phase
    pub fn is_fading_out(&self) -> bool {
        self.phase == TransitionPhase::FadingOut
    }

    /// Progress through the current phase, in [0, 1]
    pub fn progress(&self) -> f32 {
        self.progress.min(1.0)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn pending_id(&self) -> Option<ScreenId> {
        self.pending.as_ref().map(|p| p.id)
    }

    pub fn has_pending_payload(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.payload.is_some())
    }

    /// Opacity of the black fade overlay, or `None` when idle
    pub fn overlay_opacity(&self) -> Option<f32> {
        match self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::FadingOut => Some(self.progress()),
            TransitionPhase::FadingIn => Some(1.0 - self.progress()),
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION_SECONDS)
    }
}
