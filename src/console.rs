//! Console interrupt button: fades in only when the session stays busy.
//!
//! Showing the button is deferred so that short-lived commands never flash
//! it. Each deferred show holds a [`ShowToken`]; hiding invalidates the
//! token, and the due-time check refuses to fire for a stale one. The button
//! also hides on every console prompt, which covers a missed idle
//! notification (the client may drop the busy=false event if the session
//! suspends while it is out of coverage).

use std::time::{Duration, Instant};

const SHOW_DELAY: Duration = Duration::from_millis(750);
const FADE_DURATION: Duration = Duration::from_millis(250);

/// Token for one pending deferred show. Stale tokens never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowToken(u64);

#[derive(Debug)]
pub struct InterruptButton {
    enabled: bool,
    pending: Option<(ShowToken, Instant)>,
    fade_started: Option<Instant>,
    next_token: u64,
    show_delay: Duration,
    fade_duration: Duration,
}

impl InterruptButton {
    pub fn new() -> Self {
        Self::with_timing(SHOW_DELAY, FADE_DURATION)
    }

    pub fn with_timing(show_delay: Duration, fade_duration: Duration) -> Self {
        Self {
            enabled: false,
            pending: None,
            fade_started: None,
            next_token: 0,
            show_delay,
            fade_duration,
        }
    }

    pub fn on_busy(&mut self, busy: bool, now: Instant) {
        if busy {
            self.begin_show(now);
        } else {
            self.hide();
        }
    }

    pub fn on_console_prompt(&mut self) {
        self.hide();
    }

    /// Fire a due pending show. Call once per frame with the current time.
    pub fn tick(&mut self, now: Instant) {
        if let Some((token, due)) = self.pending {
            if now >= due && self.is_valid(token) {
                self.pending = None;
                self.fade_started = Some(now);
            }
        }
    }

    /// Whether the interrupt command should be accepted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current opacity of the button, ramping 0 → 1 over the fade duration.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.fade_started {
            Some(started) => {
                let elapsed = now.saturating_duration_since(started).as_secs_f32();
                (elapsed / self.fade_duration.as_secs_f32()).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.opacity(now) > 0.0
    }

    /// Token of the pending show, if one is scheduled.
    pub fn pending_token(&self) -> Option<ShowToken> {
        self.pending.map(|(token, _)| token)
    }

    /// A token is valid while it still matches the pending show.
    pub fn is_valid(&self, token: ShowToken) -> bool {
        self.pending.map(|(current, _)| current) == Some(token)
    }

    fn begin_show(&mut self, now: Instant) {
        self.hide();
        self.enabled = true;
        let token = self.mint_token();
        self.pending = Some((token, now + self.show_delay));
    }

    fn hide(&mut self) {
        // invalidate any pending show and stop an in-flight fade
        self.pending = None;
        self.fade_started = None;
        self.enabled = false;
    }

    fn mint_token(&mut self) -> ShowToken {
        self.next_token += 1;
        ShowToken(self.next_token)
    }
}

impl Default for InterruptButton {
    fn default() -> Self {
        Self::new()
    }
}
