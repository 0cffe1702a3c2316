//! Environment integrity guard.
//!
//! Tracks the two ambient signals a proctored session depends on (full-screen state
//! and page visibility) and turns them into an admission gate plus a violation count.

use thiserror::Error;

/// Page visibility as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// Parse the DOM `visibilityState` strings. Anything unknown counts as hidden.
    #[must_use]
    pub fn from_dom_state(state: &str) -> Self {
        match state {
            "visible" => Self::Visible,
            _ => Self::Hidden,
        }
    }
}

/// A change notification delivered by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentSignal {
    FullscreenChanged(bool),
    VisibilityChanged(Visibility),
}

/// Which environment APIs are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentSupport {
    pub fullscreen: bool,
    pub visibility: bool,
}

impl EnvironmentSupport {
    #[must_use]
    pub const fn full() -> Self {
        Self {
            fullscreen: true,
            visibility: true,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            fullscreen: false,
            visibility: false,
        }
    }

    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.fullscreen && self.visibility
    }
}

impl Default for EnvironmentSupport {
    fn default() -> Self {
        Self::full()
    }
}

/// Admission gate for quiz interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    Closed,
    /// The environment cannot report the signals; the gate never opens.
    Unsupported,
}

impl Gate {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Rendering-level interrupt that preempts question content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Blocked,
    Violated,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvironmentError {
    #[error("full-screen is not supported by this environment")]
    Unsupported,
}

/// Commands the guard can issue to the environment.
pub trait FullscreenControl {
    /// Ask the environment to enter full-screen.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentError` if the request cannot be issued.
    fn request_fullscreen(&self) -> Result<(), EnvironmentError>;

    /// Ask the environment to leave full-screen.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentError` if the request cannot be issued.
    fn exit_fullscreen(&self) -> Result<(), EnvironmentError>;
}

/// Observes full-screen and visibility signals and owns the violation counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentGuard {
    support: EnvironmentSupport,
    fullscreen_active: bool,
    tab_visible: bool,
    violation_count: u32,
}

impl EnvironmentGuard {
    #[must_use]
    pub fn new(support: EnvironmentSupport) -> Self {
        Self {
            support,
            fullscreen_active: false,
            // Without a visibility API the page is treated as hidden.
            tab_visible: support.is_complete(),
            violation_count: 0,
        }
    }

    #[must_use]
    pub fn support(&self) -> EnvironmentSupport {
        self.support
    }

    #[must_use]
    pub fn fullscreen_active(&self) -> bool {
        self.fullscreen_active
    }

    #[must_use]
    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    #[must_use]
    pub fn gate(&self) -> Gate {
        if !self.support.is_complete() {
            Gate::Unsupported
        } else if self.fullscreen_active {
            Gate::Open
        } else {
            Gate::Closed
        }
    }

    /// The interrupt to render instead of quiz content, if any.
    ///
    /// A closed gate takes precedence over a hidden tab.
    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        if !self.gate().is_open() {
            Some(Overlay::Blocked)
        } else if !self.tab_visible {
            Some(Overlay::Violated)
        } else {
            None
        }
    }

    /// True when the quiz may accept input: gate open and tab visible.
    #[must_use]
    pub fn admits_input(&self) -> bool {
        self.overlay().is_none()
    }

    /// Record a full-screen change and return the new state.
    pub fn on_fullscreen_change(&mut self, active: bool) -> bool {
        if self.support.is_complete() {
            self.fullscreen_active = active;
        }
        self.fullscreen_active
    }

    /// Record a visibility change and return whether the tab is now visible.
    ///
    /// Only a visible-to-hidden edge counts as a violation.
    pub fn on_visibility_change(&mut self, visibility: Visibility) -> bool {
        if !self.support.is_complete() {
            return self.tab_visible;
        }
        match visibility {
            Visibility::Hidden => {
                if self.tab_visible {
                    self.violation_count = self.violation_count.saturating_add(1);
                }
                self.tab_visible = false;
            }
            Visibility::Visible => self.tab_visible = true,
        }
        self.tab_visible
    }

    /// Take the environment's current state without treating it as a change.
    ///
    /// Used for the first reading after subscribing, so a page that is already
    /// hidden does not count as a violation.
    pub fn sample(&mut self, fullscreen_active: bool, visibility: Visibility) {
        if !self.support.is_complete() {
            return;
        }
        self.fullscreen_active = fullscreen_active;
        self.tab_visible = visibility == Visibility::Visible;
    }

    /// Dispatch a signal to the matching handler.
    pub fn apply(&mut self, signal: EnvironmentSignal) -> bool {
        match signal {
            EnvironmentSignal::FullscreenChanged(active) => self.on_fullscreen_change(active),
            EnvironmentSignal::VisibilityChanged(visibility) => {
                self.on_visibility_change(visibility)
            }
        }
    }

    /// Ask the environment to enter full-screen unless it already is.
    ///
    /// The gate opens only once the environment reports the change.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentError::Unsupported` on an unsupported environment, or the
    /// error reported by `control`.
    pub fn request_enter(&self, control: &dyn FullscreenControl) -> Result<(), EnvironmentError> {
        if !self.support.fullscreen {
            return Err(EnvironmentError::Unsupported);
        }
        if self.fullscreen_active {
            return Ok(());
        }
        control.request_fullscreen()
    }

    /// Ask the environment to leave full-screen unless it already has.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentError::Unsupported` on an unsupported environment, or the
    /// error reported by `control`.
    pub fn request_exit(&self, control: &dyn FullscreenControl) -> Result<(), EnvironmentError> {
        if !self.support.fullscreen {
            return Err(EnvironmentError::Unsupported);
        }
        if !self.fullscreen_active {
            return Ok(());
        }
        control.exit_fullscreen()
    }

    /// Seed the counter from a persisted session.
    pub fn restore_violations(&mut self, count: u32) {
        self.violation_count = count;
    }

    /// Zero the counter. Signal state is left as observed.
    pub fn reset(&mut self) {
        self.violation_count = 0;
    }
}

impl Default for EnvironmentGuard {
    fn default() -> Self {
        Self::new(EnvironmentSupport::full())
    }
}
