use dioxus::document::eval;
use quiz_core::{
    EnvironmentError, EnvironmentSignal, EnvironmentSupport, FullscreenControl, Visibility,
};
use serde::Deserialize;

/// Messages posted by the subscription script through `dioxus.send`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomMessage {
    Support { fullscreen: bool, visibility: bool },
    /// Current state right after subscribing; not a change event.
    Initial { active: bool, state: String },
    Fullscreen { active: bool },
    Visibility { state: String },
}

impl DomMessage {
    #[must_use]
    pub fn support(&self) -> Option<EnvironmentSupport> {
        match self {
            DomMessage::Support {
                fullscreen,
                visibility,
            } => Some(EnvironmentSupport {
                fullscreen: *fullscreen,
                visibility: *visibility,
            }),
            _ => None,
        }
    }

    /// Full-screen flag and visibility from the first reading.
    #[must_use]
    pub fn initial(&self) -> Option<(bool, Visibility)> {
        match self {
            DomMessage::Initial { active, state } => {
                Some((*active, Visibility::from_dom_state(state)))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn signal(&self) -> Option<EnvironmentSignal> {
        match self {
            DomMessage::Support { .. } | DomMessage::Initial { .. } => None,
            DomMessage::Fullscreen { active } => Some(EnvironmentSignal::FullscreenChanged(*active)),
            DomMessage::Visibility { state } => Some(EnvironmentSignal::VisibilityChanged(
                Visibility::from_dom_state(state),
            )),
        }
    }
}

/// Full-screen commands issued to the document.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomFullscreen;

impl FullscreenControl for DomFullscreen {
    fn request_fullscreen(&self) -> Result<(), EnvironmentError> {
        // The promise result arrives later as a `fullscreenchange` event, or not at all.
        let _ = eval(
            r"(function() {
                const root = document.documentElement;
                if (!document.fullscreenElement && root.requestFullscreen) {
                    root.requestFullscreen().catch(() => {});
                }
            })();",
        );
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), EnvironmentError> {
        let _ = eval(
            r"(function() {
                if (document.fullscreenElement && document.exitFullscreen) {
                    document.exitFullscreen().catch(() => {});
                }
            })();",
        );
        Ok(())
    }
}

/// Installs the `fullscreenchange` and `visibilitychange` listeners exactly once.
///
/// Reports capabilities first, then one `initial` reading, then every change.
#[must_use]
pub fn environment_subscribe_script() -> &'static str {
    r#"(function() {
        const doc = document;
        const state = window.__quizEnv || (window.__quizEnv = { handlers: null });
        if (state.handlers) {
            doc.removeEventListener("fullscreenchange", state.handlers.fullscreen);
            doc.removeEventListener("visibilitychange", state.handlers.visibility);
            state.handlers = null;
        }
        const fullscreen = !!doc.documentElement.requestFullscreen
            && typeof doc.exitFullscreen === "function"
            && doc.fullscreenEnabled !== false;
        const visibility = typeof doc.visibilityState === "string";
        dioxus.send({ kind: "support", fullscreen: fullscreen, visibility: visibility });
        if (!fullscreen || !visibility) {
            return;
        }
        const handlers = {
            fullscreen: () => dioxus.send({ kind: "fullscreen", active: !!doc.fullscreenElement }),
            visibility: () => dioxus.send({ kind: "visibility", state: doc.visibilityState }),
        };
        doc.addEventListener("fullscreenchange", handlers.fullscreen);
        doc.addEventListener("visibilitychange", handlers.visibility);
        state.handlers = handlers;
        dioxus.send({
            kind: "initial",
            active: !!doc.fullscreenElement,
            state: doc.visibilityState,
        });
    })();"#
}

/// Removes the listeners installed by [`environment_subscribe_script`].
#[must_use]
pub fn environment_unsubscribe_script() -> &'static str {
    r#"(function() {
        const state = window.__quizEnv;
        if (!state || !state.handlers) {
            return;
        }
        document.removeEventListener("fullscreenchange", state.handlers.fullscreen);
        document.removeEventListener("visibilitychange", state.handlers.visibility);
        state.handlers = null;
    })();"#
}
