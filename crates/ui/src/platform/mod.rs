//! Bridge between the webview document and the environment guard.

mod dom;

pub use dom::{
    DomFullscreen, DomMessage, environment_subscribe_script, environment_unsubscribe_script,
};
