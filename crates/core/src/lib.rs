#![forbid(unsafe_code)]

pub mod error;
pub mod guard;
pub mod model;

pub use error::Error;
pub use guard::{
    EnvironmentError, EnvironmentGuard, EnvironmentSignal, EnvironmentSupport, FullscreenControl,
    Gate, Overlay, Visibility,
};
