//! Library side of the `dev-toolkit` binary.

pub mod logging;
pub mod render;
pub mod session;
pub mod settings;
