//! Crate-level error types.

use std::fmt;

#[cfg(feature = "viewer")]
use crate::gpu::render_context::RenderContextError;

/// Fatal errors of the outer surfaces: options files, GPU and the viewer.
///
/// Component requests fail locally with their own error enums
/// ([`TransitionError`](crate::animation::TransitionError),
/// [`ThemeError`](crate::environment::ThemeError),
/// [`BloomError`](crate::bloom::BloomError)).
#[derive(Debug)]
pub enum WorldError {
    /// GPU context initialization failure.
    #[cfg(feature = "viewer")]
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "viewer")]
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "viewer")]
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "viewer")]
impl From<RenderContextError> for WorldError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for WorldError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
