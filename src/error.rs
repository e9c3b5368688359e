//! Error types shared by the display, canvas and paging modules.

use core::fmt;

/// Rejection of a configuration before any drawing or timing happens.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A custom geometry has a zero dimension or does not fit the pixel buffer capacity.
    Geometry,
    /// The paging engine was given an empty frame sequence.
    NoFrames,
    /// The target frame rate is zero.
    ZeroFps,
    /// The time per frame is shorter than one update interval.
    ZeroTicksPerFrame,
    /// The time per transition is shorter than one update interval.
    ZeroTicksPerTransition,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            ConfigError::Geometry => "unsupported display geometry",
            ConfigError::NoFrames => "frame sequence is empty",
            ConfigError::ZeroFps => "target frame rate must be non-zero",
            ConfigError::ZeroTicksPerFrame => "time per frame is shorter than one tick",
            ConfigError::ZeroTicksPerTransition => "time per transition is shorter than one tick",
        };
        f.write_str(msg)
    }
}

/// Driver errors, generic over the error type of the display interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// The interface failed to connect or to transmit.
    Interface(E),
    /// Command arguments are outside the range the controller accepts.
    InvalidInput,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "display interface error: {:?}", e),
            Error::InvalidInput => f.write_str("command argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
