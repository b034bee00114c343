//! Error types for the mock tree.

use thiserror::Error;

use crate::stub::SimulatedFailure;

/// Errors surfaced by mock configuration and invocation.
#[derive(Debug, Error)]
pub enum MockError {
    /// A configured failure fired during invocation.
    ///
    /// This is the intended mechanism for exercising a plugin's own
    /// error paths; it propagates unchanged, exactly as the real host
    /// API would surface a usage error.
    #[error("simulated failure at `{path}`: {failure}")]
    Simulated {
        /// Dotted path of the node that raised.
        path: String,
        /// The configured failure descriptor.
        failure: SimulatedFailure,
    },

    /// A stub set both a return value and a failure for one path.
    #[error("stub for `{path}` sets both a return value and a failure")]
    ConflictingStub {
        /// Dotted path the stub targeted.
        path: String,
    },

    /// A stub set neither a return value nor a failure.
    #[error("stub for `{path}` sets neither a return value nor a failure")]
    EmptyStub {
        /// Dotted path the stub targeted.
        path: String,
    },

    /// A path string could not be parsed.
    #[error("invalid mock path `{path}`: {reason}")]
    InvalidPath {
        /// The offending path string.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type alias for mock operations.
pub type MockResult<T> = std::result::Result<T, MockError>;
