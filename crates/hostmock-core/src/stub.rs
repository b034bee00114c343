//! Stub configuration for mock paths.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::call::CallArgs;

/// Descriptor for a failure a stubbed path should raise when invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedFailure {
    /// Short error category, e.g. `"E486"` or `"vim.error"`.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl SimulatedFailure {
    /// Create a failure descriptor.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SimulatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Dynamic stub: computes the return value from the received arguments.
pub type StubFn = Arc<dyn Fn(&CallArgs) -> Value + Send + Sync>;

/// What a stubbed path returns when invoked.
#[derive(Clone)]
pub enum ReturnSpec {
    /// A fixed value, cloned per invocation.
    Value(Value),
    /// A closure over the received arguments.
    With(StubFn),
}

impl fmt::Debug for ReturnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnSpec::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ReturnSpec::With(_) => f.write_str("With(<closure>)"),
        }
    }
}

/// A stub to apply to one path via [`HostMock::configure`].
///
/// Exactly one of the return spec and the failure must be set;
/// `configure` rejects a stub carrying both or neither rather than
/// resolving the conflict silently.
///
/// [`HostMock::configure`]: crate::node::HostMock::configure
#[derive(Debug, Clone, Default)]
pub struct Stub {
    pub(crate) returns: Option<ReturnSpec>,
    pub(crate) raises: Option<SimulatedFailure>,
}

impl Stub {
    /// Stub that returns a fixed value.
    pub fn returns(value: impl Into<Value>) -> Self {
        Self::default().and_returns(value)
    }

    /// Stub that computes its value from the received arguments.
    pub fn returns_with<F>(f: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self {
            returns: Some(ReturnSpec::With(Arc::new(f))),
            raises: None,
        }
    }

    /// Stub that raises a simulated failure.
    pub fn raises(failure: SimulatedFailure) -> Self {
        Self::default().and_raises(failure)
    }

    /// Set the fixed return value on an existing stub.
    pub fn and_returns(mut self, value: impl Into<Value>) -> Self {
        self.returns = Some(ReturnSpec::Value(value.into()));
        self
    }

    /// Set the failure on an existing stub.
    pub fn and_raises(mut self, failure: SimulatedFailure) -> Self {
        self.raises = Some(failure);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_failure_display() {
        let failure = SimulatedFailure::new("E486", "Pattern not found");
        assert_eq!(failure.to_string(), "E486: Pattern not found");
    }

    #[test]
    fn test_returns_stub_shape() {
        let stub = Stub::returns("test.py");
        assert!(stub.returns.is_some());
        assert!(stub.raises.is_none());
    }

    #[test]
    fn test_raises_stub_shape() {
        let stub = Stub::raises(SimulatedFailure::new("E492", "Not an editor command"));
        assert!(stub.returns.is_none());
        assert!(stub.raises.is_some());
    }

    #[test]
    fn test_dynamic_stub_sees_args() {
        let stub = Stub::returns_with(|args| json!(args.positional.len()));
        match stub.returns {
            Some(ReturnSpec::With(f)) => {
                let args = CallArgs::none().arg(1).arg(2);
                assert_eq!(f(&args), json!(2));
            }
            other => panic!("expected dynamic stub, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_stub_is_representable() {
        // configure() is responsible for rejecting this shape.
        let stub = Stub::returns(1).and_raises(SimulatedFailure::new("E1", "boom"));
        assert!(stub.returns.is_some() && stub.raises.is_some());
    }
}
