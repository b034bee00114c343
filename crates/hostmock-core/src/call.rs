//! Recorded interactions against mock nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stub::SimulatedFailure;

/// Arguments of a single invocation, stored exactly as received.
///
/// Keyword arguments keep the order the caller supplied them in; no
/// normalization or validation is applied, since unknown or extra
/// arguments are often exactly what a test wants to observe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    /// Positional arguments in call order.
    pub positional: Vec<Value>,
    /// Keyword arguments in the order supplied.
    pub keyword: Vec<(String, Value)>,
}

impl CallArgs {
    /// No arguments at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument.
    pub fn kw(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    /// Whether no arguments were passed.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// What an invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallOutcome {
    /// No stub was configured; a fresh auto-expanding node was returned.
    AutoMock,
    /// A configured (or dynamically computed) value was returned.
    Value(Value),
    /// A configured failure fired.
    Raised(SimulatedFailure),
}

impl CallOutcome {
    /// Whether the invocation failed.
    pub fn is_raised(&self) -> bool {
        matches!(self, CallOutcome::Raised(_))
    }
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Tree-global order index; invocations across different nodes of
    /// the same tree are totally ordered by this.
    pub seq: u64,
    /// Arguments as received.
    pub args: CallArgs,
    /// What the invocation produced.
    pub outcome: CallOutcome,
}

/// One entry in a node's interaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An attribute was accessed on this node.
    Access {
        /// Tree-global order index.
        seq: u64,
        /// Name of the accessed attribute.
        name: String,
    },
    /// This node was invoked.
    Call(CallRecord),
}

impl Event {
    /// The tree-global order index of this event.
    pub fn seq(&self) -> u64 {
        match self {
            Event::Access { seq, .. } => *seq,
            Event::Call(record) => record.seq,
        }
    }
}
