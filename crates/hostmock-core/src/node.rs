//! The mock tree: lazy children, recorded interactions, stubbed paths.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;

use crate::call::{CallArgs, CallOutcome, CallRecord, Event};
use crate::error::{MockError, MockResult};
use crate::path::MockPath;
use crate::stub::{ReturnSpec, SimulatedFailure, Stub};

/// Child slot holding the result of an unconfigured invocation.
pub const CALL_RESULT_SEGMENT: &str = "()";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

/// Configured behavior of one node. Raise wins over return at the
/// invocation site; a node holds at most one of the two.
#[derive(Debug, Clone)]
enum Behavior {
    Returns(ReturnSpec),
    Raises(SimulatedFailure),
}

#[derive(Debug, Default)]
struct NodeState {
    /// Children in first-access order.
    children: IndexMap<String, NodeId>,
    /// Append-only interaction log.
    log: Vec<Event>,
    behavior: Option<Behavior>,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<NodeState>,
    next_seq: u64,
}

impl Tree {
    fn new() -> Self {
        Self {
            nodes: vec![NodeState::default()],
            next_seq: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Child lookup with insert-on-miss. Does not log.
    fn ensure_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(id) = self.nodes[parent.0].children.get(name) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeState::default());
        self.nodes[parent.0].children.insert(name.to_string(), id);
        id
    }

    fn ensure_path(&mut self, path: &MockPath) -> NodeId {
        let mut current = ROOT;
        for segment in path.segments() {
            current = self.ensure_child(current, segment);
        }
        current
    }

    /// Walk without creating. `None` distinguishes "never touched".
    fn lookup(&self, path: &MockPath) -> Option<NodeId> {
        let mut current = ROOT;
        for segment in path.segments() {
            current = *self.nodes[current.0].children.get(segment)?;
        }
        Some(current)
    }
}

/// A cloneable handle to one node of a mock tree.
///
/// Handles share the tree; cloning is cheap and every clone observes
/// the same logs and stubs. Target code holds these and treats them as
/// the host API.
#[derive(Clone)]
pub struct MockNode {
    tree: Arc<Mutex<Tree>>,
    id: NodeId,
    path: MockPath,
}

impl MockNode {
    /// Resolve the child named `name`, creating it on first access.
    ///
    /// Never fails for a new name: plugin code probes for optional
    /// capabilities, and a missing attribute would break otherwise
    /// valid code. The access is recorded in this node's log.
    pub fn attr(&self, name: &str) -> MockNode {
        let child = {
            let mut tree = self.tree.lock();
            let seq = tree.bump();
            tree.nodes[self.id.0].log.push(Event::Access {
                seq,
                name: name.to_string(),
            });
            tree.ensure_child(self.id, name)
        };
        MockNode {
            tree: Arc::clone(&self.tree),
            id: child,
            path: self.path.child(name),
        }
    }

    /// Invoke this node.
    ///
    /// Precedence: a configured failure fires first, then a configured
    /// return (dynamic stubs are called with the received arguments),
    /// and an unconfigured node yields an auto-expanding sub-mock. The
    /// invocation is logged in every case, failures included.
    pub fn call(&self, args: CallArgs) -> MockResult<MockValue> {
        let behavior = self.tree.lock().nodes[self.id.0].behavior.clone();
        match behavior {
            Some(Behavior::Raises(failure)) => {
                self.log_call(args, CallOutcome::Raised(failure.clone()));
                Err(MockError::Simulated {
                    path: self.path.to_string(),
                    failure,
                })
            }
            Some(Behavior::Returns(ReturnSpec::Value(value))) => {
                self.log_call(args, CallOutcome::Value(value.clone()));
                Ok(MockValue::Value(value))
            }
            Some(Behavior::Returns(ReturnSpec::With(f))) => {
                // Run the stub closure unlocked; it may touch this tree.
                let value = f(&args);
                self.log_call(args, CallOutcome::Value(value.clone()));
                Ok(MockValue::Value(value))
            }
            None => {
                let child = {
                    let mut tree = self.tree.lock();
                    let child = tree.ensure_child(self.id, CALL_RESULT_SEGMENT);
                    let seq = tree.bump();
                    tree.nodes[self.id.0].log.push(Event::Call(CallRecord {
                        seq,
                        args,
                        outcome: CallOutcome::AutoMock,
                    }));
                    child
                };
                Ok(MockValue::Mock(MockNode {
                    tree: Arc::clone(&self.tree),
                    id: child,
                    path: self.path.child(CALL_RESULT_SEGMENT),
                }))
            }
        }
    }

    /// Invoke with no arguments.
    pub fn call0(&self) -> MockResult<MockValue> {
        self.call(CallArgs::none())
    }

    /// Path of this node from the root.
    pub fn path(&self) -> &MockPath {
        &self.path
    }

    fn log_call(&self, args: CallArgs, outcome: CallOutcome) {
        let mut tree = self.tree.lock();
        let seq = tree.bump();
        tree.nodes[self.id.0]
            .log
            .push(Event::Call(CallRecord { seq, args, outcome }));
    }
}

impl fmt::Debug for MockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockNode")
            .field("path", &self.path.to_string())
            .finish_non_exhaustive()
    }
}

/// A value produced by invoking a mock node.
#[derive(Debug, Clone)]
pub enum MockValue {
    /// A configured or computed value.
    Value(Value),
    /// An auto-expanding sub-mock (no stub was configured).
    Mock(MockNode),
}

impl MockValue {
    /// The JSON value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            MockValue::Value(value) => Some(value),
            MockValue::Mock(_) => None,
        }
    }

    /// The string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// The sub-mock, if no stub was configured.
    pub fn as_mock(&self) -> Option<&MockNode> {
        match self {
            MockValue::Value(_) => None,
            MockValue::Mock(node) => Some(node),
        }
    }
}

/// Root of a mock tree standing in for the host editor's scripting API.
///
/// The test owns a `HostMock`, configures paths on it, hands it (or a
/// clone) to the code under test, and reads the recorded interactions
/// back afterwards.
#[derive(Debug, Clone)]
pub struct HostMock {
    root: MockNode,
}

impl HostMock {
    /// Create an empty mock tree.
    pub fn new() -> Self {
        Self {
            root: MockNode {
                tree: Arc::new(Mutex::new(Tree::new())),
                id: ROOT,
                path: MockPath::from_segments(Vec::<String>::new()),
            },
        }
    }

    /// The root node handle.
    pub fn root(&self) -> &MockNode {
        &self.root
    }

    /// Resolve a top-level attribute. See [`MockNode::attr`].
    pub fn attr(&self, name: &str) -> MockNode {
        self.root.attr(name)
    }

    /// Set the stub for `path`, creating nodes along the way.
    ///
    /// The last configuration for a path wins: a return replaces a
    /// previously configured failure and vice versa, so a test can
    /// flip a path from success to failure without clearing state. A
    /// stub carrying both a return and a failure (or neither) is
    /// rejected outright.
    pub fn configure(&self, path: &str, stub: Stub) -> MockResult<()> {
        let parsed = MockPath::parse(path)?;
        let behavior = match (stub.returns, stub.raises) {
            (Some(_), Some(_)) => {
                return Err(MockError::ConflictingStub {
                    path: path.to_string(),
                })
            }
            (None, None) => {
                return Err(MockError::EmptyStub {
                    path: path.to_string(),
                })
            }
            (Some(returns), None) => Behavior::Returns(returns),
            (None, Some(failure)) => Behavior::Raises(failure),
        };
        let mut tree = self.root.tree.lock();
        let id = tree.ensure_path(&parsed);
        tree.nodes[id.0].behavior = Some(behavior);
        tracing::debug!(path, "configured stub");
        Ok(())
    }

    /// Recorded invocations of the node at `path`, in invocation order.
    ///
    /// Empty for a path never touched — "never called" is not an error
    /// here, it is often the property under test. The empty string
    /// addresses the root.
    pub fn calls(&self, path: &str) -> Vec<CallRecord> {
        self.with_node(path, |tree, id| {
            tree.nodes[id.0]
                .log
                .iter()
                .filter_map(|event| match event {
                    Event::Call(record) => Some(record.clone()),
                    Event::Access { .. } => None,
                })
                .collect()
        })
    }

    /// Full interaction log (accesses and invocations) of the node at
    /// `path`. Empty for a path never touched.
    pub fn events(&self, path: &str) -> Vec<Event> {
        self.with_node(path, |tree, id| tree.nodes[id.0].log.clone())
    }

    /// Child names of the node at `path`, in first-access order.
    pub fn children(&self, path: &str) -> Vec<String> {
        self.with_node(path, |tree, id| {
            tree.nodes[id.0].children.keys().cloned().collect()
        })
    }

    /// Clear every log in the tree without touching stubs, and restart
    /// the order index, so one configured mock serves many test cases.
    pub fn reset(&self) {
        let mut tree = self.root.tree.lock();
        for node in &mut tree.nodes {
            node.log.clear();
        }
        tree.next_seq = 0;
        tracing::debug!("mock tree reset");
    }

    fn with_node<T: Default>(&self, path: &str, f: impl FnOnce(&Tree, NodeId) -> T) -> T {
        let tree = self.root.tree.lock();
        let id = if path.is_empty() {
            Some(ROOT)
        } else {
            MockPath::parse(path).ok().and_then(|p| tree.lookup(&p))
        };
        match id {
            Some(id) => f(&tree, id),
            None => T::default(),
        }
    }
}

impl Default for HostMock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_unconfigured_chain_never_fails() {
        let mock = HostMock::new();
        let node = mock
            .attr("current")
            .attr("window")
            .attr("cursor")
            .attr("anything")
            .attr("at_all");
        assert_eq!(node.path().to_string(), "current.window.cursor.anything.at_all");
        assert_matches!(node.call0(), Ok(MockValue::Mock(_)));
    }

    #[test]
    fn test_attr_records_access_in_parent_log() {
        let mock = HostMock::new();
        mock.attr("current").attr("buffer");

        let root_events = mock.events("");
        assert_eq!(root_events.len(), 1);
        assert_matches!(&root_events[0], Event::Access { name, .. } if name == "current");

        let current_events = mock.events("current");
        assert_eq!(current_events.len(), 1);
        assert_matches!(&current_events[0], Event::Access { name, .. } if name == "buffer");
    }

    #[test]
    fn test_configured_return_is_returned_exactly() {
        let mock = HostMock::new();
        mock.configure("current.buffer.name", Stub::returns("test.py"))
            .unwrap();

        let value = mock
            .attr("current")
            .attr("buffer")
            .attr("name")
            .call0()
            .unwrap();
        assert_eq!(value.as_str(), Some("test.py"));

        let calls = mock.calls("current.buffer.name");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].outcome, CallOutcome::Value(json!("test.py")));
        assert!(!calls[0].outcome.is_raised());
    }

    #[test]
    fn test_last_configuration_wins() {
        let mock = HostMock::new();
        mock.configure("eval", Stub::returns(42)).unwrap();
        assert_matches!(mock.attr("eval").call0(), Ok(MockValue::Value(v)) if v == json!(42));

        mock.configure("eval", Stub::raises(SimulatedFailure::new("E15", "Invalid expression")))
            .unwrap();
        let err = mock.attr("eval").call0().unwrap_err();
        assert_matches!(
            err,
            MockError::Simulated { path, failure }
                if path == "eval" && failure.kind == "E15"
        );

        // And back to success again.
        mock.configure("eval", Stub::returns("ok")).unwrap();
        assert_matches!(mock.attr("eval").call0(), Ok(MockValue::Value(v)) if v == json!("ok"));
    }

    #[test]
    fn test_raised_invocation_is_logged() {
        let mock = HostMock::new();
        mock.configure("command", Stub::raises(SimulatedFailure::new("E492", "Not a command")))
            .unwrap();

        let _ = mock.attr("command").call(CallArgs::none().arg("bogus"));

        let calls = mock.calls("command");
        assert_eq!(calls.len(), 1);
        assert!(calls[0].outcome.is_raised());
        assert_eq!(calls[0].args.positional, vec![json!("bogus")]);
    }

    #[test]
    fn test_dynamic_stub_sees_received_args() {
        let mock = HostMock::new();
        mock.configure(
            "eval",
            Stub::returns_with(|args| json!(format!("evaluated {}", args.positional[0]))),
        )
        .unwrap();

        let value = mock
            .attr("eval")
            .call(CallArgs::none().arg("&ft"))
            .unwrap();
        assert_eq!(value.as_str(), Some("evaluated \"&ft\""));
    }

    #[test]
    fn test_call_log_preserves_order_and_args() {
        let mock = HostMock::new();
        let command = mock.attr("command");
        for i in 0..3 {
            command
                .call(CallArgs::none().arg(format!("edit file{}.txt", i)).kw("bang", i == 2))
                .unwrap();
        }

        let calls = mock.calls("command");
        assert_eq!(calls.len(), 3);
        for (i, record) in calls.iter().enumerate() {
            assert_eq!(record.args.positional, vec![json!(format!("edit file{}.txt", i))]);
            assert_eq!(record.args.keyword, vec![("bang".to_string(), json!(i == 2))]);
        }
        assert!(calls.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[test]
    fn test_ordering_across_entry_points() {
        let mock = HostMock::new();
        mock.attr("command").call(CallArgs::none().arg("w")).unwrap();
        mock.attr("eval").call(CallArgs::none().arg("1+1")).unwrap();

        let command = &mock.calls("command")[0];
        let eval = &mock.calls("eval")[0];
        assert!(command.seq < eval.seq, "command must precede eval");
    }

    #[test]
    fn test_auto_call_result_is_addressable() {
        let mock = HostMock::new();
        let result = mock.attr("bufwinnr").call0().unwrap();
        let node = result.as_mock().unwrap();
        assert_eq!(node.path().to_string(), "bufwinnr.()");

        node.attr("valid").call0().unwrap();
        assert_eq!(mock.calls("bufwinnr.().valid").len(), 1);
    }

    #[test]
    fn test_repeated_auto_calls_share_result_slot() {
        let mock = HostMock::new();
        mock.attr("timer").call0().unwrap();
        mock.attr("timer").call0().unwrap();

        assert_eq!(mock.calls("timer").len(), 2);
        assert_eq!(mock.children("timer"), vec![CALL_RESULT_SEGMENT.to_string()]);
    }

    #[test]
    fn test_reset_clears_logs_keeps_stubs() {
        let mock = HostMock::new();
        mock.configure("current.buffer.name", Stub::returns("test.py"))
            .unwrap();
        mock.attr("current").attr("buffer").attr("name").call0().unwrap();
        assert_eq!(mock.calls("current.buffer.name").len(), 1);

        mock.reset();
        assert_eq!(mock.calls("current.buffer.name").len(), 0);
        assert_eq!(mock.events(""), vec![]);

        // Stub survives, and ordering restarts from zero.
        let value = mock.attr("current").attr("buffer").attr("name").call0().unwrap();
        assert_eq!(value.as_str(), Some("test.py"));
        assert_eq!(mock.events("").first().map(Event::seq), Some(0));
    }

    #[test]
    fn test_missing_path_reads_are_empty() {
        let mock = HostMock::new();
        assert_eq!(mock.calls("never.touched"), vec![]);
        assert_eq!(mock.events("never.touched"), vec![]);
        assert_eq!(mock.children("never.touched"), Vec::<String>::new());
    }

    #[test]
    fn test_children_in_first_access_order() {
        let mock = HostMock::new();
        mock.attr("windows");
        mock.attr("buffers");
        mock.attr("current");
        mock.attr("buffers"); // repeat access does not reorder

        assert_eq!(mock.children(""), vec!["windows", "buffers", "current"]);
    }

    #[test]
    fn test_conflicting_stub_rejected() {
        let mock = HostMock::new();
        let stub = Stub::returns(1).and_raises(SimulatedFailure::new("E1", "boom"));
        assert_matches!(
            mock.configure("eval", stub),
            Err(MockError::ConflictingStub { path }) if path == "eval"
        );
        // Nothing was applied.
        assert_matches!(mock.attr("eval").call0(), Ok(MockValue::Mock(_)));
    }

    #[test]
    fn test_empty_stub_rejected() {
        let mock = HostMock::new();
        assert_matches!(
            mock.configure("eval", Stub::default()),
            Err(MockError::EmptyStub { .. })
        );
    }

    #[test]
    fn test_configure_invalid_path_rejected() {
        let mock = HostMock::new();
        assert_matches!(
            mock.configure("", Stub::returns(1)),
            Err(MockError::InvalidPath { .. })
        );
        assert_matches!(
            mock.configure("a..b", Stub::returns(1)),
            Err(MockError::InvalidPath { .. })
        );
    }

    #[test]
    fn test_configure_does_not_log_accesses() {
        let mock = HostMock::new();
        mock.configure("current.buffer.name", Stub::returns("x"))
            .unwrap();
        assert_eq!(mock.events(""), vec![]);
        assert_eq!(mock.events("current"), vec![]);
    }

    #[test]
    fn test_cloned_handles_share_the_tree() {
        let mock = HostMock::new();
        let clone = mock.clone();
        clone.attr("command").call0().unwrap();
        assert_eq!(mock.calls("command").len(), 1);
    }

    proptest! {
        #[test]
        fn prop_arbitrary_chains_never_fail(
            segments in prop::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..8)
        ) {
            let mock = HostMock::new();
            let mut node = mock.attr(&segments[0]);
            for segment in &segments[1..] {
                node = node.attr(segment);
            }
            prop_assert!(node.call0().is_ok());
            prop_assert_eq!(node.path().to_string(), segments.join("."));
        }

        #[test]
        fn prop_call_log_length_matches_invocations(count in 0usize..32) {
            let mock = HostMock::new();
            let node = mock.attr("command");
            for _ in 0..count {
                node.call0().unwrap();
            }
            prop_assert_eq!(mock.calls("command").len(), count);
        }
    }
}
