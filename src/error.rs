//! Error types: structural graph errors, node activation errors and pulse errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{NodeId, PulseId, TypeTag};

/// Structural errors detected while building a graph or instantiating node types.
/// Fatal to loading the graph; never surfaced mid-pulse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
  #[error("Node name '{0}' is used more than once")]
  DuplicateNode(String),

  #[error("Node '{0}' not found")]
  NodeNotFound(String),

  #[error("Node '{node}' has no value port named '{port}'")]
  UnknownPort { node: String, port: String },

  #[error("Node '{node}' has no flow output named '{flow}'")]
  UnknownFlowOutput { node: String, flow: String },

  #[error("Node '{0}' does not accept a flow input")]
  NotFlowInput(String),

  #[error("Cannot connect {from}.{from_port} ({found}) to {to}.{to_port} ({expected})")]
  TypeMismatch {
    from: String,
    from_port: String,
    to: String,
    to_port: String,
    expected: String,
    found: String,
  },

  #[error("Input {node}.{port} already has an upstream connection")]
  InputAlreadyConnected { node: String, port: String },

  #[error("Required input {node}.{port} is not connected")]
  RequiredInputUnconnected { node: String, port: String },

  #[error("Value connections form a cycle through node '{0}'")]
  ValueCycle(String),

  #[error("Node type '{0}' is not registered")]
  UnknownNodeType(String),

  #[error("Node type '{node_type}' is not instantiated for type '{type_tag}'")]
  TypeNotInFilter { node_type: String, type_tag: TypeTag },

  #[error("Generic node type '{0}' requires a type argument")]
  MissingTypeArgument(String),

  #[error("Node type '{0}' is not generic")]
  UnexpectedTypeArgument(String),
}

/// Errors that terminate a node activation and the pulse it belongs to.
///
/// Node effect failures are not errors; they are signaled through flow edges such as
/// "On Fail". Only broken invariants end up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
  #[error("Node {0} does not exist in this graph")]
  UnknownNode(NodeId),

  #[error("Node '{node}' has no port at index {port}")]
  UnknownPort { node: String, port: usize },

  #[error("Value on input {port} of node {node} is not a {expected}")]
  TypeMismatch {
    node: NodeId,
    port: usize,
    expected: &'static str,
  },

  #[error("Flow depth limit {limit} exceeded at node '{node}'")]
  FlowDepthExceeded { node: String, limit: usize },

  #[error("Invariant violated in node '{node}': {message}")]
  InvariantViolation { node: String, message: String },
}

/// Errors returned to the host from [crate::Graph::trigger] and friends.
#[derive(Error, Debug)]
pub enum PulseError {
  #[error("Node {0} does not exist in this graph")]
  NodeNotFound(NodeId),

  #[error("No node named '{0}' in this graph")]
  UnknownNodeName(String),

  #[error("Node '{0}' is a pure value node and cannot start a pulse")]
  NotTriggerable(String),

  #[error("{pulse} aborted: {source}")]
  Aborted {
    pulse: PulseId,
    #[source]
    source: NodeError,
  },

  #[error("Pulse task failed: {0}")]
  Join(String),
}

/// Errors reading or writing a pulse report log.
#[derive(Error, Debug)]
pub enum ReportIoError {
  #[error("Cannot access report log {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid pulse report at {}:{line}: {source}", path.display())]
  Parse {
    path: PathBuf,
    line: usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("Cannot encode pulse report: {0}")]
  Encode(#[from] serde_json::Error),
}
