//! Stable identities for node instances, their ports and pulses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena index of a node instance within a [crate::Graph].
///
/// Ids are assigned in insertion order by [crate::GraphBuilder] and stay valid for
/// the lifetime of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
  pub fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A port on a specific node instance: `(node, port index)`.
///
/// Used as the key of value wiring, flow wiring, the per-pulse memo table and the
/// reactive observation table. The index space (inputs, outputs or flows) depends on
/// where the key is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
  pub node: NodeId,
  pub port: usize,
}

impl PortRef {
  pub fn new(node: NodeId, port: usize) -> Self {
    Self { node, port }
  }
}

impl fmt::Display for PortRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.node, self.port)
  }
}

/// Sequential identity of one pulse within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PulseId(pub u64);

impl fmt::Display for PulseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "pulse-{}", self.0)
  }
}
