//! The `Node` trait and the context handed to every activation.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::dispatcher;
use crate::error::NodeError;
use crate::graph::Graph;
use crate::pulse::PulseContext;
use crate::types::{NodeDescriptor, NodeId, PulseId};

/// Upcast to `Any` so hosts can reach a concrete node through [Graph::node_as].
pub trait AsAny {
  fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// An execution unit of the graph.
///
/// Ports are plain fields allocated through [NodeDescriptor::builder]; the descriptor
/// returned by [Node::descriptor] must be the one produced while building them.
///
/// A node with no flow ports is *pure*: it runs only when one of its outputs is pulled
/// and its results are memoized for the pulse. Every other node runs when a flow edge
/// (or the host) activates it.
#[async_trait]
pub trait Node: AsAny + Send + Sync {
  fn descriptor(&self) -> &NodeDescriptor;

  /// Guard consulted before [Node::process]; `false` skips the effect and all flow
  /// triggers for this activation.
  async fn should_process(&self, _ctx: &NodeContext<'_>) -> Result<bool, NodeError> {
    Ok(true)
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError>;

  /// Restores persistent state (`GlobalStore` slots) to its defaults.
  fn reset(&self) {}
}

/// Handle through which a node reads inputs, publishes outputs and triggers flows.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
  pulse: &'a PulseContext,
  node: NodeId,
  depth: usize,
}

impl<'a> NodeContext<'a> {
  pub(crate) fn new(pulse: &'a PulseContext, node: NodeId, depth: usize) -> Self {
    Self { pulse, node, depth }
  }

  pub fn node_id(&self) -> NodeId {
    self.node
  }

  pub fn pulse(&self) -> &'a PulseContext {
    self.pulse
  }

  pub fn pulse_id(&self) -> PulseId {
    self.pulse.id()
  }

  pub fn graph(&self) -> &'a Arc<Graph> {
    self.pulse.graph()
  }

  pub fn token(&self) -> &'a CancellationToken {
    self.pulse.token()
  }

  pub fn is_cancelled(&self) -> bool {
    self.pulse.is_cancelled()
  }

  /// Number of flow edges between the pulse root and this activation.
  pub fn depth(&self) -> usize {
    self.depth
  }

  /// Sleeps for `duration` unless the pulse is cancelled first.
  /// Returns `true` when the full delay elapsed.
  pub async fn delay(&self, duration: Duration) -> bool {
    tokio::select! {
      _ = self.pulse.token().cancelled() => false,
      _ = tokio::time::sleep(duration) => !self.pulse.is_cancelled(),
    }
  }

  /// Activates every node connected to this node's flow edge `index`. `is_loop` marks
  /// a firing from inside a loop body; it only affects tracing.
  pub async fn trigger_flow(&self, index: usize, is_loop: bool) -> Result<(), NodeError> {
    dispatcher::trigger_flow(self, index, is_loop).await
  }
}
