//! Outgoing flow edges.

use crate::error::NodeError;
use crate::node::NodeContext;

/// Outgoing flow edge fired at most once per activation, typically as the node's
/// last action.
pub struct FlowContinuation {
  index: usize,
}

impl FlowContinuation {
  pub(crate) fn new(index: usize) -> Self {
    Self { index }
  }

  pub fn index(&self) -> usize {
    self.index
  }

  /// Activates every node connected to this edge, depth-first in connection order.
  pub async fn execute(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    ctx.trigger_flow(self.index, false).await
  }
}

/// Outgoing looping edge: may fire many times within one activation.
pub struct FlowCall {
  index: usize,
}

impl FlowCall {
  pub(crate) fn new(index: usize) -> Self {
    Self { index }
  }

  pub fn index(&self) -> usize {
    self.index
  }

  pub async fn execute(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    ctx.trigger_flow(self.index, true).await
  }
}
