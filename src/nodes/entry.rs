//! Host entry point.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::FlowContinuation;
use crate::types::NodeDescriptor;

/// Root node the host triggers to start a pulse; fires "Next".
pub struct EntryNode {
  descriptor: NodeDescriptor,
  next: FlowContinuation,
}

impl Default for EntryNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("On Trigger", "Events");
    let next = d.flow_continuation("Next");
    Self {
      descriptor: d.build(),
      next,
    }
  }
}

#[async_trait]
impl Node for EntryNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    self.next.execute(ctx).await
  }
}
