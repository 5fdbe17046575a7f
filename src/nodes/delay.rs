//! Cancellable delay.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowContinuation, ValueInput};
use crate::types::NodeDescriptor;

/// Waits "Milliseconds" then fires "Next"; fires nothing when cancelled while waiting.
pub struct DelayNode {
  descriptor: NodeDescriptor,
  millis: ValueInput<i32>,
  next: FlowContinuation,
}

impl Default for DelayNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Delay", "Flow");
    d.flow_input();
    let millis = d.input::<i32>("Milliseconds");
    let next = d.flow_continuation("Next");
    Self {
      descriptor: d.build(),
      millis,
      next,
    }
  }
}

#[async_trait]
impl Node for DelayNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let millis = self.millis.read(ctx).await?.max(0) as u64;
    if ctx.delay(Duration::from_millis(millis)).await {
      self.next.execute(ctx).await
    } else {
      Ok(())
    }
  }
}
