//! Persistent counter.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowContinuation, GlobalStore, ValueInput, ValueOutput};
use crate::types::NodeDescriptor;

/// Adds "Step" (default 1) to a counter that survives across pulses, publishes it on
/// "Count" and fires "Next".
pub struct CounterIncrementNode {
  descriptor: NodeDescriptor,
  step: ValueInput<i32>,
  store: GlobalStore<i32>,
  count: ValueOutput<i32>,
  next: FlowContinuation,
}

impl Default for CounterIncrementNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Counter Increment", "State");
    d.flow_input();
    let step = d.input_with_default::<i32>("Step", 1);
    let count = d.output::<i32>("Count");
    let next = d.flow_continuation("Next");
    Self {
      descriptor: d.build(),
      step,
      store: GlobalStore::new(0),
      count,
      next,
    }
  }
}

impl CounterIncrementNode {
  pub fn count(&self) -> i32 {
    self.store.read()
  }
}

#[async_trait]
impl Node for CounterIncrementNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let step = self.step.read(ctx).await?;
    let count = self.store.update(|c| c.wrapping_add(step));
    self.count.write(count, ctx);
    self.next.execute(ctx).await
  }

  fn reset(&self) {
    self.store.reset();
  }
}
