//! Update nodes fired by value changes rather than by a flow edge.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowContinuation, ValueInput, ValueOutput};
use crate::types::{NodeDescriptor, Tagged};

/// Fires "On True" each time "Condition" changes to `true`.
pub struct FireOnTrueNode {
  descriptor: NodeDescriptor,
  condition: ValueInput<bool>,
  on_true: FlowContinuation,
}

impl Default for FireOnTrueNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Fire On True", "Events");
    let condition = d.reactive_input::<bool>("Condition");
    let on_true = d.flow_continuation("On True");
    Self {
      descriptor: d.build(),
      condition,
      on_true,
    }
  }
}

#[async_trait]
impl Node for FireOnTrueNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn should_process(&self, ctx: &NodeContext<'_>) -> Result<bool, NodeError> {
    self.condition.read(ctx).await
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    self.on_true.execute(ctx).await
  }
}

/// Fires "On Changed" whenever "Value" differs from the last observation, publishing
/// the new value on "Current".
pub struct OnChangedNode<T: Tagged> {
  descriptor: NodeDescriptor,
  value: ValueInput<T>,
  current: ValueOutput<T>,
  on_changed: FlowContinuation,
}

impl<T: Tagged> Default for OnChangedNode<T> {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("On Changed", "Events");
    let value = d.reactive_input::<T>("Value");
    let current = d.output::<T>("Current");
    let on_changed = d.flow_continuation("On Changed");
    Self {
      descriptor: d.build(),
      value,
      current,
      on_changed,
    }
  }
}

#[async_trait]
impl<T: Tagged> Node for OnChangedNode<T> {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let value = self.value.read(ctx).await?;
    self.current.write(value, ctx);
    self.on_changed.execute(ctx).await
  }
}
