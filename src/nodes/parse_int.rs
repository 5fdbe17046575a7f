//! Text to integer conversion with success/failure flows.

use async_trait::async_trait;
use tracing::debug;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowContinuation, ValueInput, ValueOutput};
use crate::types::NodeDescriptor;

/// Parses "Text" (surrounding whitespace ignored). On success publishes "Value" and
/// fires "On Success"; otherwise fires "On Fail".
pub struct ParseIntNode {
  descriptor: NodeDescriptor,
  text: ValueInput<String>,
  value: ValueOutput<i32>,
  on_success: FlowContinuation,
  on_fail: FlowContinuation,
}

impl Default for ParseIntNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Parse Int", "Conversion");
    d.flow_input();
    let text = d.input::<String>("Text");
    let value = d.output::<i32>("Value");
    let on_success = d.flow_continuation("On Success");
    let on_fail = d.flow_continuation("On Fail");
    Self {
      descriptor: d.build(),
      text,
      value,
      on_success,
      on_fail,
    }
  }
}

#[async_trait]
impl Node for ParseIntNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let text = self.text.read_shared(ctx).await?;
    match text.trim().parse::<i32>() {
      Ok(value) => {
        self.value.write(value, ctx);
        self.on_success.execute(ctx).await
      }
      Err(e) => {
        debug!(node = %ctx.node_id(), text = %text, error = %e, "parse failed");
        self.on_fail.execute(ctx).await
      }
    }
  }
}
