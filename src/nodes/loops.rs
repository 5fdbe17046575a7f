//! Looping nodes. Guards are re-read every iteration (values derived from outputs
//! the body republishes are re-evaluated) and the pulse token is checked after every
//! await.
//! "On Finished" never fires for a cancelled loop.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowCall, FlowContinuation, ValueInput, ValueOutput};
use crate::types::NodeDescriptor;

pub const DEFAULT_INTERVAL_MS: i32 = 1000;

fn millis(value: i32) -> Duration {
  Duration::from_millis(value.max(1) as u64)
}

/// Fires "On Fire" every "Interval" milliseconds (at least 1) until the pulse is
/// cancelled. Waits one interval before the first firing.
pub struct FireOnIntervalNode {
  descriptor: NodeDescriptor,
  interval: ValueInput<i32>,
  on_fire: FlowCall,
}

impl Default for FireOnIntervalNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Fire On Interval", "Flow/Loops");
    d.flow_input();
    let interval = d.input_with_default::<i32>("Interval", DEFAULT_INTERVAL_MS);
    let on_fire = d.flow_call("On Fire");
    Self {
      descriptor: d.build(),
      interval,
      on_fire,
    }
  }
}

#[async_trait]
impl Node for FireOnIntervalNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let mut fired = 0u64;
    loop {
      let interval = self.interval.read(ctx).await?;
      if !ctx.delay(millis(interval)).await {
        break;
      }
      self.on_fire.execute(ctx).await?;
      fired += 1;
    }
    debug!(node = %ctx.node_id(), fired, "interval loop cancelled");
    Ok(())
  }
}

/// Fires "Loop" while "Condition" reads true, pausing "Interval" milliseconds between
/// iterations (no pause when 0), then "On Finished".
pub struct FireWhileTrueNode {
  descriptor: NodeDescriptor,
  condition: ValueInput<bool>,
  interval: ValueInput<i32>,
  body: FlowCall,
  on_finished: FlowContinuation,
}

impl Default for FireWhileTrueNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Fire While True", "Flow/Loops");
    d.flow_input();
    let condition = d.input::<bool>("Condition");
    let interval = d.input::<i32>("Interval");
    let body = d.flow_call("Loop");
    let on_finished = d.flow_continuation("On Finished");
    Self {
      descriptor: d.build(),
      condition,
      interval,
      body,
      on_finished,
    }
  }
}

#[async_trait]
impl Node for FireWhileTrueNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    loop {
      if ctx.is_cancelled() {
        return Ok(());
      }
      let condition = self.condition.read(ctx).await?;
      let interval = self.interval.read(ctx).await?;
      if !condition {
        break;
      }
      self.body.execute(ctx).await?;
      if interval > 0 {
        if !ctx.delay(millis(interval)).await {
          return Ok(());
        }
      } else {
        tokio::task::yield_now().await;
      }
    }
    if ctx.is_cancelled() {
      return Ok(());
    }
    self.on_finished.execute(ctx).await
  }
}

/// Publishes "Index" from 0 to "Count" - 1, firing "Loop" for each, then "On
/// Finished". A non-positive count only fires "On Finished".
pub struct ForNode {
  descriptor: NodeDescriptor,
  count: ValueInput<i32>,
  index: ValueOutput<i32>,
  body: FlowCall,
  on_finished: FlowContinuation,
}

impl Default for ForNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("For", "Flow/Loops");
    d.flow_input();
    let count = d.input::<i32>("Count");
    let index = d.output::<i32>("Index");
    let body = d.flow_call("Loop");
    let on_finished = d.flow_continuation("On Finished");
    Self {
      descriptor: d.build(),
      count,
      index,
      body,
      on_finished,
    }
  }
}

#[async_trait]
impl Node for ForNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let count = self.count.read(ctx).await?;
    for i in 0..count.max(0) {
      if ctx.is_cancelled() {
        return Ok(());
      }
      self.index.write(i, ctx);
      self.body.execute(ctx).await?;
    }
    if ctx.is_cancelled() {
      return Ok(());
    }
    self.on_finished.execute(ctx).await
  }
}
