//! Push execution of flow edges.

use futures::future::BoxFuture;
use tracing::{debug, trace, warn};

use crate::error::NodeError;
use crate::node::NodeContext;
use crate::pulse::PulseContext;
use crate::reactive;
use crate::types::NodeId;

/// Runs one activation of `node`: reactive gate, `should_process` guard, then
/// `process`. A cancelled pulse activates nothing.
pub(crate) fn activate(
  pulse: &PulseContext,
  node: NodeId,
  depth: usize,
) -> BoxFuture<'_, Result<(), NodeError>> {
  Box::pin(async move {
    let graph = pulse.graph();
    let entry = graph.entry(node).ok_or(NodeError::UnknownNode(node))?;
    if pulse.is_cancelled() {
      trace!(node = %entry.name, "pulse cancelled; skipping activation");
      return Ok(());
    }
    let ctx = NodeContext::new(pulse, node, depth);

    if entry.node.descriptor().has_reactive_inputs() && !reactive::observe_inputs(&ctx).await? {
      debug!(node = %entry.name, "no reactive input changed; suppressed");
      pulse.record_suppressed();
      return Ok(());
    }
    if !entry.node.should_process(&ctx).await? {
      debug!(node = %entry.name, "should_process declined");
      return Ok(());
    }

    pulse.record_activation(node);
    debug!(node = %entry.name, depth, "activating");
    entry.node.process(&ctx).await
  })
}

/// Activates every target of flow edge `index` of the node behind `ctx`, depth-first
/// in connection order, with the same pulse and therefore the same memo table.
pub(crate) async fn trigger_flow(
  ctx: &NodeContext<'_>,
  index: usize,
  is_loop: bool,
) -> Result<(), NodeError> {
  let graph = ctx.graph();
  let node = ctx.node_id();
  let entry = graph.entry(node).ok_or(NodeError::UnknownNode(node))?;
  let Some(flow) = entry.node.descriptor().flows.get(index) else {
    warn!(node = %entry.name, index, "undeclared flow output triggered");
    return Err(NodeError::InvariantViolation {
      node: entry.name.clone(),
      message: format!("flow output {} is not declared", index),
    });
  };
  if ctx.is_cancelled() {
    trace!(node = %entry.name, flow = %flow.name, "pulse cancelled; not triggering");
    return Ok(());
  }

  let depth = ctx.depth() + 1;
  let limit = graph.config().max_flow_depth;
  if depth > limit {
    warn!(node = %entry.name, limit, "flow depth limit exceeded");
    return Err(NodeError::FlowDepthExceeded {
      node: entry.name.clone(),
      limit,
    });
  }

  let looping = is_loop || flow.is_loop;
  trace!(node = %entry.name, flow = %flow.name, looping, "triggering flow");
  for target in graph.flow_targets(node, index) {
    if ctx.is_cancelled() {
      break;
    }
    activate(ctx.pulse(), *target, depth).await?;
  }
  Ok(())
}
