//! Pull evaluation of value inputs with per-pulse memoization.

use futures::future::BoxFuture;
use tracing::{instrument, trace};

use crate::error::NodeError;
use crate::node::NodeContext;
use crate::pulse::PulseContext;
use crate::types::{NodeId, PortRef, SharedValue, ValuePortSpec};

fn input_spec<'a>(ctx: &NodeContext<'a>, index: usize) -> Result<&'a ValuePortSpec, NodeError> {
  let node = ctx.node_id();
  let descriptor = ctx
    .graph()
    .descriptor(node)
    .ok_or(NodeError::UnknownNode(node))?;
  descriptor
    .inputs
    .get(index)
    .ok_or_else(|| NodeError::UnknownPort {
      node: descriptor.name.clone(),
      port: index,
    })
}

/// Value of input `index` of the node behind `ctx`: the upstream output when
/// connected, the declared default otherwise.
#[instrument(level = "trace", skip(ctx), fields(node = %ctx.node_id()))]
pub(crate) async fn resolve_input(
  ctx: &NodeContext<'_>,
  index: usize,
) -> Result<SharedValue, NodeError> {
  let spec = input_spec(ctx, index)?;
  match ctx.graph().value_sources(ctx.node_id(), index).first() {
    Some(source) => resolve_output(ctx.pulse(), *source, ctx.depth()).await,
    None => Ok(spec.default.clone()),
  }
}

/// Every source of list input `index`, in connection order.
#[instrument(level = "trace", skip(ctx), fields(node = %ctx.node_id()))]
pub(crate) async fn resolve_input_list(
  ctx: &NodeContext<'_>,
  index: usize,
) -> Result<Vec<SharedValue>, NodeError> {
  input_spec(ctx, index)?;
  let sources = ctx.graph().value_sources(ctx.node_id(), index);
  let mut values = Vec::with_capacity(sources.len());
  for source in sources {
    values.push(resolve_output(ctx.pulse(), *source, ctx.depth()).await?);
  }
  Ok(values)
}

/// Value of output `source` in this pulse.
///
/// Pure nodes are evaluated on first demand and memoized; later reads return the same
/// `Arc`. Flow-driven nodes are never run by a pull: their last published value is
/// returned, or the output's default when they have not run yet in this pulse.
pub(crate) fn resolve_output(
  pulse: &PulseContext,
  source: PortRef,
  depth: usize,
) -> BoxFuture<'_, Result<SharedValue, NodeError>> {
  Box::pin(async move {
    let graph = pulse.graph();
    let entry = graph
      .entry(source.node)
      .ok_or(NodeError::UnknownNode(source.node))?;
    let descriptor = entry.node.descriptor();
    let spec = descriptor
      .outputs
      .get(source.port)
      .ok_or_else(|| NodeError::UnknownPort {
        node: entry.name.clone(),
        port: source.port,
      })?;

    if !descriptor.is_pure() {
      return Ok(
        pulse
          .published(source)
          .unwrap_or_else(|| spec.default.clone()),
      );
    }

    if let Some(value) = pulse.memo_get(source) {
      trace!(node = %entry.name, port = source.port, "memo hit");
      pulse.record_memo_hit();
      return Ok(value);
    }

    evaluate(pulse, source.node, depth).await?;
    Ok(
      pulse
        .memo_get(source)
        .unwrap_or_else(|| spec.default.clone()),
    )
  })
}

/// Runs a pure node once and memoizes every output, defaulting the ones it left
/// unwritten so they are not evaluated again.
async fn evaluate(pulse: &PulseContext, node: NodeId, depth: usize) -> Result<(), NodeError> {
  let graph = pulse.graph();
  let entry = graph.entry(node).ok_or(NodeError::UnknownNode(node))?;
  let ctx = NodeContext::new(pulse, node, depth);
  trace!(node = %entry.name, "evaluating value node");
  if entry.node.should_process(&ctx).await? {
    entry.node.process(&ctx).await?;
  }
  pulse.record_evaluation();
  for (port, output) in entry.node.descriptor().outputs.iter().enumerate() {
    let key = PortRef::new(node, port);
    if pulse.memo_get(key).is_none() {
      pulse.memo_insert(key, output.default.clone());
    }
  }
  Ok(())
}
