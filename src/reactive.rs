//! Last-observed values of reactive inputs, compared across pulses.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::trace;

use crate::error::NodeError;
use crate::node::NodeContext;
use crate::pulse::lock;
use crate::resolver;
use crate::types::{ErasedEq, PortRef, SharedValue};

/// Observation table keyed by (node, reactive input). Outlives pulses; cleared only by
/// [crate::Graph::reset_state].
#[derive(Default)]
pub(crate) struct ReactiveTable {
  last: Mutex<HashMap<PortRef, SharedValue>>,
}

impl ReactiveTable {
  /// Records `value` for `key`. Returns true when it differs from the previous
  /// observation or when there was none.
  pub(crate) fn observe(&self, key: PortRef, value: SharedValue, eq: ErasedEq) -> bool {
    let mut last = lock(&self.last);
    match last.get(&key) {
      Some(previous) if eq(previous.as_ref(), value.as_ref()) => false,
      _ => {
        last.insert(key, value);
        true
      }
    }
  }

  pub(crate) fn clear(&self) {
    lock(&self.last).clear();
  }

  pub(crate) fn len(&self) -> usize {
    lock(&self.last).len()
  }
}

/// Reads every reactive input of the node behind `ctx` and records the observations.
/// Returns true when at least one of them changed.
pub(crate) async fn observe_inputs(ctx: &NodeContext<'_>) -> Result<bool, NodeError> {
  let graph = ctx.graph();
  let node = ctx.node_id();
  let descriptor = graph.descriptor(node).ok_or(NodeError::UnknownNode(node))?;
  let mut changed = false;
  for (index, spec) in descriptor.inputs.iter().enumerate() {
    let Some(eq) = spec.eq else { continue };
    let value = resolver::resolve_input(ctx, index).await?;
    let port_changed = graph.reactive().observe(PortRef::new(node, index), value, eq);
    trace!(node = %node, port = %spec.name, changed = port_changed, "reactive observation");
    changed |= port_changed;
  }
  Ok(changed)
}
