//! Value outputs published by a node's `process`.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::node::NodeContext;
use crate::types::{NodeValue, PortRef};

/// Typed value output.
pub struct ValueOutput<T> {
  index: usize,
  _marker: PhantomData<fn() -> T>,
}

impl<T: NodeValue> ValueOutput<T> {
  pub(crate) fn new(index: usize) -> Self {
    Self {
      index,
      _marker: PhantomData,
    }
  }

  pub fn index(&self) -> usize {
    self.index
  }

  /// Publishes `value` for the current pulse.
  ///
  /// Pure nodes write into the pulse memo; flow-driven nodes publish for the rest of
  /// the pulse, replacing any earlier value (loop indices, counters) and evicting the
  /// memoized values derived from it.
  pub fn write(&self, value: T, ctx: &NodeContext<'_>) {
    let key = PortRef::new(ctx.node_id(), self.index);
    let pure = ctx
      .graph()
      .descriptor(ctx.node_id())
      .is_some_and(|d| d.is_pure());
    if pure {
      ctx.pulse().memo_insert(key, Arc::new(value));
    } else {
      ctx.pulse().publish(key, Arc::new(value));
    }
  }
}
