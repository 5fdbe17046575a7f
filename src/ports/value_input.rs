//! Value inputs: single (`ValueInput<T>`) and variadic (`ValueInputList<T>`).

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::NodeError;
use crate::node::NodeContext;
use crate::resolver;
use crate::types::{NodeValue, SharedValue};

/// Value input accepting at most one upstream connection of type `T`.
pub struct ValueInput<T> {
  index: usize,
  _marker: PhantomData<fn() -> T>,
}

impl<T: NodeValue> ValueInput<T> {
  pub(crate) fn new(index: usize) -> Self {
    Self {
      index,
      _marker: PhantomData,
    }
  }

  pub fn index(&self) -> usize {
    self.index
  }

  /// Reads the input for the current pulse.
  ///
  /// Unconnected inputs yield their declared default. Connected inputs pull the
  /// upstream output, evaluating the producing node at most once per pulse.
  pub async fn read(&self, ctx: &NodeContext<'_>) -> Result<T, NodeError> {
    let value = self.read_shared(ctx).await?;
    Ok((*value).clone())
  }

  /// Like [ValueInput::read] but returns the memoized value itself.
  pub async fn read_shared(&self, ctx: &NodeContext<'_>) -> Result<Arc<T>, NodeError> {
    let value = resolver::resolve_input(ctx, self.index).await?;
    downcast(ctx, self.index, value)
  }
}

/// Variadic value input: an ordered list of upstream connections of type `T`.
pub struct ValueInputList<T> {
  index: usize,
  _marker: PhantomData<fn() -> T>,
}

impl<T: NodeValue> ValueInputList<T> {
  pub(crate) fn new(index: usize) -> Self {
    Self {
      index,
      _marker: PhantomData,
    }
  }

  pub fn index(&self) -> usize {
    self.index
  }

  /// Reads every connected source in connection order; empty when unconnected.
  pub async fn read(&self, ctx: &NodeContext<'_>) -> Result<Vec<T>, NodeError> {
    let values = resolver::resolve_input_list(ctx, self.index).await?;
    values
      .into_iter()
      .map(|v| downcast::<T>(ctx, self.index, v).map(|v| (*v).clone()))
      .collect()
  }
}

fn downcast<T: NodeValue>(
  ctx: &NodeContext<'_>,
  port: usize,
  value: SharedValue,
) -> Result<Arc<T>, NodeError> {
  value.downcast::<T>().map_err(|_| NodeError::TypeMismatch {
    node: ctx.node_id(),
    port,
    expected: type_name::<T>(),
  })
}
