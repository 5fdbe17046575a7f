//! Generic addition: `AddNode<T>` and the variadic `SumNode<T>`.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{ValueInput, ValueInputList, ValueOutput};
use crate::types::{NodeDescriptor, Tagged};

/// Types the math nodes are instantiated for.
pub trait Summable: Tagged {
  fn add(&self, other: &Self) -> Self;
}

impl Summable for i32 {
  /// Wraps on overflow.
  fn add(&self, other: &Self) -> Self {
    self.wrapping_add(*other)
  }
}

impl Summable for f32 {
  fn add(&self, other: &Self) -> Self {
    self + other
  }
}

/// Concatenation.
impl Summable for String {
  fn add(&self, other: &Self) -> Self {
    let mut out = String::with_capacity(self.len() + other.len());
    out.push_str(self);
    out.push_str(other);
    out
  }
}

/// `Result = A + B`.
pub struct AddNode<T: Summable> {
  descriptor: NodeDescriptor,
  a: ValueInput<T>,
  b: ValueInput<T>,
  result: ValueOutput<T>,
}

impl<T: Summable> Default for AddNode<T> {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Add", "Math");
    let a = d.input::<T>("A");
    let b = d.input::<T>("B");
    let result = d.output::<T>("Result");
    Self {
      descriptor: d.build(),
      a,
      b,
      result,
    }
  }
}

#[async_trait]
impl<T: Summable> Node for AddNode<T> {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let a = self.a.read_shared(ctx).await?;
    let b = self.b.read_shared(ctx).await?;
    self.result.write(a.add(&b), ctx);
    Ok(())
  }
}

/// Sum of every value wired into "Values", in connection order; the type's default
/// when nothing is connected.
pub struct SumNode<T: Summable> {
  descriptor: NodeDescriptor,
  values: ValueInputList<T>,
  sum: ValueOutput<T>,
}

impl<T: Summable> Default for SumNode<T> {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Sum", "Math");
    let values = d.input_list::<T>("Values");
    let sum = d.output::<T>("Sum");
    Self {
      descriptor: d.build(),
      values,
      sum,
    }
  }
}

#[async_trait]
impl<T: Summable> Node for SumNode<T> {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let total = self
      .values
      .read(ctx)
      .await?
      .iter()
      .fold(T::default(), |acc, v| acc.add(v));
    self.sum.write(total, ctx);
    Ok(())
  }
}
