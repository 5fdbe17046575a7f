//! Constant value source.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::ValueOutput;
use crate::types::{NodeDescriptor, Tagged};

/// Pure node publishing a fixed value on "Value".
pub struct ConstantNode<T: Tagged> {
  descriptor: NodeDescriptor,
  value: T,
  output: ValueOutput<T>,
}

impl<T: Tagged> ConstantNode<T> {
  pub fn new(value: T) -> Self {
    let mut d = NodeDescriptor::builder("Constant", "Values");
    let output = d.output::<T>("Value");
    Self {
      descriptor: d.build(),
      value,
      output,
    }
  }

  pub fn value(&self) -> &T {
    &self.value
  }
}

impl<T: Tagged> Default for ConstantNode<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}

#[async_trait]
impl<T: Tagged> Node for ConstantNode<T> {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    self.output.write(self.value.clone(), ctx);
    Ok(())
  }
}
