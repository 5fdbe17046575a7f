//! Log node: records and traces every value it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowContinuation, ValueInput};
use crate::pulse::lock;
use crate::types::{NodeDescriptor, Tagged};

/// Shared list of values seen by a [LogNode]. Cloning shares the list.
#[derive(Debug)]
pub struct LogSink<T> {
  entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for LogSink<T> {
  fn clone(&self) -> Self {
    Self {
      entries: Arc::clone(&self.entries),
    }
  }
}

impl<T> Default for LogSink<T> {
  fn default() -> Self {
    Self {
      entries: Arc::new(Mutex::new(Vec::new())),
    }
  }
}

impl<T: Clone> LogSink<T> {
  pub fn push(&self, value: T) {
    lock(&self.entries).push(value);
  }

  pub fn entries(&self) -> Vec<T> {
    lock(&self.entries).clone()
  }

  pub fn len(&self) -> usize {
    lock(&self.entries).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn clear(&self) {
    lock(&self.entries).clear();
  }
}

/// Reads "Value", appends it to the sink, logs it and continues with "Next".
pub struct LogNode<T: Tagged> {
  descriptor: NodeDescriptor,
  value: ValueInput<T>,
  next: FlowContinuation,
  sink: LogSink<T>,
}

impl<T: Tagged> LogNode<T> {
  pub fn with_sink(sink: LogSink<T>) -> Self {
    let mut d = NodeDescriptor::builder("Log", "Debug");
    d.flow_input();
    let value = d.input::<T>("Value");
    let next = d.flow_continuation("Next");
    Self {
      descriptor: d.build(),
      value,
      next,
      sink,
    }
  }

  pub fn sink(&self) -> LogSink<T> {
    self.sink.clone()
  }
}

impl<T: Tagged> Default for LogNode<T> {
  fn default() -> Self {
    Self::with_sink(LogSink::default())
  }
}

#[async_trait]
impl<T: Tagged> Node for LogNode<T> {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let value = self.value.read(ctx).await?;
    info!(pulse = %ctx.pulse_id(), node = %ctx.node_id(), value = ?value, "log");
    self.sink.push(value);
    self.next.execute(ctx).await
  }
}
