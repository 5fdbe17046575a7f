//! Probe and source nodes shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::NodeError;
use crate::graph::Graph;
use crate::node::{Node, NodeContext};
use crate::nodes::LogSink;
use crate::ports::{FlowContinuation, ValueInput, ValueOutput};
use crate::pulse::{PulseContext, lock};
use crate::resolver::resolve_output;
use crate::types::{NodeDescriptor, NodeValue, PortRef, PulseId};

/// Flow node appending its label to a shared sink, then firing "Next".
pub(crate) struct ProbeNode {
  descriptor: NodeDescriptor,
  label: String,
  sink: LogSink<String>,
  next: FlowContinuation,
}

impl ProbeNode {
  pub(crate) fn new(label: impl Into<String>, sink: &LogSink<String>) -> Self {
    let mut d = NodeDescriptor::builder("Probe", "Tests");
    d.flow_input();
    let next = d.flow_continuation("Next");
    Self {
      descriptor: d.build(),
      label: label.into(),
      sink: sink.clone(),
      next,
    }
  }
}

#[async_trait]
impl Node for ProbeNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    self.sink.push(self.label.clone());
    self.next.execute(ctx).await
  }
}

/// Test-controlled value cell read by a [SourceNode].
pub(crate) struct SourceHandle<T> {
  cell: Arc<Mutex<T>>,
  evaluations: Arc<AtomicUsize>,
}

impl<T: NodeValue> SourceHandle<T> {
  pub(crate) fn set(&self, value: T) {
    *lock(&self.cell) = value;
  }

  pub(crate) fn evaluations(&self) -> usize {
    self.evaluations.load(Ordering::SeqCst)
  }
}

/// Pure node publishing the current cell value on "Value" and counting evaluations.
pub(crate) struct SourceNode<T> {
  descriptor: NodeDescriptor,
  cell: Arc<Mutex<T>>,
  evaluations: Arc<AtomicUsize>,
  output: ValueOutput<T>,
}

impl<T: NodeValue + Default> SourceNode<T> {
  pub(crate) fn new(initial: T) -> (Self, SourceHandle<T>) {
    let mut d = NodeDescriptor::builder("Source", "Tests");
    let output = d.output::<T>("Value");
    let cell = Arc::new(Mutex::new(initial));
    let evaluations = Arc::new(AtomicUsize::new(0));
    let handle = SourceHandle {
      cell: Arc::clone(&cell),
      evaluations: Arc::clone(&evaluations),
    };
    (
      Self {
        descriptor: d.build(),
        cell,
        evaluations,
        output,
      },
      handle,
    )
  }
}

#[async_trait]
impl<T: NodeValue + Default> Node for SourceNode<T> {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    self.evaluations.fetch_add(1, Ordering::SeqCst);
    let value = lock(&self.cell).clone();
    self.output.write(value, ctx);
    Ok(())
  }
}

/// Pure `Result = A < Limit`.
pub(crate) struct BelowNode {
  descriptor: NodeDescriptor,
  a: ValueInput<i32>,
  limit: ValueInput<i32>,
  result: ValueOutput<bool>,
}

impl Default for BelowNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Below", "Tests");
    let a = d.input::<i32>("A");
    let limit = d.input::<i32>("Limit");
    let result = d.output::<bool>("Result");
    Self {
      descriptor: d.build(),
      a,
      limit,
      result,
    }
  }
}

#[async_trait]
impl Node for BelowNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let a = self.a.read(ctx).await?;
    let limit = self.limit.read(ctx).await?;
    self.result.write(a < limit, ctx);
    Ok(())
  }
}

/// Pure node whose single input must be connected.
pub(crate) struct NeedsInputNode {
  descriptor: NodeDescriptor,
  value: ValueInput<i32>,
  output: ValueOutput<i32>,
}

impl Default for NeedsInputNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Needs Input", "Tests");
    let value = d.required_input::<i32>("Value");
    let output = d.output::<i32>("Value");
    Self {
      descriptor: d.build(),
      value,
      output,
    }
  }
}

#[async_trait]
impl Node for NeedsInputNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let value = self.value.read(ctx).await?;
    self.output.write(value, ctx);
    Ok(())
  }
}

/// Flow node that triggers a flow index it never declared.
pub(crate) struct RogueNode {
  descriptor: NodeDescriptor,
}

impl Default for RogueNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Rogue", "Tests");
    d.flow_input();
    let _ = d.flow_continuation("Next");
    Self {
      descriptor: d.build(),
    }
  }
}

#[async_trait]
impl Node for RogueNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    ctx.trigger_flow(5, false).await
  }
}

/// Resolves output `port` of node `node` in a fresh pulse, as a consumer would.
pub(crate) async fn pull<T: NodeValue>(graph: &Arc<Graph>, node: &str, port: &str) -> T {
  let id = graph.node_id(node).unwrap();
  let index = graph.descriptor(id).unwrap().output_index(port).unwrap();
  let pulse = PulseContext::new(PulseId(0), Arc::clone(graph), CancellationToken::new());
  let value = resolve_output(&pulse, PortRef::new(id, index), 0)
    .await
    .unwrap();
  value.downcast_ref::<T>().unwrap().clone()
}
