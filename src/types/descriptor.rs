//! Static description of a node's ports.
//!
//! A node builds its descriptor while it constructs its port fields: every call on
//! [DescriptorBuilder] allocates the next index in the matching port list and returns
//! the typed port bound to that index, so declaration order and index can never
//! disagree.

use serde::Serialize;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use super::{NodeFlowRef, NodeValue, SharedValue};
use crate::ports::{FlowCall, FlowContinuation, ValueInput, ValueInputList, ValueOutput};

/// Type-erased equality used to compare reactive observations.
pub(crate) type ErasedEq = fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> bool;

fn erased_eq<T: PartialEq + 'static>(
  a: &(dyn Any + Send + Sync),
  b: &(dyn Any + Send + Sync),
) -> bool {
  match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
    (Some(a), Some(b)) => a == b,
    _ => false,
  }
}

/// Whether an input accepts one upstream connection or an ordered list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
  Single,
  List,
}

/// Declared value input.
#[derive(Debug, Clone, Serialize)]
pub struct ValuePortSpec {
  pub name: String,
  pub type_name: &'static str,
  pub kind: InputKind,
  /// Build fails when a required input is left unconnected.
  pub required: bool,
  pub reactive: bool,
  #[serde(skip)]
  pub(crate) type_id: TypeId,
  /// Value returned while the input is unconnected.
  #[serde(skip)]
  pub(crate) default: SharedValue,
  #[serde(skip)]
  pub(crate) eq: Option<ErasedEq>,
}

/// Declared value output.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPortSpec {
  pub name: String,
  pub type_name: &'static str,
  #[serde(skip)]
  pub(crate) type_id: TypeId,
  /// Value seen by consumers when a flow-driven node has not published this pulse.
  #[serde(skip)]
  pub(crate) default: SharedValue,
}

/// Name, editor category and ordered port lists of a node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
  pub name: String,
  /// Editor grouping path, e.g. `"Math"` or `"Flow/Loops"`. Irrelevant to execution.
  pub category: String,
  /// Whether the node can be the target of a flow edge.
  pub flow_input: bool,
  /// Editor-only annotation; ignored by the runtime.
  pub collapsed: bool,
  pub inputs: Vec<ValuePortSpec>,
  pub outputs: Vec<OutputPortSpec>,
  pub flows: Vec<NodeFlowRef>,
}

impl NodeDescriptor {
  pub fn builder(name: impl Into<String>, category: impl Into<String>) -> DescriptorBuilder {
    DescriptorBuilder {
      descriptor: NodeDescriptor {
        name: name.into(),
        category: category.into(),
        flow_input: false,
        collapsed: false,
        inputs: Vec::new(),
        outputs: Vec::new(),
        flows: Vec::new(),
      },
    }
  }

  /// A pure node has no flow ports at all; it runs only when one of its outputs is pulled.
  pub fn is_pure(&self) -> bool {
    !self.flow_input && self.flows.is_empty()
  }

  pub fn has_reactive_inputs(&self) -> bool {
    self.inputs.iter().any(|i| i.reactive)
  }

  /// Update nodes are driven by [crate::Graph::update] instead of an incoming flow edge.
  pub fn is_update_node(&self) -> bool {
    !self.flow_input && !self.flows.is_empty() && self.has_reactive_inputs()
  }

  pub fn input_index(&self, name: &str) -> Option<usize> {
    self.inputs.iter().position(|p| p.name == name)
  }

  pub fn output_index(&self, name: &str) -> Option<usize> {
    self.outputs.iter().position(|p| p.name == name)
  }

  pub fn flow_index(&self, name: &str) -> Option<usize> {
    self.flows.iter().position(|f| f.name == name)
  }
}

/// Allocates port indices while a node constructs its port fields.
pub struct DescriptorBuilder {
  descriptor: NodeDescriptor,
}

impl DescriptorBuilder {
  /// Marks the node as a flow-edge target.
  pub fn flow_input(&mut self) -> &mut Self {
    self.descriptor.flow_input = true;
    self
  }

  pub fn collapsed(&mut self) -> &mut Self {
    self.descriptor.collapsed = true;
    self
  }

  /// Input that reads `T::default()` while unconnected.
  pub fn input<T: NodeValue + Default>(&mut self, name: impl Into<String>) -> ValueInput<T> {
    self.push_input::<T>(name.into(), T::default(), false, None)
  }

  pub fn input_with_default<T: NodeValue>(
    &mut self,
    name: impl Into<String>,
    default: T,
  ) -> ValueInput<T> {
    self.push_input::<T>(name.into(), default, false, None)
  }

  /// Input that must be connected for the graph to build.
  pub fn required_input<T: NodeValue + Default>(
    &mut self,
    name: impl Into<String>,
  ) -> ValueInput<T> {
    self.push_input::<T>(name.into(), T::default(), true, None)
  }

  /// Input whose change since the previous observation gates the node's activation.
  pub fn reactive_input<T: NodeValue + Default + PartialEq>(
    &mut self,
    name: impl Into<String>,
  ) -> ValueInput<T> {
    self.push_input::<T>(name.into(), T::default(), false, Some(erased_eq::<T>))
  }

  /// Variadic input accepting any number of ordered upstream connections.
  pub fn input_list<T: NodeValue>(&mut self, name: impl Into<String>) -> ValueInputList<T> {
    let index = self.descriptor.inputs.len();
    self.descriptor.inputs.push(ValuePortSpec {
      name: name.into(),
      type_name: type_name::<T>(),
      kind: InputKind::List,
      required: false,
      reactive: false,
      type_id: TypeId::of::<T>(),
      default: Arc::new(Vec::<T>::new()),
      eq: None,
    });
    ValueInputList::new(index)
  }

  pub fn output<T: NodeValue + Default>(&mut self, name: impl Into<String>) -> ValueOutput<T> {
    let index = self.descriptor.outputs.len();
    self.descriptor.outputs.push(OutputPortSpec {
      name: name.into(),
      type_name: type_name::<T>(),
      type_id: TypeId::of::<T>(),
      default: Arc::new(T::default()),
    });
    ValueOutput::new(index)
  }

  /// Outgoing edge fired at most once per activation.
  pub fn flow_continuation(&mut self, name: impl Into<String>) -> FlowContinuation {
    let index = self.push_flow(name.into(), false);
    FlowContinuation::new(index)
  }

  /// Outgoing looping edge, fired once per iteration.
  pub fn flow_call(&mut self, name: impl Into<String>) -> FlowCall {
    let index = self.push_flow(name.into(), true);
    FlowCall::new(index)
  }

  pub fn build(self) -> NodeDescriptor {
    self.descriptor
  }

  fn push_input<T: NodeValue>(
    &mut self,
    name: String,
    default: T,
    required: bool,
    eq: Option<ErasedEq>,
  ) -> ValueInput<T> {
    let index = self.descriptor.inputs.len();
    self.descriptor.inputs.push(ValuePortSpec {
      name,
      type_name: type_name::<T>(),
      kind: InputKind::Single,
      required,
      reactive: eq.is_some(),
      type_id: TypeId::of::<T>(),
      default: Arc::new(default),
      eq,
    });
    ValueInput::new(index)
  }

  fn push_flow(&mut self, name: String, is_loop: bool) -> usize {
    let index = self.descriptor.flows.len();
    self.descriptor.flows.push(NodeFlowRef::new(name, is_loop));
    index
  }
}
