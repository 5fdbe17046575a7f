//! Conditional branching: plain, stateful and state-publishing `If` nodes.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NodeError;
use crate::node::{Node, NodeContext};
use crate::ports::{FlowContinuation, GlobalStore, ValueInput, ValueOutput};
use crate::types::NodeDescriptor;

/// Change of a boolean condition between two activations of the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Transition {
  BecameTrue,
  BecameFalse,
  StillTrue,
  StillFalse,
}

impl Transition {
  pub fn between(previous: bool, current: bool) -> Self {
    match (previous, current) {
      (false, true) => Transition::BecameTrue,
      (true, false) => Transition::BecameFalse,
      (true, true) => Transition::StillTrue,
      (false, false) => Transition::StillFalse,
    }
  }

  /// Name of the flow edge fired by [StatefulIfNode] for this transition.
  pub fn edge_name(self) -> &'static str {
    match self {
      Transition::BecameTrue => "Became True",
      Transition::BecameFalse => "Became False",
      Transition::StillTrue => "Still True",
      Transition::StillFalse => "Still False",
    }
  }
}

/// Fires "True" or "False" depending on "Condition".
pub struct IfNode {
  descriptor: NodeDescriptor,
  condition: ValueInput<bool>,
  on_true: FlowContinuation,
  on_false: FlowContinuation,
}

impl Default for IfNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("If", "Flow");
    d.flow_input();
    let condition = d.input::<bool>("Condition");
    let on_true = d.flow_continuation("True");
    let on_false = d.flow_continuation("False");
    Self {
      descriptor: d.build(),
      condition,
      on_true,
      on_false,
    }
  }
}

#[async_trait]
impl Node for IfNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    if self.condition.read(ctx).await? {
      self.on_true.execute(ctx).await
    } else {
      self.on_false.execute(ctx).await
    }
  }
}

/// Remembers the condition seen on its previous activation and fires exactly one of
/// "Became True", "Became False", "Still True" or "Still False". The first activation
/// compares against `false`.
pub struct StatefulIfNode {
  descriptor: NodeDescriptor,
  condition: ValueInput<bool>,
  previous: GlobalStore<bool>,
  became_true: FlowContinuation,
  became_false: FlowContinuation,
  still_true: FlowContinuation,
  still_false: FlowContinuation,
}

impl Default for StatefulIfNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("Stateful If", "Flow");
    d.flow_input();
    let condition = d.input::<bool>("Condition");
    let became_true = d.flow_continuation("Became True");
    let became_false = d.flow_continuation("Became False");
    let still_true = d.flow_continuation("Still True");
    let still_false = d.flow_continuation("Still False");
    Self {
      descriptor: d.build(),
      condition,
      previous: GlobalStore::new(false),
      became_true,
      became_false,
      still_true,
      still_false,
    }
  }
}

impl StatefulIfNode {
  /// Condition observed on the last activation.
  pub fn previous(&self) -> bool {
    self.previous.read()
  }

  fn edge(&self, transition: Transition) -> &FlowContinuation {
    match transition {
      Transition::BecameTrue => &self.became_true,
      Transition::BecameFalse => &self.became_false,
      Transition::StillTrue => &self.still_true,
      Transition::StillFalse => &self.still_false,
    }
  }
}

#[async_trait]
impl Node for StatefulIfNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let current = self.condition.read(ctx).await?;
    let previous = self.previous.read();
    self.previous.write(current);
    self.edge(Transition::between(previous, current)).execute(ctx).await
  }

  fn reset(&self) {
    self.previous.reset();
  }
}

/// Publishes whether the condition just became true or false, then fires "True" or
/// "False" like [IfNode].
pub struct IfWithStateNode {
  descriptor: NodeDescriptor,
  condition: ValueInput<bool>,
  previous: GlobalStore<bool>,
  became_true: ValueOutput<bool>,
  became_false: ValueOutput<bool>,
  on_true: FlowContinuation,
  on_false: FlowContinuation,
}

impl Default for IfWithStateNode {
  fn default() -> Self {
    let mut d = NodeDescriptor::builder("If With State", "Flow");
    d.flow_input();
    let condition = d.input::<bool>("Condition");
    let became_true = d.output::<bool>("Became True");
    let became_false = d.output::<bool>("Became False");
    let on_true = d.flow_continuation("True");
    let on_false = d.flow_continuation("False");
    Self {
      descriptor: d.build(),
      condition,
      previous: GlobalStore::new(false),
      became_true,
      became_false,
      on_true,
      on_false,
    }
  }
}

#[async_trait]
impl Node for IfWithStateNode {
  fn descriptor(&self) -> &NodeDescriptor {
    &self.descriptor
  }

  async fn process(&self, ctx: &NodeContext<'_>) -> Result<(), NodeError> {
    let current = self.condition.read(ctx).await?;
    let previous = self.previous.read();
    self.previous.write(current);
    let transition = Transition::between(previous, current);
    self
      .became_true
      .write(transition == Transition::BecameTrue, ctx);
    self
      .became_false
      .write(transition == Transition::BecameFalse, ctx);
    if current {
      self.on_true.execute(ctx).await
    } else {
      self.on_false.execute(ctx).await
    }
  }

  fn reset(&self) {
    self.previous.reset();
  }
}
