//! Construction and structural validation of a [Graph].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::RuntimeConfig;
use crate::error::GraphError;
use crate::graph::{Graph, NodeEntry};
use crate::node::Node;
use crate::registry::NodeRegistry;
use crate::types::{InputKind, NodeId, PortRef, TypeTag};

struct ValueEdge {
  from: String,
  from_port: String,
  to: String,
  to_port: String,
}

struct FlowEdge {
  from: String,
  flow: String,
  to: String,
}

/// Collects nodes and connections by name; [GraphBuilder::build] resolves and checks
/// them. Errors from chained calls are deferred and the first one is returned by
/// `build`.
///
/// ```ignore
/// let graph = GraphBuilder::new("demo")
///   .add_node("a", ConstantNode::new(5))
///   .add_node("b", ConstantNode::new(3))
///   .add_node("add", AddNode::<i32>::default())
///   .connect_value("a", "Value", "add", "A")
///   .connect_value("b", "Value", "add", "B")
///   .build()?;
/// ```
pub struct GraphBuilder {
  name: String,
  config: RuntimeConfig,
  nodes: Vec<NodeEntry>,
  names: HashMap<String, NodeId>,
  value_edges: Vec<ValueEdge>,
  flow_edges: Vec<FlowEdge>,
  error: Option<GraphError>,
}

impl GraphBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      config: RuntimeConfig::default(),
      nodes: Vec::new(),
      names: HashMap::new(),
      value_edges: Vec::new(),
      flow_edges: Vec::new(),
      error: None,
    }
  }

  pub fn config(mut self, config: RuntimeConfig) -> Self {
    self.config = config;
    self
  }

  pub fn add_node<N: Node + 'static>(self, name: impl Into<String>, node: N) -> Self {
    self.add_boxed(name, Box::new(node))
  }

  pub fn add_boxed(mut self, name: impl Into<String>, node: Box<dyn Node>) -> Self {
    let name = name.into();
    if self.names.contains_key(&name) {
      self.fail(GraphError::DuplicateNode(name));
      return self;
    }
    let id = NodeId(self.nodes.len());
    debug!(node = %name, id = %id, kind = %node.descriptor().name, "adding node");
    self.names.insert(name.clone(), id);
    self.nodes.push(NodeEntry { name, node });
    self
  }

  /// Instantiates `node_type` from `registry` (with `type_arg` for generic types).
  pub fn add_registered(
    mut self,
    registry: &NodeRegistry,
    name: impl Into<String>,
    node_type: &str,
    type_arg: Option<TypeTag>,
  ) -> Self {
    match registry.create(node_type, type_arg) {
      Ok(node) => self.add_boxed(name, node),
      Err(e) => {
        self.fail(e);
        self
      }
    }
  }

  /// Wires output `from_port` of `from` into input `to_port` of `to`.
  pub fn connect_value(
    mut self,
    from: impl Into<String>,
    from_port: impl Into<String>,
    to: impl Into<String>,
    to_port: impl Into<String>,
  ) -> Self {
    self.value_edges.push(ValueEdge {
      from: from.into(),
      from_port: from_port.into(),
      to: to.into(),
      to_port: to_port.into(),
    });
    self
  }

  /// Wires flow output `flow` of `from` into the flow input of `to`.
  pub fn connect_flow(
    mut self,
    from: impl Into<String>,
    flow: impl Into<String>,
    to: impl Into<String>,
  ) -> Self {
    self.flow_edges.push(FlowEdge {
      from: from.into(),
      flow: flow.into(),
      to: to.into(),
    });
    self
  }

  #[instrument(level = "trace", skip(self), fields(graph = %self.name))]
  pub fn build(mut self) -> Result<Arc<Graph>, GraphError> {
    if let Some(e) = self.error.take() {
      return Err(e);
    }
    let value_edges = self.resolve_value_edges()?;
    let flow_edges = self.resolve_flow_edges()?;
    self.check_required_inputs(&value_edges)?;
    self.check_value_cycles(&value_edges)?;

    info!(
      graph = %self.name,
      nodes = self.nodes.len(),
      value_edges = self.value_edges.len(),
      flow_edges = self.flow_edges.len(),
      "graph built"
    );
    Ok(Arc::new(Graph::new(
      self.name,
      self.nodes,
      self.names,
      value_edges,
      flow_edges,
      self.config,
    )))
  }

  fn fail(&mut self, error: GraphError) {
    if self.error.is_none() {
      self.error = Some(error);
    }
  }

  fn lookup(&self, name: &str) -> Result<(NodeId, &NodeEntry), GraphError> {
    let id = self
      .names
      .get(name)
      .copied()
      .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;
    Ok((id, &self.nodes[id.index()]))
  }

  fn resolve_value_edges(&self) -> Result<HashMap<PortRef, Vec<PortRef>>, GraphError> {
    let mut wired: HashMap<PortRef, Vec<PortRef>> = HashMap::new();
    for edge in &self.value_edges {
      let (from_id, from) = self.lookup(&edge.from)?;
      let (to_id, to) = self.lookup(&edge.to)?;
      let from_desc = from.node.descriptor();
      let to_desc = to.node.descriptor();
      let out_index =
        from_desc
          .output_index(&edge.from_port)
          .ok_or_else(|| GraphError::UnknownPort {
            node: edge.from.clone(),
            port: edge.from_port.clone(),
          })?;
      let in_index = to_desc
        .input_index(&edge.to_port)
        .ok_or_else(|| GraphError::UnknownPort {
          node: edge.to.clone(),
          port: edge.to_port.clone(),
        })?;
      let output = &from_desc.outputs[out_index];
      let input = &to_desc.inputs[in_index];
      if output.type_id != input.type_id {
        return Err(GraphError::TypeMismatch {
          from: edge.from.clone(),
          from_port: edge.from_port.clone(),
          to: edge.to.clone(),
          to_port: edge.to_port.clone(),
          expected: input.type_name.to_string(),
          found: output.type_name.to_string(),
        });
      }
      let sources = wired.entry(PortRef::new(to_id, in_index)).or_default();
      if input.kind == InputKind::Single && !sources.is_empty() {
        return Err(GraphError::InputAlreadyConnected {
          node: edge.to.clone(),
          port: edge.to_port.clone(),
        });
      }
      sources.push(PortRef::new(from_id, out_index));
    }
    Ok(wired)
  }

  fn resolve_flow_edges(&self) -> Result<HashMap<PortRef, Vec<NodeId>>, GraphError> {
    let mut wired: HashMap<PortRef, Vec<NodeId>> = HashMap::new();
    for edge in &self.flow_edges {
      let (from_id, from) = self.lookup(&edge.from)?;
      let (to_id, to) = self.lookup(&edge.to)?;
      let flow = from
        .node
        .descriptor()
        .flow_index(&edge.flow)
        .ok_or_else(|| GraphError::UnknownFlowOutput {
          node: edge.from.clone(),
          flow: edge.flow.clone(),
        })?;
      if !to.node.descriptor().flow_input {
        return Err(GraphError::NotFlowInput(edge.to.clone()));
      }
      wired.entry(PortRef::new(from_id, flow)).or_default().push(to_id);
    }
    Ok(wired)
  }

  fn check_required_inputs(
    &self,
    value_edges: &HashMap<PortRef, Vec<PortRef>>,
  ) -> Result<(), GraphError> {
    for (index, entry) in self.nodes.iter().enumerate() {
      for (port, input) in entry.node.descriptor().inputs.iter().enumerate() {
        let key = PortRef::new(NodeId(index), port);
        if input.required && value_edges.get(&key).is_none_or(Vec::is_empty) {
          return Err(GraphError::RequiredInputUnconnected {
            node: entry.name.clone(),
            port: input.name.clone(),
          });
        }
      }
    }
    Ok(())
  }

  /// Kahn's algorithm over the node-level value dependency graph.
  fn check_value_cycles(
    &self,
    value_edges: &HashMap<PortRef, Vec<PortRef>>,
  ) -> Result<(), GraphError> {
    let n = self.nodes.len();
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (input, sources) in value_edges {
      for source in sources {
        dependents[source.node.index()].push(input.node.index());
        in_degree[input.node.index()] += 1;
      }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|i| in_degree[*i] == 0).collect();
    let mut visited = 0;
    while let Some(node) = queue.pop_front() {
      visited += 1;
      for &next in &dependents[node] {
        in_degree[next] -= 1;
        if in_degree[next] == 0 {
          queue.push_back(next);
        }
      }
    }

    if visited < n {
      let stuck = (0..n).find(|i| in_degree[*i] > 0).unwrap_or(0);
      return Err(GraphError::ValueCycle(self.nodes[stuck].name.clone()));
    }
    Ok(())
  }
}
