//! A built node graph and the host-facing pulse entry points.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, instrument, warn};

use crate::config::RuntimeConfig;
use crate::dispatcher;
use crate::error::PulseError;
use crate::node::{AsAny, Node};
use crate::pulse::PulseContext;
use crate::reactive::ReactiveTable;
use crate::types::{NodeDescriptor, NodeId, PortRef, PulseId, PulseReport};

/// A node instance together with its unique name.
pub(crate) struct NodeEntry {
  pub(crate) name: String,
  pub(crate) node: Box<dyn Node>,
}

/// Immutable wiring plus the state that outlives pulses (node `GlobalStore`s and the
/// reactive observation table). Built by [crate::GraphBuilder].
pub struct Graph {
  name: String,
  nodes: Vec<NodeEntry>,
  names: HashMap<String, NodeId>,
  /// Input port -> upstream output ports (one for single inputs, ordered for lists).
  value_edges: HashMap<PortRef, Vec<PortRef>>,
  /// (node, flow index) -> target nodes in connection order.
  flow_edges: HashMap<PortRef, Vec<NodeId>>,
  /// Output of a flow-driven node -> pure nodes whose memoized values derive from it.
  memo_dependents: HashMap<PortRef, Vec<NodeId>>,
  reactive: ReactiveTable,
  config: RuntimeConfig,
  shutdown: CancellationToken,
  next_pulse: AtomicU64,
}

impl Graph {
  pub(crate) fn new(
    name: String,
    nodes: Vec<NodeEntry>,
    names: HashMap<String, NodeId>,
    value_edges: HashMap<PortRef, Vec<PortRef>>,
    flow_edges: HashMap<PortRef, Vec<NodeId>>,
    config: RuntimeConfig,
  ) -> Self {
    let memo_dependents = memo_dependents(&nodes, &value_edges);
    Self {
      name,
      nodes,
      names,
      value_edges,
      memo_dependents,
      flow_edges,
      reactive: ReactiveTable::default(),
      config,
      shutdown: CancellationToken::new(),
      next_pulse: AtomicU64::new(1),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
    (0..self.nodes.len()).map(NodeId)
  }

  pub fn node_id(&self, name: &str) -> Option<NodeId> {
    self.names.get(name).copied()
  }

  pub fn node_name(&self, id: NodeId) -> Option<&str> {
    self.nodes.get(id.index()).map(|e| e.name.as_str())
  }

  pub fn descriptor(&self, id: NodeId) -> Option<&NodeDescriptor> {
    self.nodes.get(id.index()).map(|e| e.node.descriptor())
  }

  pub fn node(&self, id: NodeId) -> Option<&dyn Node> {
    self.nodes.get(id.index()).map(|e| e.node.as_ref())
  }

  /// The concrete node behind `id`, if it is an `N`.
  pub fn node_as<N: Node + 'static>(&self, id: NodeId) -> Option<&N> {
    self
      .nodes
      .get(id.index())
      .and_then(|e| AsAny::as_any(e.node.as_ref()).downcast_ref::<N>())
  }

  /// Looks a node up by name and downcasts it.
  pub fn node_named<N: Node + 'static>(&self, name: &str) -> Option<&N> {
    self.node_id(name).and_then(|id| self.node_as::<N>(id))
  }

  /// Upstream outputs wired into input `input` of `node`; empty when unconnected.
  pub fn value_sources(&self, node: NodeId, input: usize) -> &[PortRef] {
    self
      .value_edges
      .get(&PortRef::new(node, input))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Nodes wired to flow output `flow` of `node`, in connection order.
  pub fn flow_targets(&self, node: NodeId, flow: usize) -> &[NodeId] {
    self
      .flow_edges
      .get(&PortRef::new(node, flow))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Pure nodes downstream of flow-node output `port`, through pure nodes only.
  /// Their memoized values go stale whenever `port` is republished.
  pub(crate) fn memo_dependents(&self, port: PortRef) -> &[NodeId] {
    self
      .memo_dependents
      .get(&port)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn config(&self) -> &RuntimeConfig {
    &self.config
  }

  pub(crate) fn entry(&self, id: NodeId) -> Option<&NodeEntry> {
    self.nodes.get(id.index())
  }

  pub(crate) fn reactive(&self) -> &ReactiveTable {
    &self.reactive
  }

  /// Number of reactive inputs observed so far.
  pub fn reactive_observations(&self) -> usize {
    self.reactive.len()
  }

  /// Nodes driven by [Graph::update]: reactive inputs, outgoing flows, no flow input.
  pub fn update_nodes(&self) -> Vec<NodeId> {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, e)| e.node.descriptor().is_update_node())
      .map(|(i, _)| NodeId(i))
      .collect()
  }

  /// A fresh pulse token, cancelled when the graph shuts down.
  pub fn pulse_token(&self) -> CancellationToken {
    self.shutdown.child_token()
  }

  /// Triggers `root` and runs the pulse to completion.
  pub async fn trigger(self: &Arc<Self>, root: NodeId) -> Result<PulseReport, PulseError> {
    self.trigger_with_token(root, self.pulse_token()).await
  }

  pub async fn trigger_named(self: &Arc<Self>, name: &str) -> Result<PulseReport, PulseError> {
    let root = self
      .node_id(name)
      .ok_or_else(|| PulseError::UnknownNodeName(name.to_string()))?;
    self.trigger(root).await
  }

  /// Runs a pulse rooted at `root` observing `token`. The token is threaded unchanged
  /// through every activation of the pulse.
  #[instrument(level = "trace", skip(self, token))]
  pub async fn trigger_with_token(
    self: &Arc<Self>,
    root: NodeId,
    token: CancellationToken,
  ) -> Result<PulseReport, PulseError> {
    let entry = self.entry(root).ok_or(PulseError::NodeNotFound(root))?;
    if entry.node.descriptor().is_pure() {
      return Err(PulseError::NotTriggerable(entry.name.clone()));
    }
    let id = PulseId(self.next_pulse.fetch_add(1, Ordering::Relaxed));
    let span = info_span!("pulse", pulse = %id, root = %entry.name);
    let pulse = PulseContext::new(id, Arc::clone(self), token);

    async move {
      info!("pulse started");
      match dispatcher::activate(&pulse, root, 0).await {
        Ok(()) => {
          let report = pulse.into_report(root);
          info!(
            activations = report.activation_count,
            evaluations = report.evaluations,
            memo_hits = report.memo_hits,
            invalidations = report.invalidations,
            cancelled = report.cancelled,
            "pulse finished"
          );
          Ok(report)
        }
        Err(source) => {
          warn!(error = %source, "pulse aborted");
          Err(PulseError::Aborted { pulse: id, source })
        }
      }
    }
    .instrument(span)
    .await
  }

  /// Runs a pulse as a tokio task with its own cancellation token.
  pub fn spawn(self: &Arc<Self>, root: NodeId) -> PulseHandle {
    let token = self.pulse_token();
    let graph = Arc::clone(self);
    let pulse_token = token.clone();
    let handle = tokio::spawn(async move { graph.trigger_with_token(root, pulse_token).await });
    PulseHandle { token, handle }
  }

  /// One reactive tick: pulses every update node. Nodes whose reactive inputs did not
  /// change are suppressed and report no activations.
  pub async fn update(self: &Arc<Self>) -> Result<Vec<PulseReport>, PulseError> {
    let mut reports = Vec::new();
    for node in self.update_nodes() {
      reports.push(self.trigger(node).await?);
    }
    Ok(reports)
  }

  /// Cancels every in-flight pulse and every pulse started afterwards.
  pub fn shutdown(&self) {
    info!(graph = %self.name, "shutting down");
    self.shutdown.cancel();
  }

  pub fn is_shut_down(&self) -> bool {
    self.shutdown.is_cancelled()
  }

  /// Forgets reactive observations and restores every node's persistent state.
  pub fn reset_state(&self) {
    self.reactive.clear();
    for entry in &self.nodes {
      entry.node.reset();
    }
  }
}

/// For every output of a flow-driven node, the sorted set of pure nodes reachable from
/// it along value edges. Flow-driven consumers end the walk: they are never memoized.
fn memo_dependents(
  nodes: &[NodeEntry],
  value_edges: &HashMap<PortRef, Vec<PortRef>>,
) -> HashMap<PortRef, Vec<NodeId>> {
  let mut consumers: HashMap<PortRef, Vec<NodeId>> = HashMap::new();
  for (input, sources) in value_edges {
    for source in sources {
      consumers.entry(*source).or_default().push(input.node);
    }
  }
  let is_pure = |id: NodeId| {
    nodes
      .get(id.index())
      .is_some_and(|e| e.node.descriptor().is_pure())
  };

  let mut dependents = HashMap::new();
  for (index, entry) in nodes.iter().enumerate() {
    let descriptor = entry.node.descriptor();
    if descriptor.is_pure() {
      continue;
    }
    for port in 0..descriptor.outputs.len() {
      let origin = PortRef::new(NodeId(index), port);
      let mut reached = BTreeSet::new();
      let mut queue: VecDeque<PortRef> = VecDeque::from([origin]);
      while let Some(output) = queue.pop_front() {
        for consumer in consumers.get(&output).into_iter().flatten() {
          if !is_pure(*consumer) || !reached.insert(*consumer) {
            continue;
          }
          let outputs = nodes[consumer.index()].node.descriptor().outputs.len();
          queue.extend((0..outputs).map(|p| PortRef::new(*consumer, p)));
        }
      }
      if !reached.is_empty() {
        dependents.insert(origin, reached.into_iter().collect());
      }
    }
  }
  dependents
}

impl fmt::Debug for Graph {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Graph")
      .field("name", &self.name)
      .field("nodes", &self.nodes.len())
      .field("value_edges", &self.value_edges.len())
      .field("flow_edges", &self.flow_edges.len())
      .field("shut_down", &self.is_shut_down())
      .finish()
  }
}

/// A pulse running as a tokio task.
pub struct PulseHandle {
  token: CancellationToken,
  handle: JoinHandle<Result<PulseReport, PulseError>>,
}

impl PulseHandle {
  /// Requests cancellation; loops stop at their next check.
  pub fn cancel(&self) {
    self.token.cancel();
  }

  pub fn token(&self) -> &CancellationToken {
    &self.token
  }

  pub fn is_finished(&self) -> bool {
    self.handle.is_finished()
  }

  pub async fn join(self) -> Result<PulseReport, PulseError> {
    self
      .handle
      .await
      .map_err(|e| PulseError::Join(e.to_string()))?
  }
}
