//! Per-pulse execution state: identity, cancellation token, value memo and counters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::graph::Graph;
use crate::types::{NodeId, PortRef, PulseId, PulseReport, SharedValue};

/// Locks `mutex`, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct MemoTable {
  /// Outputs written by flow-driven nodes; valid for the rest of the pulse.
  published: HashMap<PortRef, SharedValue>,
  /// Pure-node results, evicted when a flow-node output they derive from changes.
  values: HashMap<PortRef, SharedValue>,
}

#[derive(Default)]
struct PulseStats {
  activations: Vec<NodeId>,
  activation_count: usize,
  evaluations: usize,
  memo_hits: usize,
  invalidations: usize,
  suppressed: usize,
}

/// Execution context of one pulse, shared by every node it reaches.
///
/// The memo table lives exactly as long as the context, so value memoization never
/// crosses pulse boundaries.
pub struct PulseContext {
  id: PulseId,
  graph: Arc<Graph>,
  token: CancellationToken,
  memo: Mutex<MemoTable>,
  stats: Mutex<PulseStats>,
  started_at: DateTime<Utc>,
}

impl PulseContext {
  pub(crate) fn new(id: PulseId, graph: Arc<Graph>, token: CancellationToken) -> Self {
    Self {
      id,
      graph,
      token,
      memo: Mutex::new(MemoTable::default()),
      stats: Mutex::new(PulseStats::default()),
      started_at: Utc::now(),
    }
  }

  pub fn id(&self) -> PulseId {
    self.id
  }

  pub fn token(&self) -> &CancellationToken {
    &self.token
  }

  pub fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }

  pub fn graph(&self) -> &Arc<Graph> {
    &self.graph
  }

  /// Cached pure-node output.
  pub(crate) fn memo_get(&self, key: PortRef) -> Option<SharedValue> {
    lock(&self.memo).values.get(&key).cloned()
  }

  /// Caches a pure-node output. Keeps the first value written so repeated reads stay
  /// pointer-identical.
  pub(crate) fn memo_insert(&self, key: PortRef, value: SharedValue) {
    lock(&self.memo).values.entry(key).or_insert(value);
  }

  /// Publishes a flow-driven node's output, replacing any earlier value, and evicts
  /// the memoized values of every pure node derived from it.
  pub(crate) fn publish(&self, key: PortRef, value: SharedValue) {
    let dependents = self.graph.memo_dependents(key);
    let evicted = {
      let mut memo = lock(&self.memo);
      memo.published.insert(key, value);
      let before = memo.values.len();
      if !dependents.is_empty() {
        memo
          .values
          .retain(|port, _| dependents.binary_search(&port.node).is_err());
      }
      before - memo.values.len()
    };
    if evicted > 0 {
      trace!(pulse = %self.id, port = %key, evicted, "memo invalidated");
      lock(&self.stats).invalidations += evicted;
    }
  }

  pub(crate) fn published(&self, key: PortRef) -> Option<SharedValue> {
    lock(&self.memo).published.get(&key).cloned()
  }

  pub(crate) fn record_activation(&self, node: NodeId) {
    let mut stats = lock(&self.stats);
    stats.activation_count += 1;
    if self.graph.config().record_activations {
      stats.activations.push(node);
    }
  }

  pub(crate) fn record_evaluation(&self) {
    lock(&self.stats).evaluations += 1;
  }

  pub(crate) fn record_memo_hit(&self) {
    lock(&self.stats).memo_hits += 1;
  }

  pub(crate) fn record_suppressed(&self) {
    lock(&self.stats).suppressed += 1;
  }

  pub(crate) fn into_report(self, root: NodeId) -> PulseReport {
    let cancelled = self.token.is_cancelled();
    let stats = self.stats.into_inner().unwrap_or_else(PoisonError::into_inner);
    PulseReport {
      pulse_id: self.id,
      root,
      activations: stats.activations,
      activation_count: stats.activation_count,
      evaluations: stats.evaluations,
      memo_hits: stats.memo_hits,
      invalidations: stats.invalidations,
      suppressed: stats.suppressed,
      cancelled,
      started_at: self.started_at,
      finished_at: Utc::now(),
    }
  }
}
