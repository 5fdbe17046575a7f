//! Summary of one finished pulse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NodeId, PulseId};

/// What happened during one pulse, returned by [crate::Graph::trigger].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseReport {
  pub pulse_id: PulseId,
  /// Node the host triggered.
  pub root: NodeId,
  /// Activated nodes in activation order. Empty when activation recording is disabled.
  pub activations: Vec<NodeId>,
  /// Number of activations, recorded or not.
  pub activation_count: usize,
  /// Pure value nodes evaluated on demand.
  pub evaluations: usize,
  /// Value reads answered from the memo table.
  pub memo_hits: usize,
  /// Memoized values evicted because a flow-node output they derive from changed.
  #[serde(default)]
  pub invalidations: usize,
  /// Activations skipped because no reactive input changed.
  pub suppressed: usize,
  /// Whether the pulse token was cancelled when the pulse finished.
  pub cancelled: bool,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
}

impl PulseReport {
  /// True when at least one node was activated.
  pub fn fired(&self) -> bool {
    self.activation_count > 0
  }

  /// How many times `node` was activated in this pulse.
  pub fn activations_of(&self, node: NodeId) -> usize {
    self.activations.iter().filter(|n| **n == node).count()
  }

  pub fn duration(&self) -> chrono::Duration {
    self.finished_at - self.started_at
  }
}
