//! Runtime configuration with environment overrides.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Overrides [RuntimeConfig::max_flow_depth].
pub const ENV_MAX_FLOW_DEPTH: &str = "PULSEGRAPH_MAX_FLOW_DEPTH";
/// Overrides [RuntimeConfig::record_activations] (`1`/`true`/`0`/`false`).
pub const ENV_RECORD_ACTIVATIONS: &str = "PULSEGRAPH_RECORD_ACTIVATIONS";

pub const DEFAULT_MAX_FLOW_DEPTH: usize = 256;

/// Runtime options shared by every pulse of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
  /// Maximum nesting of flow edges within one pulse. Flow cycles that never reach a
  /// looping node hit this limit and abort the pulse.
  pub max_flow_depth: usize,
  /// Keep the ordered list of activated nodes in each [crate::types::PulseReport].
  pub record_activations: bool,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      max_flow_depth: DEFAULT_MAX_FLOW_DEPTH,
      record_activations: true,
    }
  }
}

impl RuntimeConfig {
  /// Defaults overridden by `PULSEGRAPH_*` environment variables.
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Defaults overridden by whatever `lookup` returns for each variable name.
  /// Invalid values are logged and ignored.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut config = Self::default();
    if let Some(raw) = lookup(ENV_MAX_FLOW_DEPTH) {
      match raw.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => config.max_flow_depth = depth,
        _ => warn!(value = %raw, "ignoring invalid {}", ENV_MAX_FLOW_DEPTH),
      }
    }
    if let Some(raw) = lookup(ENV_RECORD_ACTIVATIONS) {
      match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => config.record_activations = true,
        "0" | "false" | "no" => config.record_activations = false,
        _ => warn!(value = %raw, "ignoring invalid {}", ENV_RECORD_ACTIVATIONS),
      }
    }
    config
  }

  pub fn with_max_flow_depth(mut self, depth: usize) -> Self {
    self.max_flow_depth = depth;
    self
  }

  pub fn with_record_activations(mut self, record: bool) -> Self {
    self.record_activations = record;
    self
  }
}
