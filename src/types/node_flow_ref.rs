//! Static descriptor of a named outgoing flow edge.

use serde::{Deserialize, Serialize};

/// Named outgoing flow edge of a node.
///
/// `is_loop` marks edges that may fire many times within one activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlowRef {
  pub name: String,
  pub is_loop: bool,
}

impl NodeFlowRef {
  pub fn new(name: impl Into<String>, is_loop: bool) -> Self {
    Self {
      name: name.into(),
      is_loop,
    }
  }
}
