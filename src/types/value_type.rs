//! Value typing: the bound every port value satisfies and the tags used by generic
//! type filters.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Type-erased value as stored in memo tables and reactive observations.
pub type SharedValue = Arc<dyn Any + Send + Sync>;

/// Bound satisfied by every value carried on a port.
pub trait NodeValue: Any + Clone + Send + Sync + fmt::Debug {}

impl<T: Any + Clone + Send + Sync + fmt::Debug> NodeValue for T {}

/// Concrete value types a generic node may be instantiated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
  Bool,
  Int,
  Float,
  String,
}

impl TypeTag {
  pub const ALL: [TypeTag; 4] = [TypeTag::Bool, TypeTag::Int, TypeTag::Float, TypeTag::String];

  pub fn name(self) -> &'static str {
    match self {
      TypeTag::Bool => "bool",
      TypeTag::Int => "int",
      TypeTag::Float => "float",
      TypeTag::String => "string",
    }
  }
}

impl fmt::Display for TypeTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for TypeTag {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "bool" | "boolean" => Ok(TypeTag::Bool),
      "int" | "i32" => Ok(TypeTag::Int),
      "float" | "f32" => Ok(TypeTag::Float),
      "string" | "str" => Ok(TypeTag::String),
      other => Err(format!("unknown type tag '{}'", other)),
    }
  }
}

/// Maps a Rust value type to its [TypeTag]. Generic catalogue nodes are instantiated
/// only for `Tagged` types.
pub trait Tagged: NodeValue + Default + PartialEq {
  const TAG: TypeTag;
}

impl Tagged for bool {
  const TAG: TypeTag = TypeTag::Bool;
}

impl Tagged for i32 {
  const TAG: TypeTag = TypeTag::Int;
}

impl Tagged for f32 {
  const TAG: TypeTag = TypeTag::Float;
}

impl Tagged for String {
  const TAG: TypeTag = TypeTag::String;
}
