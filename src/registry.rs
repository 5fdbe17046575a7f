//! Typed factory registry for node types, including generic instantiations.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::trace;

use crate::error::GraphError;
use crate::node::Node;
use crate::types::{NodeDescriptor, TypeTag};

/// Constructs a fresh node instance with default port values and empty state.
pub type NodeFactory = fn() -> Box<dyn Node>;

/// Catalogue entry for editors: one per registered node type.
#[derive(Debug, Clone, Serialize)]
pub struct NodeTypeInfo {
  pub name: String,
  pub category: String,
  /// Types a generic node is instantiated for; empty for non-generic nodes.
  pub type_filter: Vec<TypeTag>,
  pub descriptor: NodeDescriptor,
}

/// Node types by name. Non-generic types have a single factory under `None`; generic
/// types have one factory per tag of their type filter.
#[derive(Default)]
pub struct NodeRegistry {
  entries: BTreeMap<String, BTreeMap<Option<TypeTag>, NodeFactory>>,
}

static BUILTIN: Lazy<NodeRegistry> = Lazy::new(NodeRegistry::with_builtin_nodes);

impl NodeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Shared registry holding the built-in catalogue.
  pub fn builtin() -> &'static NodeRegistry {
    &BUILTIN
  }

  pub fn with_builtin_nodes() -> Self {
    let mut registry = Self::new();
    crate::nodes::register_builtin(&mut registry);
    registry
  }

  /// Registers a non-generic node type.
  pub fn register(&mut self, name: impl Into<String>, factory: NodeFactory) -> &mut Self {
    let name = name.into();
    trace!(node_type = %name, "registering node type");
    self.entries.entry(name).or_default().insert(None, factory);
    self
  }

  /// Registers the instantiation of generic node type `name` for `tag`.
  /// Usually called through [crate::register_generic].
  pub fn register_instance(
    &mut self,
    name: impl Into<String>,
    tag: TypeTag,
    factory: NodeFactory,
  ) -> &mut Self {
    let name = name.into();
    trace!(node_type = %name, %tag, "registering generic instantiation");
    self
      .entries
      .entry(name)
      .or_default()
      .insert(Some(tag), factory);
    self
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  /// Tags `name` is instantiated for, or `None` when it is not registered.
  pub fn type_filter(&self, name: &str) -> Option<Vec<TypeTag>> {
    self
      .entries
      .get(name)
      .map(|factories| factories.keys().flatten().copied().collect())
  }

  /// Builds a new instance of `name`. Generic types need a `type_arg` from their
  /// filter; non-generic types must not be given one.
  pub fn create(&self, name: &str, type_arg: Option<TypeTag>) -> Result<Box<dyn Node>, GraphError> {
    let factories = self
      .entries
      .get(name)
      .ok_or_else(|| GraphError::UnknownNodeType(name.to_string()))?;
    let generic = factories.keys().any(Option::is_some);
    let factory = match (generic, type_arg) {
      (false, None) => factories.get(&None),
      (false, Some(_)) => return Err(GraphError::UnexpectedTypeArgument(name.to_string())),
      (true, None) => return Err(GraphError::MissingTypeArgument(name.to_string())),
      (true, Some(tag)) => match factories.get(&Some(tag)) {
        Some(factory) => Some(factory),
        None => {
          return Err(GraphError::TypeNotInFilter {
            node_type: name.to_string(),
            type_tag: tag,
          });
        }
      },
    };
    factory
      .map(|f| f())
      .ok_or_else(|| GraphError::UnknownNodeType(name.to_string()))
  }

  /// Every registered type with its descriptor. Generic types are described by their
  /// first instantiation.
  pub fn catalogue(&self) -> Vec<NodeTypeInfo> {
    self
      .entries
      .iter()
      .filter_map(|(name, factories)| {
        let (_, factory) = factories.iter().next()?;
        let descriptor = factory().descriptor().clone();
        Some(NodeTypeInfo {
          name: name.clone(),
          category: descriptor.category.clone(),
          type_filter: factories.keys().flatten().copied().collect(),
          descriptor,
        })
      })
      .collect()
  }
}

/// Registers a generic node for every type of its filter.
///
/// ```ignore
/// register_generic!(registry, "Add", AddNode, [i32, f32, String]);
/// ```
#[macro_export]
macro_rules! register_generic {
  ($registry:expr, $name:expr, $node:ident, [$($ty:ty),+ $(,)?]) => {{
    $(
      $registry.register_instance(
        $name,
        <$ty as $crate::types::Tagged>::TAG,
        || -> ::std::boxed::Box<dyn $crate::Node> {
          ::std::boxed::Box::new(<$node<$ty> as ::core::default::Default>::default())
        },
      );
    )+
  }};
}
