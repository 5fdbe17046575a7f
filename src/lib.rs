//! # pulsegraph
//!
//! Execution runtime for visual-scripting node graphs.
//!
//! ## Architecture
//!
//! A [Graph] is an arena of [Node]s wired by two kinds of edges:
//!
//! - **value edges** (output port -> input port) are resolved by pull: reading a
//!   [ports::ValueInput] evaluates the upstream pure node once per pulse and memoizes
//!   the result;
//! - **flow edges** (flow output -> flow input) are pushed: a node's `process` fires
//!   zero or more of its outgoing edges, activating the targets depth-first.
//!
//! The host starts a pulse with [Graph::trigger] (or [Graph::spawn] for long-running
//! loops) and drives reactive nodes with [Graph::update]. Every pulse carries a
//! cancellation token that loop nodes check after each await.
//!
//! Graphs are assembled with [GraphBuilder], either from concrete node values or
//! through the [NodeRegistry] catalogue.

pub mod builder;
pub mod config;
mod dispatcher;
pub mod error;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod ports;
pub mod pulse;
mod reactive;
#[cfg(test)]
mod reactive_test;
pub mod registry;
pub mod report_io;
mod resolver;
#[cfg(test)]
mod test_support;
pub mod types;

pub use builder::GraphBuilder;
pub use config::RuntimeConfig;
pub use error::{GraphError, NodeError, PulseError, ReportIoError};
pub use graph::{Graph, PulseHandle};
pub use node::{Node, NodeContext};
pub use pulse::PulseContext;
pub use registry::{NodeFactory, NodeRegistry, NodeTypeInfo};
pub use types::{NodeDescriptor, NodeId, PulseId, PulseReport, TypeTag};
