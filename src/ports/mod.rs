//! Typed port fields declared by nodes.
//!
//! Ports are created by [crate::types::DescriptorBuilder] while a node constructs
//! itself; each one only carries its index. Wiring lives in the [crate::Graph] and the
//! values flow through the [crate::node::NodeContext] handed to `process`.

mod flow;
mod global_store;
mod value_input;
mod value_output;

pub use flow::{FlowCall, FlowContinuation};
pub use global_store::GlobalStore;
pub use value_input::{ValueInput, ValueInputList};
pub use value_output::ValueOutput;
