//! Core types shared by ports, nodes and the runtime: identities, value tags, node
//! descriptors and pulse reports.

mod descriptor;
#[cfg(test)]
mod descriptor_test;
mod node_flow_ref;
mod node_id;
mod pulse_report;
mod value_type;

pub(crate) use descriptor::ErasedEq;
pub use descriptor::{DescriptorBuilder, InputKind, NodeDescriptor, OutputPortSpec, ValuePortSpec};
pub use node_flow_ref::NodeFlowRef;
pub use node_id::{NodeId, PortRef, PulseId};
pub use pulse_report::PulseReport;
pub use value_type::{NodeValue, SharedValue, Tagged, TypeTag};
