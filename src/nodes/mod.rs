//! Built-in node catalogue illustrating the runtime contract.

mod add;
mod branch;
mod constant;
mod counter;
#[cfg(test)]
mod counter_test;
mod delay;
mod entry;
mod log;
mod loops;
mod parse_int;
mod reactive_events;

pub use add::{AddNode, SumNode, Summable};
pub use branch::{IfNode, IfWithStateNode, StatefulIfNode, Transition};
pub use constant::ConstantNode;
pub use counter::CounterIncrementNode;
pub use delay::DelayNode;
pub use entry::EntryNode;
pub use log::{LogNode, LogSink};
pub use loops::{DEFAULT_INTERVAL_MS, FireOnIntervalNode, FireWhileTrueNode, ForNode};
pub use parse_int::ParseIntNode;
pub use reactive_events::{FireOnTrueNode, OnChangedNode};

use crate::registry::NodeRegistry;

/// Registers every built-in node type. Generic nodes are instantiated for the types
/// listed here.
pub fn register_builtin(registry: &mut NodeRegistry) {
  crate::register_generic!(registry, "Constant", ConstantNode, [bool, i32, f32, String]);
  crate::register_generic!(registry, "Add", AddNode, [i32, f32, String]);
  crate::register_generic!(registry, "Sum", SumNode, [i32, f32, String]);
  crate::register_generic!(registry, "Log", LogNode, [bool, i32, f32, String]);
  crate::register_generic!(registry, "On Changed", OnChangedNode, [bool, i32, f32, String]);

  registry
    .register("On Trigger", || Box::new(EntryNode::default()))
    .register("If", || Box::new(IfNode::default()))
    .register("Stateful If", || Box::new(StatefulIfNode::default()))
    .register("If With State", || Box::new(IfWithStateNode::default()))
    .register("Fire On True", || Box::new(FireOnTrueNode::default()))
    .register("Fire On Interval", || Box::new(FireOnIntervalNode::default()))
    .register("Fire While True", || Box::new(FireWhileTrueNode::default()))
    .register("For", || Box::new(ForNode::default()))
    .register("Counter Increment", || Box::new(CounterIncrementNode::default()))
    .register("Delay", || Box::new(DelayNode::default()))
    .register("Parse Int", || Box::new(ParseIntNode::default()));
}
