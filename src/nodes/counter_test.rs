//! Tests for `CounterIncrementNode`.

use crate::builder::GraphBuilder;

use super::{ConstantNode, CounterIncrementNode, EntryNode, LogNode, LogSink};

#[tokio::test]
async fn counts_across_pulses_with_default_step() {
  let counts = LogSink::default();
  let graph = GraphBuilder::new("counter")
    .add_node("entry", EntryNode::default())
    .add_node("counter", CounterIncrementNode::default())
    .add_node("log", LogNode::<i32>::with_sink(counts.clone()))
    .connect_value("counter", "Count", "log", "Value")
    .connect_flow("entry", "Next", "counter")
    .connect_flow("counter", "Next", "log")
    .build()
    .unwrap();

  for _ in 0..3 {
    graph.trigger_named("entry").await.unwrap();
  }
  assert_eq!(counts.entries(), vec![1, 2, 3]);
  let counter = graph.node_named::<CounterIncrementNode>("counter").unwrap();
  assert_eq!(counter.count(), 3);
}

#[tokio::test]
async fn step_input_is_added() {
  let graph = GraphBuilder::new("counter")
    .add_node("entry", EntryNode::default())
    .add_node("step", ConstantNode::new(-4))
    .add_node("counter", CounterIncrementNode::default())
    .connect_value("step", "Value", "counter", "Step")
    .connect_flow("entry", "Next", "counter")
    .build()
    .unwrap();

  graph.trigger_named("entry").await.unwrap();
  graph.trigger_named("entry").await.unwrap();
  let counter = graph.node_named::<CounterIncrementNode>("counter").unwrap();
  assert_eq!(counter.count(), -8);
}

#[tokio::test]
async fn instances_do_not_share_state() {
  let graph = GraphBuilder::new("counter")
    .add_node("entry", EntryNode::default())
    .add_node("first", CounterIncrementNode::default())
    .add_node("second", CounterIncrementNode::default())
    .connect_flow("entry", "Next", "first")
    .build()
    .unwrap();

  graph.trigger_named("entry").await.unwrap();
  assert_eq!(graph.node_named::<CounterIncrementNode>("first").unwrap().count(), 1);
  assert_eq!(graph.node_named::<CounterIncrementNode>("second").unwrap().count(), 0);
}
