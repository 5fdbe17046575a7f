//! Integration tests through the public API and the pulse_demo CLI.

use std::process::Command;
use std::time::Duration;

use pulsegraph::nodes::{
  AddNode, ConstantNode, CounterIncrementNode, EntryNode, ForNode, LogNode, LogSink,
};
use pulsegraph::{GraphBuilder, GraphError, NodeRegistry, PulseError, TypeTag};

#[tokio::test]
async fn constant_add_log_scenario() {
  let log = LogNode::<i32>::default();
  let sink = log.sink();
  let graph = GraphBuilder::new("scenario")
    .add_node("entry", EntryNode::default())
    .add_node("five", ConstantNode::new(5))
    .add_node("three", ConstantNode::new(3))
    .add_node("add", AddNode::<i32>::default())
    .add_node("log", log)
    .connect_value("five", "Value", "add", "A")
    .connect_value("three", "Value", "add", "B")
    .connect_value("add", "Result", "log", "Value")
    .connect_flow("entry", "Next", "log")
    .build()
    .unwrap();

  let report = graph.trigger_named("entry").await.unwrap();
  assert_eq!(sink.entries(), vec![8]);
  assert!(report.fired());
}

#[tokio::test]
async fn for_loop_drives_counter_then_finishes_once() {
  let finished = LogSink::default();
  let graph = GraphBuilder::new("for")
    .add_node("entry", EntryNode::default())
    .add_node("count", ConstantNode::new(3))
    .add_node("for", ForNode::default())
    .add_node("counter", CounterIncrementNode::default())
    .add_node("done", LogNode::<i32>::with_sink(finished.clone()))
    .connect_value("count", "Value", "for", "Count")
    .connect_value("counter", "Count", "done", "Value")
    .connect_flow("entry", "Next", "for")
    .connect_flow("for", "Loop", "counter")
    .connect_flow("for", "On Finished", "done")
    .build()
    .unwrap();

  let report = graph.trigger_named("entry").await.unwrap();
  let counter = graph.node_named::<CounterIncrementNode>("counter").unwrap();
  assert_eq!(counter.count(), 3);
  assert_eq!(finished.entries(), vec![3]);
  assert_eq!(report.activations_of(graph.node_id("counter").unwrap()), 3);
  assert_eq!(report.activations_of(graph.node_id("done").unwrap()), 1);
}

#[tokio::test]
async fn registry_built_graph_runs() {
  let registry = NodeRegistry::builtin();
  let graph = GraphBuilder::new("registry")
    .add_registered(registry, "entry", "On Trigger", None)
    .add_registered(registry, "counter", "Counter Increment", None)
    .add_registered(registry, "delay", "Delay", None)
    .connect_flow("entry", "Next", "delay")
    .connect_flow("delay", "Next", "counter")
    .build()
    .unwrap();

  graph.trigger_named("entry").await.unwrap();
  graph.trigger_named("entry").await.unwrap();
  let counter = graph.node_named::<CounterIncrementNode>("counter").unwrap();
  assert_eq!(counter.count(), 2);
}

#[test]
fn registry_rejects_types_outside_filter() {
  let err = GraphBuilder::new("filter")
    .add_registered(NodeRegistry::builtin(), "add", "Add", Some(TypeTag::Bool))
    .build()
    .err();
  assert!(matches!(err, Some(GraphError::TypeNotInFilter { .. })));
}

#[tokio::test]
async fn spawned_interval_loop_is_cancelled_by_handle() {
  let registry = NodeRegistry::builtin();
  let graph = GraphBuilder::new("interval")
    .add_node("period", ConstantNode::new(10))
    .add_registered(registry, "timer", "Fire On Interval", None)
    .add_registered(registry, "ticks", "Counter Increment", None)
    .connect_value("period", "Value", "timer", "Interval")
    .connect_flow("timer", "On Fire", "ticks")
    .build()
    .unwrap();

  let handle = graph.spawn(graph.node_id("timer").unwrap());
  tokio::time::sleep(Duration::from_millis(45)).await;
  handle.cancel();
  let report = handle.join().await.unwrap();
  assert!(report.cancelled);

  let ticks = graph.node_named::<CounterIncrementNode>("ticks").unwrap();
  let seen = ticks.count();
  assert!(seen >= 1);
  tokio::time::sleep(Duration::from_millis(25)).await;
  assert_eq!(ticks.count(), seen);
}

#[tokio::test]
async fn value_nodes_are_not_pulse_roots() {
  let graph = GraphBuilder::new("roots")
    .add_node("five", ConstantNode::new(5))
    .build()
    .unwrap();
  assert!(matches!(
    graph.trigger_named("five").await,
    Err(PulseError::NotTriggerable(_))
  ));
}

fn pulse_demo(args: &[&str]) -> std::process::Output {
  Command::new(env!("CARGO_BIN_EXE_pulse_demo"))
    .args(args)
    .env("RUST_LOG", "warn")
    .output()
    .expect("run pulse_demo")
}

#[test]
fn cli_prints_catalogue_json() {
  let out = pulse_demo(&["--catalogue"]);
  assert!(out.status.success());
  let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let names: Vec<&str> = json
    .as_array()
    .unwrap()
    .iter()
    .filter_map(|e| e["name"].as_str())
    .collect();
  assert!(names.contains(&"Stateful If"));
  assert!(names.contains(&"Fire On Interval"));
}

#[test]
fn cli_runs_demo_and_writes_reports() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("pulses.jsonl");
  let out = pulse_demo(&[
    "--count",
    "4",
    "--interval-ms",
    "10",
    "--run-ms",
    "60",
    "--report",
    path.to_str().unwrap(),
  ]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(stdout.contains("Loop values: [1, 2, 3, 4]"), "stdout: {}", stdout);
  assert!(stdout.contains("Counter: 4"));

  let reports = pulsegraph::report_io::load_reports(&path).unwrap();
  assert_eq!(reports.len(), 2);
  assert!(reports[1].cancelled);

  let out = pulse_demo(&["--run-ms", "20", "--report", path.to_str().unwrap(), "--append"]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let reports = pulsegraph::report_io::load_reports(&path).unwrap();
  assert_eq!(reports.len(), 4);
}

#[test]
fn cli_rejects_unknown_flags() {
  let out = pulse_demo(&["--bogus"]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Usage") || stderr.contains("usage"));
}
