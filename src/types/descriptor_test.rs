//! Tests for `NodeDescriptor` and `DescriptorBuilder`.

use super::{InputKind, NodeDescriptor};

#[test]
fn builder_assigns_indices_in_declaration_order() {
  let mut d = NodeDescriptor::builder("Example", "Tests");
  let a = d.input::<i32>("A");
  let b = d.input_with_default::<String>("B", "x".to_string());
  let list = d.input_list::<f32>("Values");
  let out = d.output::<i32>("Result");
  let next = d.flow_continuation("Next");
  let body = d.flow_call("Loop");
  let descriptor = d.build();

  assert_eq!(a.index(), 0);
  assert_eq!(b.index(), 1);
  assert_eq!(list.index(), 2);
  assert_eq!(out.index(), 0);
  assert_eq!(next.index(), 0);
  assert_eq!(body.index(), 1);
  assert_eq!(descriptor.input_index("B"), Some(1));
  assert_eq!(descriptor.output_index("Result"), Some(0));
  assert_eq!(descriptor.flow_index("Loop"), Some(1));
  assert_eq!(descriptor.inputs[2].kind, InputKind::List);
}

#[test]
fn flow_refs_record_looping() {
  let mut d = NodeDescriptor::builder("Loop", "Tests");
  d.flow_input();
  let _ = d.flow_call("Body");
  let _ = d.flow_continuation("On Finished");
  let descriptor = d.build();
  assert!(descriptor.flows[0].is_loop);
  assert!(!descriptor.flows[1].is_loop);
}

#[test]
fn purity_and_update_classification() {
  let mut d = NodeDescriptor::builder("Pure", "Tests");
  let _ = d.input::<i32>("A");
  let _ = d.output::<i32>("B");
  let pure = d.build();
  assert!(pure.is_pure());
  assert!(!pure.is_update_node());

  let mut d = NodeDescriptor::builder("Watcher", "Tests");
  let _ = d.reactive_input::<bool>("Condition");
  let _ = d.flow_continuation("On True");
  let watcher = d.build();
  assert!(!watcher.is_pure());
  assert!(watcher.has_reactive_inputs());
  assert!(watcher.is_update_node());

  let mut d = NodeDescriptor::builder("Gated", "Tests");
  d.flow_input();
  let _ = d.reactive_input::<bool>("Condition");
  let gated = d.build();
  assert!(!gated.is_update_node());
}

#[test]
fn required_and_reactive_flags() {
  let mut d = NodeDescriptor::builder("Flags", "Tests");
  let _ = d.required_input::<i32>("Needed");
  let _ = d.reactive_input::<i32>("Watched");
  let descriptor = d.build();
  assert!(descriptor.inputs[0].required);
  assert!(!descriptor.inputs[0].reactive);
  assert!(descriptor.inputs[1].reactive);
  assert!(descriptor.inputs[1].eq.is_some());
}

#[test]
fn reactive_equality_compares_values() {
  let mut d = NodeDescriptor::builder("Eq", "Tests");
  let _ = d.reactive_input::<i32>("Value");
  let descriptor = d.build();
  let eq = descriptor.inputs[0].eq.unwrap();
  assert!(eq(&3i32, &3i32));
  assert!(!eq(&3i32, &4i32));
  assert!(!eq(&3i32, &"3".to_string()));
}

#[test]
fn collapsed_is_recorded_only() {
  let mut d = NodeDescriptor::builder("Folded", "Tests");
  d.collapsed();
  let descriptor = d.build();
  assert!(descriptor.collapsed);
  assert!(descriptor.is_pure());
}

#[test]
fn serializes_port_lists_without_runtime_fields() {
  let mut d = NodeDescriptor::builder("Add", "Math");
  let _ = d.input::<i32>("A");
  let _ = d.output::<i32>("Result");
  let json = serde_json::to_value(d.build()).unwrap();
  assert_eq!(json["name"], "Add");
  assert_eq!(json["category"], "Math");
  assert_eq!(json["inputs"][0]["name"], "A");
  assert_eq!(json["inputs"][0]["kind"], "single");
  assert_eq!(json["inputs"][0]["type_name"], "i32");
  assert!(json["inputs"][0].get("default").is_none());
  assert_eq!(json["outputs"][0]["name"], "Result");
}
