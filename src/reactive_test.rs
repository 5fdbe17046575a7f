//! Tests for `ReactiveTable`.

use std::sync::Arc;

use crate::reactive::ReactiveTable;
use crate::types::{NodeId, NodeDescriptor, PortRef};

fn bool_eq() -> crate::types::ErasedEq {
  let mut d = NodeDescriptor::builder("Probe", "Tests");
  let _ = d.reactive_input::<bool>("Condition");
  d.build().inputs[0].eq.unwrap()
}

#[test]
fn first_observation_counts_as_changed() {
  let table = ReactiveTable::default();
  let key = PortRef::new(NodeId(0), 0);
  assert!(table.observe(key, Arc::new(false), bool_eq()));
  assert_eq!(table.len(), 1);
}

#[test]
fn equal_values_are_unchanged_and_different_values_changed() {
  let table = ReactiveTable::default();
  let key = PortRef::new(NodeId(0), 0);
  let eq = bool_eq();
  assert!(table.observe(key, Arc::new(true), eq));
  assert!(!table.observe(key, Arc::new(true), eq));
  assert!(table.observe(key, Arc::new(false), eq));
  assert!(!table.observe(key, Arc::new(false), eq));
}

#[test]
fn ports_are_tracked_independently() {
  let table = ReactiveTable::default();
  let eq = bool_eq();
  assert!(table.observe(PortRef::new(NodeId(0), 0), Arc::new(true), eq));
  assert!(table.observe(PortRef::new(NodeId(1), 0), Arc::new(true), eq));
  assert!(table.observe(PortRef::new(NodeId(0), 1), Arc::new(true), eq));
  assert_eq!(table.len(), 3);
}

#[test]
fn clear_forgets_observations() {
  let table = ReactiveTable::default();
  let key = PortRef::new(NodeId(2), 0);
  let eq = bool_eq();
  table.observe(key, Arc::new(true), eq);
  table.clear();
  assert_eq!(table.len(), 0);
  assert!(table.observe(key, Arc::new(true), eq));
}
