//! Persistent per-node-instance state slots.

use std::fmt;
use std::sync::Mutex;

use crate::pulse::lock;

/// Durable slot owned inline by the node that declares it.
///
/// Survives across pulses until the graph is dropped or the slot is reset. Reads
/// before any write return the declared default. Access from one node instance is
/// serialized by the host, so the lock is never contended in practice; it is never
/// held across an await.
pub struct GlobalStore<T> {
  default: T,
  slot: Mutex<Option<T>>,
}

impl<T: Clone> GlobalStore<T> {
  pub fn new(default: T) -> Self {
    Self {
      default,
      slot: Mutex::new(None),
    }
  }

  pub fn read(&self) -> T {
    lock(&self.slot)
      .as_ref()
      .cloned()
      .unwrap_or_else(|| self.default.clone())
  }

  pub fn write(&self, value: T) {
    *lock(&self.slot) = Some(value);
  }

  /// Read-modify-write under a single lock; returns the stored value.
  pub fn update(&self, f: impl FnOnce(&T) -> T) -> T {
    let mut slot = lock(&self.slot);
    let next = f(slot.as_ref().unwrap_or(&self.default));
    *slot = Some(next.clone());
    next
  }

  /// Forgets the stored value; the next read returns the default.
  pub fn reset(&self) {
    *lock(&self.slot) = None;
  }

  pub fn is_set(&self) -> bool {
    lock(&self.slot).is_some()
  }
}

impl<T: Clone + Default> Default for GlobalStore<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}

impl<T: Clone + fmt::Debug> fmt::Debug for GlobalStore<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GlobalStore")
      .field("value", &self.read())
      .field("is_set", &self.is_set())
      .finish()
  }
}
