//! UID-to-constructor registry for task types.

use taskdock_wire::Uid;

use crate::envelope::EnvelopeView;
use crate::error::{RegistryError, Result};
use crate::task::Task;

/// Constructs one task instance from an inbound parameter view.
///
/// Constructors must not fail: parameter validation that can reject input
/// belongs in the task's own lifecycle (report through `on_complete`).
pub type Constructor = fn(EnvelopeView<'_>) -> Box<dyn Task>;

struct Entry<U> {
    /// Normalized integer key; the sort and lookup key.
    key: u64,
    /// Semantic UID preserved for the channel API boundary.
    uid: U,
    make: Constructor,
}

/// Maps task UIDs to constructors.
///
/// Built once at application startup: `register` each task type, then
/// `freeze` (sorting the index for O(log n) lookup). The manager freezes the
/// registry it is handed, so a registry reaching lookup is always sorted.
/// Enumeration UIDs are normalized to their integer representation here;
/// the semantic type only reappears in the scheduler and channel APIs.
pub struct TaskRegistry<U> {
    entries: Vec<Entry<U>>,
    frozen: bool,
}

impl<U: Uid> TaskRegistry<U> {
    /// An empty, unfrozen registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frozen: false,
        }
    }

    /// Add a task type under `uid`.
    ///
    /// Fails on a duplicate normalized UID and after `freeze`.
    pub fn register(&mut self, uid: U, make: Constructor) -> Result<()> {
        if self.frozen {
            return Err(RegistryError::Frozen);
        }
        let key = uid.to_wire();
        if self.entries.iter().any(|entry| entry.key == key) {
            return Err(RegistryError::DuplicateUid(key));
        }
        self.entries.push(Entry { key, uid, make });
        Ok(())
    }

    /// Sort the index and seal the registry. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.entries.sort_unstable_by_key(|entry| entry.key);
            self.frozen = true;
        }
    }

    /// True once `freeze` has run.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of registered task types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no task type is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a constructor by normalized UID. Requires a frozen registry.
    pub fn find(&self, key: u64) -> Option<Constructor> {
        debug_assert!(self.frozen, "lookup before freeze");
        self.entries
            .binary_search_by_key(&key, |entry| entry.key)
            .ok()
            .map(|index| self.entries[index].make)
    }

    /// The semantic UID registered under a normalized key.
    pub fn uid_for(&self, key: u64) -> Option<U> {
        debug_assert!(self.frozen, "lookup before freeze");
        self.entries
            .binary_search_by_key(&key, |entry| entry.key)
            .ok()
            .map(|index| self.entries[index].uid)
    }
}

impl<U: Uid> Default for TaskRegistry<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::envelope::Envelope;
    use crate::status::StatusCode;

    use super::*;

    struct Noop;
    impl Task for Noop {}

    struct Echo(Vec<u8>);
    impl Task for Echo {
        fn on_complete(&mut self, _interrupted: bool) -> (Envelope, StatusCode) {
            (Envelope::from(self.0.clone()), StatusCode::TASK_FINISHED)
        }
    }

    fn make_noop(_params: EnvelopeView<'_>) -> Box<dyn Task> {
        Box::new(Noop)
    }

    fn make_echo(params: EnvelopeView<'_>) -> Box<dyn Task> {
        Box::new(Echo(params.data().to_vec()))
    }

    #[test]
    fn registers_and_finds_by_key() {
        let mut registry = TaskRegistry::<u8>::new();
        registry.register(0x20, make_noop).unwrap();
        registry.register(0x01, make_echo).unwrap();
        registry.register(0x10, make_noop).unwrap();
        registry.freeze();

        assert_eq!(registry.len(), 3);
        assert!(registry.find(0x01).is_some());
        assert!(registry.find(0x10).is_some());
        assert!(registry.find(0x20).is_some());
        assert!(registry.find(0x02).is_none());
    }

    #[test]
    fn binary_search_agrees_with_linear_scan() {
        let uids = [0x41u8, 0x07, 0x99, 0x10, 0x55];
        let mut registry = TaskRegistry::<u8>::new();
        for &uid in &uids {
            registry.register(uid, make_noop).unwrap();
        }
        registry.freeze();

        for key in 0..=0xFFu64 {
            let linear = uids.iter().any(|&uid| uid as u64 == key);
            assert_eq!(registry.find(key).is_some(), linear, "key {key:#x}");
        }
    }

    #[test]
    fn duplicate_uid_is_rejected() {
        let mut registry = TaskRegistry::<u8>::new();
        registry.register(0x01, make_noop).unwrap();
        let err = registry.register(0x01, make_echo).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateUid(0x01)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn frozen_registry_rejects_registration() {
        let mut registry = TaskRegistry::<u8>::new();
        registry.register(0x01, make_noop).unwrap();
        registry.freeze();
        assert!(registry.is_frozen());

        let err = registry.register(0x02, make_noop).unwrap_err();
        assert!(matches!(err, RegistryError::Frozen));

        // Freezing again is harmless.
        registry.freeze();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn constructor_receives_the_parameter_view() {
        let mut registry = TaskRegistry::<u8>::new();
        registry.register(0x01, make_echo).unwrap();
        registry.freeze();

        let make = registry.find(0x01).unwrap();
        let mut task = make(EnvelopeView::new(&[4, 5, 6]));
        let (result, code) = task.on_complete(false);
        assert_eq!(result.data(), &[4, 5, 6]);
        assert_eq!(code, StatusCode::TASK_FINISHED);
    }

    #[test]
    fn semantic_uid_survives_normalization() {
        let mut registry = TaskRegistry::<u16>::new();
        registry.register(0x0102, make_noop).unwrap();
        registry.freeze();
        assert_eq!(registry.uid_for(0x0102), Some(0x0102));
        assert_eq!(registry.uid_for(0x0103), None);
    }
}
