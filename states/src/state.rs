use std::any::{Any, type_name};

use log::error;

/// Produces an owned, `Send` copy of a value for command snapshots.
///
/// Types that should not leak into a snapshot keep the default `None`.
pub trait SnapshotClone {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// A value owned by [`crate::StateCtx`], addressed by its type.
///
/// States are edited by the UI through `StateCtx::update`, and may also be replaced
/// wholesale by commands through an [`crate::Updater`].
pub trait State: Any + Send + SnapshotClone {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Replaces `target` with the boxed value when the types line up.
pub fn state_assign_impl<T: State>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => error!("Type mismatch while assigning {}", type_name::<T>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct Counter(u32);

    impl SnapshotClone for Counter {}

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    #[test]
    fn assign_replaces_value() {
        let mut counter = Counter(1);
        counter.assign_box(Box::new(Counter(7)));
        assert_eq!(counter, Counter(7));
    }

    #[test]
    fn assign_ignores_wrong_type() {
        let mut counter = Counter(1);
        counter.assign_box(Box::new("not a counter"));
        assert_eq!(counter, Counter(1));
    }

    #[test]
    fn snapshot_defaults_to_none() {
        assert!(Counter(3).clone_boxed().is_none());
    }
}
