use std::any::TypeId;

use crate::{Dep, State, Updater};

/// `(state ids, compute ids)` a compute reads.
pub type ComputeDeps = (&'static [TypeId], &'static [TypeId]);

/// A [`State`] whose value is owned by code rather than by the user.
///
/// Most computes are caches written by commands and keep the no-op defaults. A compute
/// that derives its value from other entries lists them in [`Compute::deps`]; it is
/// re-run by `StateCtx::run_computed` whenever one of them changed.
pub trait Compute: State {
    fn deps(&self) -> ComputeDeps {
        (&[], &[])
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}
}

/// Replaces `target` with the boxed value when the types line up.
pub fn assign_impl<T: Compute>(target: &mut T, new_self: Box<dyn std::any::Any + Send>) {
    crate::state_assign_impl(target, new_self);
}
