use std::any::{TypeId, type_name};
use std::collections::BTreeMap;

use crate::ctx::Entry;
use crate::{Compute, State};

/// Read-only view over the entries of a `StateCtx`, handed to `Compute::compute`.
pub struct Dep<'a> {
    entries: &'a BTreeMap<TypeId, Entry>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(entries: &'a BTreeMap<TypeId, Entry>) -> Self {
        Self { entries }
    }

    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("{} is not registered", type_name::<T>()))
    }

    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.get_state_ref::<T>()
    }
}
