use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use flume::{Receiver, Sender};
use log::{debug, error, warn};

use crate::task::{Scopes, TaskSet};
use crate::updater::Update;
use crate::{
    Command, CommandScope, CommandSnapshot, Compute, Dep, Error, State, StateSyncStatus, Updater,
};

enum Slot {
    State(Box<dyn State>),
    Compute(Box<dyn Compute>),
}

pub(crate) struct Entry {
    slot: Slot,
    status: StateSyncStatus,
}

impl Entry {
    fn new(slot: Slot) -> Self {
        Self {
            slot,
            status: StateSyncStatus::BeforeInit,
        }
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        match &self.slot {
            Slot::State(state) => state.as_any(),
            Slot::Compute(compute) => compute.as_any(),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        match &mut self.slot {
            Slot::State(state) => state.as_any_mut(),
            Slot::Compute(compute) => compute.as_any_mut(),
        }
    }

    fn assign_box(&mut self, value: Box<dyn Any + Send>) {
        match &mut self.slot {
            Slot::State(state) => state.assign_box(value),
            Slot::Compute(compute) => compute.assign_box(value),
        }
        self.status = StateSyncStatus::Dirty;
    }

    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        match &self.slot {
            Slot::State(state) => state.clone_boxed(),
            Slot::Compute(compute) => compute.clone_boxed(),
        }
    }
}

/// Owner of every state, compute and command of the application.
///
/// The frame loop is:
/// 1. `sync_computes()` applies updates published by finished or running commands
/// 2. widgets read with `state`/`cached` and write with `update`, queueing commands
/// 3. `flush_commands()` runs queued commands and spawns their futures
/// 4. `run_computed()` re-derives computes whose dependencies changed
pub struct StateCtx {
    entries: BTreeMap<TypeId, Entry>,
    commands: BTreeMap<TypeId, Arc<dyn Command>>,
    queue: Vec<(TypeId, CommandScope)>,
    sender: Sender<Update>,
    receiver: Receiver<Update>,
    scopes: Scopes,
    tasks: TaskSet,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();

        Self {
            entries: BTreeMap::new(),
            commands: BTreeMap::new(),
            queue: Vec::new(),
            sender,
            receiver,
            scopes: Scopes::default(),
            tasks: TaskSet::default(),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.entries
            .insert(TypeId::of::<T>(), Entry::new(Slot::State(Box::new(state))));
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        self.entries.insert(
            TypeId::of::<T>(),
            Entry::new(Slot::Compute(Box::new(compute))),
        );
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.as_any().downcast_ref::<T>())
            .ok_or_else(Error::state_not_found::<T>)
    }

    /// Reads a registered state. Panics if `T` was never added.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access to a registered state; marks it dirty.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let entry = self
            .entries
            .get_mut(&TypeId::of::<T>())
            .unwrap_or_else(|| panic!("{} is not registered", type_name::<T>()));
        entry.status = StateSyncStatus::Dirty;
        entry
            .as_any_mut()
            .downcast_mut::<T>()
            .unwrap_or_else(|| panic!("{} is registered with another type", type_name::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// Whether a registered state or compute changed since the last `run_computed`.
    pub fn sync_status<T: State>(&self) -> Option<StateSyncStatus> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|entry| entry.status)
    }

    /// Replaces a registered state or compute with its default value.
    pub fn reset<T: State + Default>(&mut self) {
        *self.state_mut::<T>() = T::default();
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.as_any().downcast_ref::<T>())
    }

    /// Reads a registered compute. Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .unwrap_or_else(|| panic!("{}", Error::compute_not_found::<T>()))
    }

    /// An updater bound to the app scope.
    pub fn updater(&self) -> Updater {
        let app = self.scopes.token(CommandScope::App);
        Updater::new(self.sender.clone(), app.clone(), app)
    }

    /// Queues a command whose work outlives page changes.
    pub fn enqueue_command<T: Command>(&mut self) {
        self.queue.push((TypeId::of::<T>(), CommandScope::App));
    }

    /// Queues a command whose results are dropped once the current page is left.
    pub fn enqueue_page_command<T: Command>(&mut self) {
        self.queue.push((TypeId::of::<T>(), CommandScope::Page));
    }

    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    pub fn dispatch_page<T: Command>(&mut self) {
        self.enqueue_page_command::<T>();
        self.flush_commands();
    }

    /// Runs every queued command against a fresh snapshot and spawns its future.
    ///
    /// Updates published synchronously by `Command::run` (such as loading flags) are
    /// applied before this returns.
    pub fn flush_commands(&mut self) {
        let queue = std::mem::take(&mut self.queue);
        for (id, scope) in queue {
            let Some(command) = self.commands.get(&id).map(Arc::clone) else {
                error!("{}", Error::CommandNotFound { id });
                continue;
            };

            let token = self.scopes.token(scope);
            let updater = Updater::new(
                self.sender.clone(),
                token.clone(),
                self.scopes.token(CommandScope::App),
            );
            let future = command.run(self.snapshot(), updater, token);
            self.tasks.spawn(future);
            self.sync_computes();
        }
    }

    /// Applies every pending update and forgets finished tasks.
    pub fn sync_computes(&mut self) {
        self.tasks.reap();
        while let Ok((id, value)) = self.receiver.try_recv() {
            match self.entries.get_mut(&id) {
                Some(entry) => entry.assign_box(value),
                None => warn!("Dropping update for unregistered type {id:?}"),
            }
        }
    }

    /// Re-runs derived computes whose dependencies changed since the last call.
    pub fn run_computed(&mut self) {
        let changed: BTreeSet<TypeId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.status.needs_sync())
            .map(|(id, _)| *id)
            .collect();
        if changed.is_empty() {
            return;
        }

        let updater = self.updater();
        for (id, entry) in &self.entries {
            let Slot::Compute(compute) = &entry.slot else {
                continue;
            };
            let (state_ids, compute_ids) = compute.deps();
            let stale = entry.status == StateSyncStatus::BeforeInit
                || state_ids
                    .iter()
                    .chain(compute_ids.iter())
                    .any(|dep| changed.contains(dep));
            if stale {
                debug!("Recomputing {id:?}");
                compute.compute(Dep::new(&self.entries), updater.clone());
            }
        }

        for entry in self.entries.values_mut() {
            entry.status = StateSyncStatus::Clean;
        }
    }

    /// Ends the current page scope: in-flight page commands are cancelled and their
    /// pending updates are dropped.
    pub fn end_page_scope(&mut self) {
        self.scopes.end_page();
    }

    /// Number of times the page scope has ended.
    pub fn page_generation(&self) -> u64 {
        self.scopes.page_generation()
    }

    /// Number of command futures that have not been reaped yet.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_set_mut(&mut self) -> &mut TaskSet {
        &mut self.tasks
    }

    /// Cancels every scope and waits for running commands to stop.
    pub async fn shutdown(&mut self) {
        self.scopes.cancel_all();
        self.tasks.shutdown().await;
    }

    fn snapshot(&self) -> CommandSnapshot {
        CommandSnapshot::new(
            self.entries
                .iter()
                .filter_map(|(id, entry)| entry.clone_boxed().map(|value| (*id, value)))
                .collect(),
        )
    }
}
