//! Type-addressed state container shared by the business and UI crates.

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use command::{Command, CommandFuture, CommandScope};
pub use compute::{Compute, ComputeDeps, assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use snapshot::CommandSnapshot;
pub use state::{SnapshotClone, State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::TaskSet;
pub use updater::Updater;

#[cfg(test)]
mod state_ctx_test {
    use std::any::{Any, TypeId};
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct Name(String);

    impl SnapshotClone for Name {
        fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(self.clone()))
        }
    }

    impl State for Name {
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

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct Greeting(String);

    impl SnapshotClone for Greeting {
        fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(self.clone()))
        }
    }

    impl State for Greeting {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    impl Compute for Greeting {
        fn deps(&self) -> ComputeDeps {
            const STATE_IDS: [TypeId; 1] = [TypeId::of::<Name>()];
            (&STATE_IDS, &[])
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let name = deps.get_state_ref::<Name>();
            updater.set(Self(format!("Hello, {}", name.0)));
        }
    }

    /// Copies `Name` into `Greeting` after yielding once.
    #[derive(Debug, Default)]
    struct EchoCommand;

    impl Command for EchoCommand {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let name = snap.state::<Name>().clone();
            Box::pin(async move {
                tokio::task::yield_now().await;
                updater.set(Greeting(format!("echo {}", name.0)));
            })
        }
    }

    /// Publishes a value synchronously, then another one after a delay.
    #[derive(Debug, Default)]
    struct SlowCommand;

    impl Command for SlowCommand {
        fn run(
            &self,
            _snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            updater.set(Name("pending".to_owned()));
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                updater.set(Name("late".to_owned()));
            })
        }
    }

    /// Page command that also writes shared state through the app scope.
    #[derive(Debug, Default)]
    struct SharedWriteCommand;

    impl Command for SharedWriteCommand {
        fn run(
            &self,
            _snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let shared = updater.app_scoped();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                updater.set(Name("page".to_owned()));
                shared.set(Greeting("shared".to_owned()));
            })
        }
    }

    fn build_ctx() -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.add_state(Name("Ada".to_owned()));
        ctx.record_compute(Greeting::default());
        ctx.record_command(EchoCommand);
        ctx.record_command(SlowCommand);
        ctx.record_command(SharedWriteCommand);
        ctx
    }

    async fn wait_for_tasks(ctx: &mut StateCtx) {
        while ctx.task_set_mut().join_next().await {
            ctx.sync_computes();
        }
        ctx.sync_computes();
    }

    #[test]
    fn update_mutates_state() {
        let mut ctx = build_ctx();
        ctx.update::<Name>(|name| name.0.push_str(" L."));
        assert_eq!(ctx.state::<Name>(), &Name("Ada L.".to_owned()));
    }

    #[test]
    fn missing_state_is_an_error() {
        let ctx = StateCtx::new();
        assert!(matches!(
            ctx.try_state::<Name>(),
            Err(Error::StateNotFound { .. })
        ));
    }

    #[test]
    fn updater_changes_apply_on_sync() {
        let mut ctx = build_ctx();
        ctx.updater().set(Name("Grace".to_owned()));
        assert_eq!(ctx.state::<Name>().0, "Ada", "not applied before sync");

        ctx.sync_computes();
        assert_eq!(ctx.state::<Name>().0, "Grace");
    }

    #[test]
    fn derived_compute_follows_its_dependency() {
        let mut ctx = build_ctx();
        ctx.run_computed();
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Greeting>().0, "Hello, Ada");

        ctx.update::<Name>(|name| name.0 = "Grace".to_owned());
        ctx.run_computed();
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Greeting>().0, "Hello, Grace");
    }

    #[test]
    fn writes_mark_entries_dirty_until_recomputed() {
        let mut ctx = build_ctx();
        ctx.run_computed();
        assert_eq!(ctx.sync_status::<Name>(), Some(StateSyncStatus::Clean));

        ctx.update::<Name>(|name| name.0 = "Grace".to_owned());
        assert_eq!(ctx.sync_status::<Name>(), Some(StateSyncStatus::Dirty));

        ctx.run_computed();
        assert_eq!(ctx.sync_status::<Name>(), Some(StateSyncStatus::Clean));
    }

    #[test]
    fn reset_restores_default() {
        let mut ctx = build_ctx();
        ctx.reset::<Name>();
        assert_eq!(ctx.state::<Name>(), &Name::default());
    }

    #[tokio::test]
    async fn dispatched_command_publishes_result() {
        let mut ctx = build_ctx();
        ctx.dispatch::<EchoCommand>();
        assert_eq!(ctx.task_count(), 1);

        wait_for_tasks(&mut ctx).await;

        assert_eq!(ctx.compute::<Greeting>().0, "echo Ada");
        assert_eq!(ctx.task_count(), 0);
    }

    #[tokio::test]
    async fn synchronous_updates_apply_during_flush() {
        let mut ctx = build_ctx();
        ctx.dispatch_page::<SlowCommand>();
        assert_eq!(ctx.state::<Name>().0, "pending");

        wait_for_tasks(&mut ctx).await;
        assert_eq!(ctx.state::<Name>().0, "late");
    }

    #[tokio::test]
    async fn ended_page_scope_drops_late_updates() {
        let mut ctx = build_ctx();
        ctx.dispatch_page::<SlowCommand>();
        ctx.end_page_scope();

        wait_for_tasks(&mut ctx).await;

        assert_eq!(ctx.state::<Name>().0, "pending");
        assert_eq!(ctx.page_generation(), 1);
    }

    #[tokio::test]
    async fn app_scope_survives_page_changes() {
        let mut ctx = build_ctx();
        ctx.enqueue_command::<EchoCommand>();
        ctx.flush_commands();
        ctx.end_page_scope();

        wait_for_tasks(&mut ctx).await;

        assert_eq!(ctx.compute::<Greeting>().0, "echo Ada");
    }

    #[tokio::test]
    async fn app_scoped_updater_outlives_its_page() {
        let mut ctx = build_ctx();
        ctx.dispatch_page::<SharedWriteCommand>();
        ctx.end_page_scope();

        wait_for_tasks(&mut ctx).await;

        assert_eq!(ctx.state::<Name>().0, "Ada", "page write is dropped");
        assert_eq!(ctx.compute::<Greeting>().0, "shared");
    }
}
