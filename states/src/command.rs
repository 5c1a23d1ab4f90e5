use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// An explicit user action.
///
/// `run` is called synchronously when the command is flushed. It reads what it needs
/// from the snapshot, may publish immediate updates, and returns the asynchronous rest
/// of the work, which `StateCtx` spawns. `cancel` fires when the command's scope ends.
pub trait Command: Any + Send + Sync {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture;
}

/// Which lifetime a command's in-flight work is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandScope {
    /// Lives until the context shuts down.
    #[default]
    App,
    /// Lives until the current page is left (`StateCtx::end_page_scope`).
    Page,
}
