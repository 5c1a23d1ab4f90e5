use std::any::{Any, TypeId, type_name};

use flume::Sender;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::State;

pub(crate) type Update = (TypeId, Box<dyn Any + Send>);

/// Publishes new values for registered states and computes.
///
/// Updates are queued and applied by `StateCtx::sync_computes`. An updater belongs to a
/// scope; once that scope is cancelled every further `set` is dropped, so a response
/// that arrives after its page went away cannot touch the page's state.
///
/// State shared across pages (such as the session) is written through
/// [`Updater::app_scoped`], which stays live until the context shuts down.
#[derive(Clone)]
pub struct Updater {
    sender: Sender<Update>,
    scope: CancellationToken,
    app_scope: CancellationToken,
}

impl Updater {
    pub(crate) fn new(
        sender: Sender<Update>,
        scope: CancellationToken,
        app_scope: CancellationToken,
    ) -> Self {
        Self {
            sender,
            scope,
            app_scope,
        }
    }

    /// An updater on the same channel bound to the app scope.
    pub fn app_scoped(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            scope: self.app_scope.clone(),
            app_scope: self.app_scope.clone(),
        }
    }

    /// The token whose cancellation makes this updater drop its sets.
    pub fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    pub fn set<T: State>(&self, value: T) {
        if self.scope.is_cancelled() {
            debug!("Scope ended, dropping update for {}", type_name::<T>());
            return;
        }
        if self
            .sender
            .send((TypeId::of::<T>(), Box::new(value)))
            .is_err()
        {
            warn!("StateCtx is gone, dropping update for {}", type_name::<T>());
        }
    }
}
