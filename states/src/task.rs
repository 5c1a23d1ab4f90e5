//! Task management for command futures.
//!
//! - `Scopes`: the cancellation tokens commands are bound to. The page token is a child
//!   of the app token and is replaced every time the page scope ends.
//! - `TaskSet`: where command futures run. On native targets this is a tokio `JoinSet`
//!   (the caller must be inside a tokio runtime); on wasm32 futures go to
//!   `wasm_bindgen_futures::spawn_local` and only a counter is kept.

use log::error;
use tokio_util::sync::CancellationToken;

use crate::{CommandFuture, CommandScope};

#[derive(Debug)]
pub(crate) struct Scopes {
    app: CancellationToken,
    page: CancellationToken,
    page_generation: u64,
}

impl Default for Scopes {
    fn default() -> Self {
        let app = CancellationToken::new();
        let page = app.child_token();
        Self {
            app,
            page,
            page_generation: 0,
        }
    }
}

impl Scopes {
    pub(crate) fn token(&self, scope: CommandScope) -> CancellationToken {
        match scope {
            CommandScope::App => self.app.clone(),
            CommandScope::Page => self.page.clone(),
        }
    }

    /// Cancels the current page token and starts a fresh one.
    pub(crate) fn end_page(&mut self) {
        self.page.cancel();
        self.page = self.app.child_token();
        self.page_generation += 1;
    }

    pub(crate) fn page_generation(&self) -> u64 {
        self.page_generation
    }

    pub(crate) fn cancel_all(&self) {
        self.app.cancel();
    }
}

#[derive(Debug, Default)]
pub struct TaskSet {
    #[cfg(not(target_arch = "wasm32"))]
    join_set: tokio::task::JoinSet<()>,
    #[cfg(target_arch = "wasm32")]
    in_flight: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl TaskSet {
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn spawn(&mut self, future: CommandFuture) {
        self.join_set.spawn(future);
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn spawn(&mut self, future: CommandFuture) {
        use std::sync::atomic::Ordering;

        let in_flight = std::sync::Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);
        wasm_bindgen_futures::spawn_local(async move {
            future.await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Drops finished tasks, logging the ones that panicked.
    pub(crate) fn reap(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        while let Some(result) = self.join_set.try_join_next() {
            if let Err(err) = result
                && err.is_panic()
            {
                error!("Command task panicked: {err}");
            }
        }
    }

    pub fn len(&self) -> usize {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.join_set.len()
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.in_flight.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for the next task to finish. Returns `false` when nothing is running.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn join_next(&mut self) -> bool {
        match self.join_set.join_next().await {
            Some(Err(err)) if err.is_panic() => {
                error!("Command task panicked: {err}");
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    pub(crate) async fn shutdown(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        self.join_set.shutdown().await;
    }
}
