//! Route state for page navigation.
//!
//! Commands navigate by publishing a new `Route`; the UI renders the page it names.

use std::any::Any;

use secure_states::{SnapshotClone, State, state_assign_impl};
use serde::{Deserialize, Serialize};

/// Represents the current page/route of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Greeting page under the menu bar
    #[default]
    Home,
    /// Combined login and registration form
    Login,
    /// Three-stage password reset wizard
    ResetPassword,
    /// OTP entry for verifying the account's email address
    EmailVerify,
}

impl Route {
    /// Path the page would have in a browser.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::ResetPassword => "/reset-password",
            Self::EmailVerify => "/email-verify",
        }
    }
}

impl SnapshotClone for Route {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

impl State for Route {
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

/// The route whose page was last set up; `None` before the first frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderedRoute(pub Option<Route>);

impl SnapshotClone for RenderedRoute {}

impl State for RenderedRoute {
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
