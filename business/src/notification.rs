//! Toast notifications.
//!
//! Commands push toasts through a [`Notifier`] (a cloneable state, so it travels in
//! command snapshots). The UI owns the matching [`ToastFeed`] and drains it every frame.

use std::any::Any;

use chrono::{DateTime, TimeDelta, Utc};
use flume::{Receiver, Sender};
use log::{info, warn};
use secure_states::{SnapshotClone, State, state_assign_impl};

/// How long a toast stays on screen.
pub const TOAST_TTL: TimeDelta = TimeDelta::seconds(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= TOAST_TTL
    }
}

/// Fire-and-forget sender side of the toast channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Sender<Toast>,
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        let toast = Toast::new(ToastKind::Success, message);
        info!("Toast (success): {}", toast.message);
        self.push(toast);
    }

    pub fn error(&self, message: impl Into<String>) {
        let toast = Toast::new(ToastKind::Error, message);
        warn!("Toast (error): {}", toast.message);
        self.push(toast);
    }

    fn push(&self, toast: Toast) {
        if self.sender.send(toast).is_err() {
            warn!("Toast feed is gone, dropping notification");
        }
    }
}

impl SnapshotClone for Notifier {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for Notifier {
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

/// Receiver side of the toast channel plus the toasts currently on screen.
#[derive(Debug)]
pub struct ToastFeed {
    receiver: Receiver<Toast>,
    visible: Vec<Toast>,
}

impl ToastFeed {
    /// Moves newly pushed toasts on screen and drops the expired ones.
    pub fn poll(&mut self) -> &[Toast] {
        self.poll_at(Utc::now())
    }

    pub fn poll_at(&mut self, now: DateTime<Utc>) -> &[Toast] {
        self.visible.extend(self.receiver.try_iter());
        self.visible.retain(|toast| !toast.is_expired(now));
        &self.visible
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.visible.len() {
            self.visible.remove(index);
        }
    }

    /// Takes every toast seen so far, visible or pending.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.visible.extend(self.receiver.try_iter());
        std::mem::take(&mut self.visible)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.receiver.is_empty()
    }
}

pub fn notification_channel() -> (Notifier, ToastFeed) {
    let (sender, receiver) = flume::unbounded();
    (
        Notifier { sender },
        ToastFeed {
            receiver,
            visible: Vec::new(),
        },
    )
}
