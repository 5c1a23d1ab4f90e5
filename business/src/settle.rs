use secure_states::{State, Updater};

/// Publishes an in-flight value now and a settled value when dropped.
///
/// Commands hold one for the lifetime of their request, so the loading flag it carries
/// is cleared on every exit path, including an early return or the future being dropped.
pub struct SettleGuard<T: State + Default> {
    updater: Updater,
    settled: T,
}

impl<T: State + Default> SettleGuard<T> {
    pub fn begin(updater: Updater, in_flight: T, settled: T) -> Self {
        updater.set(in_flight);
        Self { updater, settled }
    }

    /// The value that will be published on drop.
    pub fn settled_mut(&mut self) -> &mut T {
        &mut self.settled
    }
}

impl<T: State + Default> Drop for SettleGuard<T> {
    fn drop(&mut self) {
        self.updater.set(std::mem::take(&mut self.settled));
    }
}
