/// Sync status of an entry in `StateCtx`, used to decide which computes to re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    #[default]
    BeforeInit,
    Dirty,
    Clean,
}

impl StateSyncStatus {
    pub fn needs_sync(self) -> bool {
        !matches!(self, Self::Clean)
    }
}
