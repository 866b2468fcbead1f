//! Migration coordinator (§4.L): the main channel's half of a
//! migration, distinct from [`spice_channel::migration::Migration`]
//! which tracks the per-channel flush/data-transfer handshake. This
//! type tracks the session-level destination the application must
//! connect to next.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationTarget {
    pub host: String,
    pub port: u16,
    pub cert_subject: Option<String>,
}

#[derive(Debug, Default)]
pub struct MigrationCoordinator {
    pending: Option<MigrationTarget>,
}

impl MigrationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&MigrationTarget> {
        self.pending.as_ref()
    }

    /// `MIGRATE_BEGIN{host, port, cert}`.
    pub fn begin(&mut self, target: MigrationTarget) {
        self.pending = Some(target);
    }

    /// `MIGRATE_SWITCH_HOST`: same shape as a begin, replacing
    /// whatever was pending.
    pub fn switch_host(&mut self, target: MigrationTarget) {
        self.pending = Some(target);
    }

    /// `MIGRATE_CANCEL`.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn take(&mut self) -> Option<MigrationTarget> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> MigrationTarget {
        MigrationTarget { host: "spice.example".into(), port: 5900, cert_subject: None }
    }

    #[test]
    fn cancel_clears_a_pending_migration() {
        let mut coordinator = MigrationCoordinator::new();
        coordinator.begin(target());
        assert!(coordinator.pending().is_some());
        coordinator.cancel();
        assert!(coordinator.pending().is_none());
    }

    #[test]
    fn switch_host_replaces_the_pending_target() {
        let mut coordinator = MigrationCoordinator::new();
        coordinator.begin(target());
        let mut other = target();
        other.port = 6900;
        coordinator.switch_host(other.clone());
        assert_eq!(coordinator.pending(), Some(&other));
    }
}
