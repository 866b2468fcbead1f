//! Channel migration handover (§4.B "Migration").
//!
//! `MIGRATE_FLUSH_MARK` and `MIGRATE_DATA` are modeled as distinct
//! messages rather than folded into one "migrate" variant, matching
//! `server/main_channel.c`'s treatment of migration as a sequence of
//! markers rather than a single atomic message.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Normal,
    FlushSent,
    DataSent,
}

/// Per-channel state carried across a migration handover and replayed
/// on the target side.
#[derive(Debug, Clone)]
pub struct MigrationData {
    pub serial: u64,
    pub ping_id: u32,
    pub cache_membership: Vec<u64>,
}

#[derive(Debug)]
pub struct Migration {
    state: MigrationState,
    pending_data: Option<MigrationData>,
}

impl Migration {
    pub fn new() -> Self {
        Self {
            state: MigrationState::Normal,
            pending_data: None,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Handle the server's `MIGRATE{flags}`: the channel must flush
    /// its outbound queue then emit `MIGRATE_FLUSH_MARK`.
    pub fn begin(&mut self) {
        self.state = MigrationState::FlushSent;
    }

    /// Called once the flush mark has actually been written to the
    /// wire: serialize channel-specific state for `MIGRATE_DATA`.
    pub fn flush_mark_sent(&mut self, data: MigrationData) -> MigrationData {
        self.state = MigrationState::DataSent;
        self.pending_data = Some(data.clone());
        data
    }

    /// Called on the target side after consuming `MIGRATE_DATA`: the
    /// outbound serial is restored and the channel resumes normal
    /// operation.
    pub fn resume(&mut self) -> Option<MigrationData> {
        self.state = MigrationState::Normal;
        self.pending_data.take()
    }

    /// The migration target was unreachable; revert to the source and
    /// discard any staged data.
    pub fn revert(&mut self) {
        self.state = MigrationState::Normal;
        self.pending_data = None;
    }
}

impl Default for Migration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_sequence() {
        let mut m = Migration::new();
        assert_eq!(m.state(), MigrationState::Normal);
        m.begin();
        assert_eq!(m.state(), MigrationState::FlushSent);
        m.flush_mark_sent(MigrationData {
            serial: 7,
            ping_id: 1,
            cache_membership: vec![],
        });
        assert_eq!(m.state(), MigrationState::DataSent);
        let data = m.resume().unwrap();
        assert_eq!(data.serial, 7);
        assert_eq!(m.state(), MigrationState::Normal);
    }

    #[test]
    fn revert_discards_staged_data() {
        let mut m = Migration::new();
        m.begin();
        m.flush_mark_sent(MigrationData {
            serial: 1,
            ping_id: 0,
            cache_membership: vec![],
        });
        m.revert();
        assert_eq!(m.state(), MigrationState::Normal);
        assert!(m.resume().is_none());
    }
}
