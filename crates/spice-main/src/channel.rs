//! The main channel: session init, notifications, the channel list,
//! mouse-mode arbitration, agent pass-through, and migration.

use crate::migration::{MigrationCoordinator, MigrationTarget};
use crate::mouse_mode::MouseModeArbiter;
use crate::session::{ChannelId, MmTime, Session, Severity};

#[derive(Debug)]
pub enum MainAction {
    None,
    /// Forwarded verbatim to the application's notification surface.
    Notify { severity: Severity, message: String },
    /// Every channel must re-evaluate pointer handling.
    MouseModeChanged,
    /// The application should tear down the session and connect to
    /// the migration target.
    MigrateTo(MigrationTarget),
    /// Agent byte stream pass-through (to/from the guest agent, e.g.
    /// clipboard/resize negotiation); the core does not interpret it.
    AgentData(Vec<u8>),
}

pub struct MainChannel {
    pub channel_id: u8,
    session: Session,
    mouse_mode: MouseModeArbiter,
    migration: MigrationCoordinator,
    agent_tokens: u32,
}

impl MainChannel {
    pub fn new(channel_id: u8) -> Self {
        Self {
            channel_id,
            session: Session::default(),
            mouse_mode: MouseModeArbiter::new(),
            migration: MigrationCoordinator::new(),
            agent_tokens: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mouse_mode(&self) -> &MouseModeArbiter {
        &self.mouse_mode
    }

    pub fn on_init(
        &mut self,
        session_id: u32,
        mm_time: u32,
        agent_connected: bool,
        supported_mouse_modes: u32,
    ) {
        self.session.session_id = session_id;
        self.session.mm_time = MmTime(mm_time);
        self.session.agent_connected = agent_connected;
        self.session.supported_mouse_modes = supported_mouse_modes;
    }

    pub fn on_notify(&self, severity: u32, message: String) -> MainAction {
        let severity = Severity::from_wire(severity);
        tracing::info!(?severity, %message, "server notification");
        MainAction::Notify { severity, message }
    }

    pub fn on_channels_list(&mut self, channels: Vec<ChannelId>) {
        tracing::debug!(count = channels.len(), "channel list received");
        self.session.channels = channels;
    }

    pub fn on_mouse_mode(&mut self, supported: u32, current: u32) -> MainAction {
        if self.mouse_mode.on_mouse_mode(supported, current) {
            MainAction::MouseModeChanged
        } else {
            MainAction::None
        }
    }

    pub fn on_multi_media_time(&mut self, mm_time: u32) {
        self.session.mm_time = MmTime(mm_time);
    }

    pub fn on_agent_connected(&mut self) {
        self.session.agent_connected = true;
    }

    pub fn on_agent_disconnected(&mut self) {
        self.session.agent_connected = false;
    }

    pub fn on_agent_data(&self, data: Vec<u8>) -> MainAction {
        MainAction::AgentData(data)
    }

    pub fn on_agent_tokens(&mut self, tokens: u32) {
        self.agent_tokens = self.agent_tokens.saturating_add(tokens);
    }

    pub fn agent_tokens(&self) -> u32 {
        self.agent_tokens
    }

    pub fn on_migrate_begin(&mut self, target: MigrationTarget) -> MainAction {
        self.migration.begin(target.clone());
        MainAction::MigrateTo(target)
    }

    pub fn on_migrate_cancel(&mut self) {
        self.migration.cancel();
    }

    pub fn on_migrate_switch_host(&mut self, target: MigrationTarget) -> MainAction {
        self.migration.switch_host(target.clone());
        MainAction::MigrateTo(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_populates_session_state() {
        let mut channel = MainChannel::new(0);
        channel.on_init(1, 1000, true, 0b11);
        assert_eq!(channel.session().session_id, 1);
        assert!(channel.session().agent_connected);
    }

    #[test]
    fn mouse_mode_change_is_reported_once() {
        let mut channel = MainChannel::new(0);
        assert!(matches!(channel.on_mouse_mode(0b11, 1), MainAction::MouseModeChanged));
        assert!(matches!(channel.on_mouse_mode(0b11, 1), MainAction::None));
    }

    #[test]
    fn agent_tokens_accumulate() {
        let mut channel = MainChannel::new(0);
        channel.on_agent_tokens(5);
        channel.on_agent_tokens(3);
        assert_eq!(channel.agent_tokens(), 8);
    }
}
