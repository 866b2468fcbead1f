//! Channel connection state machine (data model §"Channel connection").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    LinkSent,
    Authed,
    Ready,
    Migrating,
}

impl ConnectionState {
    /// Whether a regular (non-handshake) message may be sent or
    /// received in this state.
    pub fn can_exchange_messages(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_terminal_disconnect(self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

/// Legal transitions; anything else is a programming error (the
/// channel task controls its own state, it is never driven externally
/// into an invalid transition).
#[derive(Debug, thiserror::Error)]
#[error("illegal channel state transition {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

pub fn validate_transition(
    from: ConnectionState,
    to: ConnectionState,
) -> Result<(), IllegalTransition> {
    use ConnectionState::*;
    let ok = matches!(
        (from, to),
        (Disconnected, Connecting)
            | (Connecting, LinkSent)
            | (LinkSent, Authed)
            | (Authed, Ready)
            | (Ready, Migrating)
            | (Migrating, Ready)
            | (Migrating, Disconnected)
            | (_, Disconnected)
    );
    if ok {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    #[test]
    fn happy_path_is_legal() {
        for (a, b) in [
            (Disconnected, Connecting),
            (Connecting, LinkSent),
            (LinkSent, Authed),
            (Authed, Ready),
            (Ready, Migrating),
            (Migrating, Ready),
        ] {
            assert!(validate_transition(a, b).is_ok());
        }
    }

    #[test]
    fn any_state_can_disconnect() {
        for s in [Connecting, LinkSent, Authed, Ready, Migrating] {
            assert!(validate_transition(s, Disconnected).is_ok());
        }
    }

    #[test]
    fn skipping_auth_is_illegal() {
        assert!(validate_transition(LinkSent, Ready).is_err());
    }
}
