//! Session-wide state the main channel owns and hands out: the
//! channel list the server advertises, mm-time, and agent presence.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelId {
    pub channel_type: u8,
    pub channel_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn from_wire(value: u32) -> Self {
        match value {
            0 => Self::Info,
            1 => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// `mm_time` is a server-advanced millisecond clock. The source
/// occasionally computes it as a signed difference of unsigned
/// values; per the open question this keeps it as a plain `u32` with
/// `wrapping_sub` for differences rather than widening to `u64`, since
/// the wire field itself is 32 bits and downstream consumers
/// (`VideoStream`) already treat it as a bounded local window, not an
/// absolute epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MmTime(pub u32);

impl MmTime {
    pub fn diff(self, earlier: MmTime) -> i64 {
        self.0.wrapping_sub(earlier.0) as i32 as i64
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub session_id: u32,
    pub mm_time: MmTime,
    pub agent_connected: bool,
    pub supported_mouse_modes: u32,
    pub channels: Vec<ChannelId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_time_diff_handles_wraparound_as_a_negative_delta() {
        let earlier = MmTime(u32::MAX - 1);
        let later = MmTime(1);
        assert_eq!(later.diff(earlier), 3);
    }
}
