//! Ping / bandwidth probe (§4.B "Ping / bandwidth probe").
//!
//! The main channel issues a warm-up ping, a latency ping, and a
//! bulk-payload ping at session start; from the round-trip deltas it
//! computes `latency` and `bitrate_per_sec`, flagging "low bandwidth"
//! below 10 Mb/s so the image-compression heuristics elsewhere in the
//! session can tighten.

use std::time::{Duration, Instant};

/// Size of the bulk-payload ping used to estimate bitrate.
pub const BULK_PING_PAYLOAD_BYTES: usize = 250 * 1024;

/// Below this the session is flagged "low bandwidth".
pub const LOW_BANDWIDTH_THRESHOLD_BPS: u64 = 10_000_000 / 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingKind {
    WarmUp,
    Latency,
    Bulk,
}

#[derive(Debug, Default)]
pub struct BandwidthProbe {
    warm_up_rtt: Option<Duration>,
    latency: Option<Duration>,
    bitrate_bps: Option<u64>,
    in_flight: Option<(PingKind, u32, Instant)>,
}

impl BandwidthProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, kind: PingKind, id: u32) {
        self.in_flight = Some((kind, id, Instant::now()));
    }

    /// Record a `PONG{id}` reply; returns the kind that just completed,
    /// or `None` if `id` did not match an in-flight ping.
    pub fn on_pong(&mut self, id: u32) -> Option<PingKind> {
        let (kind, pending_id, sent_at) = self.in_flight.take()?;
        if pending_id != id {
            self.in_flight = Some((kind, pending_id, sent_at));
            return None;
        }
        let rtt = sent_at.elapsed();
        match kind {
            PingKind::WarmUp => self.warm_up_rtt = Some(rtt),
            PingKind::Latency => self.latency = Some(rtt),
            PingKind::Bulk => {
                // Subtract the warm-up RTT (connection setup/scheduling
                // noise) before turning the bulk RTT into a bitrate.
                let baseline = self.warm_up_rtt.unwrap_or_default();
                let effective = rtt.saturating_sub(baseline).max(Duration::from_micros(1));
                let bits = BULK_PING_PAYLOAD_BYTES as u64 * 8;
                self.bitrate_bps = Some(bits * 1_000_000 / effective.as_micros().max(1) as u64);
            }
        }
        Some(kind)
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    pub fn bitrate_per_sec(&self) -> Option<u64> {
        self.bitrate_bps
    }

    pub fn is_low_bandwidth(&self) -> bool {
        self.bitrate_bps
            .map(|b| b < LOW_BANDWIDTH_THRESHOLD_BPS)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn mismatched_pong_id_is_ignored() {
        let mut probe = BandwidthProbe::new();
        probe.start(PingKind::WarmUp, 1);
        assert!(probe.on_pong(2).is_none());
        assert!(probe.on_pong(1).is_some());
    }

    #[test]
    fn bulk_pong_computes_a_bitrate() {
        let mut probe = BandwidthProbe::new();
        probe.start(PingKind::WarmUp, 1);
        sleep(Duration::from_millis(1));
        probe.on_pong(1);

        probe.start(PingKind::Bulk, 2);
        sleep(Duration::from_millis(5));
        probe.on_pong(2);

        assert!(probe.bitrate_per_sec().is_some());
    }
}
