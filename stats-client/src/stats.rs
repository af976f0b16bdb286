//! Periodic transport statistics pushed by the backend.
//!
//! After a successful initialize the backend delivers per-SSRC stream stats
//! through the stats callback. The bridge only summarizes them for
//! diagnostics: round-trip time for outbound streams, loss rate for inbound
//! ones.

use std::collections::HashMap;

/// Direction of a reported media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDirection {
    Inbound,
    Outbound,
}

/// Statistics for a single media stream, keyed by SSRC.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamStats {
    /// Direction the stream flows relative to the local participant.
    pub direction: StreamDirection,
    /// Round-trip time in milliseconds, where the backend measured one.
    pub rtt_ms: Option<f64>,
    /// Fraction of packets lost, 0.0 to 1.0, where measured.
    pub fraction_loss: Option<f64>,
}

/// One batch of transport statistics from the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportStats {
    /// Per-stream stats keyed by SSRC.
    pub streams: HashMap<String, StreamStats>,
}

impl TransportStats {
    /// Summarize each stream the way operators expect to read it:
    /// RTT for outbound streams, loss rate for inbound ones.
    pub fn summaries(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .streams
            .iter()
            .map(|(ssrc, stats)| match stats.direction {
                StreamDirection::Outbound => {
                    format!("ssrc {ssrc} outbound rtt={:?}ms", stats.rtt_ms)
                }
                StreamDirection::Inbound => {
                    format!("ssrc {ssrc} inbound loss={:?}", stats.fraction_loss)
                }
            })
            .collect();
        lines.sort();
        lines
    }
}
