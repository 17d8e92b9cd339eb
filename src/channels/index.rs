use std::fmt;

/// One row of the daemon's channel index CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    /// Human-readable channel name (first CSV field).
    pub name: String,
    /// Relative path of the channel's stream resource, served under `/streams/`.
    pub stream_path: String,
    /// Trailing CSV fields, carried through but not interpreted.
    pub extra: Vec<String>,
}

/// Heuristic readiness state of channel discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Ready,
    Filling,
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelStatus::Ready => f.write_str("Ready"),
            ChannelStatus::Filling => f.write_str("Filling channel buffers"),
        }
    }
}

/// Result of one scan of the daemon's output directory.
#[derive(Debug, Clone, Default)]
pub struct ChannelIndex {
    /// CSV rows in file-read order, concatenated across index files.
    /// Cross-file order follows directory iteration and is not stable.
    pub channels: Vec<ChannelRecord>,
    /// Number of `.m3u8` manifest files seen. Contents are never read.
    pub manifest_count: usize,
}

impl ChannelIndex {
    /// Ready iff every listed channel appears to have a manifest written.
    ///
    /// This is a count comparison, not a per-channel check: it can misreport
    /// when extensions collide, when a manifest lands under an unexpected
    /// name, or when several index files carry overlapping rows. The daemon
    /// exposes nothing better to reconcile against, so the limitation stands.
    pub fn status(&self) -> ChannelStatus {
        if self.channels.len() == self.manifest_count {
            ChannelStatus::Ready
        } else {
            ChannelStatus::Filling
        }
    }
}
