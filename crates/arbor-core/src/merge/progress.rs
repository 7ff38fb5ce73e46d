//! Progress delivery for batch merge runs.
//!
//! The orchestrator writes one [`MergeProgress`] snapshot per processed
//! branch to a sink, decoupling it from whatever renders progress (CLI
//! lines, a TUI widget, a web event stream).

use std::sync::mpsc::Sender;

use crate::merge::types::MergeProgress;

/// Receiver of per-branch progress snapshots.
pub trait ProgressSink {
    fn send(&mut self, progress: MergeProgress);
}

/// Any closure can act as a sink.
impl<F: FnMut(MergeProgress)> ProgressSink for F {
    fn send(&mut self, progress: MergeProgress) {
        self(progress)
    }
}

/// Sink that forwards snapshots over a channel to another thread.
///
/// A disconnected receiver is ignored; progress delivery must never abort
/// a batch.
pub struct ChannelSink(pub Sender<MergeProgress>);

impl ProgressSink for ChannelSink {
    fn send(&mut self, progress: MergeProgress) {
        let _ = self.0.send(progress);
    }
}

/// Sink that discards all snapshots.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn send(&mut self, _progress: MergeProgress) {}
}
