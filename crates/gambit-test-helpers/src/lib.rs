//! Test doubles for the Gambit workspace.
//!
//! [`MockChannel`] stands in for a serial device in sequencer and CLI tests:
//! it records everything written, can acknowledge like the arm or stay mute
//! like the gripper, and can fail a chosen write to exercise abort paths.
//! Two mocks can share a [`Transcript`] so a test can assert the exact
//! interleaving of commands across both links.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gambit_link::{Channel, LinkError, LinkResult};

/// One recorded write, tagged with the device it went to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Device label of the channel that was written.
    pub device: String,
    /// The bytes written.
    pub bytes: Vec<u8>,
}

/// A write log shared between several mock channels.
pub type Transcript = Arc<Mutex<Vec<TranscriptEntry>>>;

/// Creates an empty shared transcript.
pub fn transcript() -> Transcript {
    Arc::new(Mutex::new(Vec::new()))
}

/// Renders a transcript as `(device, line)` pairs for compact assertions.
pub fn transcript_lines(transcript: &Transcript) -> Vec<(String, String)> {
    transcript
        .lock()
        .expect("transcript lock")
        .iter()
        .map(|e| {
            (
                e.device.clone(),
                String::from_utf8_lossy(&e.bytes).into_owned(),
            )
        })
        .collect()
}

/// A scriptable in-memory [`Channel`].
#[derive(Debug, Default)]
pub struct MockChannel {
    device: String,
    sent: Vec<Vec<u8>>,
    pending: VecDeque<Vec<u8>>,
    auto_ack: Option<Vec<u8>>,
    fail_on_send: Option<usize>,
    transcript: Option<Transcript>,
}

impl MockChannel {
    /// A device that answers `ok` to every write, like the arm controller.
    pub fn acknowledging(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            auto_ack: Some(b"ok\r\n".to_vec()),
            ..Self::default()
        }
    }

    /// A device that never answers, like the gripper (or a wedged arm).
    pub fn silent(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }

    /// Fails the `index`-th write (zero-based), once; acknowledges the
    /// rest. One-shot so recovery after an aborted sequence is testable.
    pub fn failing_at(device: impl Into<String>, index: usize) -> Self {
        Self {
            fail_on_send: Some(index),
            ..Self::acknowledging(device)
        }
    }

    /// Shares a transcript with other mocks for interleaving assertions.
    #[must_use]
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Queues an explicit chunk to be read before any auto-acknowledgment.
    pub fn queue_response(&mut self, bytes: &[u8]) {
        self.pending.push_back(bytes.to_vec());
    }

    /// Everything written so far, in order.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Written lines as lossy strings, for readable assertions.
    pub fn sent_lines(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect()
    }

    /// Number of completed writes.
    pub fn send_count(&self) -> usize {
        self.sent.len()
    }
}

impl Channel for MockChannel {
    fn device(&self) -> &str {
        &self.device
    }

    fn send(&mut self, bytes: &[u8]) -> LinkResult<()> {
        if self.fail_on_send == Some(self.sent.len()) {
            self.fail_on_send = None;
            return Err(LinkError::Io {
                device: self.device.clone(),
                message: "injected write failure".into(),
            });
        }
        self.sent.push(bytes.to_vec());
        if let Some(transcript) = &self.transcript {
            transcript
                .lock()
                .expect("transcript lock")
                .push(TranscriptEntry {
                    device: self.device.clone(),
                    bytes: bytes.to_vec(),
                });
        }
        if let Some(ack) = &self.auto_ack {
            self.pending.push_back(ack.clone());
        }
        Ok(())
    }

    fn bytes_available(&mut self) -> LinkResult<usize> {
        Ok(self.pending.front().map_or(0, Vec::len))
    }

    fn read_available(&mut self) -> LinkResult<Vec<u8>> {
        Ok(self.pending.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_writes_and_acknowledges() {
        let mut ch = MockChannel::acknowledging("arm");
        ch.send(b"MJ...\n").expect("send succeeds");
        assert_eq!(ch.send_count(), 1);
        assert_eq!(ch.bytes_available().expect("poll"), 4);
        assert_eq!(ch.read_available().expect("read"), b"ok\r\n");
    }

    #[test]
    fn silent_channel_never_has_data() {
        let mut ch = MockChannel::silent("gripper");
        ch.send(b"SV0P35\n").expect("send succeeds");
        assert_eq!(ch.bytes_available().expect("poll"), 0);
        assert!(ch.read_available().expect("read").is_empty());
    }

    #[test]
    fn injected_failure_hits_the_chosen_write() {
        let mut ch = MockChannel::failing_at("arm", 1);
        ch.send(b"first\n").expect("first send fine");
        let err = ch.send(b"second\n").expect_err("second send fails");
        assert!(matches!(err, LinkError::Io { .. }));
        assert_eq!(ch.send_count(), 1);
    }

    #[test]
    fn shared_transcript_interleaves_devices() {
        let log = transcript();
        let mut arm = MockChannel::acknowledging("arm").with_transcript(log.clone());
        let mut gripper = MockChannel::silent("gripper").with_transcript(log.clone());
        gripper.send(b"SV0P35\n").expect("send");
        arm.send(b"MJ...\n").expect("send");
        let lines = transcript_lines(&log);
        assert_eq!(lines[0], ("gripper".into(), "SV0P35\n".into()));
        assert_eq!(lines[1], ("arm".into(), "MJ...\n".into()));
    }
}
