//! Acknowledgement frames
//!
//! A reply is read byte by byte until the size expected for the instruction
//! has arrived. The deadline is absolute: partial arrivals do not extend it.

use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use as608_core::{ConfirmCode, Instruction, Packet, PacketKind, codec, constants::frame};
use as608_transport::Transport;

use crate::error::{Error, Result};

/// Validated acknowledgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    instruction: Instruction,
    frame: Bytes,
}

impl Reply {
    pub fn instruction(&self) -> Instruction {
        self.instruction
    }

    pub fn confirm(&self) -> ConfirmCode {
        ConfirmCode::from(self.frame[frame::PAYLOAD_OFFSET])
    }

    /// The whole frame as received
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Raw bytes at a frame offset
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.frame
            .get(offset..offset + len)
            .ok_or(Error::Core(as608_core::Error::PacketTooShort {
                expected: offset + len,
                actual: self.frame.len(),
            }))
    }

    /// Two-byte big-endian field at a frame offset
    pub fn u16_at(&self, offset: usize) -> Result<u16> {
        Ok(codec::merge_u16(self.bytes(offset, 2)?)?)
    }

    /// Four-byte big-endian field at a frame offset
    pub fn u32_at(&self, offset: usize) -> Result<u32> {
        Ok(codec::merge(self.bytes(offset, 4)?)?)
    }
}

/// Bounded-time reader for one acknowledgement frame
pub struct ReplyReceiver<'a> {
    transport: &'a mut dyn Transport,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a> ReplyReceiver<'a> {
    pub fn new(transport: &'a mut dyn Transport, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            transport,
            timeout,
            poll_interval,
        }
    }

    /// Read exactly `expected` bytes before the deadline
    pub fn read_frame(&mut self, expected: usize) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = vec![0u8; expected];
        let mut received = 0;

        while received < expected {
            if Instant::now() >= deadline {
                warn!("Reply timed out after {} of {} bytes", received, expected);
                return Err(Error::Timeout { expected, received });
            }

            if self.transport.bytes_available()? > 0 {
                received += self.transport.read(&mut buf[received..=received])?;
            } else {
                thread::sleep(self.poll_interval);
            }
        }

        trace!("Reply frame: {}", hex::encode(&buf));

        Ok(buf)
    }

    /// Receive and validate the acknowledgement for `instruction`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The full frame does not arrive before the deadline
    /// - The marker is zero or the checksum does not match
    /// - The confirmation code is not success
    pub fn receive(&mut self, instruction: Instruction) -> Result<Reply> {
        let buf = self.read_frame(instruction.reply_len())?;

        let packet = Packet::decode(&buf).inspect_err(|e| {
            warn!("Invalid reply to {}: {}", instruction, e);
        })?;

        if packet.kind != PacketKind::Ack {
            debug!("Reply to {} tagged {:?}", instruction, packet.kind);
        }

        let reply = Reply {
            instruction,
            frame: Bytes::from(buf),
        };

        let confirm = reply.confirm();
        debug!("{} -> {}", instruction, confirm);

        if !confirm.is_success() {
            return Err(Error::Device(confirm));
        }

        Ok(reply)
    }
}
