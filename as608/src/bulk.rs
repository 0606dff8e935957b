//! Chunked data transfer
//!
//! Templates, images and the info page move as a run of data packets, each
//! carrying exactly one negotiated chunk. Every packet is tagged `DataMore`
//! except the last, which is tagged `DataEnd`.
//!
//! Receiving is bounded by an inactivity timeout that restarts whenever new
//! bytes arrive, unlike replies which use an absolute deadline.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use as608_core::{Packet, PacketKind, constants::frame};
use as608_transport::Transport;

use crate::error::{Error, Result};

/// On-wire bytes moved so far out of the expected total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.done as f32 * 100.0 / self.total as f32).min(100.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.0}%)", self.done, self.total, self.percent())
    }
}

/// Progress observer installed on a sensor
pub type ProgressFn = Box<dyn FnMut(Progress) + Send>;

/// One chunked send or receive
pub struct BulkTransfer<'a> {
    transport: &'a mut dyn Transport,
    address: u32,
    chunk: usize,
    idle_timeout: Duration,
    poll_interval: Duration,
    burst: usize,
    progress: Option<&'a mut ProgressFn>,
}

impl<'a> BulkTransfer<'a> {
    pub fn new(transport: &'a mut dyn Transport, address: u32, chunk: usize) -> Self {
        Self {
            transport,
            address,
            chunk,
            idle_timeout: as608_core::constants::timing::BULK_IDLE_TIMEOUT,
            poll_interval: as608_core::constants::timing::POLL_INTERVAL,
            burst: as608_core::constants::timing::BULK_BURST,
            progress: None,
        }
    }

    pub fn with_timing(mut self, idle_timeout: Duration, poll_interval: Duration, burst: usize) -> Self {
        self.idle_timeout = idle_timeout;
        self.poll_interval = poll_interval;
        self.burst = burst.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Option<&'a mut ProgressFn>) -> Self {
        self.progress = progress;
        self
    }

    /// On-wire size of one data packet
    pub fn frame_len(&self) -> usize {
        self.chunk + frame::OVERHEAD
    }

    /// Send `data` as full chunks
    ///
    /// Nothing is written unless `data` is a non-empty multiple of the
    /// chunk size.
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        if self.chunk == 0 || data.is_empty() || data.len() % self.chunk != 0 {
            return Err(Error::SizeMismatch {
                size: data.len(),
                chunk: self.chunk,
            });
        }

        let count = data.len() / self.chunk;
        let total = count * self.frame_len();
        let mut done = 0;

        for (i, chunk) in data.chunks_exact(self.chunk).enumerate() {
            let kind = if i + 1 == count {
                PacketKind::DataEnd
            } else {
                PacketKind::DataMore
            };

            let encoded = Packet::new(kind, self.address, chunk.to_vec())?.encode();
            trace!("Data packet {}/{}: {}", i + 1, count, hex::encode(&encoded));

            self.transport.write_all(&encoded)?;

            done += encoded.len();
            debug!("Sent chunk {}/{} ({:?})", i + 1, count, kind);
            self.report(done, total);
        }

        Ok(())
    }

    /// Reassemble incoming data packets into `out`
    ///
    /// The expected on-wire byte count is estimated from `out.len()`. A
    /// `DataEnd` packet ends the transfer even if fewer bytes arrived;
    /// reaching the estimate without one is an error. Returns the payload
    /// bytes written.
    pub fn receive(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.chunk == 0 {
            return Err(Error::SizeMismatch {
                size: out.len(),
                chunk: self.chunk,
            });
        }

        let frame_len = self.frame_len();
        let total = out.len() * frame_len / self.chunk;

        let mut assembly = vec![0u8; frame_len];
        let mut filled = 0;
        let mut received = 0;
        let mut offset = 0;
        let mut last_activity = Instant::now();

        loop {
            if filled == frame_len {
                filled = 0;
                let packet = Self::validate(&assembly)?;

                let end = (offset + packet.payload.len()).min(out.len());
                out[offset..end].copy_from_slice(&packet.payload[..end - offset]);
                offset = end;

                debug!("Received chunk {:?}, {} of {} bytes", packet.kind, offset, out.len());
                self.report(received, total);

                if packet.kind == PacketKind::DataEnd {
                    return Ok(offset);
                }

                if received >= total || offset >= out.len() {
                    warn!("{} bytes received without an end packet", received);
                    return Err(Error::EndPacketMissing);
                }
            }

            if last_activity.elapsed() >= self.idle_timeout {
                warn!("Bulk receive idle: {} of {} bytes", received, total);
                return Err(Error::Timeout {
                    expected: total,
                    received,
                });
            }

            let available = self.transport.bytes_available()?;
            if available == 0 {
                thread::sleep(self.poll_interval);
                continue;
            }

            let want = available.min(self.burst).min(frame_len - filled);
            let n = self.transport.read(&mut assembly[filled..filled + want])?;
            if n > 0 {
                filled += n;
                received += n;
                last_activity = Instant::now();
            }
        }
    }

    fn validate(buf: &[u8]) -> Result<Packet> {
        let packet = Packet::decode(buf).inspect_err(|e| warn!("Invalid data packet: {}", e))?;

        if !packet.kind.is_data() {
            return Err(Error::Core(as608_core::Error::UnknownPacketKind(packet.kind.into())));
        }

        Ok(packet)
    }

    fn report(&mut self, done: usize, total: usize) {
        if let Some(progress) = self.progress.as_mut() {
            progress(Progress { done, total });
        }
    }
}
