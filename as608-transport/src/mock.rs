//! Scripted in-memory transport and detector
//!
//! `MockTransport` replays queued bursts of bytes and records everything
//! written to it. A burst only becomes readable once the previous one has
//! been drained, optionally after a delay, which lets tests reproduce slow
//! or fragmented replies. Clones share the same script.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::{FingerDetector, Transport, error::*};

#[derive(Debug)]
struct Burst {
    data: Vec<u8>,
    delay: Duration,
    ready_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct MockInner {
    incoming: VecDeque<Burst>,
    writes: Vec<Vec<u8>>,
    closed: bool,
}

impl MockInner {
    /// Bytes of the front burst that are readable now
    fn ready(&mut self) -> usize {
        let Some(front) = self.incoming.front_mut() else {
            return 0;
        };

        let now = Instant::now();
        let ready_at = *front.ready_at.get_or_insert(now + front.delay);

        if now >= ready_at { front.data.len() } else { 0 }
    }
}

/// Scripted byte stream
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a burst that is readable as soon as the previous one is drained
    pub fn push(&self, data: impl AsRef<[u8]>) {
        self.push_delayed(data, Duration::ZERO);
    }

    /// Queue a burst that turns readable `delay` after it reaches the front
    pub fn push_delayed(&self, data: impl AsRef<[u8]>, delay: Duration) {
        let data = data.as_ref().to_vec();
        if data.is_empty() {
            return;
        }

        self.inner.lock().incoming.push_back(Burst {
            data,
            delay,
            ready_at: None,
        });
    }

    /// Every byte written so far, concatenated
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().writes.concat()
    }

    /// Individual write calls, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.lock().writes.clone()
    }

    /// Forget recorded writes
    pub fn clear_writes(&self) {
        self.inner.lock().writes.clear();
    }

    /// Bytes queued but not yet read
    pub fn pending(&self) -> usize {
        self.inner.lock().incoming.iter().map(|b| b.data.len()).sum()
    }

    /// Make every further operation fail with `Error::Closed`
    pub fn close(&self) {
        self.inner.lock().closed = true;
    }
}

impl Transport for MockTransport {
    fn bytes_available(&mut self) -> Result<usize> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::Closed);
        }
        Ok(inner.ready())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::Closed);
        }

        let ready = inner.ready();
        let n = ready.min(buf.len());
        if n == 0 {
            return Ok(0);
        }

        let Some(front) = inner.incoming.front_mut() else {
            return Ok(0);
        };
        buf[..n].copy_from_slice(&front.data[..n]);
        front.data.drain(..n);

        if front.data.is_empty() {
            inner.incoming.pop_front();
        }

        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::Closed);
        }
        inner.writes.push(data.to_vec());
        Ok(())
    }

    fn description(&self) -> String {
        "mock".to_string()
    }
}

/// Scripted finger detector
///
/// Returns the queued readings in order, then repeats the last one.
#[derive(Debug, Clone)]
pub struct MockDetector {
    readings: VecDeque<bool>,
    last: bool,
    polls: usize,
}

impl MockDetector {
    pub fn new(readings: impl IntoIterator<Item = bool>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            last: false,
            polls: 0,
        }
    }

    /// Detector that always reports the same level
    pub fn always(present: bool) -> Self {
        Self {
            readings: VecDeque::new(),
            last: present,
            polls: 0,
        }
    }

    /// Number of times the detector has been read
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl FingerDetector for MockDetector {
    fn finger_present(&mut self) -> Result<bool> {
        self.polls += 1;
        if let Some(reading) = self.readings.pop_front() {
            self.last = reading;
        }
        Ok(self.last)
    }
}
