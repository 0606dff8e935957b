//! Driver configuration

use std::time::Duration;

use as608_core::constants::{DEFAULT_ADDRESS, timing};

/// Addressing and timing used by a [`Sensor`](crate::Sensor)
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use as608::SensorConfig;
///
/// let config = SensorConfig::default()
///     .with_password(0x1234)
///     .with_reply_timeout(Duration::from_secs(1));
///
/// assert_eq!(config.password, Some(0x1234));
/// assert_eq!(config.address, 0xFFFF_FFFF);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    /// Module address put on every frame
    pub address: u32,

    /// Handshake password; `None` skips verification during setup
    pub password: Option<u32>,

    /// Absolute deadline for one reply frame
    pub reply_timeout: Duration,

    /// Bulk receive fails after this long without new bytes
    pub bulk_idle_timeout: Duration,

    pub poll_interval: Duration,

    /// Upper bound on bytes pulled per bulk read
    pub bulk_burst: usize,

    pub finger_timeout: Duration,
    pub finger_poll_interval: Duration,

    /// Duration of one lift-detection attempt during enrollment
    pub lift_timeout: Duration,
    pub lift_attempts: usize,
    pub lift_poll_interval: Duration,

    pub flush_attempts: usize,
    pub flush_delay: Duration,
}

impl SensorConfig {
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }

    pub fn with_password(mut self, password: u32) -> Self {
        self.password = Some(password);
        self
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn with_bulk_idle_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_idle_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the per-read burst size; zero is raised to one
    pub fn with_bulk_burst(mut self, burst: usize) -> Self {
        self.bulk_burst = burst.max(1);
        self
    }

    pub fn with_finger_timeout(mut self, timeout: Duration) -> Self {
        self.finger_timeout = timeout;
        self
    }

    pub fn with_finger_poll_interval(mut self, interval: Duration) -> Self {
        self.finger_poll_interval = interval;
        self
    }

    pub fn with_lift_timeout(mut self, timeout: Duration, attempts: usize) -> Self {
        self.lift_timeout = timeout;
        self.lift_attempts = attempts;
        self
    }

    pub fn with_flush(mut self, attempts: usize, delay: Duration) -> Self {
        self.flush_attempts = attempts;
        self.flush_delay = delay;
        self
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            password: None,
            reply_timeout: timing::REPLY_TIMEOUT,
            bulk_idle_timeout: timing::BULK_IDLE_TIMEOUT,
            poll_interval: timing::POLL_INTERVAL,
            bulk_burst: timing::BULK_BURST,
            finger_timeout: timing::FINGER_TIMEOUT,
            finger_poll_interval: timing::FINGER_POLL_INTERVAL,
            lift_timeout: timing::LIFT_TIMEOUT,
            lift_attempts: timing::LIFT_ATTEMPTS,
            lift_poll_interval: timing::LIFT_POLL_INTERVAL,
            flush_attempts: timing::FLUSH_ATTEMPTS,
            flush_delay: timing::FLUSH_DELAY,
        }
    }
}
