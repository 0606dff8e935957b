//! Two-pass fingerprint enrollment
//!
//! ```text
//! WaitFinger(1) -> Captured(1) -> FeatureExtracted(1) -> WaitLift
//!   -> WaitFinger(2) -> Captured(2) -> FeatureExtracted(2)
//!   -> Matched -> Merged -> Stored
//! ```
//!
//! Each step runs one operation. A failing step ends the attempt; starting
//! over is up to the caller.

use std::fmt;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use as608_transport::FingerDetector;
use as608_types::BufferId;

use crate::{
    error::{Error, Result},
    sensor::Sensor,
};

/// Which of the two captures is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    Second,
}

impl Pass {
    fn buffer(self) -> BufferId {
        match self {
            Self::First => BufferId::One,
            Self::Second => BufferId::Two,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollState {
    /// Waiting for a finger, then capturing
    WaitFinger(Pass),

    /// Image captured
    Captured(Pass),

    /// Features extracted into the pass's character buffer
    FeatureExtracted(Pass),

    /// Waiting for the finger to leave the sensor
    WaitLift,

    /// Both captures agree
    Matched { score: u16 },

    /// Template built from both buffers
    Merged,

    /// Template stored in the library
    Stored { page: u16 },
}

impl fmt::Display for EnrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitFinger(pass) => write!(f, "waiting for finger ({:?})", pass),
            Self::Captured(pass) => write!(f, "captured ({:?})", pass),
            Self::FeatureExtracted(pass) => write!(f, "features extracted ({:?})", pass),
            Self::WaitLift => write!(f, "waiting for lift"),
            Self::Matched { score } => write!(f, "matched (score {})", score),
            Self::Merged => write!(f, "merged"),
            Self::Stored { page } => write!(f, "stored at page {}", page),
        }
    }
}

/// Enrollment of one finger into one library page
///
/// # Examples
///
/// ```no_run
/// use as608::{Enrollment, FingerDetector, Sensor};
///
/// /// Touch output wired to a sysfs GPIO line
/// struct TouchPin(&'static str);
///
/// impl FingerDetector for TouchPin {
///     fn finger_present(&mut self) -> as608_transport::Result<bool> {
///         match std::fs::read_to_string(self.0)?.trim() {
///             "1" => Ok(true),
///             "0" => Ok(false),
///             other => Err(as608_transport::Error::Detector(format!("bad level {:?}", other))),
///         }
///     }
/// }
///
/// fn main() -> as608::Result<()> {
///     let mut sensor = Sensor::open("/dev/ttyAMA0", 57600)?;
///     sensor.connect()?;
///
///     let mut touch = TouchPin("/sys/class/gpio/gpio17/value");
///     let page = Enrollment::new(7).run(&mut sensor, &mut touch)?;
///     println!("Stored at {}", page);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Enrollment {
    page: u16,
    state: EnrollState,
}

impl Enrollment {
    pub fn new(page: u16) -> Self {
        Self {
            page,
            state: EnrollState::WaitFinger(Pass::First),
        }
    }

    pub fn page(&self) -> u16 {
        self.page
    }

    pub fn state(&self) -> EnrollState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, EnrollState::Stored { .. })
    }

    /// Run the operation for the current state and advance
    pub fn step(
        &mut self,
        sensor: &mut Sensor,
        detector: &mut dyn FingerDetector,
    ) -> Result<EnrollState> {
        let next = match self.state {
            EnrollState::WaitFinger(pass) => {
                sensor.wait_finger_and_capture(detector)?;
                EnrollState::Captured(pass)
            }
            EnrollState::Captured(pass) => {
                sensor.gen_char(pass.buffer())?;
                EnrollState::FeatureExtracted(pass)
            }
            EnrollState::FeatureExtracted(Pass::First) => EnrollState::WaitLift,
            EnrollState::FeatureExtracted(Pass::Second) => {
                let score = sensor.match_buffers()?;
                EnrollState::Matched { score }
            }
            EnrollState::WaitLift => {
                wait_lift(sensor, detector)?;
                EnrollState::WaitFinger(Pass::Second)
            }
            EnrollState::Matched { .. } => {
                sensor.reg_model()?;
                EnrollState::Merged
            }
            EnrollState::Merged => {
                sensor.store_char(BufferId::Two, self.page)?;
                EnrollState::Stored { page: self.page }
            }
            state @ EnrollState::Stored { .. } => state,
        };

        debug!("Enrollment: {} -> {}", self.state, next);
        self.state = next;

        Ok(next)
    }

    /// Drive the enrollment to completion, returning the stored page
    pub fn run(mut self, sensor: &mut Sensor, detector: &mut dyn FingerDetector) -> Result<u16> {
        while !self.is_done() {
            self.step(sensor, detector)?;
        }

        info!("Fingerprint enrolled at page {}", self.page);
        Ok(self.page)
    }
}

/// Wait for the detector to report no finger
fn wait_lift(sensor: &Sensor, detector: &mut dyn FingerDetector) -> Result<()> {
    let config = sensor.config();

    for attempt in 1..=config.lift_attempts {
        let deadline = Instant::now() + config.lift_timeout;

        loop {
            if !detector.finger_present()? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            thread::sleep(config.lift_poll_interval);
        }

        debug!("Finger still present after attempt {}", attempt);
    }

    Err(Error::FingerNotLifted)
}
