//! # as608
//!
//! Host-side driver for AS608-family capacitive fingerprint modules.
//!
//! ## Features
//!
//! - Typed command encoding with checksummed frames
//! - Bounded-time replies and chunked bulk transfers
//! - The full module command set (capture, match, search, library,
//!   notepad, registers, password, index table)
//! - Two-pass enrollment state machine
//! - Blocking API over any byte stream; serial port support built in
//!
//! ## Quick Start
//!
//! ```no_run
//! use as608::{BufferId, Sensor};
//!
//! fn main() -> as608::Result<()> {
//!     // Open the serial link
//!     let mut sensor = Sensor::open("/dev/ttyAMA0", 57600)?;
//!
//!     // Read packet size, capacity and address
//!     let params = sensor.connect()?;
//!     println!("{}", params);
//!
//!     // Capture and look the finger up
//!     sensor.capture_image()?;
//!     sensor.gen_char(BufferId::One)?;
//!     let found = sensor.search(BufferId::One, 0, params.capacity)?;
//!     println!("{}", found);
//!
//!     Ok(())
//! }
//! ```

pub mod bulk;
pub mod config;
pub mod enroll;
pub mod error;
pub mod reply;
pub mod sensor;

// Re-exports
pub use bulk::{BulkTransfer, Progress};
pub use config::SensorConfig;
pub use enroll::{EnrollState, Enrollment, Pass};
pub use error::{Error, Result};
pub use reply::{Reply, ReplyReceiver};
pub use sensor::Sensor;

// Re-export types
pub use as608_core::{ConfirmCode, Instruction, LocalCode, Session, SessionState};
pub use as608_transport::{FingerDetector, SerialTransport, Transport};
#[cfg(feature = "mock")]
pub use as608_transport::{MockDetector, MockTransport};
pub use as608_types::{
    BaudRate, BufferId, PacketSize, ProductInfo, Register, SearchResult, SecurityLevel,
    SystemParameters,
};
