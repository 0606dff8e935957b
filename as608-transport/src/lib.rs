//! Transport layer for the AS608 protocol
//!
//! The driver needs two capabilities from its environment: a byte stream
//! to the module and, for finger-presence polling, one digital input.
//! Both are blocking; nothing here spawns threads or waits on events.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod serial;

pub use error::{Error, Result};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockDetector, MockTransport};
pub use serial::SerialTransport;

/// Byte stream to the module
pub trait Transport: Send {
    /// Number of bytes that can be read without blocking
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read up to `buf.len()` bytes, returning how many were read
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write every byte of `data`
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Human-readable endpoint name for logs
    fn description(&self) -> String;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// Digital input wired to the module's touch output
pub trait FingerDetector: Send {
    /// `true` while a finger rests on the sensor
    fn finger_present(&mut self) -> Result<bool>;
}

impl<T: FingerDetector + ?Sized> FingerDetector for Box<T> {
    fn finger_present(&mut self) -> Result<bool> {
        (**self).finger_present()
    }
}
