//! Type definitions for as608

pub mod device_info;
pub mod error;
pub mod params;
pub mod search;

pub use device_info::ProductInfo;
pub use error::{Error, Result};
pub use params::{BaudRate, BufferId, PacketSize, Register, SecurityLevel, SystemParameters};
pub use search::SearchResult;
