//! Per-connection session state
//!
//! A session holds everything negotiated with one module:
//! - Address and handshake password
//! - Packet size and baud rate used for bulk transfers
//! - Library capacity, security level, status and model
//! - Product identification strings
//!
//! The session is owned by whoever drives the connection and is mutated
//! only by operations that change or read back module configuration.

use as608_types::{BaudRate, PacketSize, ProductInfo, SecurityLevel, SystemParameters};

use crate::constants::DEFAULT_ADDRESS;

/// Handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Defaults only, nothing confirmed by the module
    Unconfigured,

    /// Password accepted, parameters not read yet
    Verified,

    /// System parameters read; bulk transfers can be sized
    Ready,
}

/// Session state for one module connection
#[derive(Debug, Clone)]
pub struct Session {
    address: u32,
    password: Option<u32>,
    packet_size: Option<PacketSize>,
    baud_rate: Option<BaudRate>,
    security_level: Option<SecurityLevel>,
    capacity: u16,
    status: u16,
    model: u16,
    product: ProductInfo,
    state: SessionState,
}

impl Session {
    /// Create a session addressed to the broadcast address with no password
    pub fn new() -> Self {
        Self::with_credentials(DEFAULT_ADDRESS, None)
    }

    pub fn with_credentials(address: u32, password: Option<u32>) -> Self {
        Self {
            address,
            password,
            packet_size: None,
            baud_rate: None,
            security_level: None,
            capacity: 0,
            status: 0,
            model: 0,
            product: ProductInfo::default(),
            state: SessionState::Unconfigured,
        }
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn set_address(&mut self, address: u32) {
        self.address = address;
    }

    /// Handshake password, `None` when the module has none set
    pub fn password(&self) -> Option<u32> {
        self.password
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn set_password(&mut self, password: u32) {
        self.password = Some(password);
    }

    /// Negotiated bulk chunk size, `None` until read from the module
    pub fn packet_size(&self) -> Option<PacketSize> {
        self.packet_size
    }

    pub fn set_packet_size(&mut self, size: PacketSize) {
        self.packet_size = Some(size);
    }

    pub fn baud_rate(&self) -> Option<BaudRate> {
        self.baud_rate
    }

    pub fn set_baud_rate(&mut self, baud: BaudRate) {
        self.baud_rate = Some(baud);
    }

    pub fn security_level(&self) -> Option<SecurityLevel> {
        self.security_level
    }

    pub fn set_security_level(&mut self, level: SecurityLevel) {
        self.security_level = Some(level);
    }

    /// Library capacity (number of template slots)
    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn model(&self) -> u16 {
        self.model
    }

    pub fn product_info(&self) -> &ProductInfo {
        &self.product
    }

    pub fn set_product_info(&mut self, info: ProductInfo) {
        self.product = info;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Record a successful password verification
    pub fn mark_verified(&mut self) {
        if self.state == SessionState::Unconfigured {
            self.state = SessionState::Verified;
        }
    }

    /// Adopt the parameters read back from the module
    pub fn apply_system_parameters(&mut self, params: &SystemParameters) {
        self.status = params.status;
        self.model = params.model;
        self.capacity = params.capacity;
        self.security_level = Some(params.security_level);
        self.address = params.address;
        self.packet_size = Some(params.packet_size);
        self.baud_rate = Some(params.baud_rate);
        self.state = SessionState::Ready;
    }

    /// Snapshot of the cached parameters, once they have been read
    pub fn system_parameters(&self) -> Option<SystemParameters> {
        Some(SystemParameters {
            status: self.status,
            model: self.model,
            capacity: self.capacity,
            security_level: self.security_level?,
            address: self.address,
            packet_size: self.packet_size?,
            baud_rate: self.baud_rate?,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> SystemParameters {
        SystemParameters {
            status: 0,
            model: 9,
            capacity: 300,
            security_level: SecurityLevel::new(3).unwrap(),
            address: 0x1234_5678,
            packet_size: PacketSize::Bytes128,
            baud_rate: BaudRate::from_multiplier(6).unwrap(),
        }
    }

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.address(), 0xFFFF_FFFF);
        assert!(!session.has_password());
        assert_eq!(session.packet_size(), None);
        assert_eq!(session.state(), SessionState::Unconfigured);
        assert!(session.system_parameters().is_none());
    }

    #[test]
    fn test_apply_system_parameters() {
        let mut session = Session::new();
        session.apply_system_parameters(&params());

        assert_eq!(session.address(), 0x1234_5678);
        assert_eq!(session.capacity(), 300);
        assert_eq!(session.packet_size(), Some(PacketSize::Bytes128));
        assert_eq!(session.model(), 9);
        assert!(session.is_ready());
        assert_eq!(session.system_parameters(), Some(params()));
    }

    #[test]
    fn test_password_zero_is_still_a_password() {
        let mut session = Session::new();
        session.set_password(0);

        assert!(session.has_password());
        assert_eq!(session.password(), Some(0));
    }

    #[test]
    fn test_mark_verified_does_not_downgrade() {
        let mut session = Session::new();
        session.mark_verified();
        assert_eq!(session.state(), SessionState::Verified);

        session.apply_system_parameters(&params());
        session.mark_verified();
        assert_eq!(session.state(), SessionState::Ready);
    }
}
