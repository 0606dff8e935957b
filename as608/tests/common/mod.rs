//! Scripted module replies shared by the integration tests

#![allow(dead_code)]

use std::time::Duration;

use as608::{Sensor, SensorConfig};
use as608_transport::MockTransport;
use as608_core::{Packet, PacketKind};

pub const ADDRESS: u32 = 0xFFFF_FFFF;

/// Timing short enough for tests that exercise timeouts
pub fn fast_config() -> SensorConfig {
    SensorConfig::default()
        .with_reply_timeout(Duration::from_millis(100))
        .with_bulk_idle_timeout(Duration::from_millis(100))
        .with_poll_interval(Duration::from_micros(10))
        .with_finger_timeout(Duration::from_millis(20))
        .with_finger_poll_interval(Duration::from_micros(100))
        .with_lift_timeout(Duration::from_millis(5), 3)
        .with_flush(3, Duration::from_millis(1))
}

pub fn sensor() -> (Sensor, MockTransport) {
    sensor_with(fast_config())
}

pub fn sensor_with(config: SensorConfig) -> (Sensor, MockTransport) {
    let mock = MockTransport::new();
    (Sensor::with_config(mock.clone(), config), mock)
}

/// Sensor that has already read its parameters with the given packet size code
pub fn ready_sensor(packet_code: u16) -> (Sensor, MockTransport) {
    let (mut sensor, mock) = sensor();
    mock.push(sys_params(packet_code));
    sensor.connect().expect("setup");
    mock.clear_writes();
    (sensor, mock)
}

/// Acknowledgement with a confirmation code and trailing fields
pub fn ack(confirm: u8, fields: &[u8]) -> Vec<u8> {
    let mut payload = vec![confirm];
    payload.extend_from_slice(fields);
    frame(PacketKind::Ack, payload)
}

pub fn ok() -> Vec<u8> {
    ack(0x00, &[])
}

pub fn data(kind: PacketKind, payload: &[u8]) -> Vec<u8> {
    frame(kind, payload.to_vec())
}

/// Split `payload` into data packets, the last tagged `DataEnd`
pub fn data_stream(payload: &[u8], chunk: usize) -> Vec<Vec<u8>> {
    let count = payload.len() / chunk;
    payload
        .chunks(chunk)
        .enumerate()
        .map(|(i, c)| {
            let kind = if i + 1 == count {
                PacketKind::DataEnd
            } else {
                PacketKind::DataMore
            };
            data(kind, c)
        })
        .collect()
}

/// `ReadSysPara` reply: capacity 300, level 3, broadcast address, 57600 baud
pub fn sys_params(packet_code: u16) -> Vec<u8> {
    let mut fields = Vec::new();
    fields.extend_from_slice(&0u16.to_be_bytes());
    fields.extend_from_slice(&9u16.to_be_bytes());
    fields.extend_from_slice(&300u16.to_be_bytes());
    fields.extend_from_slice(&3u16.to_be_bytes());
    fields.extend_from_slice(&ADDRESS.to_be_bytes());
    fields.extend_from_slice(&packet_code.to_be_bytes());
    fields.extend_from_slice(&6u16.to_be_bytes());
    ack(0x00, &fields)
}

fn frame(kind: PacketKind, payload: Vec<u8>) -> Vec<u8> {
    Packet::new(kind, ADDRESS, payload)
        .expect("payload fits")
        .encode()
        .to_vec()
}

/// Opcodes of every command frame written, in order
pub fn opcodes(writes: &[Vec<u8>]) -> Vec<u8> {
    writes
        .iter()
        .filter(|w| w.len() > 9 && w[6] == 0x01)
        .map(|w| w[9])
        .collect()
}
