mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;

use as608::{BufferId, ConfirmCode, Error, PacketSize, SearchResult, SensorConfig, SessionState};
use as608_transport::MockDetector;
use common::*;

#[test]
fn test_setup_reads_parameters() {
    let (mut sensor, mock) = sensor();
    mock.push(sys_params(2));

    let params = sensor.connect().unwrap();

    assert_eq!(params.capacity, 300);
    assert_eq!(params.packet_size, PacketSize::Bytes128);
    assert_eq!(params.baud_rate.bps(), 57600);
    assert_eq!(sensor.packet_size(), Some(PacketSize::Bytes128));
    assert_eq!(sensor.capacity(), 300);
    assert_eq!(sensor.session().state(), SessionState::Ready);
    assert_eq!(
        mock.written(),
        vec![0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x03, 0x0F, 0x00, 0x13]
    );
}

#[test]
fn test_setup_verifies_password_first() {
    let (mut sensor, mock) = sensor_with(fast_config().with_password(0x0000_1234));
    mock.push(ok());
    mock.push(sys_params(1));

    sensor.connect().unwrap();

    let writes = mock.writes();
    assert_eq!(opcodes(&writes), vec![0x13, 0x0F]);
    assert_eq!(&writes[0][10..14], &[0x00, 0x00, 0x12, 0x34]);
    assert!(sensor.session().has_password());
    assert_eq!(sensor.packet_size(), Some(PacketSize::Bytes64));
}

#[test]
fn test_setup_fails_on_wrong_password() {
    let (mut sensor, mock) = sensor_with(fast_config().with_password(7));
    mock.push(ack(0x13, &[]));

    let err = sensor.connect().unwrap_err();

    assert!(matches!(err, Error::SetupFailed(_)));
    assert_eq!(err.code(), 0xC7);
    assert_eq!(opcodes(&mock.writes()), vec![0x13]);
}

#[test]
fn test_setup_fails_on_silence() {
    let (mut sensor, _mock) = sensor();
    assert!(matches!(sensor.connect(), Err(Error::SetupFailed(_))));
    assert!(!sensor.session().is_ready());
}

#[test]
fn test_setup_fails_on_unknown_packet_size() {
    let (mut sensor, mock) = sensor();
    mock.push(sys_params(7));

    assert!(matches!(sensor.connect(), Err(Error::SetupFailed(_))));
    assert_eq!(sensor.packet_size(), None);
}

#[test]
fn test_search_frame_and_result() {
    let (mut sensor, mock) = sensor();
    mock.push(ack(0x00, &[0x00, 0x05, 0x00, 0x64]));

    let found = sensor.search(BufferId::One, 0x0000, 0x012C).unwrap();

    assert_eq!(found, SearchResult::new(5, 100));

    let frame = mock.written();
    let sum: u16 = [0x01u16, 0x00, 0x08, 0x04, 0x01, 0x00, 0x00, 0x01, 0x2C].iter().sum();
    assert_eq!(&frame[7..9], &[0x00, 0x08]);
    assert_eq!(&frame[9..15], &[0x04, 0x01, 0x00, 0x00, 0x01, 0x2C]);
    assert_eq!(&frame[15..17], &sum.to_be_bytes());
}

#[test]
fn test_search_not_found_passes_device_code() {
    let (mut sensor, mock) = sensor();
    mock.push(ack(0x09, &[0, 0, 0, 0]));

    let err = sensor.high_speed_search(BufferId::Two, 0, 300).unwrap_err();

    assert!(matches!(err, Error::Device(ConfirmCode::NotFound)));
    assert_eq!(err.code(), 0x09);
    assert_eq!(err.description(), "Not found in fingerprint library");
}

#[test]
fn test_reply_in_two_bursts() {
    let (mut sensor, mock) = sensor();
    let reply = ok();
    mock.push(&reply[..3]);
    mock.push_delayed(&reply[3..], Duration::from_millis(20));

    sensor.empty().unwrap();
}

#[test]
fn test_reply_deadline_is_absolute() {
    let (mut sensor, mock) = sensor_with(
        fast_config().with_reply_timeout(Duration::from_millis(60)),
    );
    let reply = ok();
    mock.push(&reply[..4]);
    mock.push_delayed(&reply[4..8], Duration::from_millis(40));
    mock.push_delayed(&reply[8..], Duration::from_millis(40));

    let err = sensor.reg_model().unwrap_err();

    assert!(matches!(err, Error::Timeout { expected: 12, received: 8 }));
    assert_eq!(err.code(), 0xC3);
    assert!(err.requires_flush());
}

#[test]
fn test_counts_and_codes() {
    let (mut sensor, mock) = sensor();
    mock.push(ack(0x00, &[0x00, 0x2A]));
    mock.push(ack(0x00, &[0xDE, 0xAD, 0xBE, 0xEF]));
    mock.push(ack(0x00, &[0x00, 0x50]));
    mock.push(ack(0x00, &[0x00, 0x11]));

    assert_eq!(sensor.valid_template_count().unwrap(), 42);
    assert_eq!(sensor.random_code().unwrap(), 0xDEAD_BEEF);
    assert_eq!(sensor.match_buffers().unwrap(), 0x50);
    assert_eq!(sensor.enroll().unwrap(), 0x11);

    assert_eq!(opcodes(&mock.writes()), vec![0x1D, 0x14, 0x03, 0x10]);
}

#[test]
fn test_identify() {
    let (mut sensor, mock) = sensor();
    mock.push(ack(0x00, &[0x00, 0x03, 0x01, 0x00]));

    assert_eq!(sensor.identify().unwrap(), SearchResult::new(3, 256));
}

#[test]
fn test_library_commands() {
    let (mut sensor, mock) = sensor();
    for _ in 0..3 {
        mock.push(ok());
    }

    sensor.store_char(BufferId::Two, 0x0102).unwrap();
    sensor.load_char(BufferId::One, 7).unwrap();
    sensor.delete_char(10, 5).unwrap();

    let writes = mock.writes();
    assert_eq!(&writes[0][9..13], &[0x06, 0x02, 0x01, 0x02]);
    assert_eq!(&writes[1][9..13], &[0x07, 0x01, 0x00, 0x07]);
    assert_eq!(&writes[2][9..14], &[0x0C, 0x00, 0x0A, 0x00, 0x05]);
}

#[test]
fn test_index_table() {
    let (mut sensor, mock) = sensor();

    let mut page0 = [0u8; 32];
    page0[0] = 0b0000_0101;
    page0[1] = 0b1000_0000;
    let mut page1 = [0u8; 32];
    page1[31] = 0b1000_0000;

    mock.push(ack(0x00, &page0));
    mock.push(ack(0x00, &page1));

    assert_eq!(sensor.index_table().unwrap(), vec![0, 2, 15, 511]);

    let writes = mock.writes();
    assert_eq!(&writes[0][9..11], &[0x1F, 0x00]);
    assert_eq!(&writes[1][9..11], &[0x1F, 0x01]);
}

#[test]
fn test_index_table_buffer_too_small() {
    let (mut sensor, mock) = sensor();
    mock.push(ack(0x00, &[0xFF; 32]));
    mock.push(ack(0x00, &[0x00; 32]));

    let mut out = [0u16; 4];
    let err = sensor.read_index_table(&mut out).unwrap_err();

    assert!(matches!(err, Error::BufferTooSmall { needed: 256, capacity: 4 }));
    assert_eq!(err.code(), 0xC1);
}

#[test]
fn test_read_index_table_fills_output() {
    let (mut sensor, mock) = sensor();
    mock.push(ack(0x00, &[0x03; 32]));
    mock.push(ack(0x00, &[0x00; 32]));

    let mut out = [u16::MAX; 100];
    let n = sensor.read_index_table(&mut out).unwrap();

    assert_eq!(n, 64);
    assert_eq!(&out[..4], &[0, 1, 8, 9]);
    assert_eq!(out[64], u16::MAX);
}

#[test]
fn test_notepad() {
    let (mut sensor, mock) = sensor();
    mock.push(ok());

    sensor.write_notepad(3, b"hello").unwrap();

    let frame = &mock.writes()[0];
    assert_eq!(frame.len(), 12 + 33);
    assert_eq!(&frame[7..9], &[0x00, 36]);
    assert_eq!(&frame[9..16], &[0x18, 0x03, b'h', b'e', b'l', b'l', b'o']);
    assert!(frame[16..43].iter().all(|&b| b == 0));

    let mut content = [0u8; 32];
    content[..5].copy_from_slice(b"world");
    mock.push(ack(0x00, &content));

    assert_eq!(sensor.read_notepad(3).unwrap(), content);
}

#[test]
fn test_notepad_page_out_of_range() {
    let (mut sensor, mock) = sensor();

    assert!(sensor.read_notepad(16).is_err());
    assert!(sensor.write_notepad(16, b"x").is_err());
    assert!(mock.written().is_empty());
}

#[test]
fn test_register_writes_update_session() {
    let (mut sensor, mock) = ready_sensor(2);
    for _ in 0..4 {
        mock.push(ok());
    }

    sensor.set_packet_size(64).unwrap();
    sensor.set_baud_rate(115_200).unwrap();
    sensor.set_security_level(5).unwrap();
    sensor.write_reg(6, 3).unwrap();

    let writes = mock.writes();
    assert_eq!(&writes[0][9..12], &[0x0E, 6, 1]);
    assert_eq!(&writes[1][9..12], &[0x0E, 4, 12]);
    assert_eq!(&writes[2][9..12], &[0x0E, 5, 5]);
    assert_eq!(&writes[3][9..12], &[0x0E, 6, 3]);

    let session = sensor.session();
    assert_eq!(session.packet_size(), Some(PacketSize::Bytes256));
    assert_eq!(session.baud_rate().map(|b| b.bps()), Some(115_200));
    assert_eq!(session.security_level().map(|l| l.value()), Some(5));
}

#[test]
fn test_rejected_register_write_keeps_session() {
    let (mut sensor, mock) = ready_sensor(2);
    mock.push(ack(0x1A, &[]));

    let err = sensor.set_packet_size(32).unwrap_err();

    assert!(matches!(err, Error::Device(ConfirmCode::InvalidRegister)));
    assert_eq!(sensor.packet_size(), Some(PacketSize::Bytes128));
}

#[test]
fn test_password_and_address() {
    let (mut sensor, mock) = sensor();
    mock.push(ok());
    mock.push(ok());
    mock.push(ok());

    sensor.set_password(0xCAFE).unwrap();
    sensor.set_address(0x0102_0304).unwrap();
    sensor.capture_image().unwrap();

    let writes = mock.writes();
    assert_eq!(&writes[0][9..14], &[0x12, 0x00, 0x00, 0xCA, 0xFE]);
    assert_eq!(&writes[1][9..14], &[0x15, 0x01, 0x02, 0x03, 0x04]);
    // Frames after the change carry the new address
    assert_eq!(&writes[2][2..6], &[0x01, 0x02, 0x03, 0x04]);

    assert_eq!(sensor.session().password(), Some(0xCAFE));
    assert_eq!(sensor.address(), 0x0102_0304);
}

#[test]
fn test_reconnect_uses_new_address() {
    let (mut sensor, mock) = ready_sensor(2);
    mock.push(ok());
    sensor.set_address(0x1122_3344).unwrap();

    mock.clear_writes();
    mock.push(sys_params(2));
    sensor.connect().unwrap();

    let writes = mock.writes();
    assert_eq!(opcodes(&writes), vec![0x0F]);
    assert_eq!(&writes[0][2..6], &[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(sensor.config().address, 0x1122_3344);
}

#[test]
fn test_reconnect_verifies_new_password() {
    let (mut sensor, mock) = ready_sensor(2);
    mock.push(ok());
    sensor.set_password(0xDEAD_BEEF).unwrap();

    mock.clear_writes();
    mock.push(ok());
    mock.push(sys_params(2));
    sensor.connect().unwrap();

    let writes = mock.writes();
    assert_eq!(opcodes(&writes), vec![0x13, 0x0F]);
    assert_eq!(&writes[0][10..14], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert!(sensor.session().has_password());
}

#[test]
fn test_rejected_address_change_keeps_config() {
    let (mut sensor, mock) = ready_sensor(2);
    mock.push(ack(0x01, &[]));

    assert!(sensor.set_address(0x1122_3344).is_err());
    assert_eq!(sensor.config().address, ADDRESS);
    assert_eq!(sensor.address(), ADDRESS);
}

#[test]
fn test_wait_finger_times_out() {
    let (mut sensor, mock) = sensor();
    let mut detector = MockDetector::always(false);

    let err = sensor.wait_finger_and_capture(&mut detector).unwrap_err();

    assert!(matches!(err, Error::NoFinger));
    assert_eq!(err.code(), 0x02);
    assert!(detector.polls() > 1);
    assert!(mock.written().is_empty());
}

#[test]
fn test_wait_finger_then_capture() {
    let (mut sensor, mock) = sensor();
    mock.push(ok());
    let mut detector = MockDetector::new([false, false, true]);

    sensor.wait_finger_and_capture(&mut detector).unwrap();

    assert_eq!(detector.polls(), 3);
    assert_eq!(opcodes(&mock.writes()), vec![0x01]);
}

#[test]
fn test_flush_discards_stale_bytes() {
    let (mut sensor, mock) = sensor();
    let mut corrupt = ack(0x00, &[0x00, 0x01]);
    corrupt[13] ^= 0xFF;

    mock.push([0x12, 0x34, 0x56]);
    mock.push_delayed(corrupt, Duration::from_millis(2));
    mock.push_delayed(ack(0x00, &[0x00, 0x01]), Duration::from_millis(2));

    sensor.flush().unwrap();

    assert_eq!(opcodes(&mock.writes()), vec![0x1D, 0x1D]);
}

#[test]
fn test_flush_gives_up() {
    let config = fast_config()
        .with_reply_timeout(Duration::from_millis(10))
        .with_flush(2, Duration::from_millis(1));
    let (mut sensor, mock) = sensor_with(config);

    let err = sensor.flush().unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
    assert_eq!(mock.writes().len(), 2);
}

#[test]
fn test_sensor_config_address_used() {
    let (mut sensor, mock) = sensor_with(SensorConfig::default().with_address(0x0A0B_0C0D));
    mock.push(ok());

    sensor.reg_model().unwrap();

    assert_eq!(&mock.written()[2..6], &[0x0A, 0x0B, 0x0C, 0x0D]);
}
