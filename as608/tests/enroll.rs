mod common;

use pretty_assertions::assert_eq;

use as608::{ConfirmCode, EnrollState, Enrollment, Error, FingerDetector, Pass};
use as608_transport::MockDetector;
use common::*;

#[test]
fn test_enrollment_stores_template() {
    let (mut sensor, mock) = sensor();

    mock.push(ok()); // GetImage
    mock.push(ok()); // GenChar 1
    mock.push(ok()); // GetImage
    mock.push(ok()); // GenChar 2
    mock.push(ack(0x00, &[0x00, 0x64])); // Match
    mock.push(ok()); // RegModel
    mock.push(ok()); // StoreChar

    let mut detector = MockDetector::new([true, false, true]);
    let page = Enrollment::new(7).run(&mut sensor, &mut detector).unwrap();

    assert_eq!(page, 7);

    let writes = mock.writes();
    assert_eq!(opcodes(&writes), vec![0x01, 0x02, 0x01, 0x02, 0x03, 0x05, 0x06]);
    assert_eq!(writes[1][10], 0x01);
    assert_eq!(writes[3][10], 0x02);
    assert_eq!(&writes[6][9..13], &[0x06, 0x02, 0x00, 0x07]);
}

#[test]
fn test_enrollment_steps() {
    let (mut sensor, mock) = sensor();
    mock.push(ok());
    mock.push(ok());

    let mut detector = MockDetector::always(true);
    let mut enrollment = Enrollment::new(1);

    assert_eq!(enrollment.state(), EnrollState::WaitFinger(Pass::First));
    assert_eq!(
        enrollment.step(&mut sensor, &mut detector).unwrap(),
        EnrollState::Captured(Pass::First)
    );
    assert_eq!(
        enrollment.step(&mut sensor, &mut detector).unwrap(),
        EnrollState::FeatureExtracted(Pass::First)
    );
    assert_eq!(
        enrollment.step(&mut sensor, &mut detector).unwrap(),
        EnrollState::WaitLift
    );
    assert!(!enrollment.is_done());
}

#[test]
fn test_mismatch_ends_attempt() {
    let (mut sensor, mock) = sensor();
    mock.push(ok());
    mock.push(ok());
    mock.push(ok());
    mock.push(ok());
    mock.push(ack(0x08, &[0x00, 0x00]));

    let mut detector = MockDetector::new([true, false, true]);
    let mut enrollment = Enrollment::new(2);

    let err = loop {
        if let Err(e) = enrollment.step(&mut sensor, &mut detector) {
            break e;
        }
    };

    assert!(matches!(err, Error::Device(ConfirmCode::Mismatch)));
    assert_eq!(enrollment.state(), EnrollState::FeatureExtracted(Pass::Second));
    assert_eq!(opcodes(&mock.writes()), vec![0x01, 0x02, 0x01, 0x02, 0x03]);
}

#[test]
fn test_finger_never_lifted() {
    let (mut sensor, mock) = sensor();
    mock.push(ok());
    mock.push(ok());

    let mut detector = MockDetector::always(true);
    let err = Enrollment::new(0).run(&mut sensor, &mut detector).unwrap_err();

    assert!(matches!(err, Error::FingerNotLifted));
    assert_eq!(err.code(), 0xCE);
    assert_eq!(opcodes(&mock.writes()), vec![0x01, 0x02]);
}

#[test]
fn test_no_finger_for_first_capture() {
    let (mut sensor, mock) = sensor();
    let mut detector = MockDetector::always(false);

    let err = Enrollment::new(0).run(&mut sensor, &mut detector).unwrap_err();

    assert!(matches!(err, Error::NoFinger));
    assert!(mock.written().is_empty());
}

struct UnwiredDetector;

impl FingerDetector for UnwiredDetector {
    fn finger_present(&mut self) -> as608_transport::Result<bool> {
        Err(as608_transport::Error::Detector("touch line not configured".into()))
    }
}

#[test]
fn test_detector_failure_ends_attempt() {
    let (mut sensor, mock) = sensor();

    let err = Enrollment::new(0).run(&mut sensor, &mut UnwiredDetector).unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(as608_transport::Error::Detector(_))
    ));
    assert_eq!(err.code(), 0xCD);
    assert!(mock.written().is_empty());
}
