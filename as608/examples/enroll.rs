//! Enroll one finger, using the module's touch output on a GPIO line
//!
//! Usage: enroll <page> [gpio value file]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use as608::{EnrollState, Enrollment, FingerDetector, Sensor};

/// Touch output read through sysfs; "1" while a finger rests on the window
struct TouchPin {
    path: PathBuf,
}

impl FingerDetector for TouchPin {
    fn finger_present(&mut self) -> as608_transport::Result<bool> {
        match fs::read_to_string(&self.path)?.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(as608_transport::Error::Detector(format!(
                "unexpected level {:?} on {}",
                other,
                self.path.display()
            ))),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("usage: {} <page> [gpio value file]", args[0]);
    }
    let page: u16 = args[1].parse().context("page must be a number")?;
    let mut touch = TouchPin {
        path: args
            .get(2)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/sys/class/gpio/gpio17/value")),
    };

    let port = std::env::var("AS608_PORT").unwrap_or_else(|_| "/dev/ttyAMA0".to_string());
    let mut sensor = Sensor::open(port, 57600)?;
    let params = sensor.connect()?;
    if page >= params.capacity {
        bail!("page {} is outside the library (capacity {})", page, params.capacity);
    }

    let mut enrollment = Enrollment::new(page);
    while !enrollment.is_done() {
        match enrollment.state() {
            EnrollState::WaitFinger(pass) => println!("Place your finger ({:?} pass)...", pass),
            EnrollState::WaitLift => println!("Lift your finger"),
            _ => {}
        }
        enrollment.step(&mut sensor, &mut touch)?;
    }

    println!("✓ Enrolled at page {}", page);
    Ok(())
}
