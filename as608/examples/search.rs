//! Capture a finger and search the library

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use as608::{BufferId, ConfirmCode, Error, Sensor};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("AS608_PORT").unwrap_or_else(|_| "/dev/ttyAMA0".to_string());
    let mut sensor = Sensor::open(port, 57600)?;
    let params = sensor.connect()?;

    println!("Place your finger on the sensor...");

    // Without a touch output wired, poll the capture command itself
    loop {
        match sensor.capture_image() {
            Ok(()) => break,
            Err(Error::Device(ConfirmCode::NoFinger)) => {
                std::thread::sleep(Duration::from_millis(200));
            }
            Err(e) => return Err(e.into()),
        }
    }

    sensor.gen_char(BufferId::One)?;

    match sensor.high_speed_search(BufferId::One, 0, params.capacity) {
        Ok(found) => println!("✓ Found: {}", found),
        Err(e) => println!("✗ {} (0x{:02X}: {})", e, e.code(), e.description()),
    }

    Ok(())
}
