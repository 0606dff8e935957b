//! Module information example

use tracing_subscriber::EnvFilter;
use as608::Sensor;

fn main() -> anyhow::Result<()> {
    // Initialize logging, e.g. RUST_LOG=as608=trace
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("AS608_PORT").unwrap_or_else(|_| "/dev/ttyAMA0".to_string());
    let baud: u32 = std::env::var("AS608_BAUD")
        .ok()
        .and_then(|b| b.parse().ok())
        .unwrap_or(57600);

    println!("Opening {} at {} baud...", port, baud);

    let mut sensor = Sensor::open(port, baud)?;
    sensor.connect()?;
    println!("✓ Connected");

    let (params, product) = sensor.get_all_info()?;
    println!("✓ Parameters: {}", params);
    println!("✓ Product: {}", product);

    let count = sensor.valid_template_count()?;
    let slots = sensor.index_table()?;
    println!("✓ {} templates stored, slots {:?}", count, slots);

    let notepad = sensor.read_notepad(0)?;
    println!("✓ Notepad page 0: {}", hex::encode(notepad));

    Ok(())
}
