//! Template export / import example
//!
//! Usage: templates <export|import> <page> <file>

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use as608::{BufferId, Sensor};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        bail!("usage: {} <export|import> <page> <file>", args[0]);
    }
    let page: u16 = args[2].parse().context("page must be a number")?;
    let file = &args[3];

    let port = std::env::var("AS608_PORT").unwrap_or_else(|_| "/dev/ttyAMA0".to_string());
    let mut sensor = Sensor::open(port, 57600)?;
    sensor.connect()?;

    sensor.set_progress(|p| eprint!("\r{}", p));

    match args[1].as_str() {
        "export" => {
            sensor.load_char(BufferId::One, page)?;
            if let Err(e) = sensor.upload_template_to_file(BufferId::One, file) {
                if e.requires_flush() {
                    sensor.flush()?;
                }
                return Err(e.into());
            }
            eprintln!();
            println!("✓ Page {} exported to {}", page, file);
        }
        "import" => {
            sensor.download_template_from_file(BufferId::One, file)?;
            sensor.store_char(BufferId::One, page)?;
            eprintln!();
            println!("✓ {} stored at page {}", file, page);
        }
        other => bail!("unknown action {}", other),
    }

    Ok(())
}
