// Minimal host: reads one JSON booking per line from stdin, processes each and
// prints the stored bookings as JSON once input ends.

use anyhow::{Context, Result};
use hotel_booking::{init_tracing, BookingPlugin, BookingRequest};
use std::io::{self, BufRead};
use tracing::{info, warn};

fn main() -> Result<()> {
    init_tracing();

    let plugin = BookingPlugin::from_env().context("load booking config")?;
    let processor = plugin.processor();

    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line.context("read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match BookingRequest::from_json(&line) {
            Ok(booking) => {
                let accepted = processor.process(booking);
                info!(line = index + 1, accepted, "processed booking");
            }
            Err(e) => warn!(line = index + 1, error = %e, "skipping malformed booking"),
        }
    }

    let bookings = processor.get_bookings();
    println!(
        "{}",
        serde_json::to_string_pretty(&bookings).context("serialize bookings")?
    );
    info!(count = bookings.len(), "done");

    Ok(())
}
