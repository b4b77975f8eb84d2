//! Pump a fixed byte sequence to stdout, one byte per tick.
//!
//! Run with:
//!   cargo run --example ticked-pump

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use tagpump::io::{BufSource, WriteSink};
use tagpump::pump::Pump;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 0, -1, c, <nothing>, z
    let input = Bytes::from_static(&[0x00, 0x7F, 0x82, 0xC0, 0x99]);
    let mut pump = Pump::new(BufSource::new(input), WriteSink::new(std::io::stdout()));

    pump.start()?;
    while pump.is_running() {
        thread::sleep(Duration::from_millis(100));
        pump.resume();
    }

    let stats = pump.stats();
    eprintln!(
        "read {} bytes, wrote {} fragments ({} silent)",
        stats.bytes_read, stats.fragments_written, stats.silent_bytes
    );
    Ok(())
}
