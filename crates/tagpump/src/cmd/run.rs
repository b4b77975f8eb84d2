use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tagpump_io::ChannelSink;
use tagpump_pump::{Pump, PumpConfig};

use crate::cmd::RunArgs;
use crate::exit::{pump_error, CliError, CliResult, SUCCESS, USAGE};
use crate::input::open_source;
use crate::output::{print_fragment, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let source = open_source(&args.input)?;

    let (tx, rx) = mpsc::channel();
    let mut pump = Pump::with_config(
        source,
        ChannelSink::new(tx),
        PumpConfig::default().with_thread_name("tagpump-run"),
    );

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    pump.start().map_err(|err| pump_error("start failed", err))?;

    let mut printed = 0usize;
    let limit_reached = |printed: usize| args.count.is_some_and(|count| printed as u64 >= count);

    while running.load(Ordering::SeqCst) && !limit_reached(printed) {
        // Sampled before draining so a worker that has just exited has
        // already written its last fragment.
        let exhausted = !pump.is_running();
        for text in rx.try_iter() {
            if limit_reached(printed) {
                break;
            }
            print_fragment(printed, &text, format);
            printed = printed.saturating_add(1);
        }
        if exhausted {
            break;
        }

        thread::sleep(interval);
        pump.resume();
    }

    pump.stop();
    let stats = pump.stats();
    tracing::info!(
        bytes_read = stats.bytes_read,
        fragments = stats.fragments_written,
        silent = stats.silent_bytes,
        "pump finished"
    );

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
