use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tagpump_codec::decode_byte;
use tagpump_io::{Sink, Source};

use crate::pump::PumpStats;

/// State shared between the owner and the worker.
///
/// The running flag, the resume slot and the collaborators all live under
/// one mutex, and `signal` is only waited on with that mutex held. A stop
/// request therefore cannot slip in between the worker's flag check and
/// its suspension.
pub(crate) struct Shared<S, K> {
    control: Mutex<Control<S, K>>,
    pub(crate) signal: Condvar,
}

pub(crate) struct Control<S, K> {
    pub(crate) running: bool,
    /// Single-slot resume signal; repeated resumes coalesce.
    pub(crate) resume: bool,
    pub(crate) source: S,
    pub(crate) sink: K,
    pub(crate) stats: PumpStats,
}

impl<S, K> Shared<S, K> {
    pub(crate) fn new(source: S, sink: K) -> Self {
        Self {
            control: Mutex::new(Control {
                running: false,
                resume: false,
                source,
                sink,
                stats: PumpStats::default(),
            }),
            signal: Condvar::new(),
        }
    }

    /// Lock the control block. A panic inside a sink poisons the mutex;
    /// the flags stay meaningful, so the poison is ignored.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Control<S, K>> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn into_control(self) -> Control<S, K> {
        self.control
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks the pump stopped however the worker exits, unwinding included.
struct ExitGuard<'a, S, K>(&'a Shared<S, K>);

impl<S, K> Drop for ExitGuard<'_, S, K> {
    fn drop(&mut self) {
        self.0.lock().running = false;
    }
}

/// Worker body: read, decode, write, suspend; until stopped or exhausted.
///
/// The first byte of a run is always read, even when `stop` took the lock
/// before the worker did. The running flag gates every later byte.
pub(crate) fn run<S: Source, K: Sink>(shared: &Shared<S, K>) {
    let _exit = ExitGuard(shared);
    let mut control = shared.lock();
    tracing::debug!("worker started");

    loop {
        let Some(byte) = control.source.read_byte() else {
            tracing::debug!("source exhausted; worker stopping");
            control.running = false;
            break;
        };
        control.stats.bytes_read += 1;

        match decode_byte(byte) {
            Some(value) => {
                let text = value.to_string();
                tracing::debug!(byte, %text, "decoded");
                control.sink.write(&text);
                control.stats.fragments_written += 1;
            }
            None => {
                tracing::debug!(byte, "no output");
                control.stats.silent_bytes += 1;
            }
        }

        tracing::trace!("worker suspended");
        control = shared
            .signal
            .wait_while(control, |c| c.running && !c.resume)
            .unwrap_or_else(PoisonError::into_inner);
        control.resume = false;
        tracing::trace!(running = control.running, "worker woke");
        if !control.running {
            break;
        }
    }

    tracing::debug!("worker exited");
}
