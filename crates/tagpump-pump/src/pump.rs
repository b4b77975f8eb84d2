use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tagpump_io::{Sink, Source};

use crate::config::PumpConfig;
use crate::error::{PumpError, Result};
use crate::worker::{self, Shared};

/// Lifecycle state of a pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("stopped"),
            Self::Running => f.write_str("running"),
        }
    }
}

/// Counters accumulated across every run of a pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Bytes consumed from the source.
    pub bytes_read: u64,
    /// Text fragments handed to the sink.
    pub fragments_written: u64,
    /// Bytes that decoded to nothing (reserved tag, letter past `'z'`).
    pub silent_bytes: u64,
    /// Number of times a worker was launched.
    pub runs: u64,
}

/// Reads bytes from a source on a background worker, decodes them and
/// writes the text to a sink, one byte per tick.
///
/// The first byte is processed as soon as the pump starts, even if `stop`
/// follows immediately; each later byte waits for [`resume`](Pump::resume). The worker ends when the source is
/// exhausted or [`stop`](Pump::stop) is called. Dropping the pump stops it.
///
/// A source read that never returns blocks the worker while it holds the
/// control lock, which in turn delays `stop`, `resume` and `stats`.
pub struct Pump<S, K> {
    shared: Arc<Shared<S, K>>,
    worker: Option<JoinHandle<()>>,
    config: PumpConfig,
}

impl<S, K> Pump<S, K> {
    /// Create a stopped pump with default configuration.
    pub fn new(source: S, sink: K) -> Self {
        Self::with_config(source, sink, PumpConfig::default())
    }

    /// Create a stopped pump with explicit configuration.
    pub fn with_config(source: S, sink: K, config: PumpConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(source, sink)),
            worker: None,
            config,
        }
    }

    /// Current lifecycle state.
    ///
    /// Turns `Stopped` on its own once the source is exhausted.
    pub fn state(&self) -> PumpState {
        if self.is_running() {
            PumpState::Running
        } else {
            PumpState::Stopped
        }
    }

    /// Returns true while a worker is active.
    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    /// Snapshot of the pump counters.
    pub fn stats(&self) -> PumpStats {
        self.shared.lock().stats
    }

    /// Pump configuration.
    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Let a suspended worker process the next byte.
    ///
    /// Resumes are not queued: several calls before the worker consumes
    /// one have the effect of a single call. No-op while stopped.
    pub fn resume(&self) {
        let mut control = self.shared.lock();
        if !control.running {
            return;
        }
        control.resume = true;
        self.shared.signal.notify_one();
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// No-op if the pump is already stopped. When this returns, the worker
    /// no longer touches the source or sink.
    pub fn stop(&mut self) {
        {
            let mut control = self.shared.lock();
            if !control.running && self.worker.is_none() {
                return;
            }
            control.running = false;
            self.shared.signal.notify_all();
        }
        tracing::debug!("pump stopping");
        self.reap();
    }

    /// Stop the pump and hand back its source and sink.
    pub fn into_parts(mut self) -> Result<(S, K)> {
        self.stop();
        let shared = Arc::clone(&self.shared);
        drop(self);

        let shared = Arc::try_unwrap(shared).map_err(|_| PumpError::Busy)?;
        let control = shared.into_control();
        Ok((control.source, control.sink))
    }

    /// Join a worker that has been told to stop or has exited on its own.
    fn reap(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("pump worker panicked");
            }
        }
    }
}

impl<S: Source + 'static, K: Sink + 'static> Pump<S, K> {
    /// Launch the worker.
    ///
    /// No-op if already running. A worker that ended through exhaustion is
    /// joined first; the new run continues from the source's current
    /// position.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            tracing::debug!("pump already running");
            return Ok(());
        }
        self.reap();

        {
            let mut control = self.shared.lock();
            control.running = true;
            control.resume = false;
            control.stats.runs += 1;
        }

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || worker::run(&shared));

        match spawned {
            Ok(handle) => {
                tracing::debug!(thread = %self.config.thread_name, "pump started");
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                let mut control = self.shared.lock();
                control.running = false;
                control.stats.runs -= 1;
                Err(PumpError::Spawn(err))
            }
        }
    }
}

impl<S, K> Drop for Pump<S, K> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S, K> fmt::Debug for Pump<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pump")
            .field("state", &self.state())
            .field("thread_name", &self.config.thread_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use bytes::Bytes;
    use tagpump_io::{BufSource, ChannelSink};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);
    const QUIET: Duration = Duration::from_millis(100);

    fn channel_pump(
        bytes: &'static [u8],
    ) -> (Pump<BufSource<Bytes>, ChannelSink>, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        let pump = Pump::new(
            BufSource::new(Bytes::from_static(bytes)),
            ChannelSink::new(tx),
        );
        (pump, rx)
    }

    fn wait_until(mut cond: impl FnMut() -> bool) {
        let start = Instant::now();
        while !cond() {
            assert!(start.elapsed() < TIMEOUT, "condition not reached in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn new_pump_is_stopped() {
        let (pump, _rx) = channel_pump(&[0x00]);
        assert_eq!(pump.state(), PumpState::Stopped);
        assert_eq!(pump.stats(), PumpStats::default());
    }

    #[test]
    fn first_byte_is_processed_on_start_then_waits_for_resume() {
        let (mut pump, rx) = channel_pump(&[0x00, 0x7F]);
        pump.start().unwrap();

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "0");
        assert!(rx.recv_timeout(QUIET).is_err());
        assert!(pump.is_running());

        pump.resume();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "-1");
        pump.stop();
    }

    #[test]
    fn reference_sequence_end_to_end() {
        let (mut pump, rx) = channel_pump(&[0x00, 0x7F, 0x82, 0xC0]);
        pump.start().unwrap();

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "0");
        pump.resume();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "-1");
        pump.resume();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "c");
        pump.resume();
        wait_until(|| pump.stats().bytes_read == 4);
        pump.resume();
        wait_until(|| !pump.is_running());

        assert!(rx.try_recv().is_err());
        let stats = pump.stats();
        assert_eq!(stats.bytes_read, 4);
        assert_eq!(stats.fragments_written, 3);
        assert_eq!(stats.silent_bytes, 1);
        assert_eq!(pump.state(), PumpState::Stopped);
    }

    #[test]
    fn bytes_are_written_in_order() {
        let bytes: Vec<u8> = (0..64).collect();
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        let (mut pump, rx) = channel_pump(bytes);
        pump.start().unwrap();

        let mut out = Vec::new();
        for _ in 0..64 {
            out.push(rx.recv_timeout(TIMEOUT).unwrap());
            pump.resume();
        }
        let expected: Vec<String> = (0..64).map(|n: u8| n.to_string()).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn double_start_launches_one_worker() {
        let (mut pump, rx) = channel_pump(&[0x01, 0x02]);
        pump.start().unwrap();
        pump.start().unwrap();

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "1");
        assert!(rx.recv_timeout(QUIET).is_err());
        assert_eq!(pump.stats().runs, 1);
        assert_eq!(pump.stats().bytes_read, 1);

        pump.resume();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "2");
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn stop_wakes_suspended_worker_and_joins() {
        let (mut pump, rx) = channel_pump(&[0x05, 0x06]);
        pump.start().unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "5");

        pump.stop();
        assert_eq!(pump.state(), PumpState::Stopped);
        assert!(pump.worker.is_none());
        assert_eq!(pump.stats().bytes_read, 1);
    }

    #[test]
    fn stop_twice_is_noop() {
        let (mut pump, _rx) = channel_pump(&[0x05]);
        pump.stop();
        pump.start().unwrap();
        pump.stop();
        pump.stop();
        assert_eq!(pump.state(), PumpState::Stopped);
    }

    #[test]
    fn resume_while_stopped_is_ignored() {
        let (mut pump, rx) = channel_pump(&[0x01, 0x02]);
        pump.resume();
        pump.start().unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "1");
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn restart_continues_from_source_position() {
        let (mut pump, rx) = channel_pump(&[0x00, 0x7F, 0x82]);
        pump.start().unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "0");
        pump.stop();

        pump.start().unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "-1");
        assert_eq!(pump.stats().runs, 2);
    }

    #[test]
    fn exhaustion_stops_worker_and_restart_finds_nothing() {
        let (mut pump, rx) = channel_pump(&[0x03]);
        pump.start().unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "3");
        pump.resume();
        wait_until(|| !pump.is_running());

        pump.start().unwrap();
        wait_until(|| !pump.is_running());
        assert!(rx.try_recv().is_err());
        assert_eq!(pump.stats().bytes_read, 1);
        assert_eq!(pump.stats().runs, 2);
    }

    #[test]
    fn empty_source_ends_immediately() {
        let (mut pump, rx) = channel_pump(&[]);
        pump.start().unwrap();
        wait_until(|| !pump.is_running());
        pump.stop();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drop_stops_and_releases_sink() {
        let (mut pump, rx) = channel_pump(&[0x09, 0x0A]);
        pump.start().unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "9");

        drop(pump);
        // The sink (and its sender) went away with the joined worker.
        assert!(matches!(
            rx.recv_timeout(TIMEOUT),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }

    #[test]
    fn into_parts_returns_collaborators() {
        let mut pump = Pump::new(
            BufSource::new(Bytes::from_static(&[0x80, 0x81])),
            Vec::<String>::new(),
        );
        pump.start().unwrap();
        wait_until(|| pump.stats().bytes_read == 1);

        let (source, sink) = pump.into_parts().unwrap();
        assert_eq!(sink, vec!["a".to_string()]);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn worker_thread_uses_configured_name() {
        struct NamedSource(Arc<Mutex<Option<String>>>);

        impl Source for NamedSource {
            fn read_byte(&mut self) -> Option<u8> {
                *self.0.lock().unwrap() = thread::current().name().map(str::to_string);
                None
            }
        }

        let seen = Arc::new(Mutex::new(None));
        let mut pump = Pump::with_config(
            NamedSource(Arc::clone(&seen)),
            Vec::<String>::new(),
            PumpConfig::default().with_thread_name("decoder-under-test"),
        );
        pump.start().unwrap();
        wait_until(|| !pump.is_running());
        pump.stop();

        assert_eq!(seen.lock().unwrap().as_deref(), Some("decoder-under-test"));
    }

    #[test]
    fn panicking_sink_leaves_pump_stopped() {
        struct PanicSink;

        impl Sink for PanicSink {
            fn write(&mut self, _text: &str) {
                panic!("sink failure");
            }
        }

        let mut pump = Pump::new(BufSource::new(Bytes::from_static(&[0x01])), PanicSink);
        pump.start().unwrap();
        wait_until(|| !pump.is_running());
        pump.stop();
        assert_eq!(pump.state(), PumpState::Stopped);
    }

    #[test]
    fn stop_blocks_until_worker_has_left_source() {
        struct CountingSource {
            reads: Arc<AtomicUsize>,
        }

        impl Source for CountingSource {
            fn read_byte(&mut self) -> Option<u8> {
                self.reads.fetch_add(1, Ordering::SeqCst);
                Some(0xC1)
            }
        }

        let reads = Arc::new(AtomicUsize::new(0));
        let mut pump = Pump::new(
            CountingSource {
                reads: Arc::clone(&reads),
            },
            Vec::<String>::new(),
        );
        pump.start().unwrap();
        for _ in 0..10 {
            pump.resume();
        }
        pump.stop();

        let after_stop = reads.load(Ordering::SeqCst);
        thread::sleep(QUIET);
        assert_eq!(reads.load(Ordering::SeqCst), after_stop);
        assert!(after_stop >= 1);
    }

    struct Endless;

    impl Source for Endless {
        fn read_byte(&mut self) -> Option<u8> {
            Some(0x81)
        }
    }

    #[test]
    fn stop_right_after_start_still_reads_first_byte() {
        let (mut pump, rx) = channel_pump(&[0x81, 0x82]);
        pump.start().unwrap();
        pump.stop();

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "b");
        assert!(rx.try_recv().is_err());
        assert_eq!(pump.stats().bytes_read, 1);
        assert_eq!(pump.state(), PumpState::Stopped);
    }

    #[test]
    fn repeated_start_resume_stop_cycles_settle() {
        const CYCLES: u64 = 500;

        let mut pump = Pump::new(Endless, Vec::<String>::new());
        let started = Instant::now();
        for _ in 0..CYCLES {
            pump.start().unwrap();
            pump.resume();
            pump.resume();
            pump.stop();
            assert!(!pump.is_running());
        }
        assert!(started.elapsed() < TIMEOUT * 6, "cycles took too long");

        let stats = pump.stats();
        assert_eq!(stats.runs, CYCLES);
        assert!(stats.bytes_read >= CYCLES);
        assert_eq!(stats.fragments_written, stats.bytes_read);

        let (_, sink) = pump.into_parts().unwrap();
        assert_eq!(sink.len() as u64, stats.bytes_read);
    }
}
