//! Integration tests for signal forwarding and termination.
//!
//! Real signals are raised at the test process, so everything runs inside a
//! single test to keep handlers from different tests apart.

use std::ffi::{c_int, c_void};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use sysmenu::config::ConfigTable;
use sysmenu::module::{Module, ModuleHandle};
use sysmenu::signals::{SignalBridge, TerminationListener, forwarded_signals};

#[derive(Default)]
struct Relayed {
    count: AtomicUsize,
    last_signal: AtomicI32,
    last_handle: AtomicUsize,
}

struct RecordingModule {
    relayed: Arc<Relayed>,
}

impl Module for RecordingModule {
    fn create(&self, _config: &ConfigTable) -> ModuleHandle {
        ModuleHandle::from_raw(0xbeef as *mut c_void)
    }

    fn handle_signal(&self, handle: ModuleHandle, signal: c_int) {
        self.relayed.last_handle.store(handle.as_raw() as usize, Ordering::SeqCst);
        self.relayed.last_signal.store(signal, Ordering::SeqCst);
        self.relayed.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn wait_for(relayed: &Relayed, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while relayed.count.load(Ordering::SeqCst) < count {
        assert!(Instant::now() < deadline, "signal was not relayed");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_forwarding_and_termination() {
    let relayed = Arc::new(Relayed::default());
    let module: Arc<dyn Module> = Arc::new(RecordingModule {
        relayed: Arc::clone(&relayed),
    });
    let handle = module.create(&ConfigTable::new());

    let bridge = SignalBridge::install(Arc::clone(&module), handle).expect("install");
    assert_eq!(bridge.signals(), forwarded_signals().to_vec());

    for (i, signal) in forwarded_signals().into_iter().enumerate() {
        signal_hook::low_level::raise(signal).expect("raise");
        wait_for(&relayed, i + 1);
        assert_eq!(relayed.last_signal.load(Ordering::SeqCst), signal);
        assert_eq!(relayed.last_handle.load(Ordering::SeqCst), 0xbeef);
    }
    drop(bridge);

    let mut listener = TerminationListener::new().expect("listen");
    let raiser = thread::spawn(|| {
        thread::sleep(Duration::from_millis(50));
        signal_hook::low_level::raise(libc::SIGHUP).expect("raise");
    });
    assert_eq!(listener.wait(), Some(libc::SIGHUP));
    raiser.join().unwrap();
}
