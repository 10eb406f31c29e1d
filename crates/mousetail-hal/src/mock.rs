//! Mock probes for testing without real hardware
//!
//! Two flavors are provided: [`MockProbe`] is driven live from the test
//! through a shared handle, and [`ScriptedProbe`] replays a fixed sequence
//! of scan results.
//!
//! # Usage
//!
//! ```
//! use mousetail_hal::mock::MockProbe;
//! use mousetail_hal::DeviceProbe;
//!
//! let (mut probe, handle) = MockProbe::new(false);
//! handle.set_present(true);
//! assert!(probe.detect().unwrap());
//! ```

use crate::probe::{DeviceProbe, ScanError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

struct MockProbeState {
    present: AtomicBool,
    failing: AtomicBool,
    scans: AtomicUsize,
}

/// Shared handle for driving a [`MockProbe`] from a test
#[derive(Clone)]
pub struct MockProbeHandle {
    state: Arc<MockProbeState>,
}

impl MockProbeHandle {
    /// Flip the simulated wired state
    pub fn set_present(&self, present: bool) {
        self.state.present.store(present, Ordering::SeqCst);
    }

    /// Make every scan fail until cleared
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of scans performed so far
    pub fn scans(&self) -> usize {
        self.state.scans.load(Ordering::SeqCst)
    }
}

/// Probe whose answer is controlled through a [`MockProbeHandle`]
pub struct MockProbe {
    state: Arc<MockProbeState>,
}

impl MockProbe {
    pub fn new(present: bool) -> (Self, MockProbeHandle) {
        let state = Arc::new(MockProbeState {
            present: AtomicBool::new(present),
            failing: AtomicBool::new(false),
            scans: AtomicUsize::new(0),
        });

        (
            Self {
                state: Arc::clone(&state),
            },
            MockProbeHandle { state },
        )
    }
}

impl DeviceProbe for MockProbe {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn detect(&mut self) -> Result<bool, ScanError> {
        self.state.scans.fetch_add(1, Ordering::SeqCst);
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(ScanError::Io(std::io::Error::other("mock scan failure")));
        }
        Ok(self.state.present.load(Ordering::SeqCst))
    }
}

/// Probe that replays a fixed sequence of scan results
///
/// Once the script runs out, every further scan repeats the last `Ok` value
/// seen (or `false` if the script held none).
pub struct ScriptedProbe {
    script: VecDeque<Result<bool, ScanError>>,
    resting: bool,
    scans: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn new(script: Vec<Result<bool, ScanError>>) -> Self {
        Self {
            script: script.into(),
            resting: false,
            scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter shared with the test thread
    pub fn scan_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.scans)
    }
}

impl DeviceProbe for ScriptedProbe {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self) -> Result<bool, ScanError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            Some(step) => {
                if let Ok(found) = &step {
                    self.resting = *found;
                }
                step
            }
            None => Ok(self.resting),
        }
    }
}
