//! Background presence polling
//!
//! A dedicated thread scans a [`DeviceProbe`] on a fixed cadence and reports
//! attach/detach transitions over a channel. One event is sent per transition;
//! steady state is silent. A failed scan counts as "not found" for that cycle
//! and the poller keeps going.

use crate::probe::DeviceProbe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Transitions in wired presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    /// The device appeared on the bus
    Attached,
    /// The device left the bus
    Detached,
}

/// Polls a probe on a background thread
pub struct PresenceDetector {
    tx: Sender<PresenceEvent>,
    rx: Receiver<PresenceEvent>,
    present: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PresenceDetector {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            present: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start polling. The probe is scanned once per `interval`.
    pub fn start(&mut self, mut probe: Box<dyn DeviceProbe>, interval: Duration) {
        if self.handle.is_some() {
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        let tx = self.tx.clone();
        let present = Arc::clone(&self.present);
        let running = Arc::clone(&self.running);

        let handle = thread::spawn(move || {
            tracing::info!("Presence poller started (probe: {})", probe.name());
            let mut last = false;

            while running.load(Ordering::SeqCst) {
                let found = match probe.detect() {
                    Ok(found) => found,
                    Err(e) => {
                        // Nothing could be enumerated; treat as absent this cycle
                        tracing::debug!("Scan failed: {e}");
                        false
                    }
                };

                if found != last {
                    present.store(found, Ordering::SeqCst);
                    let event = if found {
                        PresenceEvent::Attached
                    } else {
                        PresenceEvent::Detached
                    };
                    tracing::debug!("Presence changed: {event:?}");
                    let _ = tx.send(event);
                    last = found;
                }

                thread::sleep(interval);
            }

            tracing::info!("Presence poller stopped");
        });

        self.handle = Some(handle);
    }

    /// Latest published presence state
    pub fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    /// Get the event receiver
    pub fn events(&self) -> &Receiver<PresenceEvent> {
        &self.rx
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<PresenceEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for an event with timeout
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PresenceEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Signal the poller and wait for the thread to exit
    ///
    /// Blocks for at most one poll interval while the thread finishes its
    /// current cycle.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Default for PresenceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PresenceDetector {
    fn drop(&mut self) {
        self.shutdown();
    }
}
