//! Hardware probing for mousetail
//!
//! This module answers a single question for the rest of the system: is the
//! mouse currently attached over its charging cable? The mouse itself reports
//! no battery state, but it only shows up on the wire while it charges, so
//! wired presence doubles as charging state.
//!
//! Two probing strategies are provided: a sysfs walk of the USB bus matched
//! by vendor/product ID, and HID enumeration matched by product name.
//!
//! # Example
//!
//! ```no_run
//! use mousetail_hal::{PresenceDetector, UsbId, UsbProbe};
//! use std::time::Duration;
//!
//! fn main() -> anyhow::Result<()> {
//!     let id = UsbId::parse("25a7:fa7b")?;
//!     let mut detector = PresenceDetector::new();
//!     detector.start(Box::new(UsbProbe::new(id)), Duration::from_secs(1));
//!
//!     if let Some(event) = detector.recv_timeout(Duration::from_secs(5)) {
//!         println!("presence changed: {event:?}");
//!     }
//!     detector.stop();
//!     Ok(())
//! }
//! ```

pub mod mock;
pub mod presence;
pub mod probe;

pub use presence::{PresenceDetector, PresenceEvent};
pub use probe::{DeviceProbe, HidProbe, ScanError, UsbId, UsbProbe};

/// Probe Result type
pub type Result<T> = std::result::Result<T, ScanError>;
