//! Battery estimation core for mousetail
//!
//! The mouse this daemon watches exposes no battery interface, so its charge
//! can only be estimated: the percentage creeps down while the mouse runs on
//! its battery and climbs while it sits on the charging cable. This crate
//! owns that simulation, the JSON state file it survives restarts through,
//! and the threshold bands that turn a percentage into a tray icon name.

pub mod band;
pub mod battery;
pub mod store;

pub use band::{Band, BandError, BandTable, CHARGING_ICON, WARNING_ICON};
pub use battery::{BatteryEstimator, CHARGING_TEXT, ChargeRates, FULL_CHARGE};
pub use store::{DEFAULT_STATE_FILE, StateStore, StoreError};
