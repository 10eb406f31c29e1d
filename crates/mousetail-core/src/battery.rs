//! Battery simulation
//!
//! Nothing on the wire reports the mouse's real charge, so the estimator
//! simulates it. Each timer tick moves the percentage by a fixed rate in the
//! direction the charging state dictates and persists the result, so a
//! restart picks up where the last session ended.

use crate::band::BandTable;
use crate::store::{StateStore, StoreError};

/// Percentage assumed when no usable state exists
pub const FULL_CHARGE: f32 = 100.0;

/// Tooltip label shown while the mouse charges
pub const CHARGING_TEXT: &str = "Charging";

/// Simulated charge movement per tick, in percentage points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeRates {
    /// Gain per tick while on the wire
    pub increase: f32,
    /// Loss per tick while running on battery
    pub decrease: f32,
}

impl Default for ChargeRates {
    fn default() -> Self {
        // At the one-minute tick: full in ~90 minutes, empty in ~33 hours
        Self {
            increase: 1.1,
            decrease: 0.05,
        }
    }
}

/// Simulated battery estimator
///
/// The percentage always stays within `0.0..=100.0`; ticks clamp after
/// applying their rate.
pub struct BatteryEstimator {
    percentage: f32,
    charging: bool,
    rates: ChargeRates,
    bands: BandTable,
    store: StateStore,
}

impl BatteryEstimator {
    /// Create an estimator with default rates and bands
    pub fn new(store: StateStore) -> Self {
        Self::with_settings(store, ChargeRates::default(), BandTable::default())
    }

    /// Create an estimator with custom rates and bands
    pub fn with_settings(store: StateStore, rates: ChargeRates, bands: BandTable) -> Self {
        Self {
            percentage: FULL_CHARGE,
            charging: false,
            rates,
            bands,
            store,
        }
    }

    /// Restore the persisted estimate
    ///
    /// A missing or unreadable state file resets the estimate to full charge
    /// and writes the fresh value back immediately.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        match self.store.load() {
            Ok(percentage) => {
                self.percentage = percentage.clamp(0.0, 100.0);
                tracing::info!("Restored battery estimate: {:.2}%", self.percentage);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("No usable battery state ({e}), assuming full charge");
                self.percentage = FULL_CHARGE;
                self.store.save(self.percentage)
            }
        }
    }

    /// Advance the simulation one tick and persist the result
    ///
    /// The new estimate is kept even when the write fails; the next tick
    /// retries the file.
    pub fn tick(&mut self, charging: bool) -> Result<(), StoreError> {
        self.charging = charging;
        let delta = if charging {
            self.rates.increase
        } else {
            -self.rates.decrease
        };
        self.percentage = (self.percentage + delta).clamp(0.0, 100.0);
        self.store.save(self.percentage)
    }

    /// Record a presence change without advancing the simulation
    pub fn set_charging(&mut self, charging: bool) {
        self.charging = charging;
    }

    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Icon name for the current state
    pub fn display_band(&self) -> &str {
        self.bands.select(self.percentage, self.charging)
    }

    /// One-line battery description for the tray tooltip
    ///
    /// Shows the charging label for as long as the cable is in, even once the
    /// estimate reaches full.
    pub fn status_text(&self) -> String {
        if self.charging {
            CHARGING_TEXT.to_string()
        } else {
            format!("Battery level {}%", self.percentage.round() as i32)
        }
    }
}
