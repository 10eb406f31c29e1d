//! Display band selection
//!
//! Maps a battery percentage to the icon name the tray should show. A table
//! holds thresholds in descending order and the first one at or below the
//! percentage wins.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BandError {
    #[error("Band table must not be empty")]
    Empty,

    #[error("Band thresholds must be strictly descending: {0} is not above {1}")]
    NotDescending(f32, f32),

    #[error("Lowest band threshold must be 0, found {0}")]
    MissingFloor(f32),
}

/// Icon shown while the mouse charges on the wire
pub const CHARGING_ICON: &str = "charging";

/// Icon shown by the lowest band
pub const WARNING_ICON: &str = "warning";

/// One row of the selection table
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Minimum percentage for this band
    pub threshold: f32,
    /// Icon name the band selects
    pub icon: String,
}

impl Band {
    pub fn new(threshold: f32, icon: impl Into<String>) -> Self {
        Self {
            threshold,
            icon: icon.into(),
        }
    }
}

/// Threshold table mapping percentages to icon names
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    /// Build a table from strictly descending thresholds ending at 0
    pub fn new(bands: Vec<Band>) -> Result<Self, BandError> {
        let Some(last) = bands.last() else {
            return Err(BandError::Empty);
        };
        if last.threshold != 0.0 {
            return Err(BandError::MissingFloor(last.threshold));
        }
        for pair in bands.windows(2) {
            if !(pair[0].threshold > pair[1].threshold) {
                return Err(BandError::NotDescending(
                    pair[0].threshold,
                    pair[1].threshold,
                ));
            }
        }

        Ok(Self { bands })
    }

    /// Five bands in steps of roughly a quarter charge
    pub fn coarse() -> Self {
        Self {
            bands: vec![
                Band::new(75.0, "100"),
                Band::new(50.0, "75"),
                Band::new(25.0, "50"),
                Band::new(10.0, "25"),
                Band::new(0.0, WARNING_ICON),
            ],
        }
    }

    /// Ten bands in steps of ten
    pub fn fine() -> Self {
        Self {
            bands: vec![
                Band::new(90.0, "100"),
                Band::new(80.0, "90"),
                Band::new(70.0, "80"),
                Band::new(60.0, "70"),
                Band::new(50.0, "60"),
                Band::new(40.0, "50"),
                Band::new(30.0, "40"),
                Band::new(20.0, "30"),
                Band::new(10.0, "20"),
                Band::new(0.0, WARNING_ICON),
            ],
        }
    }

    /// Pick the icon for the given state
    ///
    /// Charging shows its own icon until the battery is full; at 100% the
    /// numeric bands take over even while the cable stays in.
    pub fn select(&self, percentage: f32, charging: bool) -> &str {
        if charging && percentage < 100.0 {
            return CHARGING_ICON;
        }

        for band in &self.bands {
            if percentage >= band.threshold {
                return &band.icon;
            }
        }

        // Out-of-range input reads as still charging
        CHARGING_ICON
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::coarse()
    }
}
