//! Wired device probing
//!
//! Handles bus enumeration using Linux sysfs and HID interfaces. A probe scans
//! the bus once per call and reports whether the configured mouse is attached.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid USB identifier '{0}': expected 'vvvv:pppp' in lowercase hex")]
    InvalidId(String),

    #[error("HID enumeration failed: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// USB vendor/product identifier in `vvvv:pppp` notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbId {
    vendor: String,
    product: String,
}

impl UsbId {
    /// Parse from `vvvv:pppp` notation (lowercase hex, as sysfs reports it)
    pub fn parse(s: &str) -> Result<Self, ScanError> {
        let (vendor, product) = s
            .split_once(':')
            .ok_or_else(|| ScanError::InvalidId(s.to_string()))?;

        if !is_hex4(vendor) || !is_hex4(product) {
            return Err(ScanError::InvalidId(s.to_string()));
        }

        Ok(Self {
            vendor: vendor.to_string(),
            product: product.to_string(),
        })
    }

    /// Compare against attribute values read from sysfs
    fn matches(&self, vendor: &str, product: &str) -> bool {
        self.vendor == vendor && self.product == product
    }
}

impl std::fmt::Display for UsbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.vendor, self.product)
    }
}

fn is_hex4(s: &str) -> bool {
    s.len() == 4
        && s.chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// Strip trailing NUL padding and whitespace from a raw descriptor string
fn trim_padding(s: &str) -> &str {
    s.trim_matches('\0').trim()
}

/// A strategy for answering "is the mouse on the wire right now?"
///
/// Implementations scan the bus once per [`detect`](DeviceProbe::detect) call.
/// A scan failure means nothing could be enumerated this cycle; callers treat
/// it as "not found" and try again later.
pub trait DeviceProbe: Send {
    /// Short strategy name for logs
    fn name(&self) -> &'static str;

    /// Scan the bus once. `Ok(true)` means the device is attached.
    fn detect(&mut self) -> Result<bool, ScanError>;
}

/// Probes the USB bus through sysfs device attributes
pub struct UsbProbe {
    id: UsbId,
    root: PathBuf,
}

impl UsbProbe {
    /// Probe the standard sysfs USB device tree
    pub fn new(id: UsbId) -> Self {
        Self::with_root(id, "/sys/bus/usb/devices")
    }

    /// Probe an alternate device tree root
    pub fn with_root(id: UsbId, root: impl Into<PathBuf>) -> Self {
        Self {
            id,
            root: root.into(),
        }
    }

    fn read_attr(path: &Path) -> Option<String> {
        let bytes = fs::read(path).ok()?;
        let raw = String::from_utf8_lossy(&bytes);
        Some(trim_padding(&raw).to_string())
    }
}

impl DeviceProbe for UsbProbe {
    fn name(&self) -> &'static str {
        "usb"
    }

    fn detect(&mut self) -> Result<bool, ScanError> {
        for entry in fs::read_dir(&self.root)? {
            let Ok(entry) = entry else { continue };
            let dir = entry.path();

            // Interface nodes carry no idVendor; skip anything incomplete
            let Some(vendor) = Self::read_attr(&dir.join("idVendor")) else {
                continue;
            };
            let Some(product) = Self::read_attr(&dir.join("idProduct")) else {
                continue;
            };

            if self.id.matches(&vendor, &product) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Probes HID devices filtered by vendor ID, matched by product name
pub struct HidProbe {
    api: hidapi::HidApi,
    vendor_id: u16,
    product: String,
}

impl HidProbe {
    pub fn new(vendor_id: u16, product: impl Into<String>) -> Result<Self, ScanError> {
        Ok(Self {
            api: hidapi::HidApi::new()?,
            vendor_id,
            product: product.into(),
        })
    }
}

impl DeviceProbe for HidProbe {
    fn name(&self) -> &'static str {
        "hid"
    }

    fn detect(&mut self) -> Result<bool, ScanError> {
        self.api.refresh_devices()?;

        for info in self.api.device_list() {
            if info.vendor_id() != self.vendor_id {
                continue;
            }
            if let Some(name) = info.product_string()
                && trim_padding(name) == self.product
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
