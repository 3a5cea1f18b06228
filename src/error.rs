use thiserror::Error;

/// Errors that can occur while polling the UPS.
///
/// Each layer of the acquisition path signals failure with a distinct
/// variant: single-shot report reads, the retry/reopen escalation, the
/// by-identity reset, and the derived-metric decode all fail differently,
/// and the sweep scheduler decides per slot whether to keep trying.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying HID API layer.
    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),
    /// Error from the USB transport used for device resets.
    #[error("USB transport error: {0}")]
    Usb(#[from] rusb::Error),
    /// No UPS was found on the HID device list.
    #[error("no Tripp-Lite UPS found among the attached HID devices")]
    DeviceNotFound,
    /// A supplied device path cannot be used as a platform path.
    #[error("invalid device path: {0:?}")]
    InvalidPath(String),
    /// A report read was issued while the channel was closed.
    #[error("channel to '{path}' is not open")]
    ChannelClosed {
        /// The device path the channel was created for.
        path: String,
    },
    /// No USB device matching the identity pair is attached, so a reset
    /// cannot be issued.
    #[error("cannot reset {vid:04x}:{pid:04x}: no matching USB device attached")]
    ResetUnavailable {
        /// Vendor ID the reset was targeted at.
        vid: u16,
        /// Product ID the reset was targeted at.
        pid: u16,
    },
    /// Scratch buffer handed to a report read is too small to hold the
    /// report number plus at least one data byte. Contract violation, not a
    /// device error.
    #[error("report buffer too small (need at least {expected} bytes, got {actual})")]
    BufferTooSmall {
        /// Minimum required buffer size.
        expected: usize,
        /// Actual buffer size provided.
        actual: usize,
    },
    /// A report could not be fetched within the attempt budget, including
    /// the mid-sequence channel reopen.
    #[error("report {report} unavailable after {attempts} attempts")]
    ReportUnavailable {
        /// The feature report number that was requested.
        report: u8,
        /// The attempt budget that was exhausted.
        attempts: usize,
    },
    /// The device reported a full-charge capacity of zero (or garbage), so
    /// the battery percentage cannot be derived.
    #[error("device reported non-positive full-charge capacity ({0})")]
    ZeroTotalCapacity(i32),
    /// The device reported a negative remaining capacity, which is equally
    /// garbage for deriving a percentage.
    #[error("device reported negative remaining capacity ({0})")]
    NegativeRemainingCapacity(i32),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
