//! Internal constants: device identity, report numbers, and retry budgets.

// Default Vendor/Product IDs
/// Tripp-Lite vendor ID.
pub const TRIPPLITE_VID: u16 = 0x09AE;
/// Product ID of the SMART1500LCDT.
pub const SMART1500LCDT_PID: u16 = 0x3016;

// --- Feature Report Numbers (Control Transfer) ---
// The UPS exposes each telemetry value as a numbered feature report with a
// fixed decoded width. Reports 52/54 only exist as a pair: the published
// battery percentage is derived from both.
pub mod report {
    /// Input line voltage in tenths of a volt, 16-bit.
    pub const INPUT_VOLTAGE: u8 = 24;
    /// Output voltage in tenths of a volt, 16-bit.
    pub const OUTPUT_VOLTAGE: u8 = 27;
    /// Present load as a percentage, 8-bit.
    pub const LOAD_PERCENT: u8 = 30;
    /// Present power status bitfield, 16-bit.
    pub const POWER_STATUS: u8 = 34;
    /// Present battery status bitfield, 16-bit.
    pub const BATTERY_STATUS: u8 = 35;
    /// Remaining battery capacity, raw units, 8-bit.
    pub const REMAINING_CAPACITY: u8 = 52;
    /// Estimated runtime to empty in seconds, 16-bit.
    pub const RUNTIME_TO_EMPTY: u8 = 53;
    /// Full-charge battery capacity, raw units, 8-bit.
    pub const FULL_CAPACITY: u8 = 54;
}

/// Scratch buffer size for feature-report reads. The device never returns
/// anywhere near this much; matching the report descriptor exactly is not
/// required for control reads.
pub const REPORT_BUF_LEN: usize = 128;

/// Per-report attempt budget. The UPS returns EPIPE-style failures seemingly
/// at random, often 2-3 in a row, so a single-shot read is useless.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Sweep round budget before the run is declared a failure.
pub const DEFAULT_ROUND_BUDGET: u32 = 10;
