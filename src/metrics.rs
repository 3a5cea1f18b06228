//! The seven tracked metrics, their report mapping, and the raw-report
//! decoders.

use crate::channel::ReportChannel;
use crate::consts::{report, DEFAULT_MAX_ATTEMPTS, REPORT_BUF_LEN};
use crate::error::{Error, Result};
use crate::retry::retry_read;

/// One of the seven telemetry values assembled into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    RuntimeToEmpty,
    BatteryPercent,
    InputVoltage,
    OutputVoltage,
    LoadPercent,
    PowerStatus,
    BatteryStatus,
}

impl Metric {
    /// Every tracked metric, in the order a sweep round visits them.
    pub const ALL: [Metric; 7] = [
        Metric::RuntimeToEmpty,
        Metric::BatteryPercent,
        Metric::InputVoltage,
        Metric::OutputVoltage,
        Metric::LoadPercent,
        Metric::PowerStatus,
        Metric::BatteryStatus,
    ];

    /// The field name this metric is published under.
    pub fn name(self) -> &'static str {
        match self {
            Metric::RuntimeToEmpty => "runtime",
            Metric::BatteryPercent => "battery_percent",
            Metric::InputVoltage => "input_voltage",
            Metric::OutputVoltage => "output_voltage",
            Metric::LoadPercent => "load_percent",
            Metric::PowerStatus => "power_status",
            Metric::BatteryStatus => "battery_status",
        }
    }
}

/// Decodes the signed byte at offset 1 of a raw report buffer.
pub fn decode_i8(buf: &[u8]) -> i32 {
    buf[1] as i8 as i32
}

/// Decodes the signed little-endian 16-bit value at offset 1 of a raw
/// report buffer.
pub fn decode_i16(buf: &[u8]) -> i32 {
    i16::from_le_bytes([buf[1], buf[2]]) as i32
}

fn read_i8<C: ReportChannel + ?Sized>(channel: &mut C, report: u8) -> Result<i32> {
    let mut buf = [0u8; REPORT_BUF_LEN];
    retry_read(channel, report, &mut buf, DEFAULT_MAX_ATTEMPTS)?;
    Ok(decode_i8(&buf))
}

fn read_i16<C: ReportChannel + ?Sized>(channel: &mut C, report: u8) -> Result<i32> {
    let mut buf = [0u8; REPORT_BUF_LEN];
    retry_read(channel, report, &mut buf, DEFAULT_MAX_ATTEMPTS)?;
    Ok(decode_i16(&buf))
}

/// Acquires one metric through the retry engine and decodes it.
///
/// The battery percentage is derived: it needs both the remaining-capacity
/// and full-capacity reports in the same round, and fails if either read
/// fails, the remaining capacity comes back negative, or the device claims
/// a non-positive full capacity. Everything else maps to a single report.
pub fn read_metric<C: ReportChannel + ?Sized>(channel: &mut C, metric: Metric) -> Result<i32> {
    match metric {
        Metric::RuntimeToEmpty => read_i16(channel, report::RUNTIME_TO_EMPTY),
        Metric::BatteryPercent => {
            let remaining = read_i8(channel, report::REMAINING_CAPACITY)?;
            if remaining < 0 {
                return Err(Error::NegativeRemainingCapacity(remaining));
            }
            let total = read_i8(channel, report::FULL_CAPACITY)?;
            if total <= 0 {
                return Err(Error::ZeroTotalCapacity(total));
            }
            Ok(remaining * 100 / total)
        }
        Metric::InputVoltage => read_i16(channel, report::INPUT_VOLTAGE),
        Metric::OutputVoltage => read_i16(channel, report::OUTPUT_VOLTAGE),
        Metric::LoadPercent => read_i8(channel, report::LOAD_PERCENT),
        Metric::PowerStatus => read_i16(channel, report::POWER_STATUS),
        Metric::BatteryStatus => read_i16(channel, report::BATTERY_STATUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_i8_sign_extends() {
        let buf = [30u8, 0xFF, 0x00];
        assert_eq!(decode_i8(&buf), -1);
        let buf = [30u8, 42, 0x00];
        assert_eq!(decode_i8(&buf), 42);
    }

    #[test]
    fn decode_i16_is_little_endian() {
        let buf = [53u8, 0x10, 0x0E];
        assert_eq!(decode_i16(&buf), 0x0E10);
        let buf = [53u8, 0xFF, 0xFF];
        assert_eq!(decode_i16(&buf), -1);
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let mut buf = [0u8; 128];
        buf[1] = 0xB0;
        buf[2] = 0x04;
        assert_eq!(decode_i16(&buf), 1200);
    }

    #[test]
    fn metric_names_match_output_fields() {
        let names: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            [
                "runtime",
                "battery_percent",
                "input_voltage",
                "output_voltage",
                "load_percent",
                "power_status",
                "battery_status",
            ]
        );
    }
}
