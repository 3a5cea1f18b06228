//! Expansion of the status bitfields into named conditions.
//!
//! Bit positions and names follow the HID power-device usage of the
//! SMART1500LCDT; several bits have never been observed set and are kept
//! under their placeholder names.

/// Condition names for the power-status bitfield, indexed by bit position.
pub const POWER_STATUS_CONDITIONS: [&str; 16] = [
    "voltage out of range",
    "buck",
    "boost",
    "undefined-3",
    "overload",
    "ups off",
    "over temperature",
    "internal failure",
    "undefined-8",
    "reserved-9",
    "undefined-10",
    "undefined-11",
    "undefined-12",
    "undefined-13",
    "awaiting power",
    "undefined-14",
];

/// Condition names for the battery-status bitfield, indexed by bit position.
pub const BATTERY_STATUS_CONDITIONS: [&str; 8] = [
    "charging",
    "discharging",
    "need replacement",
    "reserved-3",
    "reserved-4",
    "reserved-5",
    "reserved-6",
    "reserved-7",
];

// Zero means no conditions set, not an error.
fn conditions(value: i32, table: &'static [&'static str]) -> Vec<&'static str> {
    table
        .iter()
        .enumerate()
        .filter(|(bit, _)| value & (1 << bit) != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Names every condition set in a power-status value.
pub fn power_status_conditions(value: i32) -> Vec<&'static str> {
    conditions(value, &POWER_STATUS_CONDITIONS)
}

/// Names every condition set in a battery-status value.
pub fn battery_status_conditions(value: i32) -> Vec<&'static str> {
    conditions(value, &BATTERY_STATUS_CONDITIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_no_conditions() {
        assert!(power_status_conditions(0).is_empty());
        assert!(battery_status_conditions(0).is_empty());
    }

    #[test]
    fn battery_charging_is_bit_zero() {
        assert_eq!(battery_status_conditions(1), ["charging"]);
    }

    #[test]
    fn multiple_power_bits() {
        // bit 0 + bit 4 + bit 14
        let value = 1 | 16 | 16384;
        assert_eq!(
            power_status_conditions(value),
            ["voltage out of range", "overload", "awaiting power"]
        );
    }

    #[test]
    fn battery_needs_replacement_while_discharging() {
        assert_eq!(
            battery_status_conditions(2 | 4),
            ["discharging", "need replacement"]
        );
    }

    #[test]
    fn bits_beyond_table_are_ignored() {
        // Only the low 8 bits of the battery table are named.
        assert_eq!(battery_status_conditions(0x100), Vec::<&str>::new());
    }
}
