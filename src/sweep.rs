//! The sweep scheduler: repeated best-effort rounds over the metric slots
//! until a full snapshot exists or the round budget runs out.

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::Serialize;

use crate::channel::ReportChannel;
use crate::consts::DEFAULT_ROUND_BUDGET;
use crate::metrics::{read_metric, Metric};
use crate::status;

/// One complete set of the seven tracked telemetry values plus the capture
/// time (Unix seconds). Only ever produced with every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub runtime: i32,
    pub battery_percent: i32,
    pub input_voltage: i32,
    pub output_voltage: i32,
    pub load_percent: i32,
    pub power_status: i32,
    pub battery_status: i32,
    pub updated: i64,
}

/// Where a sweep currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// At least one slot is unset and rounds remain.
    Collecting,
    /// Every slot is set.
    Complete,
    /// The round budget ran out with at least one slot unset.
    Exhausted,
}

/// Terminal result of a sweep run.
#[derive(Debug)]
pub enum SweepOutcome {
    /// All seven slots were filled; the snapshot is publishable.
    Complete(Snapshot),
    /// The round budget ran out. No partial snapshot is produced; a consumer
    /// could misread missing telemetry as zero.
    Exhausted {
        /// The metrics that were never acquired.
        missing: Vec<Metric>,
    },
}

/// Collects the metric slots across rounds.
///
/// Each round attempts every still-unset slot; the first successful read
/// wins and the slot is never queried again. A metric that fails its whole
/// retry budget just stays unset for the round. A reopen or reset performed
/// while servicing one slot frequently un-wedges the channel for the
/// others, so a round never fails fast.
#[derive(Debug)]
pub struct Sweep {
    slots: [Option<i32>; 7],
    rounds_used: u32,
    round_budget: u32,
}

impl Default for Sweep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sweep {
    /// A sweep with the default round budget.
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_ROUND_BUDGET)
    }

    /// A sweep with an explicit round budget.
    pub fn with_budget(round_budget: u32) -> Self {
        Self {
            slots: [None; 7],
            rounds_used: 0,
            round_budget,
        }
    }

    /// Current state of the state machine, derived from the slots and the
    /// rounds consumed so far.
    pub fn state(&self) -> SweepState {
        if self.is_complete() {
            SweepState::Complete
        } else if self.rounds_used >= self.round_budget {
            SweepState::Exhausted
        } else {
            SweepState::Collecting
        }
    }

    /// The stored value for `metric`, if set.
    pub fn get(&self, metric: Metric) -> Option<i32> {
        self.slots[metric as usize]
    }

    /// Sets a slot if it is still unset. Returns whether the value was
    /// stored; an already-set slot is never overwritten.
    pub fn set(&mut self, metric: Metric, value: i32) -> bool {
        let slot = &mut self.slots[metric as usize];
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Whether every slot is set.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The metrics still unset.
    pub fn missing(&self) -> Vec<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .filter(|m| self.get(*m).is_none())
            .collect()
    }

    /// Rounds consumed so far.
    pub fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    /// Drives rounds against `channel` until the sweep completes or the
    /// round budget is exhausted.
    pub fn run<C: ReportChannel + ?Sized>(&mut self, channel: &mut C) -> SweepOutcome {
        while self.state() == SweepState::Collecting {
            self.rounds_used += 1;
            for metric in Metric::ALL {
                if self.get(metric).is_some() {
                    continue;
                }
                match read_metric(channel, metric) {
                    Ok(value) => {
                        self.set(metric, value);
                        log_acquired(metric, value);
                    }
                    Err(e) => {
                        debug!(
                            "{} not acquired in round {}: {}",
                            metric.name(),
                            self.rounds_used,
                            e
                        );
                    }
                }
            }
        }

        match self.state() {
            SweepState::Complete => SweepOutcome::Complete(self.snapshot()),
            _ => SweepOutcome::Exhausted {
                missing: self.missing(),
            },
        }
    }

    // Only reachable once every slot is set.
    fn snapshot(&self) -> Snapshot {
        let value = |m: Metric| self.slots[m as usize].unwrap_or(0);
        Snapshot {
            runtime: value(Metric::RuntimeToEmpty),
            battery_percent: value(Metric::BatteryPercent),
            input_voltage: value(Metric::InputVoltage),
            output_voltage: value(Metric::OutputVoltage),
            load_percent: value(Metric::LoadPercent),
            power_status: value(Metric::PowerStatus),
            battery_status: value(Metric::BatteryStatus),
            updated: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
        }
    }
}

fn log_acquired(metric: Metric, value: i32) {
    match metric {
        Metric::RuntimeToEmpty => debug!("runtime to empty: {} mins", value / 60),
        Metric::BatteryPercent => debug!("remaining capacity: {}%", value),
        Metric::InputVoltage => debug!("input voltage: {}.{}", value / 10, value % 10),
        Metric::OutputVoltage => debug!("output voltage: {}.{}", value / 10, value % 10),
        Metric::LoadPercent => debug!("current load: {}%", value),
        Metric::PowerStatus => {
            debug!(
                "power status: {:?}",
                status::power_status_conditions(value)
            );
        }
        Metric::BatteryStatus => {
            debug!(
                "battery status: {:?}",
                status::battery_status_conditions(value)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collecting_with_all_slots_unset() {
        let sweep = Sweep::new();
        assert_eq!(sweep.state(), SweepState::Collecting);
        assert_eq!(sweep.missing().len(), 7);
        assert_eq!(sweep.rounds_used(), 0);
    }

    #[test]
    fn first_set_wins() {
        let mut sweep = Sweep::new();
        assert!(sweep.set(Metric::RuntimeToEmpty, 3600));
        assert!(!sweep.set(Metric::RuntimeToEmpty, 99));
        assert_eq!(sweep.get(Metric::RuntimeToEmpty), Some(3600));
    }

    #[test]
    fn complete_once_every_slot_is_set() {
        let mut sweep = Sweep::new();
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            assert_eq!(sweep.state(), SweepState::Collecting);
            sweep.set(metric, i as i32);
        }
        assert_eq!(sweep.state(), SweepState::Complete);
        assert!(sweep.missing().is_empty());
    }

    #[test]
    fn zero_budget_is_exhausted_unless_complete() {
        let sweep = Sweep::with_budget(0);
        assert_eq!(sweep.state(), SweepState::Exhausted);
    }

    #[test]
    fn negative_values_count_as_set() {
        let mut sweep = Sweep::new();
        assert!(sweep.set(Metric::InputVoltage, -5));
        assert!(!sweep.set(Metric::InputVoltage, 1200));
        assert_eq!(sweep.get(Metric::InputVoltage), Some(-5));
    }
}
