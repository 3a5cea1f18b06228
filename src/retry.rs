//! Bounded retry with mid-sequence channel recovery.

use log::{debug, trace};

use crate::channel::ReportChannel;
use crate::error::{Error, Result};

/// Fetches feature report `report` into `buf`, retrying up to `max_attempts`
/// times.
///
/// The UPS fails single control reads seemingly at random, often in bursts
/// of 2-3, so one failure means nothing. If the first half of the attempt
/// budget fails, the channel has likely wedged. It is closed and reopened
/// once, which may escalate to a device reset internally, before the
/// remaining attempts are made. If that reopen itself fails, the whole
/// operation fails immediately; there is no point burning attempts on a
/// channel that cannot be brought back.
pub fn retry_read<C: ReportChannel + ?Sized>(
    channel: &mut C,
    report: u8,
    buf: &mut [u8],
    max_attempts: usize,
) -> Result<usize> {
    for attempt in 0..max_attempts {
        match channel.read_report(report, buf) {
            Ok(len) => return Ok(len),
            // A too-small buffer cannot succeed on a later attempt.
            Err(e @ Error::BufferTooSmall { .. }) => return Err(e),
            Err(e) => {
                trace!(
                    "report {} attempt {}/{} failed: {}",
                    report,
                    attempt + 1,
                    max_attempts,
                    e
                );
            }
        }

        if attempt == max_attempts / 2 {
            debug!(
                "report {}: {} consecutive failures, reopening channel",
                report,
                attempt + 1
            );
            channel.reopen()?;
        }
    }

    Err(Error::ReportUnavailable {
        report,
        attempts: max_attempts,
    })
}
