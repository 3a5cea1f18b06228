//! Transport-level device reset, targeted by identity rather than by an
//! open handle.

use log::{debug, warn};

use crate::error::{Error, Result};

/// Finds an attached USB device matching `vid`/`pid` and issues a full
/// transport reset on it.
///
/// Works independently of any open HID handle, which is the point: it is the
/// fallback for when the control path cannot even be opened. If multiple
/// matching devices are attached, whichever the USB stack returns first gets
/// reset. A reset invalidates any other open handle on that device, so this
/// is only called once a plain open has already failed.
pub fn reset_by_ids(vid: u16, pid: u16) -> Result<()> {
    let mut handle =
        rusb::open_device_with_vid_pid(vid, pid).ok_or(Error::ResetUnavailable { vid, pid })?;
    debug!("resetting device {:04x}:{:04x}", vid, pid);
    if let Err(e) = handle.reset() {
        warn!(
            "reset of {:04x}:{:04x} failed ({}); the device may need a replug",
            vid, pid, e
        );
        return Err(Error::Usb(e));
    }
    Ok(())
}
