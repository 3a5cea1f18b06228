//! The control channel to the UPS and the trait seam the resilience engine
//! drives it through.

use std::ffi::{CStr, CString};

use hidapi::{HidApi, HidDevice};
use log::{debug, trace, warn};

use crate::consts;
use crate::error::{Error, Result};
use crate::reset::reset_by_ids;

/// A channel that can answer single-shot feature-report requests and be
/// reopened when it wedges.
///
/// [`UpsChannel`] is the real implementation; the retry and sweep layers are
/// written against this trait so they can be exercised against scripted
/// transports.
pub trait ReportChannel {
    /// Issues one control-read request for the buffer. `buf[0]` holds the
    /// report number on entry; on success the buffer contains the raw report
    /// and the returned length is whatever the device reported, which may be
    /// shorter than the buffer. Single-shot: no retry at this layer.
    fn request_report(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Closes and reopens the underlying channel.
    fn reopen(&mut self) -> Result<()>;

    /// Fetches feature report `report` into `buf`.
    ///
    /// The buffer must have room for the report number plus at least one
    /// data byte; anything shorter fails before touching the device.
    fn read_report(&mut self, report: u8, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(Error::BufferTooSmall {
                expected: 2,
                actual: buf.len(),
            });
        }
        buf[0] = report;
        self.request_report(buf)
    }
}

/// An open control channel to the UPS.
///
/// Owns the `HidApi` context, the device path, and the identity pair used to
/// target resets. Whether the channel is currently open is visible state:
/// the retry layer closes and reopens it mid-sequence, so callers must ask
/// rather than assume.
pub struct UpsChannel {
    api: HidApi,
    path: CString,
    vid: u16,
    pid: u16,
    device: Option<HidDevice>,
}

impl UpsChannel {
    /// Opens the channel at `path` for the default SMART1500LCDT identity.
    pub fn open(api: HidApi, path: &CStr) -> Result<Self> {
        Self::open_with_ids(
            api,
            path,
            consts::TRIPPLITE_VID,
            consts::SMART1500LCDT_PID,
        )
    }

    /// Opens the channel at `path`, targeting resets at the given identity.
    pub fn open_with_ids(api: HidApi, path: &CStr, vid: u16, pid: u16) -> Result<Self> {
        let mut channel = Self {
            api,
            path: path.to_owned(),
            vid,
            pid,
            device: None,
        };
        channel.open_device()?;
        Ok(channel)
    }

    // The open sequence shared by open() and reopen(): if a plain open
    // fails, the device usually needs either a reset or a port power cycle.
    // Only the former is possible from here, so reset by identity and try
    // the open exactly once more before giving up.
    fn open_device(&mut self) -> Result<()> {
        match self.api.open_path(&self.path) {
            Ok(device) => {
                debug!("opened {:?}", self.path);
                self.device = Some(device);
                Ok(())
            }
            Err(e) => {
                warn!("unable to open {:?}: {}; resetting device", self.path, e);
                reset_by_ids(self.vid, self.pid)?;
                let device = self.api.open_path(&self.path)?;
                debug!("opened {:?} after reset", self.path);
                self.device = Some(device);
                Ok(())
            }
        }
    }

    /// Releases the handle. Safe to call on an already-closed channel.
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            debug!("closed {:?}", self.path);
        }
    }

    /// Whether the channel currently holds a live handle.
    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// The device path this channel was opened on.
    pub fn path(&self) -> &CStr {
        &self.path
    }
}

impl ReportChannel for UpsChannel {
    fn request_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        let report = buf[0];
        let device = self.device.as_ref().ok_or_else(|| Error::ChannelClosed {
            path: self.path.to_string_lossy().into_owned(),
        })?;
        match device.get_feature_report(buf) {
            Ok(len) => {
                trace!("report {}: {} bytes; {:02x?}", report, len, &buf[..len]);
                Ok(len)
            }
            Err(e) => {
                trace!("get_feature_report({}) error: {}", report, e);
                Err(Error::Hid(e))
            }
        }
    }

    fn reopen(&mut self) -> Result<()> {
        self.close();
        self.open_device()
    }
}
