//! `tripplite-poll`: assemble one complete UPS telemetry snapshot and print
//! it as a flat JSON record.
//!
//! Usage: `tripplite-poll [--debug] [HIDRAW_PATH]`
//!
//! Without a path argument the UPS is located on the HID device list. On
//! success the record goes to stdout and the exit status is zero. Any
//! failure (device not found, channel unrecoverable, round budget
//! exhausted) exits nonzero with nothing on stdout, so a supervising
//! script can power cycle the USB port and try again.

use std::env;
use std::ffi::CString;
use std::process::ExitCode;

use hidapi::HidApi;
use log::LevelFilter;

use tripplite_hid::{find_first, Error, Result, Sweep, SweepOutcome, UpsChannel};

fn main() -> ExitCode {
    let mut args = env::args().skip(1).peekable();
    let debug = args.peek().map(|a| a == "--debug").unwrap_or(false);
    if debug {
        args.next();
    }
    let path = args.next();

    // --debug forces debug-level logging; otherwise RUST_LOG applies.
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    match run(path) {
        Ok(SweepOutcome::Complete(snapshot)) => match serde_json::to_string(&snapshot) {
            Ok(record) => {
                println!("{record}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to serialize snapshot: {e}");
                ExitCode::FAILURE
            }
        },
        Ok(SweepOutcome::Exhausted { missing }) => {
            let names: Vec<_> = missing.iter().map(|m| m.name()).collect();
            eprintln!(
                "gave up after the round budget; never acquired: {}",
                names.join(", ")
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: Option<String>) -> Result<SweepOutcome> {
    let hid_api = HidApi::new()?;

    let mut channel = match path {
        Some(p) => {
            let cpath = CString::new(p.clone()).map_err(|_| Error::InvalidPath(p))?;
            UpsChannel::open(hid_api, &cpath)?
        }
        None => {
            let info = find_first(&hid_api)?;
            UpsChannel::open(hid_api, &info.path)?
        }
    };

    Ok(Sweep::new().run(&mut channel))
}
