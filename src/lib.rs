//! Device-side USB HID class core.
//!
//! Binds boot-protocol keyboard and mouse interfaces at enumeration,
//! answers the HID control requests (GET_DESCRIPTOR(Report), GET_REPORT,
//! SET_REPORT, SET_IDLE, GET_IDLE, GET_PROTOCOL) and delivers input reports
//! over the interrupt IN endpoint, including string typing.
//!
//! Hardware is reached only through [`ControllerDriver`], so the whole
//! crate runs on the host for tests: `cargo test`.
//!
//! Features:
//! - `boot-protocol` (default): separate keyboard and mouse interfaces.
//!   Without it a single composite interface is used.
//! - `defmt`: `defmt::Format` on public types and logging through `defmt`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to later modules.
#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod hid;
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use error::{DriverError, Error, Result};
pub use hid::keyboard::{KeyboardLeds, KeyboardReport};
pub use hid::keycode::{ascii_to_keycode, KeyMapping, ASCII_TO_KEYCODE};
pub use hid::mouse::MouseReport;
pub use hid::{LedTracker, NoReportHandler, ReportHandler, ReportType, Role};
pub use usb::control::ControlOutcome;
pub use usb::descriptor::{EndpointDescriptor, HidDescriptor, InterfaceDescriptor};
pub use usb::device::HidDevice;
pub use usb::driver::{ControllerDriver, TransferEvent};
pub use usb::interface::{ControlStage, InterfaceRecord, Registry, ReportDescriptors};
pub use usb::request::{ControlRequest, Direction, Recipient, RequestKind};
