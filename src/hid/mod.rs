//! HID report types, roles and application report hooks.

pub mod keyboard;
pub mod keycode;
pub mod mouse;


/// Boot-protocol role an interface plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Keyboard,
    Mouse,
}

impl Role {
    /// Size of the input report sent on the interrupt endpoint.
    pub const fn report_size(self) -> usize {
        match self {
            Role::Keyboard => keyboard::KEYBOARD_REPORT_SIZE,
            Role::Mouse => mouse::MOUSE_REPORT_SIZE,
        }
    }
}

/// Report type carried in the high byte of wValue for GET/SET_REPORT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Input,
    Output,
    Feature,
    /// Reserved or invalid value, passed through untouched.
    Other(u8),
}

impl From<u8> for ReportType {
    fn from(code: u8) -> Self {
        match code {
            1 => ReportType::Input,
            2 => ReportType::Output,
            3 => ReportType::Feature,
            other => ReportType::Other(other),
        }
    }
}

impl From<ReportType> for u8 {
    fn from(t: ReportType) -> u8 {
        match t {
            ReportType::Input => 1,
            ReportType::Output => 2,
            ReportType::Feature => 3,
            ReportType::Other(code) => code,
        }
    }
}

/// Application hooks for class GET_REPORT / SET_REPORT requests.
///
/// One implementation per role. The defaults keep the cached report
/// unchanged and ignore incoming reports, so [`NoReportHandler`] is a
/// complete implementation.
pub trait ReportHandler {
    /// Fill `buf` for a GET_REPORT and return the number of bytes to send.
    ///
    /// `buf` holds the last report sent on this interface. `requested` is
    /// the host's wLength, already clamped to `buf.len()`. A larger return
    /// value is cut to `requested`. Returning 0 is a handler bug and fails
    /// the request.
    fn get_report(&mut self, report_type: ReportType, buf: &mut [u8], requested: usize) -> usize {
        let _ = (report_type, buf);
        requested
    }

    /// Called once the SET_REPORT data stage has arrived.
    fn set_report(&mut self, report_type: ReportType, data: &[u8]) {
        let _ = (report_type, data);
    }
}

/// Handler that leaves every report untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReportHandler;

impl ReportHandler for NoReportHandler {}

impl<T: ReportHandler + ?Sized> ReportHandler for &mut T {
    fn get_report(&mut self, report_type: ReportType, buf: &mut [u8], requested: usize) -> usize {
        (**self).get_report(report_type, buf, requested)
    }

    fn set_report(&mut self, report_type: ReportType, data: &[u8]) {
        (**self).set_report(report_type, data)
    }
}

/// Keyboard handler that tracks the LED state the host writes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedTracker {
    pub leds: keyboard::KeyboardLeds,
}

impl ReportHandler for LedTracker {
    fn set_report(&mut self, report_type: ReportType, data: &[u8]) {
        if report_type != ReportType::Output {
            return;
        }
        if let Some(leds) = keyboard::KeyboardLeds::from_bytes(data) {
            debug!("keyboard LEDs: {=u8:#x}", leds.0);
            self.leds = leds;
        }
    }
}
