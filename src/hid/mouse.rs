//! Boot-protocol mouse report.
//!
//! Four bytes: buttons, then signed X, Y and wheel deltas. A strict boot
//! host reads only the first three.

pub const MOUSE_REPORT_SIZE: usize = 4;

pub const BUTTON_LEFT: u8 = 1 << 0;
pub const BUTTON_RIGHT: u8 = 1 << 1;
pub const BUTTON_MIDDLE: u8 = 1 << 2;

/// Mouse input report. Axes and wheel are relative.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// `BUTTON_*` bits.
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
}

impl MouseReport {
    pub const fn empty() -> Self {
        Self::movement(0, 0, 0)
    }

    /// Move by (`x`, `y`) with `buttons` held and no wheel motion.
    pub const fn movement(buttons: u8, x: i8, y: i8) -> Self {
        Self {
            buttons,
            x,
            y,
            wheel: 0,
        }
    }

    /// Decode a 3-byte boot report or a 4-byte report with wheel.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match *data {
            [buttons, x, y] => Some(Self::movement(buttons, x as i8, y as i8)),
            [buttons, x, y, wheel, ..] => Some(Self {
                buttons,
                x: x as i8,
                y: y as i8,
                wheel: wheel as i8,
            }),
            _ => None,
        }
    }

    pub const fn to_bytes(&self) -> [u8; MOUSE_REPORT_SIZE] {
        [self.buttons, self.x as u8, self.y as u8, self.wheel as u8]
    }

    /// Write the report into the front of `buf`. Returns the bytes written,
    /// 0 when `buf` is shorter than a report.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match buf.get_mut(..MOUSE_REPORT_SIZE) {
            Some(out) => {
                out.copy_from_slice(&self.to_bytes());
                MOUSE_REPORT_SIZE
            }
            None => 0,
        }
    }

    /// No buttons held and nothing moved.
    pub fn is_idle(&self) -> bool {
        *self == Self::empty()
    }
}

// Boot mouse report descriptor

/// Boot mouse report descriptor: 3 buttons, X, Y and wheel.
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Constant)
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x03, //     Report Count (3)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    0xC0, //   End Collection
    0xC0, // End Collection
];
