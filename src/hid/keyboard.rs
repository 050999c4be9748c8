//! Boot-protocol keyboard report and LED output report.
//!
//! The input report is 8 bytes: modifier bits (`MODIFIER_*`), one reserved
//! byte, then six key usage codes.
//!
//! Output report layout (1 byte): LED bitfield, see [`KeyboardLeds`].

pub const KEYBOARD_REPORT_SIZE: usize = 8;

pub const MODIFIER_LEFT_CTRL: u8 = 1 << 0;
pub const MODIFIER_LEFT_SHIFT: u8 = 1 << 1;
pub const MODIFIER_LEFT_ALT: u8 = 1 << 2;
pub const MODIFIER_LEFT_GUI: u8 = 1 << 3;
pub const MODIFIER_RIGHT_CTRL: u8 = 1 << 4;
pub const MODIFIER_RIGHT_SHIFT: u8 = 1 << 5;
pub const MODIFIER_RIGHT_ALT: u8 = 1 << 6;
pub const MODIFIER_RIGHT_GUI: u8 = 1 << 7;

/// Keyboard input report as sent on the interrupt IN endpoint.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// `MODIFIER_*` bits.
    pub modifier: u8,
    /// Always 0 on send.
    pub reserved: u8,
    /// Pressed keys, unused slots are 0.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    pub const fn new(modifier: u8, keycodes: [u8; 6]) -> Self {
        Self {
            modifier,
            reserved: 0,
            keycodes,
        }
    }

    /// All keys released.
    pub const fn empty() -> Self {
        Self::new(0, [0; 6])
    }

    /// One key down, with left shift when `shift` is set.
    pub const fn single(keycode: u8, shift: bool) -> Self {
        let modifier = if shift { MODIFIER_LEFT_SHIFT } else { 0 };
        Self::new(modifier, [keycode, 0, 0, 0, 0, 0])
    }

    /// Decode the first 8 bytes of `data`.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let [modifier, reserved, k0, k1, k2, k3, k4, k5, ..] = *data else {
            return None;
        };
        Some(Self {
            modifier,
            reserved,
            keycodes: [k0, k1, k2, k3, k4, k5],
        })
    }

    pub const fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let [k0, k1, k2, k3, k4, k5] = self.keycodes;
        [self.modifier, self.reserved, k0, k1, k2, k3, k4, k5]
    }

    /// Write the report into the front of `buf`. Returns the bytes written,
    /// 0 when `buf` is shorter than a report.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match buf.get_mut(..KEYBOARD_REPORT_SIZE) {
            Some(out) => {
                out.copy_from_slice(&self.to_bytes());
                KEYBOARD_REPORT_SIZE
            }
            None => 0,
        }
    }

    /// No key and no modifier held.
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes == [0; 6]
    }
}

/// Keyboard LED state carried by a SET_REPORT output report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardLeds(pub u8);

impl KeyboardLeds {
    pub const NUM_LOCK: u8 = 1 << 0;
    pub const CAPS_LOCK: u8 = 1 << 1;
    pub const SCROLL_LOCK: u8 = 1 << 2;
    pub const COMPOSE: u8 = 1 << 3;
    pub const KANA: u8 = 1 << 4;

    /// Decode an output report. Boot keyboards send one byte; a leading
    /// report ID is not expected.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        data.first().map(|&bits| Self(bits & 0x1F))
    }

    pub fn num_lock(&self) -> bool {
        self.0 & Self::NUM_LOCK != 0
    }

    pub fn caps_lock(&self) -> bool {
        self.0 & Self::CAPS_LOCK != 0
    }

    pub fn scroll_lock(&self) -> bool {
        self.0 & Self::SCROLL_LOCK != 0
    }

    pub fn compose(&self) -> bool {
        self.0 & Self::COMPOSE != 0
    }

    pub fn kana(&self) -> bool {
        self.0 & Self::KANA != 0
    }
}

// Boot keyboard report descriptor

/// Boot keyboard report descriptor. Input: modifier bits, a constant byte
/// and a 6-key array. Output: 5 LED bits padded to one byte.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    0xC0, // End Collection
];
