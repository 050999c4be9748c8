//! Control request (setup packet) decoding.

// Standard requests
pub const REQ_GET_DESCRIPTOR: u8 = 0x06;

// HID class requests
pub const HID_REQ_GET_REPORT: u8 = 0x01;
pub const HID_REQ_GET_IDLE: u8 = 0x02;
pub const HID_REQ_GET_PROTOCOL: u8 = 0x03;
pub const HID_REQ_SET_REPORT: u8 = 0x09;
pub const HID_REQ_SET_IDLE: u8 = 0x0A;
pub const HID_REQ_SET_PROTOCOL: u8 = 0x0B;

/// Data stage direction (bmRequestType bit 7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Host-to-device.
    Out,
    /// Device-to-host.
    In,
}

/// bmRequestType bits 6..5.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    Standard,
    Class,
    Vendor,
    Reserved,
}

/// bmRequestType bits 4..0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recipient {
    Device,
    Interface,
    Endpoint,
    Other,
}

/// Decoded setup packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRequest {
    pub direction: Direction,
    pub kind: RequestKind,
    pub recipient: Recipient,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl ControlRequest {
    /// Decode the 8-byte setup packet.
    pub fn parse(setup: &[u8; 8]) -> Self {
        let bm = setup[0];
        Self {
            direction: if bm & 0x80 != 0 {
                Direction::In
            } else {
                Direction::Out
            },
            kind: match (bm >> 5) & 0x03 {
                0 => RequestKind::Standard,
                1 => RequestKind::Class,
                2 => RequestKind::Vendor,
                _ => RequestKind::Reserved,
            },
            recipient: match bm & 0x1F {
                0 => Recipient::Device,
                1 => Recipient::Interface,
                2 => Recipient::Endpoint,
                _ => Recipient::Other,
            },
            request: setup[1],
            value: u16::from_le_bytes([setup[2], setup[3]]),
            index: u16::from_le_bytes([setup[4], setup[5]]),
            length: u16::from_le_bytes([setup[6], setup[7]]),
        }
    }

    /// Interface-recipient class request.
    pub const fn class(direction: Direction, request: u8, value: u16, index: u16, length: u16) -> Self {
        Self {
            direction,
            kind: RequestKind::Class,
            recipient: Recipient::Interface,
            request,
            value,
            index,
            length,
        }
    }

    /// GET_DESCRIPTOR(Report) addressed to an interface.
    pub const fn get_report_descriptor(interface: u8, length: u16) -> Self {
        Self {
            direction: Direction::In,
            kind: RequestKind::Standard,
            recipient: Recipient::Interface,
            request: REQ_GET_DESCRIPTOR,
            value: (super::descriptor::DESC_TYPE_REPORT as u16) << 8,
            index: interface as u16,
            length,
        }
    }

    pub const fn value_high(&self) -> u8 {
        (self.value >> 8) as u8
    }

    pub const fn value_low(&self) -> u8 {
        self.value as u8
    }

    /// Interface number addressed by wIndex.
    pub const fn interface(&self) -> u8 {
        self.index as u8
    }
}
