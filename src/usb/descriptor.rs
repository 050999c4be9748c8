//! Typed views over the interface, HID and endpoint descriptors that make
//! up a boot-protocol HID function.
//!
//! ```text
//! Interface (9) | HID (9) | Endpoint (7)
//! ```

use crate::error::{Error, Result};

// Descriptor types
pub const DESC_TYPE_INTERFACE: u8 = 0x04;
pub const DESC_TYPE_ENDPOINT: u8 = 0x05;
pub const DESC_TYPE_HID: u8 = 0x21;
pub const DESC_TYPE_REPORT: u8 = 0x22;

// Descriptor sizes
pub const INTERFACE_DESC_LEN: usize = 9;
pub const HID_DESC_LEN: usize = 9;
pub const ENDPOINT_DESC_LEN: usize = 7;

// Interface class codes
pub const CLASS_HID: u8 = 0x03;
pub const SUBCLASS_NONE: u8 = 0x00;
pub const SUBCLASS_BOOT: u8 = 0x01;
pub const PROTOCOL_NONE: u8 = 0x00;
pub const PROTOCOL_KEYBOARD: u8 = 0x01;
pub const PROTOCOL_MOUSE: u8 = 0x02;

/// Standard interface descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterfaceDescriptor {
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
}

impl InterfaceDescriptor {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let d = header(data, DESC_TYPE_INTERFACE, INTERFACE_DESC_LEN)?;
        Ok(Self {
            interface_number: d[2],
            alternate_setting: d[3],
            num_endpoints: d[4],
            class: d[5],
            subclass: d[6],
            protocol: d[7],
        })
    }

    pub fn is_boot(&self) -> bool {
        self.subclass == SUBCLASS_BOOT
    }
}

/// HID class descriptor (single subordinate report descriptor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidDescriptor {
    pub bcd_hid: u16,
    pub country_code: u8,
    pub num_descriptors: u8,
    pub report_type: u8,
    /// Length of the report descriptor (wDescriptorLength).
    pub report_length: u16,
}

impl HidDescriptor {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let d = header(data, DESC_TYPE_HID, HID_DESC_LEN)?;
        Ok(Self {
            bcd_hid: u16::from_le_bytes([d[2], d[3]]),
            country_code: d[4],
            num_descriptors: d[5],
            report_type: d[6],
            report_length: u16::from_le_bytes([d[7], d[8]]),
        })
    }
}

/// Standard endpoint descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndpointDescriptor {
    pub address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl EndpointDescriptor {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let d = header(data, DESC_TYPE_ENDPOINT, ENDPOINT_DESC_LEN)?;
        Ok(Self {
            address: d[2],
            attributes: d[3],
            max_packet_size: u16::from_le_bytes([d[4], d[5]]),
            interval: d[6],
        })
    }

    /// Device-to-host endpoint.
    pub fn is_in(&self) -> bool {
        self.address & 0x80 != 0
    }
}

/// Type byte of the descriptor at the start of `data`.
pub fn descriptor_type(data: &[u8]) -> Result<u8> {
    data.get(1).copied().ok_or(Error::Truncated)
}

/// Skip the descriptor at the start of `data`, using its bLength.
pub fn next_descriptor(data: &[u8]) -> Result<&[u8]> {
    let len = *data.first().ok_or(Error::Truncated)? as usize;
    if len < 2 {
        return Err(Error::InvalidDescriptor);
    }
    data.get(len..).ok_or(Error::Truncated)
}

fn header(data: &[u8], expected_type: u8, min_len: usize) -> Result<&[u8]> {
    if descriptor_type(data)? != expected_type {
        return Err(Error::InvalidDescriptor);
    }
    if (data[0] as usize) < min_len {
        return Err(Error::InvalidDescriptor);
    }
    data.get(..min_len).ok_or(Error::Truncated)
}
