//! Per-interface HID state and the registry that owns it.
//!
//! With the `boot-protocol` feature there is one record per role
//! (keyboard, mouse); without it a single composite record serves
//! whichever role was bound last.

use crate::config::{IDLE_RATE_UNIT_MS, INTERFACE_COUNT, REPORT_BUFFER_SIZE};
use crate::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use crate::hid::mouse::MOUSE_REPORT_DESCRIPTOR;
use crate::hid::{ReportType, Role};

/// Where an interface is in a multi-stage control transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlStage {
    #[default]
    Idle,
    /// SET_REPORT accepted, waiting for the host's data stage.
    AwaitingData { report_type: ReportType, length: usize },
    /// Data stage done (or none), waiting for the status stage.
    AwaitingStatus,
}

/// Report descriptors served by GET_DESCRIPTOR(Report), per role.
///
/// Supplied by the surrounding descriptor tables. `None` marks a role whose
/// descriptor was left out of the build; binding it fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportDescriptors {
    pub keyboard: Option<&'static [u8]>,
    pub mouse: Option<&'static [u8]>,
}

impl ReportDescriptors {
    pub fn for_role(&self, role: Role) -> Option<&'static [u8]> {
        match role {
            Role::Keyboard => self.keyboard,
            Role::Mouse => self.mouse,
        }
    }
}

impl Default for ReportDescriptors {
    fn default() -> Self {
        Self {
            keyboard: Some(KEYBOARD_REPORT_DESCRIPTOR),
            mouse: Some(MOUSE_REPORT_DESCRIPTOR),
        }
    }
}

/// State of one HID interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceRecord {
    pub(crate) role: Option<Role>,
    pub(crate) interface_number: u8,
    pub(crate) in_endpoint: u8,
    pub(crate) idle_rate: u8,
    pub(crate) report_id: u8,
    pub(crate) report_length: u16,
    pub(crate) report_descriptor: &'static [u8],
    pub(crate) report_buffer: [u8; REPORT_BUFFER_SIZE],
    pub(crate) stage: ControlStage,
}

impl InterfaceRecord {
    pub const fn new() -> Self {
        Self {
            role: None,
            interface_number: 0,
            in_endpoint: 0,
            idle_rate: 0,
            report_id: 0,
            report_length: 0,
            report_descriptor: &[],
            report_buffer: [0; REPORT_BUFFER_SIZE],
            stage: ControlStage::Idle,
        }
    }

    /// Role bound at enumeration, `None` until then.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_bound(&self) -> bool {
        self.role.is_some()
    }

    pub fn interface_number(&self) -> u8 {
        self.interface_number
    }

    pub fn in_endpoint(&self) -> u8 {
        self.in_endpoint
    }

    /// Idle rate in 4 ms units, as set by SET_IDLE.
    pub fn idle_rate(&self) -> u8 {
        self.idle_rate
    }

    /// Idle period in milliseconds. 0 means report only on change.
    pub fn idle_duration_ms(&self) -> u32 {
        self.idle_rate as u32 * IDLE_RATE_UNIT_MS
    }

    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    /// wDescriptorLength from the HID descriptor.
    pub fn report_length(&self) -> u16 {
        self.report_length
    }

    pub fn report_descriptor(&self) -> &'static [u8] {
        self.report_descriptor
    }

    /// Last report staged on this interface.
    pub fn report_buffer(&self) -> &[u8; REPORT_BUFFER_SIZE] {
        &self.report_buffer
    }

    pub fn stage(&self) -> ControlStage {
        self.stage
    }
}

impl Default for InterfaceRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of all interface records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry {
    records: [InterfaceRecord; INTERFACE_COUNT],
}

impl Registry {
    pub const fn new() -> Self {
        const EMPTY: InterfaceRecord = InterfaceRecord::new();
        Self {
            records: [EMPTY; INTERFACE_COUNT],
        }
    }

    /// Zero every record (bus reset / disconnect).
    pub fn reset(&mut self) {
        for record in self.records.iter_mut() {
            *record = InterfaceRecord::new();
        }
    }

    pub fn records(&self) -> &[InterfaceRecord] {
        &self.records
    }

    /// Record bound to the IN endpoint `ep_addr`.
    pub fn by_endpoint(&self, ep_addr: u8) -> Option<&InterfaceRecord> {
        self.records
            .iter()
            .find(|r| r.is_bound() && r.in_endpoint == ep_addr)
    }

    /// Record bound to interface number `itf_num`.
    pub fn by_interface(&self, itf_num: u8) -> Option<&InterfaceRecord> {
        self.records
            .iter()
            .find(|r| r.is_bound() && r.interface_number == itf_num)
    }

    pub fn by_interface_mut(&mut self, itf_num: u8) -> Option<&mut InterfaceRecord> {
        self.records
            .iter_mut()
            .find(|r| r.is_bound() && r.interface_number == itf_num)
    }

    /// Record currently bound as `role`.
    pub fn by_role(&self, role: Role) -> Option<&InterfaceRecord> {
        self.records.iter().find(|r| r.role == Some(role))
    }

    pub fn by_role_mut(&mut self, role: Role) -> Option<&mut InterfaceRecord> {
        self.records.iter_mut().find(|r| r.role == Some(role))
    }

    /// Record that `role` binds into.
    pub(crate) fn slot_mut(&mut self, role: Role) -> &mut InterfaceRecord {
        let index = match role {
            Role::Keyboard => 0,
            Role::Mouse => INTERFACE_COUNT - 1,
        };
        &mut self.records[index]
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
