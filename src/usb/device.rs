//! HID function core: interface binding, report delivery and typing.
//!
//! [`HidDevice`] owns the interface registry and is driven by the
//! surrounding USB stack:
//!
//! - `reset` on bus reset / disconnect,
//! - `bind_interface` for each HID interface during enumeration,
//! - `handle_control_request` and friends for control transfers
//!   (see `usb::control`),
//! - `handle_transfer_complete` for interrupt endpoint completions.
//!
//! Application code sends reports through the keyboard/mouse API. Every
//! send is a single attempt: it fails when the device is not mounted or
//! the endpoint still has a transfer in flight, and nothing is queued.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::{BOOT_PROTOCOL, CONTROL_BUFFER_SIZE, REPORT_BUFFER_SIZE};
use crate::error::{Error, Result};
use crate::hid::keyboard::KeyboardReport;
use crate::hid::keycode::ascii_to_keycode;
use crate::hid::mouse::MouseReport;
use crate::hid::{NoReportHandler, ReportHandler, Role};
use crate::usb::descriptor::{
    descriptor_type, next_descriptor, EndpointDescriptor, HidDescriptor, InterfaceDescriptor,
    DESC_TYPE_ENDPOINT, DESC_TYPE_HID, ENDPOINT_DESC_LEN, HID_DESC_LEN, INTERFACE_DESC_LEN,
    PROTOCOL_KEYBOARD, PROTOCOL_MOUSE,
};
use crate::usb::driver::{ControllerDriver, TransferEvent};
use crate::usb::interface::{ControlStage, Registry, ReportDescriptors};

/// Device-side HID class.
///
/// `K` and `M` answer GET_REPORT/SET_REPORT for the keyboard and mouse
/// interfaces respectively.
pub struct HidDevice<D, K = NoReportHandler, M = NoReportHandler> {
    pub(crate) driver: D,
    pub(crate) registry: Registry,
    pub(crate) descriptors: ReportDescriptors,
    pub(crate) keyboard_handler: K,
    pub(crate) mouse_handler: M,
    /// Shared control-transfer staging buffer.
    pub(crate) control_buffer: Vec<u8, CONTROL_BUFFER_SIZE>,
}

impl<D: ControllerDriver> HidDevice<D> {
    /// Device with the built-in report descriptors and no report hooks.
    pub fn new(driver: D) -> Self {
        Self::with_handlers(
            driver,
            ReportDescriptors::default(),
            NoReportHandler,
            NoReportHandler,
        )
    }
}

impl<D, K, M> HidDevice<D, K, M>
where
    D: ControllerDriver,
    K: ReportHandler,
    M: ReportHandler,
{
    pub fn with_handlers(
        driver: D,
        descriptors: ReportDescriptors,
        keyboard_handler: K,
        mouse_handler: M,
    ) -> Self {
        Self {
            driver,
            registry: Registry::new(),
            descriptors,
            keyboard_handler,
            mouse_handler,
            control_buffer: Vec::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn keyboard_handler(&self) -> &K {
        &self.keyboard_handler
    }

    pub fn mouse_handler(&self) -> &M {
        &self.mouse_handler
    }

    /// Zero all interface state (bus reset / disconnect).
    pub fn reset(&mut self) {
        debug!("HID reset");
        self.registry.reset();
        self.control_buffer.clear();
    }

    // Enumeration

    /// Bind the HID interface whose descriptor chain starts at `desc`.
    ///
    /// Expects the boot-protocol layout: interface, HID, then one endpoint
    /// descriptor. Returns the number of descriptor bytes consumed.
    pub fn bind_interface(&mut self, desc: &[u8]) -> Result<usize> {
        let itf = InterfaceDescriptor::parse(desc)?;

        let hid_desc = next_descriptor(desc)?;
        if descriptor_type(hid_desc)? != DESC_TYPE_HID {
            warn!("interface {=u8}: HID descriptor missing", itf.interface_number);
            return Err(Error::InvalidDescriptor);
        }
        let hid = HidDescriptor::parse(hid_desc)?;

        let ep_desc = next_descriptor(hid_desc)?;
        if descriptor_type(ep_desc)? != DESC_TYPE_ENDPOINT {
            warn!("interface {=u8}: endpoint descriptor missing", itf.interface_number);
            return Err(Error::InvalidDescriptor);
        }
        let ep = EndpointDescriptor::parse(ep_desc)?;

        if !itf.is_boot() {
            // Generic (report-protocol only) HID is not supported.
            warn!("interface {=u8}: non-boot HID not supported", itf.interface_number);
            return Err(Error::InvalidDescriptor);
        }

        let role = match itf.protocol {
            PROTOCOL_KEYBOARD => Role::Keyboard,
            PROTOCOL_MOUSE => Role::Mouse,
            other => {
                warn!("interface {=u8}: unsupported boot protocol {=u8}", itf.interface_number, other);
                return Err(Error::InvalidDescriptor);
            }
        };

        let report_descriptor = self
            .descriptors
            .for_role(role)
            .ok_or(Error::DescriptorCorrupted)?;

        // Endpoint and interface number must not belong to another record.
        // A composite build has a single record, which is simply rebound.
        let clash = BOOT_PROTOCOL
            && self.registry.records().iter().any(|r| {
                r.is_bound()
                    && r.role() != Some(role)
                    && (r.in_endpoint() == ep.address
                        || r.interface_number() == itf.interface_number)
            });
        if clash {
            warn!("interface {=u8}: endpoint or interface already bound", itf.interface_number);
            return Err(Error::InvalidDescriptor);
        }

        self.driver.open_endpoint(&ep)?;

        let record = self.registry.slot_mut(role);
        if let Some(previous) = record.role {
            if previous != role {
                warn!("composite interface rebound as {}", role);
            }
        }
        record.role = Some(role);
        record.report_descriptor = report_descriptor;
        record.report_length = hid.report_length;
        record.interface_number = itf.interface_number;
        record.in_endpoint = ep.address;
        record.report_id = 0;
        record.stage = ControlStage::Idle;

        info!(
            "HID {} bound: interface {=u8}, endpoint {=u8:#x}",
            role, itf.interface_number, ep.address
        );

        Ok(INTERFACE_DESC_LEN + HID_DESC_LEN + ENDPOINT_DESC_LEN)
    }

    /// Interrupt endpoint completion. Nothing is tracked per transfer yet.
    pub fn handle_transfer_complete(
        &mut self,
        ep_addr: u8,
        event: TransferEvent,
        bytes: usize,
    ) -> Result<()> {
        match self.registry.by_endpoint(ep_addr) {
            Some(record) => trace!(
                "endpoint {=u8:#x} ({}) {}: {=usize} bytes",
                ep_addr,
                record.role(),
                event,
                bytes
            ),
            None => debug!("completion on unbound endpoint {=u8:#x}", ep_addr),
        }
        Ok(())
    }

    // Report channel

    /// Whether the endpoint of `role` has a transfer in flight.
    pub fn is_busy(&self, role: Role) -> bool {
        self.registry
            .by_role(role)
            .map(|r| self.driver.endpoint_busy(r.in_endpoint()))
            .unwrap_or(false)
    }

    /// Stage `report` (or zeros) in the role's report buffer and start the
    /// transfer.
    fn send_report(&mut self, role: Role, report: Option<&[u8]>) -> Result<()> {
        if !self.driver.is_mounted() {
            trace!("{} report dropped: not mounted", role);
            return Err(Error::NotMounted);
        }
        let record = self.registry.by_role_mut(role).ok_or(Error::NotBound)?;
        if self.driver.endpoint_busy(record.in_endpoint) {
            trace!("{} report dropped: endpoint busy", role);
            return Err(Error::Busy);
        }

        let size = role.report_size();
        match report {
            Some(bytes) => {
                let n = bytes.len().min(size);
                record.report_buffer[..n].copy_from_slice(&bytes[..n]);
            }
            None => record.report_buffer = [0; REPORT_BUFFER_SIZE],
        }

        self.driver
            .endpoint_transfer(record.in_endpoint, &record.report_buffer[..size])?;
        Ok(())
    }

    // Keyboard API

    pub fn keyboard_busy(&self) -> bool {
        self.is_busy(Role::Keyboard)
    }

    /// Send a keyboard report; `None` sends the all-released report.
    pub fn keyboard_send_report(&mut self, report: Option<&KeyboardReport>) -> Result<()> {
        match report {
            Some(report) => self.send_report(Role::Keyboard, Some(&report.to_bytes())),
            None => self.send_report(Role::Keyboard, None),
        }
    }

    pub fn keyboard_send_keycode(&mut self, modifier: u8, keycodes: [u8; 6]) -> Result<()> {
        self.keyboard_send_report(Some(&KeyboardReport::new(modifier, keycodes)))
    }

    /// Press the key for `ch` (US layout). Characters without a key send
    /// an empty key slot.
    pub fn keyboard_send_char(&mut self, ch: char) -> Result<()> {
        let mapping = ascii_to_keycode(ch);
        self.keyboard_send_report(Some(&KeyboardReport::single(mapping.keycode, mapping.shift)))
    }

    /// Type `text`, waiting `interval_ms` after every report.
    ///
    /// A release report is only sent before a repeated character and after
    /// the last one; otherwise the next key press replaces the previous key.
    /// `delay` must actually wait: the endpoint has to drain between
    /// reports or the next send fails with [`Error::Busy`].
    pub fn keyboard_send_string<T: DelayNs>(
        &mut self,
        text: &str,
        interval_ms: u32,
        delay: &mut T,
    ) -> Result<()> {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            self.keyboard_send_char(ch)?;
            delay.delay_ms(interval_ms);

            let release = chars.peek().map_or(true, |&next| next == ch);
            if release {
                self.keyboard_send_report(None)?;
                delay.delay_ms(interval_ms);
            }
        }
        Ok(())
    }

    // Mouse API

    pub fn mouse_busy(&self) -> bool {
        self.is_busy(Role::Mouse)
    }

    pub fn mouse_send(&mut self, report: &MouseReport) -> Result<()> {
        self.send_report(Role::Mouse, Some(&report.to_bytes()))
    }
}
