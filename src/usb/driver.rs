//! Seam to the endpoint/controller driver.
//!
//! The HID core never touches hardware. Whatever owns the USB peripheral
//! implements [`ControllerDriver`]; transfers are asynchronous and their
//! completion comes back through the `handle_*` entry points of
//! [`HidDevice`](crate::HidDevice).

use crate::error::DriverError;
use crate::usb::descriptor::EndpointDescriptor;
use crate::usb::request::Direction;

/// Completion event for an interrupt endpoint transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferEvent {
    Complete,
    Stalled,
    Error,
}

pub trait ControllerDriver {
    /// Whether the host has configured the device.
    fn is_mounted(&self) -> bool;

    /// Open an endpoint described by `desc`.
    fn open_endpoint(&mut self, desc: &EndpointDescriptor) -> Result<(), DriverError>;

    /// Whether `ep_addr` has a transfer in flight.
    fn endpoint_busy(&self, ep_addr: u8) -> bool;

    /// Queue `data` on `ep_addr`. The driver copies or owns the bytes until
    /// completion.
    fn endpoint_transfer(&mut self, ep_addr: u8, data: &[u8]) -> Result<(), DriverError>;

    /// Start a device-to-host control data stage.
    fn control_in(&mut self, data: &[u8]) -> Result<(), DriverError>;

    /// Arm a host-to-device control data stage of `length` bytes.
    fn control_out(&mut self, length: usize) -> Result<(), DriverError>;

    /// Send the zero-length status stage of a request whose data stage
    /// (if any) ran in `direction`.
    fn control_status(&mut self, direction: Direction);

    /// Stall the control endpoint.
    fn control_stall(&mut self);
}

impl<T: ControllerDriver + ?Sized> ControllerDriver for &mut T {
    fn is_mounted(&self) -> bool {
        (**self).is_mounted()
    }

    fn open_endpoint(&mut self, desc: &EndpointDescriptor) -> Result<(), DriverError> {
        (**self).open_endpoint(desc)
    }

    fn endpoint_busy(&self, ep_addr: u8) -> bool {
        (**self).endpoint_busy(ep_addr)
    }

    fn endpoint_transfer(&mut self, ep_addr: u8, data: &[u8]) -> Result<(), DriverError> {
        (**self).endpoint_transfer(ep_addr, data)
    }

    fn control_in(&mut self, data: &[u8]) -> Result<(), DriverError> {
        (**self).control_in(data)
    }

    fn control_out(&mut self, length: usize) -> Result<(), DriverError> {
        (**self).control_out(length)
    }

    fn control_status(&mut self, direction: Direction) {
        (**self).control_status(direction)
    }

    fn control_stall(&mut self) {
        (**self).control_stall()
    }
}
