//! HID control request handling.
//!
//! A request addressed to a bound interface is answered in one of three
//! ways: a data stage is started, a status stage is sent right away, or
//! the control endpoint is stalled. SET_REPORT spans two calls: the setup
//! arms the OUT data stage and [`HidDevice::handle_control_data`] finishes
//! it. The per-interface [`ControlStage`] tracks where a transfer is; a new
//! setup packet always starts over.

use crate::config::{BOOT_PROTOCOL, CONTROL_BUFFER_SIZE, REPORT_BUFFER_SIZE};
use crate::error::{Error, Result};
use crate::hid::{ReportHandler, ReportType, Role};
use crate::usb::descriptor::DESC_TYPE_REPORT;
use crate::usb::device::HidDevice;
use crate::usb::driver::ControllerDriver;
use crate::usb::interface::{ControlStage, InterfaceRecord};
use crate::usb::request::{
    ControlRequest, Direction, RequestKind, HID_REQ_GET_IDLE, HID_REQ_GET_PROTOCOL,
    HID_REQ_GET_REPORT, HID_REQ_SET_IDLE, HID_REQ_SET_REPORT, REQ_GET_DESCRIPTOR,
};

/// GET_PROTOCOL answer: 0 is boot protocol, 1 is report protocol.
const PROTOCOL_VALUE: u8 = if BOOT_PROTOCOL { 0 } else { 1 };

/// How a control request was answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlOutcome {
    /// A data stage was started.
    DataStage,
    /// The status stage was sent without a data stage.
    Status,
    /// The request is not supported; the endpoint was stalled.
    Stalled,
}

impl<D, K, M> HidDevice<D, K, M>
where
    D: ControllerDriver,
    K: ReportHandler,
    M: ReportHandler,
{
    /// Answer a setup packet addressed (by wIndex) to one of our interfaces.
    pub fn handle_control_request(&mut self, request: &ControlRequest) -> Result<ControlOutcome> {
        let Self {
            driver,
            registry,
            keyboard_handler,
            mouse_handler,
            control_buffer,
            ..
        } = self;

        let Some(record) = registry.by_interface_mut(request.interface()) else {
            warn!("control request for unknown interface {=u16}", request.index);
            return Err(Error::UnknownInterface);
        };
        record.stage = ControlStage::Idle;

        let outcome = match request.kind {
            RequestKind::Standard => standard_request(driver, control_buffer, record, request)?,
            RequestKind::Class => {
                let handler: &mut dyn ReportHandler = match record.role {
                    Some(Role::Mouse) => mouse_handler,
                    _ => keyboard_handler,
                };
                class_request(driver, control_buffer, record, handler, request)?
            }
            RequestKind::Vendor | RequestKind::Reserved => stall(driver, request),
        };

        record.stage = match outcome {
            ControlOutcome::Stalled => ControlStage::Idle,
            _ if matches!(record.stage, ControlStage::AwaitingData { .. }) => record.stage,
            _ => ControlStage::AwaitingStatus,
        };
        Ok(outcome)
    }

    /// OUT data stage of a SET_REPORT arrived for `interface`.
    ///
    /// Hands the payload to the report handler and sends the status stage.
    /// Data that no SET_REPORT is waiting for is stalled.
    pub fn handle_control_data(&mut self, interface: u8, data: &[u8]) -> Result<ControlOutcome> {
        let Self {
            driver,
            registry,
            keyboard_handler,
            mouse_handler,
            control_buffer,
            ..
        } = self;

        let record = registry
            .by_interface_mut(interface)
            .ok_or(Error::UnknownInterface)?;

        let ControlStage::AwaitingData {
            report_type,
            length,
        } = record.stage
        else {
            debug!("unexpected data stage on interface {=u8}", interface);
            record.stage = ControlStage::Idle;
            driver.control_stall();
            return Ok(ControlOutcome::Stalled);
        };

        let n = data.len().min(length);
        control_buffer.clear();
        control_buffer
            .extend_from_slice(&data[..n])
            .map_err(|_| Error::ReportTooLarge {
                length: n,
                capacity: CONTROL_BUFFER_SIZE,
            })?;

        let handler: &mut dyn ReportHandler = match record.role {
            Some(Role::Mouse) => mouse_handler,
            _ => keyboard_handler,
        };
        handler.set_report(report_type, control_buffer);

        driver.control_status(Direction::Out);
        record.stage = ControlStage::AwaitingStatus;
        Ok(ControlOutcome::Status)
    }

    /// Status stage finished for `interface`; the transfer is over.
    pub fn handle_control_status(&mut self, interface: u8) -> Result<()> {
        let record = self
            .registry
            .by_interface_mut(interface)
            .ok_or(Error::UnknownInterface)?;
        record.stage = ControlStage::Idle;
        Ok(())
    }
}

fn standard_request<D: ControllerDriver>(
    driver: &mut D,
    control_buffer: &mut heapless::Vec<u8, CONTROL_BUFFER_SIZE>,
    record: &InterfaceRecord,
    request: &ControlRequest,
) -> Result<ControlOutcome> {
    if request.request != REQ_GET_DESCRIPTOR || request.value_high() != DESC_TYPE_REPORT {
        return Ok(stall(driver, request));
    }

    let length = record.report_length as usize;
    if length > CONTROL_BUFFER_SIZE {
        error!(
            "report descriptor of {=usize} bytes exceeds control buffer",
            length
        );
        return Err(Error::ReportTooLarge {
            length,
            capacity: CONTROL_BUFFER_SIZE,
        });
    }
    let descriptor = record
        .report_descriptor
        .get(..length)
        .ok_or(Error::DescriptorCorrupted)?;

    control_buffer.clear();
    control_buffer
        .extend_from_slice(descriptor)
        .map_err(|_| Error::ReportTooLarge {
            length,
            capacity: CONTROL_BUFFER_SIZE,
        })?;

    let n = length.min(request.length as usize);
    transfer(driver, request.direction, &control_buffer[..n])?;
    Ok(ControlOutcome::DataStage)
}

fn class_request<D: ControllerDriver>(
    driver: &mut D,
    control_buffer: &mut heapless::Vec<u8, CONTROL_BUFFER_SIZE>,
    record: &mut InterfaceRecord,
    handler: &mut dyn ReportHandler,
    request: &ControlRequest,
) -> Result<ControlOutcome> {
    match request.request {
        HID_REQ_GET_REPORT => {
            // wValue = Report Type | Report ID
            let report_type = ReportType::from(request.value_high());
            let report_id = request.value_low();
            if report_id > 0 {
                // Multi-report routing is not defined for boot interfaces.
                debug!("GET_REPORT for report id {=u8} served as id 0", report_id);
            }

            let requested = (request.length as usize).min(REPORT_BUFFER_SIZE);
            // Never send more than the host asked for.
            let length = handler
                .get_report(report_type, &mut record.report_buffer, requested)
                .min(requested);
            if length == 0 {
                error!("GET_REPORT handler returned no data");
                return Err(Error::EmptyReport);
            }

            transfer(driver, request.direction, &record.report_buffer[..length])?;
            Ok(ControlOutcome::DataStage)
        }
        HID_REQ_SET_REPORT => {
            let report_type = ReportType::from(request.value_high());
            let length = request.length as usize;
            if length > CONTROL_BUFFER_SIZE {
                error!("SET_REPORT of {=usize} bytes exceeds control buffer", length);
                return Err(Error::ReportTooLarge {
                    length,
                    capacity: CONTROL_BUFFER_SIZE,
                });
            }

            if length == 0 {
                handler.set_report(report_type, &[]);
                driver.control_status(request.direction);
                return Ok(ControlOutcome::Status);
            }

            driver.control_out(length)?;
            record.stage = ControlStage::AwaitingData {
                report_type,
                length,
            };
            Ok(ControlOutcome::DataStage)
        }
        HID_REQ_SET_IDLE => {
            record.idle_rate = request.value_high();
            trace!("idle rate set to {=u8}", record.idle_rate);
            driver.control_status(request.direction);
            Ok(ControlOutcome::Status)
        }
        HID_REQ_GET_IDLE => {
            reply_byte(driver, control_buffer, request, record.idle_rate)?;
            Ok(ControlOutcome::DataStage)
        }
        HID_REQ_GET_PROTOCOL => {
            reply_byte(driver, control_buffer, request, PROTOCOL_VALUE)?;
            Ok(ControlOutcome::DataStage)
        }
        // SET_PROTOCOL and anything unknown
        _ => Ok(stall(driver, request)),
    }
}

fn reply_byte<D: ControllerDriver>(
    driver: &mut D,
    control_buffer: &mut heapless::Vec<u8, CONTROL_BUFFER_SIZE>,
    request: &ControlRequest,
    value: u8,
) -> Result<()> {
    control_buffer.clear();
    control_buffer
        .push(value)
        .map_err(|_| Error::ReportTooLarge {
            length: 1,
            capacity: CONTROL_BUFFER_SIZE,
        })?;
    transfer(driver, request.direction, control_buffer)
}

/// Start the data stage in the direction the request asked for.
fn transfer<D: ControllerDriver>(driver: &mut D, direction: Direction, data: &[u8]) -> Result<()> {
    match direction {
        Direction::In => driver.control_in(data)?,
        Direction::Out => driver.control_out(data.len())?,
    }
    Ok(())
}

fn stall<D: ControllerDriver>(driver: &mut D, request: &ControlRequest) -> ControlOutcome {
    debug!(
        "stalling request {=u8:#x} ({})",
        request.request, request.kind
    );
    driver.control_stall();
    ControlOutcome::Stalled
}
