//! HID control request handling.

mod common;

use common::*;
use hidd::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use hidd::usb::request::*;
use hidd::{
    ControlOutcome, ControlRequest, ControlStage, Direction, DriverError, Error, HidDevice,
    KeyboardLeds, LedTracker, NoReportHandler, ReportDescriptors, ReportHandler, ReportType,
};

fn bound_keyboard() -> (HidDevice<FakeDriver>, FakeDriver) {
    let bus = Bus::new();
    let mut dev = HidDevice::new(FakeDriver(bus.clone()));
    dev.bind_interface(&keyboard_interface(0)).unwrap();
    let probe = FakeDriver(bus);
    probe.clear();
    (dev, probe)
}

fn class_in(request: u8, value: u16, length: u16) -> ControlRequest {
    ControlRequest::class(Direction::In, request, value, 0, length)
}

fn class_out(request: u8, value: u16, length: u16) -> ControlRequest {
    ControlRequest::class(Direction::Out, request, value, 0, length)
}

// ═══════════════════════════════════════════════════════════════════════════
// Routing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unknown_interface_fails_without_touching_the_bus() {
    let (mut dev, probe) = bound_keyboard();
    let req = ControlRequest::class(Direction::In, HID_REQ_GET_IDLE, 0, 5, 1);

    assert_eq!(dev.handle_control_request(&req), Err(Error::UnknownInterface));
    assert!(probe.events().is_empty());
}

#[test]
fn vendor_request_is_stalled() {
    let (mut dev, probe) = bound_keyboard();
    let req = ControlRequest::parse(&[0xC1, 0x01, 0, 0, 0, 0, 1, 0]);

    assert_eq!(dev.handle_control_request(&req), Ok(ControlOutcome::Stalled));
    assert_eq!(probe.events(), vec![Event::Stall]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Standard Requests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn get_report_descriptor_sends_whole_descriptor() {
    let (mut dev, probe) = bound_keyboard();
    let req = ControlRequest::get_report_descriptor(0, 0xFF);

    assert_eq!(dev.handle_control_request(&req), Ok(ControlOutcome::DataStage));
    assert_eq!(
        probe.events(),
        vec![Event::ControlIn(payload_of(KEYBOARD_REPORT_DESCRIPTOR))]
    );
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::AwaitingStatus
    );
}

#[test]
fn get_report_descriptor_is_limited_by_wlength() {
    let (mut dev, probe) = bound_keyboard();
    let req = ControlRequest::get_report_descriptor(0, 9);

    dev.handle_control_request(&req).unwrap();
    assert_eq!(
        probe.events(),
        vec![Event::ControlIn(payload_of(&KEYBOARD_REPORT_DESCRIPTOR[..9]))]
    );
}

#[test]
fn oversized_report_length_fails_instead_of_copying() {
    static BIG: [u8; 100] = [0x05; 100];
    let bus = Bus::new();
    let descriptors = ReportDescriptors {
        keyboard: Some(&BIG[..]),
        mouse: None,
    };
    let mut dev = HidDevice::with_handlers(
        FakeDriver(bus.clone()),
        descriptors,
        NoReportHandler,
        NoReportHandler,
    );
    dev.bind_interface(&hid_interface(0, 1, 1, 100, KEYBOARD_EP)).unwrap();
    bus.borrow_mut().events.clear();

    let req = ControlRequest::get_report_descriptor(0, 100);
    assert_eq!(
        dev.handle_control_request(&req),
        Err(Error::ReportTooLarge {
            length: 100,
            capacity: hidd::config::CONTROL_BUFFER_SIZE
        })
    );
    assert!(bus.borrow().events.is_empty());
}

#[test]
fn other_standard_requests_are_stalled() {
    let (mut dev, probe) = bound_keyboard();
    // GET_DESCRIPTOR(HID) is not served here.
    let hid_desc = ControlRequest::parse(&[0x81, 0x06, 0x00, 0x21, 0, 0, 9, 0]);
    // GET_STATUS
    let status = ControlRequest::parse(&[0x81, 0x00, 0, 0, 0, 0, 2, 0]);

    assert_eq!(dev.handle_control_request(&hid_desc), Ok(ControlOutcome::Stalled));
    assert_eq!(dev.handle_control_request(&status), Ok(ControlOutcome::Stalled));
    assert_eq!(probe.events(), vec![Event::Stall, Event::Stall]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Idle & Protocol
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn set_idle_then_get_idle_round_trips_high_byte() {
    let (mut dev, probe) = bound_keyboard();

    let set = class_out(HID_REQ_SET_IDLE, 0x7D00, 0);
    assert_eq!(dev.handle_control_request(&set), Ok(ControlOutcome::Status));
    assert_eq!(dev.registry().by_interface(0).unwrap().idle_rate(), 0x7D);
    assert_eq!(dev.registry().by_interface(0).unwrap().idle_duration_ms(), 500);

    let get = class_in(HID_REQ_GET_IDLE, 0, 1);
    assert_eq!(dev.handle_control_request(&get), Ok(ControlOutcome::DataStage));

    assert_eq!(
        probe.events(),
        vec![
            Event::Status(Direction::Out),
            Event::ControlIn(payload_of(&[0x7D])),
        ]
    );
}

#[test]
fn set_idle_ignores_report_id_byte() {
    let (mut dev, _probe) = bound_keyboard();
    dev.handle_control_request(&class_out(HID_REQ_SET_IDLE, 0x1203, 0))
        .unwrap();
    assert_eq!(dev.registry().by_interface(0).unwrap().idle_rate(), 0x12);
}

#[test]
fn idle_rate_is_zero_after_reset() {
    let (mut dev, _probe) = bound_keyboard();
    dev.handle_control_request(&class_out(HID_REQ_SET_IDLE, 0x2000, 0))
        .unwrap();

    dev.reset();
    assert!(dev.registry().records().iter().all(|r| r.idle_rate() == 0));

    // Rebinding after reset starts from a zero idle rate as well.
    dev.bind_interface(&keyboard_interface(0)).unwrap();
    assert_eq!(dev.registry().by_interface(0).unwrap().idle_rate(), 0);
}

#[test]
fn get_protocol_reports_build_configuration() {
    let (mut dev, probe) = bound_keyboard();

    dev.handle_control_request(&class_in(HID_REQ_GET_PROTOCOL, 0, 1))
        .unwrap();

    let expected = if cfg!(feature = "boot-protocol") { 0 } else { 1 };
    assert_eq!(probe.events(), vec![Event::ControlIn(payload_of(&[expected]))]);
}

#[test]
fn get_idle_surfaces_control_failure() {
    let (mut dev, probe) = bound_keyboard();
    probe.0.borrow_mut().fail_control = true;

    assert_eq!(
        dev.handle_control_request(&class_in(HID_REQ_GET_IDLE, 0, 1)),
        Err(Error::Driver(DriverError::Control))
    );
    assert!(probe.events().is_empty());
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::Idle
    );
}

#[test]
fn set_protocol_is_stalled() {
    let (mut dev, probe) = bound_keyboard();

    let outcome = dev.handle_control_request(&class_out(HID_REQ_SET_PROTOCOL, 1, 0));

    assert_eq!(outcome, Ok(ControlOutcome::Stalled));
    assert_eq!(probe.events(), vec![Event::Stall]);
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::Idle
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// GET_REPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn get_report_without_handler_resends_cached_report() {
    let (mut dev, probe) = bound_keyboard();
    dev.keyboard_send_char('a').unwrap();
    probe.clear();

    let req = class_in(HID_REQ_GET_REPORT, 0x0100, 8);
    assert_eq!(dev.handle_control_request(&req), Ok(ControlOutcome::DataStage));
    assert_eq!(
        probe.events(),
        vec![Event::ControlIn(payload_of(&[0, 0, 0x04, 0, 0, 0, 0, 0]))]
    );
}

#[test]
fn get_report_length_is_clamped_to_report_buffer() {
    let (mut dev, probe) = bound_keyboard();

    dev.handle_control_request(&class_in(HID_REQ_GET_REPORT, 0x0100, 64))
        .unwrap();

    assert_eq!(probe.events(), vec![Event::ControlIn(payload_of(&[0; 9]))]);
}

#[test]
fn get_report_zero_length_is_an_error() {
    let (mut dev, probe) = bound_keyboard();

    assert_eq!(
        dev.handle_control_request(&class_in(HID_REQ_GET_REPORT, 0x0100, 0)),
        Err(Error::EmptyReport)
    );
    assert!(probe.events().is_empty());
}

struct FixedReport;

impl ReportHandler for FixedReport {
    fn get_report(&mut self, report_type: ReportType, buf: &mut [u8], _requested: usize) -> usize {
        assert_eq!(report_type, ReportType::Input);
        buf[..3].copy_from_slice(&[0x01, 0x02, 0x03]);
        3
    }
}

struct EmptyReport;

impl ReportHandler for EmptyReport {
    fn get_report(&mut self, _: ReportType, _: &mut [u8], _: usize) -> usize {
        0
    }
}

#[test]
fn get_report_uses_handler_length() {
    let bus = Bus::new();
    let mut dev = HidDevice::with_handlers(
        FakeDriver(bus.clone()),
        ReportDescriptors::default(),
        FixedReport,
        NoReportHandler,
    );
    dev.bind_interface(&keyboard_interface(0)).unwrap();
    bus.borrow_mut().events.clear();

    dev.handle_control_request(&class_in(HID_REQ_GET_REPORT, 0x0100, 8))
        .unwrap();

    assert_eq!(
        bus.borrow().events,
        vec![Event::ControlIn(payload_of(&[0x01, 0x02, 0x03]))]
    );
}

#[test]
fn get_report_handler_returning_nothing_fails() {
    let bus = Bus::new();
    let mut dev = HidDevice::with_handlers(
        FakeDriver(bus.clone()),
        ReportDescriptors::default(),
        EmptyReport,
        NoReportHandler,
    );
    dev.bind_interface(&keyboard_interface(0)).unwrap();

    assert_eq!(
        dev.handle_control_request(&class_in(HID_REQ_GET_REPORT, 0x0100, 8)),
        Err(Error::EmptyReport)
    );
}

struct FullBuffer;

impl ReportHandler for FullBuffer {
    fn get_report(&mut self, _: ReportType, buf: &mut [u8], _: usize) -> usize {
        buf.len()
    }
}

#[test]
fn get_report_never_exceeds_wlength() {
    let bus = Bus::new();
    let mut dev = HidDevice::with_handlers(
        FakeDriver(bus.clone()),
        ReportDescriptors::default(),
        FullBuffer,
        NoReportHandler,
    );
    dev.bind_interface(&keyboard_interface(0)).unwrap();
    dev.keyboard_send_char('a').unwrap();
    bus.borrow_mut().events.clear();

    dev.handle_control_request(&class_in(HID_REQ_GET_REPORT, 0x0100, 4))
        .unwrap();

    assert_eq!(
        bus.borrow().events,
        vec![Event::ControlIn(payload_of(&[0, 0, 0x04, 0]))]
    );
}

#[test]
fn get_report_on_mouse_uses_mouse_handler() {
    let bus = Bus::new();
    // The keyboard handler would fail the request if it were consulted.
    let mut dev = HidDevice::with_handlers(
        FakeDriver(bus.clone()),
        ReportDescriptors::default(),
        EmptyReport,
        FixedReport,
    );
    dev.bind_interface(&mouse_interface(1)).unwrap();
    bus.borrow_mut().events.clear();

    let req = ControlRequest::class(Direction::In, HID_REQ_GET_REPORT, 0x0100, 1, 8);
    assert_eq!(dev.handle_control_request(&req), Ok(ControlOutcome::DataStage));

    assert_eq!(
        bus.borrow().events,
        vec![Event::ControlIn(payload_of(&[0x01, 0x02, 0x03]))]
    );
}

#[test]
fn get_report_with_report_id_is_served_like_id_zero() {
    let (mut dev, probe) = bound_keyboard();

    let outcome = dev.handle_control_request(&class_in(HID_REQ_GET_REPORT, 0x0102, 8));

    assert_eq!(outcome, Ok(ControlOutcome::DataStage));
    assert_eq!(probe.events(), vec![Event::ControlIn(payload_of(&[0; 8]))]);
}

// ═══════════════════════════════════════════════════════════════════════════
// SET_REPORT
// ═══════════════════════════════════════════════════════════════════════════

fn led_keyboard() -> (HidDevice<FakeDriver, LedTracker>, FakeDriver) {
    let bus = Bus::new();
    let mut dev = HidDevice::with_handlers(
        FakeDriver(bus.clone()),
        ReportDescriptors::default(),
        LedTracker::default(),
        NoReportHandler,
    );
    dev.bind_interface(&keyboard_interface(0)).unwrap();
    let probe = FakeDriver(bus);
    probe.clear();
    (dev, probe)
}

#[test]
fn set_report_delivers_data_stage_to_handler() {
    let (mut dev, probe) = led_keyboard();

    let setup = class_out(HID_REQ_SET_REPORT, 0x0200, 1);
    assert_eq!(dev.handle_control_request(&setup), Ok(ControlOutcome::DataStage));
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::AwaitingData {
            report_type: ReportType::Output,
            length: 1
        }
    );
    // Nothing reaches the handler before the data stage.
    assert!(!dev.keyboard_handler().leds.caps_lock());

    assert_eq!(
        dev.handle_control_data(0, &[KeyboardLeds::CAPS_LOCK]),
        Ok(ControlOutcome::Status)
    );
    assert!(dev.keyboard_handler().leds.caps_lock());
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::AwaitingStatus
    );

    dev.handle_control_status(0).unwrap();
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::Idle
    );

    assert_eq!(
        probe.events(),
        vec![Event::ControlOut(1), Event::Status(Direction::Out)]
    );
}

#[test]
fn set_report_without_handler_is_accepted() {
    let (mut dev, probe) = bound_keyboard();

    dev.handle_control_request(&class_out(HID_REQ_SET_REPORT, 0x0200, 1))
        .unwrap();
    assert_eq!(dev.handle_control_data(0, &[0x01]), Ok(ControlOutcome::Status));

    assert_eq!(
        probe.events(),
        vec![Event::ControlOut(1), Event::Status(Direction::Out)]
    );
}

#[test]
fn set_report_larger_than_control_buffer_fails() {
    let (mut dev, probe) = bound_keyboard();

    let req = class_out(HID_REQ_SET_REPORT, 0x0200, 65);
    assert!(matches!(
        dev.handle_control_request(&req),
        Err(Error::ReportTooLarge { length: 65, .. })
    ));
    assert!(probe.events().is_empty());
}

#[test]
fn set_report_control_failure_leaves_no_pending_data_stage() {
    let (mut dev, probe) = led_keyboard();
    probe.0.borrow_mut().fail_control = true;

    assert_eq!(
        dev.handle_control_request(&class_out(HID_REQ_SET_REPORT, 0x0200, 1)),
        Err(Error::Driver(DriverError::Control))
    );
    assert_eq!(
        dev.registry().by_interface(0).unwrap().stage(),
        ControlStage::Idle
    );
}

#[test]
fn unexpected_data_stage_is_stalled() {
    let (mut dev, probe) = led_keyboard();

    assert_eq!(dev.handle_control_data(0, &[0x02]), Ok(ControlOutcome::Stalled));
    assert_eq!(probe.events(), vec![Event::Stall]);
    assert!(!dev.keyboard_handler().leds.caps_lock());
}

#[test]
fn new_setup_supersedes_pending_set_report() {
    let (mut dev, probe) = led_keyboard();

    dev.handle_control_request(&class_out(HID_REQ_SET_REPORT, 0x0200, 1))
        .unwrap();
    dev.handle_control_request(&class_in(HID_REQ_GET_IDLE, 0, 1))
        .unwrap();

    // The SET_REPORT data stage is no longer expected.
    assert_eq!(
        dev.handle_control_data(0, &[KeyboardLeds::CAPS_LOCK]),
        Ok(ControlOutcome::Stalled)
    );
    assert!(!dev.keyboard_handler().leds.caps_lock());
    assert_eq!(probe.events().last(), Some(&Event::Stall));
}

#[test]
fn data_for_unknown_interface_fails() {
    let (mut dev, _probe) = bound_keyboard();
    assert_eq!(dev.handle_control_data(3, &[0]), Err(Error::UnknownInterface));
    assert_eq!(dev.handle_control_status(3), Err(Error::UnknownInterface));
}
