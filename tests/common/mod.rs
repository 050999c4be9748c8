//! Fake controller driver and delay for host tests.
//!
//! Both share one [`Bus`] so the order of reports and waits can be
//! asserted from a single event log.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use hidd::{ControllerDriver, Direction, DriverError, EndpointDescriptor};

pub type Payload = heapless::Vec<u8, 64>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Open(u8),
    Transfer { ep: u8, data: Payload },
    ControlIn(Payload),
    ControlOut(usize),
    Status(Direction),
    Stall,
    DelayMs(u32),
}

#[derive(Debug)]
pub struct Bus {
    pub events: Vec<Event>,
    pub mounted: bool,
    /// Endpoint reports busy right now.
    pub busy: bool,
    /// Every transfer leaves the endpoint busy until the next delay.
    pub busy_after_transfer: bool,
    pub fail_open: bool,
    /// Interrupt transfers are rejected.
    pub fail_transfer: bool,
    /// Control data stages are rejected.
    pub fail_control: bool,
}

impl Bus {
    pub fn new() -> Rc<RefCell<Bus>> {
        Rc::new(RefCell::new(Bus {
            events: Vec::new(),
            mounted: true,
            busy: false,
            busy_after_transfer: false,
            fail_open: false,
            fail_transfer: false,
            fail_control: false,
        }))
    }
}

pub struct FakeDriver(pub Rc<RefCell<Bus>>);

impl FakeDriver {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn transfers(&self) -> Vec<(u8, Payload)> {
        self.0
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Transfer { ep, data } => Some((*ep, data.clone())),
                _ => None,
            })
            .collect()
    }
}

fn payload(data: &[u8]) -> Payload {
    Payload::from_slice(data).expect("payload fits")
}

impl ControllerDriver for FakeDriver {
    fn is_mounted(&self) -> bool {
        self.0.borrow().mounted
    }

    fn open_endpoint(&mut self, desc: &EndpointDescriptor) -> Result<(), DriverError> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_open {
            return Err(DriverError::EndpointOpen);
        }
        bus.events.push(Event::Open(desc.address));
        Ok(())
    }

    fn endpoint_busy(&self, _ep_addr: u8) -> bool {
        self.0.borrow().busy
    }

    fn endpoint_transfer(&mut self, ep_addr: u8, data: &[u8]) -> Result<(), DriverError> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_transfer {
            return Err(DriverError::Transfer);
        }
        bus.events.push(Event::Transfer {
            ep: ep_addr,
            data: payload(data),
        });
        if bus.busy_after_transfer {
            bus.busy = true;
        }
        Ok(())
    }

    fn control_in(&mut self, data: &[u8]) -> Result<(), DriverError> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_control {
            return Err(DriverError::Control);
        }
        bus.events.push(Event::ControlIn(payload(data)));
        Ok(())
    }

    fn control_out(&mut self, length: usize) -> Result<(), DriverError> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_control {
            return Err(DriverError::Control);
        }
        bus.events.push(Event::ControlOut(length));
        Ok(())
    }

    fn control_status(&mut self, direction: Direction) {
        self.0.borrow_mut().events.push(Event::Status(direction));
    }

    fn control_stall(&mut self) {
        self.0.borrow_mut().events.push(Event::Stall);
    }
}

/// Delay that completes any in-flight transfer while "waiting".
pub struct FakeDelay(pub Rc<RefCell<Bus>>);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut bus = self.0.borrow_mut();
        bus.events.push(Event::DelayMs(ms));
        bus.busy = false;
    }
}

// Descriptor builders

pub const KEYBOARD_EP: u8 = 0x81;
pub const MOUSE_EP: u8 = 0x82;

/// Interface + HID + endpoint descriptor chain.
pub fn hid_interface(itf: u8, subclass: u8, protocol: u8, report_len: u16, ep: u8) -> [u8; 25] {
    let len = report_len.to_le_bytes();
    [
        // Interface
        9, 0x04, itf, 0, 1, 0x03, subclass, protocol, 0,
        // HID
        9, 0x21, 0x11, 0x01, 0, 1, 0x22, len[0], len[1],
        // Endpoint: interrupt IN, 8 bytes, 10 ms
        7, 0x05, ep, 0x03, 8, 0, 10,
    ]
}

pub fn keyboard_interface(itf: u8) -> [u8; 25] {
    hid_interface(itf, 1, 1, hidd::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR.len() as u16, KEYBOARD_EP)
}

pub fn mouse_interface(itf: u8) -> [u8; 25] {
    hid_interface(itf, 1, 2, hidd::hid::mouse::MOUSE_REPORT_DESCRIPTOR.len() as u16, MOUSE_EP)
}

pub fn payload_of(data: &[u8]) -> Payload {
    payload(data)
}
