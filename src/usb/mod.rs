//! USB-facing side of the HID function.
//!
//! - `descriptor`: typed views over interface/HID/endpoint descriptors
//! - `request`: setup packet decoding and request codes
//! - `driver`: the endpoint/controller driver seam
//! - `interface`: per-interface records and their registry
//! - `device`: binding, report delivery and keyboard typing
//! - `control`: HID control request handling

pub mod control;
pub mod descriptor;
pub mod device;
pub mod driver;
pub mod interface;
pub mod request;
