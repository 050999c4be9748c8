//! Unified error type for hidd.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for
//! efficient on-target logging.

use core::fmt;

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type.
///
/// Unsupported control requests are not errors: they are answered with a
/// stall and reported as [`ControlOutcome::Stalled`](crate::ControlOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Descriptors
    /// The descriptor chain does not describe a supported HID interface.
    InvalidDescriptor,

    /// The selected role has no report descriptor configured.
    DescriptorCorrupted,

    /// The descriptor chain ended before a complete descriptor.
    Truncated,

    // Controller driver
    /// The endpoint/controller driver rejected an operation.
    Driver(DriverError),

    // Preconditions
    /// The device is not mounted (configured) by the host.
    NotMounted,

    /// The interrupt endpoint already has a transfer in flight.
    Busy,

    /// No interface is bound for the requested role.
    NotBound,

    // Requests
    /// A control request addressed an interface this class does not own.
    UnknownInterface,

    // Internal invariants
    /// A report or descriptor does not fit the buffer meant to carry it.
    ReportTooLarge { length: usize, capacity: usize },

    /// The GET_REPORT handler produced no data.
    EmptyReport,
}

/// Failures reported by the endpoint/controller driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The endpoint could not be opened.
    EndpointOpen,
    /// A transfer could not be queued.
    Transfer,
    /// The control endpoint could not start a data stage.
    Control,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDescriptor => write!(f, "Unsupported HID interface descriptor"),
            Self::DescriptorCorrupted => write!(f, "Report descriptor not configured"),
            Self::Truncated => write!(f, "Descriptor chain truncated"),
            Self::Driver(e) => write!(f, "Driver error: {}", e),
            Self::NotMounted => write!(f, "Device not mounted"),
            Self::Busy => write!(f, "Endpoint busy"),
            Self::NotBound => write!(f, "Interface not bound"),
            Self::UnknownInterface => write!(f, "Unknown interface"),
            Self::ReportTooLarge { length, capacity } => {
                write!(f, "Report of {} bytes exceeds {} byte buffer", length, capacity)
            }
            Self::EmptyReport => write!(f, "Empty report"),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointOpen => write!(f, "endpoint open failed"),
            Self::Transfer => write!(f, "transfer failed"),
            Self::Control => write!(f, "control transfer failed"),
        }
    }
}

// Convenience conversions

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Error::Driver(e)
    }
}
