//! Compile-time configuration.
//!
//! Buffer sizes and timing constants live here so they can be tuned in
//! one place. Role layout (separate keyboard/mouse vs. one composite
//! interface) is selected by the `boot-protocol` cargo feature.

// Buffers

/// Size of the shared control-transfer buffer (bytes).
///
/// Report descriptors served by GET_DESCRIPTOR and SET_REPORT payloads
/// must fit in here.
pub const CONTROL_BUFFER_SIZE: usize = 64;

/// Per-interface report buffer (bytes).
///
/// Largest supported report is the keyboard's 8 bytes plus a leading
/// report-ID byte.
pub const REPORT_BUFFER_SIZE: usize = 9;

// Interfaces

/// Whether separate boot-protocol keyboard and mouse interfaces are built.
pub const BOOT_PROTOCOL: bool = cfg!(feature = "boot-protocol");

/// Number of interface records held by the registry.
pub const INTERFACE_COUNT: usize = if BOOT_PROTOCOL { 2 } else { 1 };

// Timing

/// Unit of the SET_IDLE duration field (ms).
pub const IDLE_RATE_UNIT_MS: u32 = 4;

/// Suggested delay between typed keys (ms).
pub const DEFAULT_KEY_INTERVAL_MS: u32 = 10;
