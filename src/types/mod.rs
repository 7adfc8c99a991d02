//! Data types shared across the bridge.
//!
//! This module contains:
//! - Protocol names, families and transmit subtypes
//! - Typed hardware readings
//! - Transceiver status

pub mod protocol;
pub mod reading;
pub mod status;

pub use protocol::{Family, Protocol, UnknownProtocol};
pub use reading::{DeviceEvent, EnergyReading, HardwareEvent, LightingReading, SensorReading};
pub use status::StatusInfo;
