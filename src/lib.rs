//! # rfxtrx2mqtt
//!
//! Bridge between an RFXtrx 433 MHz transceiver and an MQTT broker.
//!
//! Sensor, energy and lighting events received by the transceiver are
//! published as one MQTT message per measurement, and `.../set` messages
//! on the command topics of transmit-capable protocols are turned into
//! switch commands.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rfxtrx2mqtt::{Config, RfxCom};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), rfxtrx2mqtt::Error> {
//!     let config = Config::load("./configuration.yaml")?;
//!     let mut rfx = RfxCom::serial(config.serial.port.clone());
//!     rfxtrx2mqtt::bridge::service::run(&config, &mut rfx).await
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`protocol`] - RFXtrx framing, packet decoding and command encoding
//! - [`types`] - Protocol names, typed readings and transceiver status
//! - [`transport`] - Transport implementations (currently USB/Serial)
//! - [`event`] - Async event system for transceiver notifications
//! - [`rfxcom`] - High-level [`RfxCom`] transceiver client
//! - [`bridge`] - Device registry, topic naming and the two routers
//! - [`mqtt`] - MQTT client adapter
//! - [`scan`] - Device discovery printer
//! - [`config`] - Configuration file

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod mqtt;
pub mod protocol;
pub mod rfxcom;
pub mod scan;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use bridge::{Bridge, BridgeContext, DeviceMap, Publish, Switch, TransmitterFactory};
pub use config::Config;
pub use error::{Error, FrameError, Result};
pub use event::{Event, EventDispatcher, EventFilter, Subscription};
pub use protocol::PacketType;
pub use rfxcom::{RfxCom, Transmitter};
pub use scan::{ScanMode, Scanner};
pub use transport::{SerialTransport, serial::list_ports};
pub use types::{
    DeviceEvent, EnergyReading, Family, HardwareEvent, LightingReading, Protocol, SensorReading,
    StatusInfo,
};
