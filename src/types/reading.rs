//! Typed readings decoded from transceiver packets.

use crate::types::Protocol;

/// Weather and environment sensor reading.
///
/// Fields a sensor does not report are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    /// Device identifier as reported by the hardware (e.g. `0x6A01`).
    pub id: String,
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    pub humidity: Option<f64>,
    /// Barometric pressure in hPa.
    pub barometer: Option<f64>,
    /// Rain since the previous report in mm.
    pub rainfall_increment: Option<f64>,
    /// Total rain in mm.
    pub rainfall: Option<f64>,
    /// Rain rate in mm/h.
    pub rainfall_rate: Option<f64>,
    /// Gust speed in m/s.
    pub gust_speed: Option<f64>,
    /// Average wind speed in m/s.
    pub average_speed: Option<f64>,
    /// Wind direction in degrees.
    pub direction: Option<f64>,
    /// Wind chill temperature in degrees Celsius.
    pub chillfactor: Option<f64>,
    /// UV index.
    pub uv: Option<f64>,
    /// Solar insolation in W/m².
    pub insolation: Option<f64>,
    /// Weight in kg.
    pub weight: Option<f64>,
}

/// Energy meter reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyReading {
    /// Device identifier as reported by the hardware.
    pub id: String,
    /// Voltage in V.
    pub voltage: Option<f64>,
    /// Current in A.
    pub current: Option<f64>,
    /// Message counter.
    pub count: Option<f64>,
    /// Instantaneous power in W.
    pub power: Option<f64>,
    /// Accumulated energy in Wh.
    pub energy: Option<f64>,
    /// Power factor.
    pub power_factor: Option<f64>,
    /// Mains frequency in Hz.
    pub frequency: Option<f64>,
}

/// Lighting switch state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightingReading {
    /// Device identifier as reported by the hardware (e.g. `0x0100ABCD`).
    pub id: String,
    /// Unit code within the device, if the protocol is addressable.
    pub unit_code: Option<u8>,
    /// Command name (e.g. `On`, `Off`, `Group On`).
    pub command: String,
}

impl LightingReading {
    /// Returns the raw device key: `identifier/unitCode`.
    #[must_use]
    pub fn device_key(&self) -> String {
        match self.unit_code {
            Some(unit) => format!("{}/{unit}", self.id),
            None => self.id.clone(),
        }
    }
}

/// A decoded hardware event, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareEvent {
    /// Sensor reading.
    Sensor(SensorReading),
    /// Energy reading.
    Energy(EnergyReading),
    /// Lighting state change.
    Lighting(LightingReading),
}

impl HardwareEvent {
    /// Returns the hardware-reported device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Sensor(r) => &r.id,
            Self::Energy(r) => &r.id,
            Self::Lighting(r) => &r.id,
        }
    }

    /// Returns the key used to look the device up in a device map.
    ///
    /// Lighting devices are addressed by `identifier/unitCode`, all others by
    /// identifier alone.
    #[must_use]
    pub fn device_key(&self) -> String {
        match self {
            Self::Lighting(r) => r.device_key(),
            _ => self.id().to_owned(),
        }
    }
}

/// A hardware event together with the packet it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    /// Protocol family the packet belongs to.
    pub protocol: Protocol,
    /// Raw packet type byte.
    pub packet_type: u8,
    /// Raw packet subtype byte.
    pub subtype: u8,
    /// Decoded reading.
    pub reading: HardwareEvent,
    /// Signal strength (0-15), if reported.
    pub rssi: Option<u8>,
    /// Battery level (0-15), if reported.
    pub battery_level: Option<u8>,
}
