//! Configuration file loading.
//!
//! The configuration is a YAML document whose top-level keys are either
//! `serial`, `mqtt` or a protocol name:
//!
//! ```yaml
//! serial:
//!   port: /dev/ttyUSB0
//! mqtt:
//!   server: mqtt://localhost
//!   base_topic: rfxcom
//! temperaturehumidity1:
//!   devices:
//!     "0x6A01": living
//! lighting2:
//!   subtype: AC
//!   devices:
//!     0x0100ABCD/1: lamp1
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::types::Protocol;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./configuration.yaml";

/// Base topic used when `mqtt.base_topic` is absent.
pub const DEFAULT_BASE_TOPIC: &str = "rfxcom";

/// Serial port settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Serial port path.
    pub port: String,
    /// Baud rate override.
    pub baud_rate: Option<u32>,
}

/// MQTT broker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSettings {
    /// Broker URL, e.g. `mqtt://localhost:1883`.
    pub server: String,
    /// Optional user name.
    pub username: Option<String>,
    /// Optional password.
    pub password: Option<String>,
    /// Prefix of every topic.
    pub base_topic: String,
}

/// One protocol section, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolSection {
    /// Top-level key of the section.
    pub name: String,
    /// Topic segment override.
    pub topic: Option<String>,
    /// Transmit subtype name.
    pub subtype: Option<String>,
    /// `(raw key, display name)` pairs.
    pub devices: Vec<(String, String)>,
}

/// Parsed bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Serial port settings.
    pub serial: SerialSettings,
    /// MQTT settings.
    pub mqtt: MqttSettings,
    /// Protocol sections, in file order.
    pub protocols: Vec<ProtocolSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSerial {
    port: Option<String>,
    baud_rate: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMqtt {
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
    base_topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProtocol {
    topic: Option<Value>,
    subtype: Option<String>,
    devices: Option<Mapping>,
}

impl Config {
    /// Loads and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parses and validates a configuration document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: Mapping = serde_yaml::from_str(text)?;

        let mut serial = RawSerial::default();
        let mut mqtt = RawMqtt::default();
        let mut protocols = Vec::new();

        for (key, value) in document {
            let Some(name) = key.as_str() else {
                tracing::debug!("ignoring non-string configuration key {:?}", key);
                continue;
            };

            match name {
                "serial" => serial = section(value)?,
                "mqtt" => mqtt = section(value)?,
                _ => match section::<RawProtocol>(value) {
                    Ok(raw) => protocols.push(protocol_section(name, raw)?),
                    Err(e) if Protocol::from_name(name).is_some() => {
                        return Err(Error::config(format!("{name}: {e}")));
                    }
                    Err(e) => tracing::debug!("ignoring configuration key '{}': {}", name, e),
                },
            }
        }

        let port = serial
            .port
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::config("RFXCOM port is undefined"))?;
        let server = mqtt
            .server
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::config("MQTT server is undefined"))?;

        Ok(Self {
            serial: SerialSettings {
                port,
                baud_rate: serial.baud_rate,
            },
            mqtt: MqttSettings {
                server,
                username: mqtt.username.filter(|u| !u.is_empty()),
                password: mqtt.password.filter(|p| !p.is_empty()),
                base_topic: mqtt
                    .base_topic
                    .unwrap_or_else(|| DEFAULT_BASE_TOPIC.to_owned()),
            },
            protocols,
        })
    }

    /// Returns the section for a top-level key.
    #[must_use]
    pub fn protocol(&self, name: &str) -> Option<&ProtocolSection> {
        self.protocols.iter().find(|p| p.name == name)
    }
}

/// Deserializes a section, treating an empty (`null`) section as default.
fn section<T: Default + for<'de> Deserialize<'de>>(value: Value) -> Result<T> {
    if value.is_null() {
        Ok(T::default())
    } else {
        Ok(serde_yaml::from_value(value)?)
    }
}

fn protocol_section(name: &str, raw: RawProtocol) -> Result<ProtocolSection> {
    let topic = raw.topic.map(|t| scalar(&t, name, "topic")).transpose()?;

    let devices = raw
        .devices
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            Ok((
                scalar(&key, name, "device key")?,
                scalar(&value, name, "device name")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProtocolSection {
        name: name.to_owned(),
        topic,
        subtype: raw.subtype,
        devices,
    })
}

/// Renders a YAML scalar as text.
///
/// Unquoted hex literals are integers in YAML and come out in decimal, so
/// hex device identifiers have to be quoted.
fn scalar(value: &Value, section: &str, what: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::config(format!(
            "{section}: {what} must be a string or a number"
        ))),
    }
}
