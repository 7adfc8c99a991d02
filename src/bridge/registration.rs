//! Protocol registration: configuration sections to routing tables.

use std::fmt;

use crate::bridge::registry::DeviceMap;
use crate::bridge::topic::command_topic;
use crate::bridge::{Switch, TransmitterFactory};
use crate::config::{Config, ProtocolSection};
use crate::error::{Error, Result};
use crate::types::Protocol;

/// Routing settings of one registered protocol.
pub struct ProtocolConfig {
    /// Protocol family.
    pub protocol: Protocol,
    /// Topic segment, defaults to the protocol name.
    pub topic: String,
    /// Transmit subtype name, only set for transmit-capable protocols.
    pub subtype: Option<String>,
    /// Configured devices.
    pub devices: DeviceMap,
    transmitter: Option<Box<dyn Switch>>,
}

impl fmt::Debug for ProtocolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolConfig")
            .field("protocol", &self.protocol)
            .field("topic", &self.topic)
            .field("subtype", &self.subtype)
            .field("devices", &self.devices)
            .field("transmitter", &self.transmitter.is_some())
            .finish()
    }
}

impl ProtocolConfig {
    /// Builds a protocol config from its configuration section, applying
    /// defaults. No transmitter is attached yet.
    #[must_use]
    pub fn from_section(protocol: Protocol, section: &ProtocolSection) -> Self {
        let subtype = if protocol.is_transmit_capable() {
            section
                .subtype
                .clone()
                .or_else(|| protocol.default_subtype().map(str::to_owned))
        } else {
            if section.subtype.is_some() {
                tracing::debug!("{}: subtype ignored for receive-only protocol", protocol);
            }
            None
        };

        Self {
            protocol,
            topic: section
                .topic
                .clone()
                .unwrap_or_else(|| protocol.name().to_owned()),
            subtype,
            devices: section
                .devices
                .iter()
                .map(|(key, name)| (key.as_str(), name.as_str()))
                .collect(),
            transmitter: None,
        }
    }

    /// Returns the bound transmitter, if any.
    #[must_use]
    pub fn transmitter(&self) -> Option<&dyn Switch> {
        self.transmitter.as_deref()
    }

    fn bind(&mut self, factory: &dyn TransmitterFactory) -> Result<()> {
        let name = self.subtype.as_deref().unwrap_or_default();
        let code = self
            .protocol
            .subtype_code(name)
            .ok_or_else(|| Error::UnknownSubtype {
                protocol: self.protocol.name().to_owned(),
                subtype: name.to_owned(),
            })?;

        self.transmitter = Some(factory.bind_transmitter(self.protocol, code)?);
        tracing::debug!(
            "{}: transmitter bound with subtype {} (0x{:02x})",
            self.protocol,
            name,
            code
        );
        Ok(())
    }
}

/// Protocols that own a transmitter, in registration order.
///
/// Only these take part in command routing and MQTT subscriptions.
#[derive(Debug, Default)]
pub struct TxProtocolSet {
    entries: Vec<ProtocolConfig>,
}

impl TxProtocolSet {
    /// Returns the first protocol using the given topic segment.
    #[must_use]
    pub fn by_segment(&self, segment: &str) -> Option<&ProtocolConfig> {
        self.entries.iter().find(|p| p.topic == segment)
    }

    /// Returns the protocol config of a protocol.
    #[must_use]
    pub fn get(&self, protocol: Protocol) -> Option<&ProtocolConfig> {
        self.entries.iter().find(|p| p.protocol == protocol)
    }

    /// Iterates over the entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProtocolConfig> {
        self.entries.iter()
    }

    /// Returns the number of transmit-capable protocols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no transmit-capable protocol is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, config: ProtocolConfig) {
        self.entries.push(config);
    }
}

/// Routing state built once at startup and read-only afterwards.
#[derive(Debug)]
pub struct BridgeContext {
    base_topic: String,
    receive_only: Vec<ProtocolConfig>,
    tx: TxProtocolSet,
}

impl BridgeContext {
    /// Creates an empty context for a base topic.
    #[must_use]
    pub fn new(base_topic: impl Into<String>) -> Self {
        Self {
            base_topic: base_topic.into(),
            receive_only: Vec::new(),
            tx: TxProtocolSet::default(),
        }
    }

    /// Registers every protocol section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a transmit subtype is unknown or a transmitter
    /// cannot be bound.
    pub fn register(config: &Config, factory: &dyn TransmitterFactory) -> Result<Self> {
        let mut context = Self::new(config.mqtt.base_topic.clone());
        for section in &config.protocols {
            context.register_protocol(section, factory)?;
        }
        Ok(context)
    }

    /// Registers one protocol section.
    ///
    /// Unknown protocol names and protocols that are already registered are
    /// skipped. Returns true if the protocol was added.
    ///
    /// # Errors
    ///
    /// Returns an error if a transmit subtype is unknown or a transmitter
    /// cannot be bound.
    pub fn register_protocol(
        &mut self,
        section: &ProtocolSection,
        factory: &dyn TransmitterFactory,
    ) -> Result<bool> {
        let Some(protocol) = Protocol::from_name(&section.name) else {
            tracing::debug!("ignoring unknown protocol '{}'", section.name);
            return Ok(false);
        };
        if self.protocol(protocol).is_some() {
            tracing::debug!("{} already registered", protocol);
            return Ok(false);
        }

        let mut config = ProtocolConfig::from_section(protocol, section);
        tracing::info!(
            "registered {} on topic {}/{} with {} device(s)",
            protocol,
            self.base_topic,
            config.topic,
            config.devices.len()
        );

        if protocol.is_transmit_capable() {
            config.bind(factory)?;
            self.tx.push(config);
        } else {
            self.receive_only.push(config);
        }
        Ok(true)
    }

    /// Returns the base topic.
    #[must_use]
    pub fn base_topic(&self) -> &str {
        &self.base_topic
    }

    /// Returns the config of a registered protocol.
    #[must_use]
    pub fn protocol(&self, protocol: Protocol) -> Option<&ProtocolConfig> {
        self.receive_only
            .iter()
            .find(|p| p.protocol == protocol)
            .or_else(|| self.tx.get(protocol))
    }

    /// Returns the transmit-capable protocols.
    #[must_use]
    pub const fn tx_protocols(&self) -> &TxProtocolSet {
        &self.tx
    }

    /// Returns the command topic patterns to subscribe to, one per distinct
    /// topic segment.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        let mut topics: Vec<String> = Vec::new();
        for config in self.tx.iter() {
            let pattern = command_topic(&self.base_topic, &config.topic);
            if !topics.contains(&pattern) {
                topics.push(pattern);
            }
        }
        topics
    }
}
