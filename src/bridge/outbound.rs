//! Outbound command router: MQTT command messages to transmitters.

use std::borrow::Cow;

use crate::bridge::registration::BridgeContext;

/// Switch action requested by a command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    On,
    Off,
}

impl SwitchAction {
    /// Parses a command payload.
    ///
    /// Surrounding whitespace is ignored; matching is otherwise exact.
    #[must_use]
    pub fn from_payload(payload: &str) -> Option<Self> {
        match payload.trim() {
            "on" | "On" | "true" => Some(Self::On),
            "off" | "Off" | "false" => Some(Self::Off),
            _ => None,
        }
    }
}

/// What happened to a command message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The transceiver is not initialised yet.
    NotReady,
    /// Topic is not a command topic of a transmit-capable protocol.
    UnknownTopic,
    /// No device with that display name.
    UnknownDevice,
    /// Payload is not an on/off command.
    UnknownPayload,
    /// The transmitter was invoked.
    Sent { action: SwitchAction, key: String },
    /// The transmitter rejected the command.
    Failed,
}

/// Splits `base/segment/device/set` into `(segment, device)`.
///
/// The device is the last level before `set`; the segment may span levels.
fn split_topic<'a>(base: &str, topic: &'a str) -> Option<(&'a str, &'a str)> {
    topic
        .strip_prefix(base)?
        .strip_prefix('/')?
        .strip_suffix("/set")?
        .rsplit_once('/')
}

/// Routes one MQTT message to the transmitter of the matching protocol.
///
/// Never fails: every miss is logged and reported through the outcome.
pub fn route_command(
    context: &BridgeContext,
    ready: bool,
    topic: &str,
    payload: &[u8],
) -> CommandOutcome {
    if !ready {
        tracing::warn!("transceiver not ready, dropping command on {}", topic);
        return CommandOutcome::NotReady;
    }

    let Some((segment, device)) = split_topic(context.base_topic(), topic) else {
        tracing::debug!("ignoring message on {}", topic);
        return CommandOutcome::UnknownTopic;
    };
    let Some(config) = context.tx_protocols().by_segment(segment) else {
        tracing::debug!("no transmit protocol on segment {}", segment);
        return CommandOutcome::UnknownTopic;
    };
    let Some(transmitter) = config.transmitter() else {
        return CommandOutcome::UnknownTopic;
    };
    let Some(key) = config.devices.key_of(device) else {
        tracing::debug!("{}: unknown device {}", config.protocol, device);
        return CommandOutcome::UnknownDevice;
    };

    let text: Cow<'_, str> = String::from_utf8_lossy(payload);
    let Some(action) = SwitchAction::from_payload(&text) else {
        tracing::debug!("{}: ignoring payload {:?}", topic, text);
        return CommandOutcome::UnknownPayload;
    };

    tracing::info!("{} {} ({}) {:?}", config.protocol, device, key, action);
    let result = match action {
        SwitchAction::On => transmitter.switch_on(key),
        SwitchAction::Off => transmitter.switch_off(key),
    };

    match result {
        Ok(()) => CommandOutcome::Sent {
            action,
            key: key.to_owned(),
        },
        Err(e) => {
            tracing::warn!("{}: failed to switch {}: {}", config.protocol, device, e);
            CommandOutcome::Failed
        }
    }
}
