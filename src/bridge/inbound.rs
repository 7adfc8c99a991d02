//! Inbound event router: hardware events to MQTT messages.

use crate::bridge::Publish;
use crate::bridge::registration::BridgeContext;
use crate::bridge::topic::{format_number, topic};
use crate::types::{DeviceEvent, EnergyReading, HardwareEvent, SensorReading};

/// A published measurement: field name and accessor.
type Field<R> = (&'static str, fn(&R) -> Option<f64>);

/// Sensor fields, in publish order.
pub const SENSOR_FIELDS: [Field<SensorReading>; 13] = [
    ("temperature", |r| r.temperature),
    ("humidity", |r| r.humidity),
    ("barometer", |r| r.barometer),
    ("rainfallIncrement", |r| r.rainfall_increment),
    ("rainfall", |r| r.rainfall),
    ("rainfallRate", |r| r.rainfall_rate),
    ("gustSpeed", |r| r.gust_speed),
    ("averageSpeed", |r| r.average_speed),
    ("direction", |r| r.direction),
    ("chillfactor", |r| r.chillfactor),
    ("uv", |r| r.uv),
    ("insolation", |r| r.insolation),
    ("weight", |r| r.weight),
];

/// Energy fields, in publish order.
pub const ENERGY_FIELDS: [Field<EnergyReading>; 7] = [
    ("voltage", |r| r.voltage),
    ("current", |r| r.current),
    ("count", |r| r.count),
    ("power", |r| r.power),
    ("energy", |r| r.energy),
    ("powerFactor", |r| r.power_factor),
    ("frequency", |r| r.frequency),
];

/// Field carrying a lighting command.
pub const STATE_FIELD: &str = "state";

fn numeric_fields<R>(fields: &[Field<R>], reading: &R) -> Vec<(&'static str, String)> {
    fields
        .iter()
        .filter_map(|&(name, get)| get(reading).map(|value| (name, format_number(value))))
        .collect()
}

/// Returns the `(field, payload)` pairs an event publishes, in order.
#[must_use]
pub fn payloads(event: &HardwareEvent) -> Vec<(&'static str, String)> {
    match event {
        HardwareEvent::Sensor(reading) => numeric_fields(&SENSOR_FIELDS, reading),
        HardwareEvent::Energy(reading) => numeric_fields(&ENERGY_FIELDS, reading),
        HardwareEvent::Lighting(reading) => vec![(STATE_FIELD, reading.command.clone())],
    }
}

/// Publishes one message per populated field of a device event.
///
/// Events of unregistered protocols or unknown devices are dropped. Publish
/// failures are logged and do not stop the remaining fields. Returns the
/// number of messages handed to the publisher.
pub fn route_event(context: &BridgeContext, publisher: &dyn Publish, event: &DeviceEvent) -> usize {
    let Some(config) = context.protocol(event.protocol) else {
        tracing::trace!("{} is not configured, event dropped", event.protocol);
        return 0;
    };

    let key = event.reading.device_key();
    let Some(device) = config.devices.name_of(&key) else {
        tracing::trace!("{}: unknown device {}", event.protocol, key);
        return 0;
    };

    let mut published = 0;
    for (field, payload) in payloads(&event.reading) {
        let topic = topic(context.base_topic(), &config.topic, device, field);
        tracing::debug!("publish {} {}", topic, payload);
        match publisher.publish(&topic, &payload) {
            Ok(()) => published += 1,
            Err(e) => tracing::warn!("failed to publish {}: {}", topic, e),
        }
    }
    published
}
