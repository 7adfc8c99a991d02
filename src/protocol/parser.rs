//! Packet decoding for the RFXtrx protocol.
//!
//! All functions take the packet with the length prefix already stripped:
//! `[packetType] [subtype] [seqnbr] [data...]`.

use crate::error::{Error, Result};
use crate::protocol::PacketType;
use crate::types::{
    DeviceEvent, EnergyReading, HardwareEvent, LightingReading, Protocol, SensorReading,
    StatusInfo,
};

/// Energy counter scaling for CM119/160 and CM180 meters.
const ENERGY_SCALE: f64 = 223.666;

/// Rain increment per tip for La Crosse TX5 gauges, in mm.
const RAIN_TIP_MM: f64 = 0.266;

fn ensure_len(packet: &[u8], min: usize, what: &str) -> Result<()> {
    if packet.len() < min {
        return Err(Error::Protocol {
            message: format!("{what} too short: {} bytes", packet.len()),
        });
    }
    Ok(())
}

/// Formats a sensor identifier as `0x` + upper-case hex.
fn hex_id(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode_upper(bytes))
}

/// Decodes a temperature stored as sign bit + 15-bit tenths.
fn signed_tenths(hi: u8, lo: u8) -> f64 {
    let magnitude = f64::from((u16::from(hi & 0x7F) << 8) | u16::from(lo)) / 10.0;
    if hi & 0x80 == 0 { magnitude } else { -magnitude }
}

fn u16_be(hi: u8, lo: u8) -> f64 {
    f64::from(u16::from_be_bytes([hi, lo]))
}

/// Splits a trailing `battery/rssi` byte into `(battery, rssi)`.
const fn battery_rssi(byte: u8) -> (u8, u8) {
    (byte & 0x0F, byte >> 4)
}

/// Parses the interface status message.
///
/// Format:
/// ```text
/// [0x01] [subtype] [seq] [cmnd] [receiver_type] [fw_version] [protocols:4]
/// [hw_major] [hw_minor] [output_power] [fw_type] ...
/// ```
pub fn parse_status(packet: &[u8]) -> Result<StatusInfo> {
    ensure_len(packet, 14, "status message")?;

    Ok(StatusInfo {
        receiver_type_code: packet[4],
        firmware_version: packet[5],
        hardware_version: format!("{}.{}", packet[10], packet[11]),
        transmitter_power: i8::from_ne_bytes([packet[12]]),
        firmware_type_code: packet[13],
    })
}

/// Parses a device packet into a typed event.
///
/// Returns `Ok(None)` for packet types that do not carry device readings or
/// that the bridge does not decode.
pub fn parse_device_event(packet: &[u8]) -> Result<Option<DeviceEvent>> {
    ensure_len(packet, 3, "packet")?;

    let packet_type = packet[0];
    let subtype = packet[1];

    let decoded = match PacketType::from_byte(packet_type) {
        Some(PacketType::Lighting2) => Some(parse_lighting2(packet)?),
        Some(PacketType::Lighting5) => Some(parse_lighting5(packet)?),
        Some(PacketType::Temperature1) => Some(parse_temperature1(packet)?),
        Some(PacketType::Humidity1) => Some(parse_humidity1(packet)?),
        Some(PacketType::TemperatureHumidity1) => Some(parse_temperature_humidity1(packet)?),
        Some(PacketType::TempHumBaro1) => Some(parse_temp_hum_baro1(packet)?),
        Some(PacketType::Rain1) => Some(parse_rain1(packet)?),
        Some(PacketType::Wind1) => Some(parse_wind1(packet)?),
        Some(PacketType::Uv1) => Some(parse_uv1(packet)?),
        Some(PacketType::TemperatureRain1) => Some(parse_temperature_rain1(packet)?),
        Some(PacketType::Elec1) => Some(parse_elec1(packet)?),
        Some(PacketType::Elec23) => parse_elec23(packet)?,
        Some(PacketType::Elec4) => Some(parse_elec4(packet)?),
        Some(PacketType::Elec5) => Some(parse_elec5(packet)?),
        Some(PacketType::Weight1) => Some(parse_weight1(packet)?),
        Some(PacketType::Weather) => Some(parse_weather(packet)?),
        Some(PacketType::Solar) => Some(parse_solar(packet)?),
        _ => None,
    };

    Ok(decoded.map(|(protocol, reading, rssi, battery_level)| DeviceEvent {
        protocol,
        packet_type,
        subtype,
        reading,
        rssi,
        battery_level,
    }))
}

type Decoded = (Protocol, HardwareEvent, Option<u8>, Option<u8>);

fn sensor(protocol: Protocol, reading: SensorReading, trailer: u8) -> Decoded {
    let (battery, rssi) = battery_rssi(trailer);
    (
        protocol,
        HardwareEvent::Sensor(reading),
        Some(rssi),
        Some(battery),
    )
}

fn energy(protocol: Protocol, reading: EnergyReading, trailer: u8) -> Decoded {
    let (battery, rssi) = battery_rssi(trailer);
    (
        protocol,
        HardwareEvent::Energy(reading),
        Some(rssi),
        Some(battery),
    )
}

/// Sums the three 0.1 A current channels starting at `offset`.
fn channel_current(packet: &[u8], offset: usize) -> f64 {
    (0..3)
        .map(|ch| u16_be(packet[offset + 2 * ch], packet[offset + 2 * ch + 1]))
        .sum::<f64>()
        / 10.0
}

/// Reads a 6-byte energy counter and scales it to Wh.
fn energy_total(bytes: &[u8]) -> f64 {
    let mut total = [0u8; 8];
    total[2..].copy_from_slice(&bytes[..6]);
    #[allow(clippy::cast_precision_loss)]
    let total = u64::from_be_bytes(total) as f64;
    total / ENERGY_SCALE
}

fn lighting2_command(code: u8) -> &'static str {
    match code {
        0x00 => "Off",
        0x01 => "On",
        0x02 => "Set Level",
        0x03 => "Group Off",
        0x04 => "Group On",
        0x05 => "Set Group Level",
        _ => "Unknown",
    }
}

fn lighting5_command(code: u8) -> &'static str {
    match code {
        0x00 => "Off",
        0x01 => "On",
        0x02 => "Group Off",
        0x03 => "Group On",
        _ => "Unknown",
    }
}

/// `[0x11] [subtype] [seq] [id:4] [unit] [cmnd] [level] [rssi]`
fn parse_lighting2(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 11, "lighting2 packet")?;

    let id = hex_id(&[packet[3] & 0x03, packet[4], packet[5], packet[6]]);
    let reading = LightingReading {
        id,
        unit_code: Some(packet[7]),
        command: lighting2_command(packet[8]).to_owned(),
    };

    Ok((
        Protocol::Lighting2,
        HardwareEvent::Lighting(reading),
        Some(packet[10] >> 4),
        None,
    ))
}

/// `[0x14] [subtype] [seq] [id:3] [unit] [cmnd] [level] [rssi]`
fn parse_lighting5(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 10, "lighting5 packet")?;

    let reading = LightingReading {
        id: hex_id(&packet[3..6]),
        unit_code: Some(packet[6]),
        command: lighting5_command(packet[7]).to_owned(),
    };

    Ok((
        Protocol::Lighting5,
        HardwareEvent::Lighting(reading),
        Some(packet[9] >> 4),
        None,
    ))
}

/// `[0x50] [subtype] [seq] [id:2] [temp:2] [battery/rssi]`
fn parse_temperature1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 8, "temperature1 packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        temperature: Some(signed_tenths(packet[5], packet[6])),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::Temperature1, reading, packet[7]))
}

/// `[0x51] [subtype] [seq] [id:2] [humidity] [status] [battery/rssi]`
fn parse_humidity1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 8, "humidity1 packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        humidity: Some(f64::from(packet[5])),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::Humidity1, reading, packet[7]))
}

/// `[0x52] [subtype] [seq] [id:2] [temp:2] [humidity] [status] [battery/rssi]`
fn parse_temperature_humidity1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 10, "temperaturehumidity1 packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        temperature: Some(signed_tenths(packet[5], packet[6])),
        humidity: Some(f64::from(packet[7])),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::TemperatureHumidity1, reading, packet[9]))
}

/// `[0x54] [subtype] [seq] [id:2] [temp:2] [humidity] [status] [baro:2]
/// [forecast] [battery/rssi]`
fn parse_temp_hum_baro1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 13, "temphumbaro1 packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        temperature: Some(signed_tenths(packet[5], packet[6])),
        humidity: Some(f64::from(packet[7])),
        barometer: Some(u16_be(packet[9], packet[10])),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::TempHumBaro1, reading, packet[12]))
}

/// `[0x55] [subtype] [seq] [id:2] [rate:2] [total:3] [battery/rssi]`
fn parse_rain1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 11, "rain1 packet")?;

    let subtype = packet[1];
    let mut reading = SensorReading {
        id: hex_id(&packet[3..5]),
        ..SensorReading::default()
    };

    if subtype == 0x06 {
        reading.rainfall_increment = Some(f64::from(packet[9] & 0x0F) * RAIN_TIP_MM);
    } else {
        let total = u32::from_be_bytes([0, packet[7], packet[8], packet[9]]);
        reading.rainfall = Some(f64::from(total) / 10.0);
        reading.rainfall_rate = match subtype {
            0x01 => Some(u16_be(packet[5], packet[6])),
            0x02 => Some(u16_be(packet[5], packet[6]) / 100.0),
            _ => None,
        };
    }

    Ok(sensor(Protocol::Rain1, reading, packet[10]))
}

/// `[0x56] [subtype] [seq] [id:2] [direction:2] [average:2] [gust:2]
/// [temp:2] [chill:2] [battery/rssi]`
fn parse_wind1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 16, "wind1 packet")?;

    let subtype = packet[1];
    let mut reading = SensorReading {
        id: hex_id(&packet[3..5]),
        direction: Some(u16_be(packet[5], packet[6])),
        gust_speed: Some(u16_be(packet[9], packet[10]) / 10.0),
        ..SensorReading::default()
    };
    if subtype != 0x05 {
        reading.average_speed = Some(u16_be(packet[7], packet[8]) / 10.0);
    }
    if subtype == 0x04 {
        reading.temperature = Some(signed_tenths(packet[11], packet[12]));
        reading.chillfactor = Some(signed_tenths(packet[13], packet[14]));
    }

    Ok(sensor(Protocol::Wind1, reading, packet[15]))
}

/// `[0x57] [subtype] [seq] [id:2] [uv] [temp:2] [battery/rssi]`
fn parse_uv1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 9, "uv1 packet")?;

    let mut reading = SensorReading {
        id: hex_id(&packet[3..5]),
        uv: Some(f64::from(packet[5]) / 10.0),
        ..SensorReading::default()
    };
    if packet[1] == 0x03 {
        reading.temperature = Some(signed_tenths(packet[6], packet[7]));
    }

    Ok(sensor(Protocol::Uv1, reading, packet[8]))
}

/// `[0x5A] [subtype] [seq] [id:2] [count] [instant:4] [total:6] [battery/rssi]`
///
/// Subtype 1 is reported as `elec2`, subtype 2 as `elec3`.
fn parse_elec23(packet: &[u8]) -> Result<Option<Decoded>> {
    ensure_len(packet, 17, "elec2/3 packet")?;

    let protocol = match packet[1] {
        0x01 => Protocol::Elec2,
        0x02 => Protocol::Elec3,
        _ => return Ok(None),
    };

    let instant = u32::from_be_bytes([packet[6], packet[7], packet[8], packet[9]]);

    let reading = EnergyReading {
        id: hex_id(&packet[3..5]),
        count: Some(f64::from(packet[5])),
        power: Some(f64::from(instant)),
        energy: Some(energy_total(&packet[10..16])),
        ..EnergyReading::default()
    };

    Ok(Some(energy(protocol, reading, packet[16])))
}

/// `[0x4F] [subtype] [seq] [id:2] [temp:2] [rain total:2] [battery/rssi]`
fn parse_temperature_rain1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 10, "temperaturerain1 packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        temperature: Some(signed_tenths(packet[5], packet[6])),
        rainfall: Some(u16_be(packet[7], packet[8]) / 10.0),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::TemperatureRain1, reading, packet[9]))
}

/// `[0x59] [subtype] [seq] [id:2] [count] [ch1:2] [ch2:2] [ch3:2] [battery/rssi]`
///
/// `current` is the sum of the three channels.
fn parse_elec1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 13, "elec1 packet")?;

    let reading = EnergyReading {
        id: hex_id(&packet[3..5]),
        count: Some(f64::from(packet[5])),
        current: Some(channel_current(packet, 6)),
        ..EnergyReading::default()
    };
    Ok(energy(Protocol::Elec1, reading, packet[12]))
}

/// `[0x5B] [subtype] [seq] [id:2] [count] [ch1:2] [ch2:2] [ch3:2] [total:6]
/// [battery/rssi]`
fn parse_elec4(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 19, "elec4 packet")?;

    let reading = EnergyReading {
        id: hex_id(&packet[3..5]),
        count: Some(f64::from(packet[5])),
        current: Some(channel_current(packet, 6)),
        energy: Some(energy_total(&packet[12..18])),
        ..EnergyReading::default()
    };
    Ok(energy(Protocol::Elec4, reading, packet[18]))
}

/// `[0x5C] [subtype] [seq] [id:2] [voltage] [current:2] [power:2] [energy:2]
/// [power factor] [frequency] [rssi]`
fn parse_elec5(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 15, "elec5 packet")?;

    let reading = EnergyReading {
        id: hex_id(&packet[3..5]),
        voltage: Some(f64::from(packet[5])),
        current: Some(u16_be(packet[6], packet[7]) / 100.0),
        power: Some(u16_be(packet[8], packet[9]) / 10.0),
        energy: Some(u16_be(packet[10], packet[11]) / 100.0),
        power_factor: Some(f64::from(packet[12]) / 100.0),
        frequency: Some(f64::from(packet[13])),
        ..EnergyReading::default()
    };

    Ok((
        Protocol::Elec5,
        HardwareEvent::Energy(reading),
        Some(packet[14] >> 4),
        None,
    ))
}

/// `[0x5D] [subtype] [seq] [id:2] [weight:2] [battery/rssi]`
fn parse_weight1(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 8, "weight1 packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        weight: Some(u16_be(packet[5], packet[6]) / 10.0),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::Weight1, reading, packet[7]))
}

/// `[0x76] [subtype] [seq] [id:2] [direction:2] [average:2] [gust:2]
/// [temp:2] [chill:2] [humidity] [status] [rain rate:2] [rain total:4] [uv]
/// [solar:2] [baro:2] [forecast] [battery/rssi]`
fn parse_weather(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 30, "weather packet")?;

    let total = u32::from_be_bytes([packet[19], packet[20], packet[21], packet[22]]);
    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        direction: Some(u16_be(packet[5], packet[6])),
        average_speed: Some(u16_be(packet[7], packet[8]) / 10.0),
        gust_speed: Some(u16_be(packet[9], packet[10]) / 10.0),
        temperature: Some(signed_tenths(packet[11], packet[12])),
        chillfactor: Some(signed_tenths(packet[13], packet[14])),
        humidity: Some(f64::from(packet[15])),
        rainfall_rate: Some(u16_be(packet[17], packet[18]) / 100.0),
        rainfall: Some(f64::from(total) / 10.0),
        uv: Some(f64::from(packet[23]) / 10.0),
        insolation: Some(u16_be(packet[24], packet[25])),
        barometer: Some(u16_be(packet[26], packet[27])),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::Weather, reading, packet[29]))
}

/// `[0x77] [subtype] [seq] [id:2] [solar:2] [battery/rssi]`
fn parse_solar(packet: &[u8]) -> Result<Decoded> {
    ensure_len(packet, 8, "solar packet")?;

    let reading = SensorReading {
        id: hex_id(&packet[3..5]),
        insolation: Some(u16_be(packet[5], packet[6]) / 100.0),
        ..SensorReading::default()
    };
    Ok(sensor(Protocol::Solar, reading, packet[7]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(packet: &[u8]) -> DeviceEvent {
        parse_device_event(packet).unwrap().unwrap()
    }

    #[test]
    fn test_parse_status() {
        let packet = [
            0x01, 0x00, 0x01, 0x02, 0x53, 0xF2, 0x00, 0x00, 0x00, 0x00, 0x01, 0x03, 0x0A, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let status = parse_status(&packet).unwrap();
        assert_eq!(status.receiver_type_code, 0x53);
        assert_eq!(status.firmware_version, 0xF2);
        assert_eq!(status.hardware_version, "1.3");
        assert_eq!(status.transmitter_power, 10);
        assert_eq!(status.firmware_type_code, 0x04);
    }

    #[test]
    fn test_parse_status_too_short() {
        assert!(parse_status(&[0x01, 0x00, 0x01]).is_err());
    }

    #[test]
    fn test_parse_lighting2() {
        let event = reading(&[
            0x11, 0x00, 0x05, 0xFD, 0x00, 0xAB, 0xCD, 0x03, 0x01, 0x0F, 0x60,
        ]);
        assert_eq!(event.protocol, Protocol::Lighting2);
        assert_eq!(event.subtype, 0x00);
        assert_eq!(event.rssi, Some(6));
        let HardwareEvent::Lighting(light) = event.reading else {
            panic!("expected lighting event");
        };
        assert_eq!(light.id, "0x0100ABCD");
        assert_eq!(light.unit_code, Some(3));
        assert_eq!(light.command, "On");
        assert_eq!(light.device_key(), "0x0100ABCD/3");
    }

    #[test]
    fn test_parse_lighting5() {
        let event = reading(&[0x14, 0x04, 0x00, 0xF0, 0x9A, 0xC8, 0x01, 0x00, 0x00, 0x50]);
        assert_eq!(event.protocol, Protocol::Lighting5);
        let HardwareEvent::Lighting(light) = event.reading else {
            panic!("expected lighting event");
        };
        assert_eq!(light.device_key(), "0xF09AC8/1");
        assert_eq!(light.command, "Off");
    }

    #[test]
    fn test_parse_temperature_humidity() {
        let event = reading(&[0x52, 0x01, 0x03, 0x6A, 0x01, 0x00, 0xD7, 0x37, 0x02, 0x89]);
        assert_eq!(event.protocol, Protocol::TemperatureHumidity1);
        assert_eq!(event.battery_level, Some(9));
        assert_eq!(event.rssi, Some(8));
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.id, "0x6A01");
        assert_eq!(sensor.temperature, Some(21.5));
        assert_eq!(sensor.humidity, Some(55.0));
        assert_eq!(sensor.barometer, None);
    }

    #[test]
    fn test_parse_negative_temperature() {
        let event = reading(&[0x50, 0x02, 0x00, 0x12, 0x34, 0x80, 0x2D, 0x79]);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.temperature, Some(-4.5));
    }

    #[test]
    fn test_parse_temp_hum_baro() {
        let event = reading(&[
            0x54, 0x01, 0x00, 0xE9, 0x00, 0x00, 0xC8, 0x2D, 0x02, 0x03, 0xF5, 0x01, 0x59,
        ]);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.temperature, Some(20.0));
        assert_eq!(sensor.humidity, Some(45.0));
        assert_eq!(sensor.barometer, Some(1013.0));
    }

    #[test]
    fn test_parse_rain() {
        let event = reading(&[
            0x55, 0x02, 0x00, 0x12, 0x34, 0x00, 0x32, 0x00, 0x01, 0x2C, 0x69,
        ]);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.rainfall, Some(30.0));
        assert_eq!(sensor.rainfall_rate, Some(0.5));
        assert_eq!(sensor.rainfall_increment, None);
    }

    #[test]
    fn test_parse_wind_with_chill() {
        let event = reading(&[
            0x56, 0x04, 0x00, 0x12, 0x34, 0x00, 0xB4, 0x00, 0x0A, 0x00, 0x14, 0x00, 0x32, 0x80,
            0x0A, 0x59,
        ]);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.direction, Some(180.0));
        assert_eq!(sensor.average_speed, Some(1.0));
        assert_eq!(sensor.gust_speed, Some(2.0));
        assert_eq!(sensor.temperature, Some(5.0));
        assert_eq!(sensor.chillfactor, Some(-1.0));
    }

    #[test]
    fn test_parse_elec2() {
        let event = reading(&[
            0x5A, 0x01, 0x00, 0x1A, 0x2B, 0x03, 0x00, 0x00, 0x01, 0xF4, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x79,
        ]);
        assert_eq!(event.protocol, Protocol::Elec2);
        let HardwareEvent::Energy(energy) = event.reading else {
            panic!("expected energy event");
        };
        assert_eq!(energy.id, "0x1A2B");
        assert_eq!(energy.count, Some(3.0));
        assert_eq!(energy.power, Some(500.0));
        assert_eq!(energy.energy, Some(0.0));
        assert_eq!(energy.voltage, None);
    }

    #[test]
    fn test_parse_weight() {
        let event = reading(&[0x5D, 0x01, 0x00, 0x00, 0x11, 0x02, 0xBC, 0x69]);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.weight, Some(70.0));
    }

    #[test]
    fn test_parse_temperature_rain() {
        let event = reading(&[0x4F, 0x01, 0x00, 0x3C, 0x01, 0x00, 0x96, 0x01, 0x2C, 0x59]);
        assert_eq!(event.protocol, Protocol::TemperatureRain1);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.id, "0x3C01");
        assert_eq!(sensor.temperature, Some(15.0));
        assert_eq!(sensor.rainfall, Some(30.0));
    }

    #[test]
    fn test_parse_elec1() {
        let event = reading(&[
            0x59, 0x01, 0x00, 0x1A, 0x00, 0x01, 0x00, 0x32, 0x00, 0x0A, 0x00, 0x00, 0x79,
        ]);
        assert_eq!(event.protocol, Protocol::Elec1);
        assert_eq!(event.battery_level, Some(9));
        assert_eq!(event.rssi, Some(7));
        let HardwareEvent::Energy(energy) = event.reading else {
            panic!("expected energy event");
        };
        assert_eq!(energy.id, "0x1A00");
        assert_eq!(energy.count, Some(1.0));
        assert_eq!(energy.current, Some(6.0));
        assert_eq!(energy.power, None);
    }

    #[test]
    fn test_parse_elec4() {
        let event = reading(&[
            0x5B, 0x01, 0x00, 0x2B, 0x01, 0x04, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x69,
        ]);
        assert_eq!(event.protocol, Protocol::Elec4);
        let HardwareEvent::Energy(energy) = event.reading else {
            panic!("expected energy event");
        };
        assert_eq!(energy.count, Some(4.0));
        assert_eq!(energy.current, Some(2.0));
        assert_eq!(energy.energy, Some(0.0));
    }

    #[test]
    fn test_parse_elec5() {
        let event = reading(&[
            0x5C, 0x01, 0x00, 0x00, 0x2D, 0xE6, 0x01, 0xF4, 0x04, 0xB0, 0x00, 0x64, 0x5A, 0x32,
            0x80,
        ]);
        assert_eq!(event.protocol, Protocol::Elec5);
        assert_eq!(event.rssi, Some(8));
        assert_eq!(event.battery_level, None);
        let HardwareEvent::Energy(energy) = event.reading else {
            panic!("expected energy event");
        };
        assert_eq!(energy.id, "0x002D");
        assert_eq!(energy.voltage, Some(230.0));
        assert_eq!(energy.current, Some(5.0));
        assert_eq!(energy.power, Some(120.0));
        assert_eq!(energy.energy, Some(1.0));
        assert_eq!(energy.power_factor, Some(0.9));
        assert_eq!(energy.frequency, Some(50.0));
    }

    #[test]
    fn test_parse_weather() {
        let event = reading(&[
            0x76, 0x01, 0x00, 0x70, 0x01, 0x00, 0x5A, 0x00, 0x0C, 0x00, 0x14, 0x80, 0x0F, 0x80,
            0x19, 0x50, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x7B, 0x05, 0x01, 0x2C, 0x03, 0xF5,
            0x00, 0x89,
        ]);
        assert_eq!(event.protocol, Protocol::Weather);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.direction, Some(90.0));
        assert_eq!(sensor.average_speed, Some(1.2));
        assert_eq!(sensor.gust_speed, Some(2.0));
        assert_eq!(sensor.temperature, Some(-1.5));
        assert_eq!(sensor.chillfactor, Some(-2.5));
        assert_eq!(sensor.humidity, Some(80.0));
        assert_eq!(sensor.rainfall_rate, Some(1.0));
        assert_eq!(sensor.rainfall, Some(12.3));
        assert_eq!(sensor.uv, Some(0.5));
        assert_eq!(sensor.insolation, Some(300.0));
        assert_eq!(sensor.barometer, Some(1013.0));
    }

    #[test]
    fn test_parse_solar() {
        let event = reading(&[0x77, 0x01, 0x00, 0x11, 0x22, 0x75, 0x30, 0x59]);
        assert_eq!(event.protocol, Protocol::Solar);
        let HardwareEvent::Sensor(sensor) = event.reading else {
            panic!("expected sensor event");
        };
        assert_eq!(sensor.id, "0x1122");
        assert_eq!(sensor.insolation, Some(300.0));
    }

    #[test]
    fn test_unhandled_packet_type() {
        assert!(parse_device_event(&[0x01, 0x00, 0x00, 0x02]).unwrap().is_none());
        assert!(parse_device_event(&[0x20, 0x00, 0x00]).unwrap().is_none());
    }

    #[test]
    fn test_truncated_packet() {
        assert!(parse_device_event(&[0x52, 0x01, 0x00, 0x6A]).is_err());
    }
}
