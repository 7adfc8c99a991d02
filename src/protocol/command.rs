//! Command encoding for the RFXtrx protocol.
//!
//! Commands are built without the length prefix; the transport frames them
//! with [`super::encode_frame`] before writing.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::protocol::PacketType;
use crate::types::Protocol;

/// Interface control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InterfaceCommand {
    /// Reset the receiver and flush its buffers.
    Reset = 0x00,
    /// Request the status message.
    GetStatus = 0x02,
    /// Start receiving (firmware 1001 and later).
    StartReceiver = 0x07,
}

/// Switch commands shared by the lighting protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchCommand {
    /// Switch the unit off.
    Off,
    /// Switch the unit on.
    On,
}

impl SwitchCommand {
    const fn code(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0x01,
        }
    }
}

/// Transmit address of a lighting unit, parsed from an `identifier/unitCode`
/// device key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAddress {
    /// Device identifier.
    pub id: u32,
    /// Unit code.
    pub unit_code: u8,
}

impl DeviceAddress {
    /// Parses a device key for the given protocol.
    ///
    /// The identifier may be written in hex with a `0x` prefix or in decimal.
    pub fn parse(protocol: Protocol, key: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidDeviceKey {
            key: key.to_owned(),
            reason: reason.to_owned(),
        };

        let (id, unit) = key
            .split_once('/')
            .ok_or_else(|| invalid("missing unit code"))?;

        let id = parse_number(id.trim()).ok_or_else(|| invalid("identifier is not a number"))?;
        let unit_code: u8 = unit
            .trim()
            .parse()
            .map_err(|_| invalid("unit code is not a number"))?;

        let max_id = match protocol {
            Protocol::Lighting2 => 0x03FF_FFFF,
            Protocol::Lighting5 => 0x00FF_FFFF,
            _ => return Err(invalid("protocol cannot transmit")),
        };
        if id > max_id {
            return Err(invalid("identifier out of range"));
        }
        if unit_code > 16 {
            return Err(invalid("unit code out of range"));
        }

        Ok(Self { id, unit_code })
    }
}

fn parse_number(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Encodes an interface control command.
#[must_use]
pub fn interface_command(command: InterfaceCommand, seq: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(13);
    buf.put_u8(PacketType::InterfaceControl.as_byte());
    buf.put_u8(0x00);
    buf.put_u8(seq);
    buf.put_u8(command as u8);
    buf.put_bytes(0, 9);
    buf.freeze()
}

/// Encodes a lighting switch command for a transmit-capable protocol.
pub fn switch_command(
    protocol: Protocol,
    subtype: u8,
    seq: u8,
    address: DeviceAddress,
    command: SwitchCommand,
) -> Result<Bytes> {
    let id = address.id.to_be_bytes();
    let mut buf = BytesMut::with_capacity(11);

    match protocol {
        Protocol::Lighting2 => {
            buf.put_u8(PacketType::Lighting2.as_byte());
            buf.put_u8(subtype);
            buf.put_u8(seq);
            buf.put_slice(&id);
            buf.put_u8(address.unit_code);
            buf.put_u8(command.code());
            buf.put_u8(0x00); // level
            buf.put_u8(0x00); // filler
        }
        Protocol::Lighting5 => {
            buf.put_u8(PacketType::Lighting5.as_byte());
            buf.put_u8(subtype);
            buf.put_u8(seq);
            buf.put_slice(&id[1..]);
            buf.put_u8(address.unit_code);
            buf.put_u8(command.code());
            buf.put_u8(0x00); // level
            buf.put_u8(0x00); // filler
        }
        _ => {
            return Err(Error::Protocol {
                message: format!("protocol {protocol} cannot transmit"),
            });
        }
    }

    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_command() {
        let packet = interface_command(InterfaceCommand::GetStatus, 1);
        assert_eq!(packet.len(), 13);
        assert_eq!(&packet[..4], &[0x00, 0x00, 0x01, 0x02]);
        assert!(packet[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_parse_device_address() {
        let addr = DeviceAddress::parse(Protocol::Lighting2, "0x0100ABCD/3").unwrap();
        assert_eq!(addr.id, 0x0100_ABCD);
        assert_eq!(addr.unit_code, 3);

        let addr = DeviceAddress::parse(Protocol::Lighting5, "1234/1").unwrap();
        assert_eq!(addr.id, 1234);
    }

    #[test]
    fn test_parse_device_address_errors() {
        assert!(DeviceAddress::parse(Protocol::Lighting2, "0x0100ABCD").is_err());
        assert!(DeviceAddress::parse(Protocol::Lighting2, "lamp/1").is_err());
        assert!(DeviceAddress::parse(Protocol::Lighting2, "0x0400ABCD/1").is_err());
        assert!(DeviceAddress::parse(Protocol::Lighting5, "0x01000000/1").is_err());
        assert!(DeviceAddress::parse(Protocol::Lighting5, "0x10/17").is_err());
        assert!(DeviceAddress::parse(Protocol::Temperature1, "0x10/1").is_err());
    }

    #[test]
    fn test_lighting2_switch_on() {
        let addr = DeviceAddress::parse(Protocol::Lighting2, "0x0100ABCD/3").unwrap();
        let packet =
            switch_command(Protocol::Lighting2, 0x00, 7, addr, SwitchCommand::On).unwrap();
        assert_eq!(
            &packet[..],
            &[0x11, 0x00, 0x07, 0x01, 0x00, 0xAB, 0xCD, 0x03, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_lighting5_switch_off() {
        let addr = DeviceAddress::parse(Protocol::Lighting5, "0xF09AC8/1").unwrap();
        let packet =
            switch_command(Protocol::Lighting5, 0x04, 2, addr, SwitchCommand::Off).unwrap();
        assert_eq!(
            &packet[..],
            &[0x14, 0x04, 0x02, 0xF0, 0x9A, 0xC8, 0x01, 0x00, 0x00, 0x00]
        );
    }
}
