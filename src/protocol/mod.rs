//! Protocol definitions for RFXtrx communication.
//!
//! This module contains the low-level protocol types including:
//! - Frame encoding/decoding
//! - Packet type definitions
//! - Command encoding
//! - Packet decoding

pub mod command;
pub mod frame;
pub mod packet;
pub mod parser;

pub use command::{DeviceAddress, InterfaceCommand, SwitchCommand, interface_command, switch_command};
pub use frame::{FrameDecoder, MAX_FRAME_SIZE, encode as encode_frame};
pub use packet::{PacketType, device_names};
pub use parser::{parse_device_event, parse_status};
