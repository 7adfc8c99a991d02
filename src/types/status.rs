//! Transceiver status information.

/// Status reported by the transceiver in reply to a get-status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    /// Receiver/transceiver type code.
    pub receiver_type_code: u8,
    /// Firmware version.
    pub firmware_version: u8,
    /// Hardware version (`major.minor`).
    pub hardware_version: String,
    /// Firmware type code.
    pub firmware_type_code: u8,
    /// Transmitter output power in dBm.
    pub transmitter_power: i8,
}

impl StatusInfo {
    /// Returns a human readable receiver type.
    #[must_use]
    pub const fn receiver_type(&self) -> &'static str {
        match self.receiver_type_code {
            0x50 => "310MHz",
            0x51 => "315MHz",
            0x52 => "433.92MHz receiver only",
            0x53 => "433.92MHz transceiver",
            0x54 => "433.42MHz",
            0x55 => "868.00MHz",
            0x56 => "868.00MHz FSK",
            0x57 => "868.30MHz",
            0x58 => "868.30MHz FSK",
            0x59 => "868.35MHz",
            0x5A => "868.35MHz FSK",
            0x5B => "868.95MHz",
            _ => "Unknown receiver",
        }
    }

    /// Returns a human readable firmware type.
    #[must_use]
    pub const fn firmware_type(&self) -> &'static str {
        match self.firmware_type_code {
            0x00 => "Type1 RFXrec",
            0x01 => "Type1",
            0x02 => "Type2",
            0x03 => "Ext",
            0x04 => "Ext2",
            0x05 => "Pro1",
            0x06 => "Pro2",
            0x10 => "ProXL1",
            0x11 => "ProXL2",
            _ => "Unknown firmware",
        }
    }
}
