//! Packet type definitions for the RFXtrx protocol.
//!
//! The packet type is the first byte after the length prefix and selects
//! the layout of the rest of the packet.

/// Packet types exchanged with the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    // Interface (0x00-0x03)
    /// Interface control command.
    InterfaceControl = 0x00,
    /// Interface response (status, start receiver).
    InterfaceMessage = 0x01,
    /// Receiver/transmitter acknowledgement.
    TransmitterResponse = 0x02,

    // Lighting (0x10-0x1F)
    /// AC, `HomeEasy` EU, ANSLUT, Kambrook.
    Lighting2 = 0x11,
    /// `LightwaveRF`, Conrad, Livolo and friends.
    Lighting5 = 0x14,

    // Sensors (0x4F-0x5D)
    /// Temperature and rain.
    TemperatureRain1 = 0x4F,
    /// Temperature.
    Temperature1 = 0x50,
    /// Humidity.
    Humidity1 = 0x51,
    /// Temperature and humidity.
    TemperatureHumidity1 = 0x52,
    /// Temperature, humidity and barometer.
    TempHumBaro1 = 0x54,
    /// Rain gauge.
    Rain1 = 0x55,
    /// Wind gauge.
    Wind1 = 0x56,
    /// UV sensor.
    Uv1 = 0x57,
    /// Current meter (three channels).
    Elec1 = 0x59,
    /// Energy meters (CM119/160 and CM180).
    Elec23 = 0x5A,
    /// Current and energy meter.
    Elec4 = 0x5B,
    /// Revolt power meter.
    Elec5 = 0x5C,
    /// Weighing scale.
    Weight1 = 0x5D,
    /// Weather station.
    Weather = 0x76,
    /// Solar sensor.
    Solar = 0x77,
}

impl PacketType {
    /// Converts a byte to a packet type.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::InterfaceControl),
            0x01 => Some(Self::InterfaceMessage),
            0x02 => Some(Self::TransmitterResponse),
            0x11 => Some(Self::Lighting2),
            0x14 => Some(Self::Lighting5),
            0x4F => Some(Self::TemperatureRain1),
            0x50 => Some(Self::Temperature1),
            0x51 => Some(Self::Humidity1),
            0x52 => Some(Self::TemperatureHumidity1),
            0x54 => Some(Self::TempHumBaro1),
            0x55 => Some(Self::Rain1),
            0x56 => Some(Self::Wind1),
            0x57 => Some(Self::Uv1),
            0x59 => Some(Self::Elec1),
            0x5A => Some(Self::Elec23),
            0x5B => Some(Self::Elec4),
            0x5C => Some(Self::Elec5),
            0x5D => Some(Self::Weight1),
            0x76 => Some(Self::Weather),
            0x77 => Some(Self::Solar),
            _ => None,
        }
    }

    /// Returns the byte value of this packet type.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Returns the device names the transceiver documents for a packet type
/// and subtype, as shown in discovery reports.
#[must_use]
pub fn device_names(packet_type: u8, subtype: u8) -> &'static [&'static str] {
    match (packet_type, subtype) {
        (0x11, 0x00) => &["AC", "HomeEasy UK", "Chacon", "NEXA", "Intertechno"],
        (0x11, 0x01) => &["HomeEasy EU"],
        (0x11, 0x02) => &["ANSLUT"],
        (0x11, 0x03) => &["Kambrook RF3672"],
        (0x14, 0x00) => &["LightwaveRF", "Siemens"],
        (0x14, 0x01) => &["EMW100 GAO/Everflourish"],
        (0x14, 0x02) => &["BBSB new types"],
        (0x14, 0x03) => &["MDREMOTE LED dimmer"],
        (0x14, 0x04) => &["Conrad RSL2"],
        (0x14, 0x05) => &["Livolo"],
        (0x4F, 0x01) => &["Alecto ACH2010"],
        (0x50, 0x01) => &["THR128/138", "THC138"],
        (0x50, 0x02) => &["THC238/268", "THN132", "THWR288", "THRN122", "THN122", "AW129/131"],
        (0x50, 0x03) => &["THWR800"],
        (0x50, 0x04) => &["RTHN318"],
        (0x50, 0x05) => &["La Crosse TX2", "TX3", "TX4", "TX17"],
        (0x51, 0x01) => &["LaCrosse TX3"],
        (0x51, 0x02) => &["LaCrosse WS2300"],
        (0x52, 0x01) => &["THGN122/123", "THGN132", "THGR122/228/238/268"],
        (0x52, 0x02) => &["THGR810", "THGN800"],
        (0x52, 0x03) => &["RTGR328"],
        (0x52, 0x04) => &["THGR328"],
        (0x52, 0x05) => &["WTGR800"],
        (0x52, 0x06) => &["THGR918/928", "THGRN228", "THGN500"],
        (0x52, 0x07) => &["TFA TS34C", "Cresta"],
        (0x52, 0x0A) => &["Alecto WS1700 and compatibles"],
        (0x54, 0x01) => &["BTHR918", "BTHGN129"],
        (0x54, 0x02) => &["BTHR918N", "BTHR968"],
        (0x55, 0x01) => &["RGR126/682/918/928"],
        (0x55, 0x02) => &["PCR800"],
        (0x55, 0x03) => &["TFA"],
        (0x55, 0x06) => &["La Crosse TX5"],
        (0x56, 0x01) => &["WTGR800"],
        (0x56, 0x02) => &["WGR800"],
        (0x56, 0x03) => &["STR918", "WGR918", "WGR928"],
        (0x56, 0x04) => &["TFA"],
        (0x56, 0x05) => &["UPM WDS500"],
        (0x57, 0x01) => &["UVN128", "UV138"],
        (0x57, 0x02) => &["UVN800"],
        (0x57, 0x03) => &["TFA"],
        (0x59, 0x01) => &["CM113", "Electrisave"],
        (0x5A, 0x01) => &["CM119/160"],
        (0x5A, 0x02) => &["CM180"],
        (0x5B, 0x01) => &["CM180i"],
        (0x5C, 0x01) => &["Revolt"],
        (0x5D, 0x01) => &["BWR101/102"],
        (0x5D, 0x02) => &["GR101"],
        (0x76, 0x01) => &["Alecto ACH2010"],
        (0x76, 0x02) => &["Alecto WS5500"],
        (0x77, 0x01) => &["Davis"],
        _ => &["Unknown"],
    }
}
