//! Protocol names, families and transmit subtypes.

use std::fmt;
use std::str::FromStr;

/// Shape of the events a protocol produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Weather and environment sensors.
    Sensor,
    /// Energy and current meters.
    Energy,
    /// Addressable lighting switches (identifier + unit code).
    Lighting,
}

/// Protocol families understood by the bridge.
///
/// The names are the keys used in the configuration file and the default
/// topic segment for each protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Temperature1,
    Humidity1,
    TemperatureHumidity1,
    TempHumBaro1,
    TemperatureRain1,
    Rain1,
    Wind1,
    Uv1,
    Weather,
    Solar,
    Weight1,
    Elec1,
    Elec2,
    Elec3,
    Elec4,
    Elec5,
    Lighting2,
    Lighting5,
}

impl Protocol {
    /// Every protocol, in discovery order.
    pub const ALL: [Self; 18] = [
        Self::Temperature1,
        Self::Humidity1,
        Self::TemperatureHumidity1,
        Self::TempHumBaro1,
        Self::TemperatureRain1,
        Self::Rain1,
        Self::Wind1,
        Self::Uv1,
        Self::Weather,
        Self::Solar,
        Self::Weight1,
        Self::Elec1,
        Self::Elec2,
        Self::Elec3,
        Self::Elec4,
        Self::Elec5,
        Self::Lighting2,
        Self::Lighting5,
    ];

    /// Returns the configuration name of the protocol.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature1 => "temperature1",
            Self::Humidity1 => "humidity1",
            Self::TemperatureHumidity1 => "temperaturehumidity1",
            Self::TempHumBaro1 => "temphumbaro1",
            Self::TemperatureRain1 => "temperaturerain1",
            Self::Rain1 => "rain1",
            Self::Wind1 => "wind1",
            Self::Uv1 => "uv1",
            Self::Weather => "weather",
            Self::Solar => "solar",
            Self::Weight1 => "weight1",
            Self::Elec1 => "elec1",
            Self::Elec2 => "elec2",
            Self::Elec3 => "elec3",
            Self::Elec4 => "elec4",
            Self::Elec5 => "elec5",
            Self::Lighting2 => "lighting2",
            Self::Lighting5 => "lighting5",
        }
    }

    /// Looks up a protocol by its configuration name.
    ///
    /// Returns `None` for names the bridge does not handle.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns the event family of the protocol.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Elec1 | Self::Elec2 | Self::Elec3 | Self::Elec4 | Self::Elec5 => Family::Energy,
            Self::Lighting2 | Self::Lighting5 => Family::Lighting,
            _ => Family::Sensor,
        }
    }

    /// Returns true if the bridge can send switch commands for this protocol.
    #[must_use]
    pub const fn is_transmit_capable(self) -> bool {
        matches!(self, Self::Lighting2 | Self::Lighting5)
    }

    /// Returns the subtype name used when the configuration omits one.
    #[must_use]
    pub const fn default_subtype(self) -> Option<&'static str> {
        match self {
            Self::Lighting2 => Some("AC"),
            Self::Lighting5 => Some("CONRAD"),
            _ => None,
        }
    }

    /// Returns the subtype table of a transmit-capable protocol.
    #[must_use]
    pub const fn subtypes(self) -> &'static [(&'static str, u8)] {
        match self {
            Self::Lighting2 => LIGHTING2_SUBTYPES,
            Self::Lighting5 => LIGHTING5_SUBTYPES,
            _ => &[],
        }
    }

    /// Resolves a subtype name to its wire value.
    #[must_use]
    pub fn subtype_code(self, name: &str) -> Option<u8> {
        self.subtypes()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, code)| code)
    }

    /// Resolves a wire subtype value to its name.
    #[must_use]
    pub fn subtype_name(self, code: u8) -> Option<&'static str> {
        self.subtypes()
            .iter()
            .find(|&&(_, c)| c == code)
            .map(|&(name, _)| name)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown protocol name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProtocol(pub String);

impl fmt::Display for UnknownProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown protocol '{}'", self.0)
    }
}

impl std::error::Error for UnknownProtocol {}

impl FromStr for Protocol {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownProtocol(s.to_owned()))
    }
}

const LIGHTING2_SUBTYPES: &[(&str, u8)] = &[
    ("AC", 0x00),
    ("HOMEEASY_EU", 0x01),
    ("ANSLUT", 0x02),
    ("KAMBROOK", 0x03),
];

const LIGHTING5_SUBTYPES: &[(&str, u8)] = &[
    ("LIGHTWAVERF", 0x00),
    ("EMW100", 0x01),
    ("BBSB", 0x02),
    ("MDREMOTE", 0x03),
    ("CONRAD", 0x04),
    ("LIVOLO", 0x05),
    ("TRC02", 0x06),
    ("AOKE", 0x07),
    ("TRC02_2", 0x08),
    ("EURODOMEST", 0x09),
    ("LIVOLO_APPLIANCE", 0x0A),
    ("RGB432W", 0x0B),
    ("MDREMOTE107", 0x0C),
    ("LEGRAND", 0x0D),
    ("AVANTEK", 0x0E),
    ("IT", 0x0F),
    ("MDREMOTE108", 0x10),
    ("KANGTAI", 0x11),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        for protocol in Protocol::ALL {
            assert_eq!(Protocol::from_name(protocol.name()), Some(protocol));
        }
        assert_eq!(Protocol::from_name("serial"), None);
        assert_eq!(Protocol::from_name("Lighting2"), None);
        assert!("mqtt".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_families() {
        assert_eq!(Protocol::Wind1.family(), Family::Sensor);
        assert_eq!(Protocol::Elec3.family(), Family::Energy);
        assert_eq!(Protocol::Lighting5.family(), Family::Lighting);
    }

    #[test]
    fn test_transmit_capable() {
        let tx: Vec<_> = Protocol::ALL
            .into_iter()
            .filter(|p| p.is_transmit_capable())
            .collect();
        assert_eq!(tx, vec![Protocol::Lighting2, Protocol::Lighting5]);
    }

    #[test]
    fn test_subtypes() {
        assert_eq!(Protocol::Lighting2.default_subtype(), Some("AC"));
        assert_eq!(Protocol::Lighting5.default_subtype(), Some("CONRAD"));
        assert_eq!(Protocol::Lighting5.subtype_code("CONRAD"), Some(0x04));
        assert_eq!(Protocol::Lighting2.subtype_name(0x01), Some("HOMEEASY_EU"));
        assert_eq!(Protocol::Lighting2.subtype_code("CONRAD"), None);
        assert_eq!(Protocol::Temperature1.subtype_code("AC"), None);
    }
}
