//! Device registry: raw device keys to display names.
//!
//! Keys are compared in a canonical textual form so that a key written as a
//! YAML number, a quoted string or a lower-case hex literal still matches
//! the identifier the transceiver reports.

/// Returns the canonical form of a raw device key.
///
/// Each `/`-separated part is trimmed, and hex literals are rewritten as
/// `0x` followed by upper-case digits. Everything else is kept verbatim.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .split('/')
        .map(|part| {
            let part = part.trim();
            match part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
                Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
                    format!("0x{}", digits.to_ascii_uppercase())
                }
                _ => part.to_owned(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Mapping from raw device key to display name for one protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceMap {
    entries: Vec<(String, String)>,
}

impl DeviceMap {
    /// Creates an empty device map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a device, replacing the name of an existing key.
    pub fn insert(&mut self, key: &str, name: impl Into<String>) {
        let key = normalize_key(key);
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = name;
        } else {
            self.entries.push((key, name));
        }
    }

    /// Returns the display name of a raw device key.
    #[must_use]
    pub fn name_of(&self, raw_key: &str) -> Option<&str> {
        let key = normalize_key(raw_key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, name)| name.as_str())
    }

    /// Returns the raw key of the first device with the given display name.
    #[must_use]
    pub fn key_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, n)| n == name)
            .map(|(key, _)| key.as_str())
    }

    /// Iterates over `(key, name)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n.as_str()))
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no device is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, N: Into<String>> FromIterator<(K, N)> for DeviceMap {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, name) in iter {
            map.insert(key.as_ref(), name);
        }
        map
    }
}
