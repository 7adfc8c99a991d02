//! Error types for the rfxtrx2mqtt bridge.

use thiserror::Error;

/// The main error type for bridge operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Serial port error.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding/decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration is missing a required value or holds an invalid one.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// MQTT request could not be queued.
    #[error("MQTT client error: {0}")]
    MqttClient(#[from] rumqttc::ClientError),

    /// MQTT connection failed.
    #[error("MQTT connection error: {0}")]
    MqttConnection(#[from] rumqttc::ConnectionError),

    /// Unexpected or malformed data from the transceiver.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// Waiting for a transceiver response timed out.
    #[error("command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection is not established.
    #[error("not connected")]
    NotConnected,

    /// A device key could not be turned into a transmit address.
    #[error("invalid device key '{key}': {reason}")]
    InvalidDeviceKey { key: String, reason: String },

    /// A transmit subtype name is not known for the protocol.
    #[error("unknown subtype '{subtype}' for protocol {protocol}")]
    UnknownSubtype { protocol: String, subtype: String },

    /// Channel closed.
    #[error("channel closed")]
    ChannelClosed,
}

/// Frame-specific errors.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Frame announces a zero-length payload.
    #[error("empty frame")]
    Empty,

    /// Frame payload exceeds maximum size.
    #[error("frame too large: {size} bytes exceeds maximum {max}")]
    TooLarge { size: usize, max: usize },
}

impl Error {
    /// Creates a configuration error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
