//! Bidirectional routing between the transceiver and MQTT.
//!
//! The bridge core is synchronous and free of I/O: it talks to the outside
//! world through the [`Publish`], [`Switch`] and [`TransmitterFactory`]
//! traits so the routers can be driven directly from tests.

pub mod inbound;
pub mod outbound;
pub mod registration;
pub mod registry;
pub mod service;
pub mod topic;

use crate::error::Result;
use crate::rfxcom::{RfxCom, Transmitter};
use crate::transport::Transport;
use crate::types::Protocol;

pub use inbound::route_event;
pub use outbound::{CommandOutcome, SwitchAction, route_command};
pub use registration::{BridgeContext, ProtocolConfig, TxProtocolSet};
pub use registry::{DeviceMap, normalize_key};
pub use service::Bridge;
pub use topic::{command_topic, format_number, topic};

/// Something telemetry can be published to.
pub trait Publish {
    /// Queues one message. Must not block.
    fn publish(&self, topic: &str, payload: &str) -> Result<()>;
}

/// A transmitter bound to one protocol and subtype.
pub trait Switch: Send + Sync {
    /// Switches the unit addressed by `device_key` on.
    fn switch_on(&self, device_key: &str) -> Result<()>;

    /// Switches the unit addressed by `device_key` off.
    fn switch_off(&self, device_key: &str) -> Result<()>;
}

/// Creates bound transmitters during protocol registration.
pub trait TransmitterFactory {
    /// Binds a transmitter to a protocol and wire subtype.
    fn bind_transmitter(&self, protocol: Protocol, subtype: u8) -> Result<Box<dyn Switch>>;
}

impl Switch for Transmitter {
    fn switch_on(&self, device_key: &str) -> Result<()> {
        Self::switch_on(self, device_key)
    }

    fn switch_off(&self, device_key: &str) -> Result<()> {
        Self::switch_off(self, device_key)
    }
}

impl<T: Transport + 'static> TransmitterFactory for RfxCom<T> {
    fn bind_transmitter(&self, protocol: Protocol, subtype: u8) -> Result<Box<dyn Switch>> {
        Ok(Box::new(self.transmitter(protocol, subtype)?))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::Error;

    /// Records every published message.
    #[derive(Default, Clone)]
    pub struct MockPublisher {
        pub messages: Arc<Mutex<Vec<(String, String)>>>,
        pub fail: bool,
    }

    impl MockPublisher {
        pub fn messages(&self) -> Vec<(String, String)> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Publish for MockPublisher {
        fn publish(&self, topic: &str, payload: &str) -> Result<()> {
            if self.fail {
                return Err(Error::NotConnected);
            }
            self.messages
                .lock()
                .unwrap()
                .push((topic.to_owned(), payload.to_owned()));
            Ok(())
        }
    }

    /// One recorded switch call: `(protocol, subtype, action, key)`.
    pub type SwitchCall = (Protocol, u8, &'static str, String);

    struct MockSwitch {
        protocol: Protocol,
        subtype: u8,
        calls: Arc<Mutex<Vec<SwitchCall>>>,
    }

    impl Switch for MockSwitch {
        fn switch_on(&self, device_key: &str) -> Result<()> {
            self.calls.lock().unwrap().push((
                self.protocol,
                self.subtype,
                "on",
                device_key.to_owned(),
            ));
            Ok(())
        }

        fn switch_off(&self, device_key: &str) -> Result<()> {
            self.calls.lock().unwrap().push((
                self.protocol,
                self.subtype,
                "off",
                device_key.to_owned(),
            ));
            Ok(())
        }
    }

    /// Hands out recording transmitters.
    #[derive(Default, Clone)]
    pub struct MockFactory {
        pub bound: Arc<Mutex<Vec<(Protocol, u8)>>>,
        pub calls: Arc<Mutex<Vec<SwitchCall>>>,
    }

    impl MockFactory {
        pub fn calls(&self) -> Vec<SwitchCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn bound(&self) -> Vec<(Protocol, u8)> {
            self.bound.lock().unwrap().clone()
        }
    }

    impl TransmitterFactory for MockFactory {
        fn bind_transmitter(&self, protocol: Protocol, subtype: u8) -> Result<Box<dyn Switch>> {
            self.bound.lock().unwrap().push((protocol, subtype));
            Ok(Box::new(MockSwitch {
                protocol,
                subtype,
                calls: Arc::clone(&self.calls),
            }))
        }
    }
}
