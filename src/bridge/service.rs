//! Bridging mode: one task routing transceiver events and MQTT messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rumqttc::{Event as MqttEvent, EventLoop, Packet};

use crate::bridge::inbound::route_event;
use crate::bridge::outbound::{CommandOutcome, route_command};
use crate::bridge::registration::BridgeContext;
use crate::bridge::Publish;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::mqtt::{self, MqttPublisher};
use crate::rfxcom::{RfxCom, log_status};
use crate::transport::Transport;

/// Routing state plus the publisher and the hardware-ready flag.
pub struct Bridge<P> {
    context: BridgeContext,
    publisher: P,
    ready: Arc<AtomicBool>,
}

impl<P: Publish> Bridge<P> {
    /// Creates a bridge.
    #[must_use]
    pub const fn new(context: BridgeContext, publisher: P, ready: Arc<AtomicBool>) -> Self {
        Self {
            context,
            publisher,
            ready,
        }
    }

    /// Returns the routing context.
    #[must_use]
    pub const fn context(&self) -> &BridgeContext {
        &self.context
    }

    /// Returns the publisher.
    #[must_use]
    pub const fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Handles one transceiver event. Returns the number of messages
    /// published.
    pub fn handle_event(&self, event: &Event) -> usize {
        match event {
            Event::Device(device) => route_event(&self.context, &self.publisher, device),
            Event::Status(status) => {
                log_status(status);
                0
            }
            Event::Ready => {
                tracing::info!(target: "rfxcom", "RFXCOM connection established");
                0
            }
            _ => 0,
        }
    }

    /// Handles one MQTT message.
    pub fn handle_message(&self, topic: &str, payload: &[u8]) -> CommandOutcome {
        route_command(
            &self.context,
            self.ready.load(Ordering::SeqCst),
            topic,
            payload,
        )
    }
}

impl Bridge<MqttPublisher> {
    /// Handles one MQTT event loop notification.
    ///
    /// Subscriptions are (re)issued on every connection acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriptions cannot be queued.
    pub fn handle_mqtt(&self, event: MqttEvent) -> Result<()> {
        match event {
            MqttEvent::Incoming(Packet::ConnAck(_)) => {
                tracing::info!(target: "mqtt", "Connected");
                self.publisher.subscribe_all(&self.context.subscriptions())?;
            }
            MqttEvent::Incoming(Packet::Publish(publish)) => {
                self.handle_message(&publish.topic, &publish.payload);
            }
            _ => {}
        }
        Ok(())
    }
}

/// Runs the bridge until the transceiver or the broker connection fails.
///
/// Opens the transceiver, registers the configured protocols, connects to
/// the broker and initialises the transceiver while already routing MQTT
/// traffic. Commands arriving before initialisation completes are dropped.
///
/// # Errors
///
/// Returns an error on any unrecoverable setup or connection failure.
pub async fn run<T: Transport + 'static>(config: &Config, rfx: &mut RfxCom<T>) -> Result<()> {
    let mut events = rfx.subscribe();
    rfx.connect().await?;

    let context = BridgeContext::register(config, &*rfx)?;
    let (publisher, event_loop) = mqtt::connect(&config.mqtt)?;
    let bridge = Bridge::new(context, publisher, rfx.ready_flag());

    let result = serve(&bridge, rfx, &mut events, event_loop).await;
    if let Err(e) = bridge.publisher().disconnect() {
        tracing::debug!(target: "mqtt", "disconnect failed: {}", e);
    }
    if let Err(e) = rfx.disconnect().await {
        tracing::debug!(target: "rfxcom", "closing serial port failed: {}", e);
    }
    result
}

async fn serve<T: Transport + 'static>(
    bridge: &Bridge<MqttPublisher>,
    rfx: &RfxCom<T>,
    events: &mut crate::event::Subscription,
    mut event_loop: EventLoop,
) -> Result<()> {
    let initialise = rfx.initialise();
    tokio::pin!(initialise);
    let mut initialised = false;

    loop {
        tokio::select! {
            result = &mut initialise, if !initialised => {
                result?;
                initialised = true;
            }
            event = events.recv() => match event {
                Some(Event::Disconnected) | None => {
                    tracing::error!(target: "rfxcom", "RFXCOM connection lost");
                    return Err(Error::NotConnected);
                }
                Some(event) => {
                    bridge.handle_event(&event);
                }
            },
            notification = event_loop.poll() => {
                let notification = notification.map_err(|e| {
                    tracing::error!(target: "mqtt", "MQTT connection error");
                    Error::from(e)
                })?;
                bridge.handle_mqtt(notification)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::mock::{MockFactory, MockPublisher};
    use crate::bridge::outbound::SwitchAction;
    use crate::types::{DeviceEvent, HardwareEvent, LightingReading, Protocol};

    const CONFIG: &str = "
serial:
  port: /dev/null
mqtt:
  server: mqtt://localhost
lighting2:
  devices:
    4278190080/1: lamp1
";

    fn bridge(ready: bool) -> (Bridge<MockPublisher>, MockFactory) {
        let factory = MockFactory::default();
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let context = BridgeContext::register(&config, &factory).unwrap();
        let bridge = Bridge::new(
            context,
            MockPublisher::default(),
            Arc::new(AtomicBool::new(ready)),
        );
        (bridge, factory)
    }

    #[test]
    fn test_round_trip_scenario() {
        let (bridge, factory) = bridge(true);

        let event = Event::Device(Box::new(DeviceEvent {
            protocol: Protocol::Lighting2,
            packet_type: 0x11,
            subtype: 0x00,
            reading: HardwareEvent::Lighting(LightingReading {
                id: "4278190080".into(),
                unit_code: Some(1),
                command: "On".into(),
            }),
            rssi: Some(7),
            battery_level: None,
        }));
        assert_eq!(bridge.handle_event(&event), 1);
        assert_eq!(
            bridge.publisher().messages(),
            vec![("rfxcom/lighting2/lamp1/state".to_owned(), "On".to_owned())]
        );

        let outcome = bridge.handle_message("rfxcom/lighting2/lamp1/set", b"off");
        assert_eq!(
            outcome,
            CommandOutcome::Sent {
                action: SwitchAction::Off,
                key: "4278190080/1".into()
            }
        );
        assert_eq!(
            factory.calls(),
            vec![(Protocol::Lighting2, 0x00, "off", "4278190080/1".to_owned())]
        );
    }

    #[test]
    fn test_ready_flag_is_read_per_message() {
        let (bridge, factory) = bridge(false);
        assert_eq!(
            bridge.handle_message("rfxcom/lighting2/lamp1/set", b"on"),
            CommandOutcome::NotReady
        );

        bridge.ready.store(true, Ordering::SeqCst);
        bridge.handle_message("rfxcom/lighting2/lamp1/set", b"on");
        assert_eq!(factory.calls().len(), 1);
    }

    #[test]
    fn test_non_device_events_publish_nothing() {
        let (bridge, _factory) = bridge(true);
        assert_eq!(bridge.handle_event(&Event::Connected), 0);
        assert_eq!(bridge.handle_event(&Event::Ready), 0);
        assert!(bridge.publisher().messages().is_empty());
    }
}
