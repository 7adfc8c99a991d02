//! Event system for transceiver notifications.
//!
//! Frames decoded by the read loop are turned into [`Event`]s and broadcast
//! to every subscriber: the bridge routers, the scan printer and the
//! initialisation handshake.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::broadcast;

use crate::protocol::PacketType;
use crate::types::{DeviceEvent, StatusInfo};

/// Event types that can be dispatched.
#[derive(Debug, Clone)]
pub enum Event {
    /// Serial connection established.
    Connected,
    /// Serial connection lost.
    Disconnected,
    /// Initialisation handshake completed.
    Ready,
    /// Status message received.
    Status(Box<StatusInfo>),
    /// Raw packet received, length byte stripped.
    ///
    /// Dispatched for every packet before any decoded event.
    Receive(Bytes),
    /// Device reading decoded.
    Device(Box<DeviceEvent>),
    /// Transmitter acknowledged (or rejected) a command.
    TransmitterResponse { seq: u8, accepted: bool },
}

impl Event {
    /// Returns the associated packet type if applicable.
    #[must_use]
    pub fn packet_type(&self) -> Option<PacketType> {
        match self {
            Self::Status(_) => Some(PacketType::InterfaceMessage),
            Self::Device(event) => PacketType::from_byte(event.packet_type),
            Self::TransmitterResponse { .. } => Some(PacketType::TransmitterResponse),
            Self::Receive(data) => data.first().copied().and_then(PacketType::from_byte),
            Self::Connected | Self::Disconnected | Self::Ready => None,
        }
    }
}

/// A subscription to events.
pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Receives the next event.
    ///
    /// Returns `None` once the dispatcher is gone. Lagged events are skipped
    /// with a warning.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("event subscriber lagged, {} events dropped", n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Subscription filter for decoded events of specific packet types.
///
/// Raw [`Event::Receive`] packets never match.
#[derive(Debug, Clone)]
pub struct EventFilter {
    packet_types: Vec<PacketType>,
}

impl EventFilter {
    /// Creates a filter for decoded events of specific packet types.
    #[must_use]
    pub const fn packet_types(types: Vec<PacketType>) -> Self {
        Self {
            packet_types: types,
        }
    }

    /// Checks if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if matches!(event, Event::Receive(_)) {
            return false;
        }
        event
            .packet_type()
            .is_some_and(|pkt_type| self.packet_types.contains(&pkt_type))
    }
}

struct EventDispatcherInner {
    sender: broadcast::Sender<Event>,
}

/// Dispatches events to subscribers.
#[derive(Clone)]
pub struct EventDispatcher {
    inner: Arc<EventDispatcherInner>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(EventDispatcherInner { sender }),
        }
    }

    /// Dispatches an event to all subscribers.
    pub fn dispatch(&self, event: Event) {
        // No receivers is fine
        let _ = self.inner.sender.send(event);
    }

    /// Subscribes to all events.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.inner.sender.subscribe(),
        }
    }

    /// Waits on an existing subscription for an event matching the filter.
    ///
    /// Returns `None` if the timeout expires or the channel is closed.
    pub async fn wait_for(
        subscription: &mut Subscription,
        filter: &EventFilter,
        timeout: std::time::Duration,
    ) -> Option<Event> {
        tokio::select! {
            biased;
            result = async {
                loop {
                    let event = subscription.recv().await?;
                    if filter.matches(&event) {
                        return Some(event);
                    }
                }
            } => result,
            () = tokio::time::sleep(timeout) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HardwareEvent, LightingReading, Protocol};

    fn lighting_event() -> Event {
        Event::Device(Box::new(DeviceEvent {
            protocol: Protocol::Lighting2,
            packet_type: 0x11,
            subtype: 0x00,
            reading: HardwareEvent::Lighting(LightingReading {
                id: "0x0100ABCD".into(),
                unit_code: Some(1),
                command: "On".into(),
            }),
            rssi: Some(6),
            battery_level: None,
        }))
    }

    #[tokio::test]
    async fn test_event_dispatch() {
        let dispatcher = EventDispatcher::new(16);
        let mut sub = dispatcher.subscribe();

        dispatcher.dispatch(Event::Connected);

        let event = tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv())
            .await
            .unwrap();

        assert!(matches!(event, Some(Event::Connected)));
    }

    #[test]
    fn test_event_filter() {
        let filter = EventFilter::packet_types(vec![PacketType::Lighting2]);

        assert!(filter.matches(&lighting_event()));
        assert!(!filter.matches(&Event::Connected));
        assert!(!filter.matches(&Event::Receive(Bytes::from_static(&[0x11, 0x00]))));
        assert!(!filter.matches(&Event::TransmitterResponse {
            seq: 1,
            accepted: true
        }));
    }

    #[test]
    fn test_filter_skips_raw_status_packet() {
        let filter = EventFilter::packet_types(vec![PacketType::InterfaceMessage]);
        assert!(!filter.matches(&Event::Receive(Bytes::from_static(&[0x01, 0x00]))));
        assert!(!filter.matches(&Event::Ready));
    }

    #[tokio::test]
    async fn test_wait_for_skips_other_events() {
        let dispatcher = EventDispatcher::new(16);
        let mut sub = dispatcher.subscribe();

        dispatcher.dispatch(Event::Receive(Bytes::from_static(&[0x11])));
        dispatcher.dispatch(lighting_event());

        let filter = EventFilter::packet_types(vec![PacketType::Lighting2]);
        let event =
            EventDispatcher::wait_for(&mut sub, &filter, std::time::Duration::from_millis(100))
                .await;
        assert!(matches!(event, Some(Event::Device(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_timeout() {
        let dispatcher = EventDispatcher::new(16);
        let mut sub = dispatcher.subscribe();
        let filter = EventFilter::packet_types(vec![PacketType::InterfaceMessage]);

        let event =
            EventDispatcher::wait_for(&mut sub, &filter, std::time::Duration::from_secs(5)).await;
        assert!(event.is_none());
    }
}
