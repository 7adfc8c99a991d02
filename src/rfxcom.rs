//! Main [`RfxCom`] transceiver client implementation.
//!
//! This module combines the transport, the frame decoder and the event
//! dispatcher into a client that opens the transceiver, runs the
//! initialisation handshake and hands out bound [`Transmitter`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::event::{Event, EventDispatcher, EventFilter, Subscription};
use crate::protocol::{
    DeviceAddress, FrameDecoder, InterfaceCommand, PacketType, SwitchCommand, interface_command,
    parse_device_event, parse_status, switch_command,
};
use crate::transport::serial::{SerialConfig, run_read_loop};
use crate::transport::{SerialTransport, Transport};
use crate::types::{Protocol, StatusInfo};

/// Time the receiver needs to settle after a reset.
pub const RESET_DELAY: Duration = Duration::from_millis(500);

/// Time to wait for the status message.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity of the outgoing command queue.
const COMMAND_QUEUE: usize = 32;

/// Client for an RFXtrx transceiver.
pub struct RfxCom<T> {
    transport: Arc<Mutex<T>>,
    dispatcher: EventDispatcher,
    command_tx: mpsc::Sender<Bytes>,
    command_rx: Option<mpsc::Receiver<Bytes>>,
    seq: Arc<AtomicU8>,
    ready: Arc<AtomicBool>,
    discard: Arc<AtomicBool>,

    // Background tasks
    read_task: Option<JoinHandle<()>>,
    process_task: Option<JoinHandle<()>>,
    write_task: Option<JoinHandle<()>>,
}

impl RfxCom<SerialTransport> {
    /// Creates a new client for a serial port.
    ///
    /// The port is not opened until [`RfxCom::connect`] is called.
    #[must_use]
    pub fn serial(port: impl Into<String>) -> Self {
        Self::with_serial_config(SerialConfig::new(port))
    }

    /// Creates a new client with custom serial configuration.
    #[must_use]
    pub fn with_serial_config(config: SerialConfig) -> Self {
        Self::new(SerialTransport::new(config))
    }
}

impl<T: Transport + 'static> RfxCom<T> {
    /// Creates a new client with the given transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);

        Self {
            transport: Arc::new(Mutex::new(transport)),
            dispatcher: EventDispatcher::new(256),
            command_tx,
            command_rx: Some(command_rx),
            seq: Arc::new(AtomicU8::new(0)),
            ready: Arc::new(AtomicBool::new(false)),
            discard: Arc::new(AtomicBool::new(false)),
            read_task: None,
            process_task: None,
            write_task: None,
        }
    }

    /// Opens the transport and starts the background tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be opened.
    pub async fn connect(&mut self) -> Result<()> {
        let reader = {
            let mut transport = self.transport.lock().await;
            transport.connect().await?;
            transport.take_reader()
        };

        let (frame_tx, mut frame_rx) = mpsc::channel::<Bytes>(256);

        if let Some(reader) = reader {
            let dispatcher = self.dispatcher.clone();
            self.read_task = Some(tokio::spawn(async move {
                if let Err(e) = run_read_loop(reader, FrameDecoder::new(), frame_tx).await {
                    tracing::error!("read loop error: {}", e);
                }
                dispatcher.dispatch(Event::Disconnected);
            }));
        }

        let dispatcher = self.dispatcher.clone();
        let discard = Arc::clone(&self.discard);
        self.process_task = Some(tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                process_frame(frame, &dispatcher, &discard);
            }
        }));

        if let Some(mut command_rx) = self.command_rx.take() {
            let transport = Arc::clone(&self.transport);
            self.write_task = Some(tokio::spawn(async move {
                while let Some(packet) = command_rx.recv().await {
                    let mut transport = transport.lock().await;
                    if let Err(e) = transport.send(packet).await {
                        tracing::warn!("failed to write to transceiver: {}", e);
                    }
                }
            }));
        }

        self.dispatcher.dispatch(Event::Connected);
        Ok(())
    }

    /// Runs the initialisation handshake.
    ///
    /// This will:
    /// 1. Reset the receiver and discard anything it sends for 500ms
    /// 2. Request and wait for the status message
    /// 3. Start the receiver
    /// 4. Mark the transceiver as ready
    ///
    /// # Errors
    ///
    /// Returns an error if the status message does not arrive in time.
    pub async fn initialise(&self) -> Result<StatusInfo> {
        let mut subscription = self.subscribe();

        self.discard.store(true, Ordering::SeqCst);
        self.queue(interface_command(InterfaceCommand::Reset, self.next_seq()))
            .await?;
        tokio::time::sleep(RESET_DELAY).await;
        self.discard.store(false, Ordering::SeqCst);

        self.queue(interface_command(InterfaceCommand::GetStatus, self.next_seq()))
            .await?;

        let filter = EventFilter::packet_types(vec![PacketType::InterfaceMessage]);
        let status = match EventDispatcher::wait_for(&mut subscription, &filter, STATUS_TIMEOUT)
            .await
        {
            Some(Event::Status(status)) => *status,
            _ => {
                return Err(Error::Timeout {
                    timeout_ms: u64::try_from(STATUS_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
                });
            }
        };

        self.queue(interface_command(
            InterfaceCommand::StartReceiver,
            self.next_seq(),
        ))
        .await?;

        self.ready.store(true, Ordering::SeqCst);
        self.dispatcher.dispatch(Event::Ready);

        Ok(status)
    }

    /// Returns the shared ready flag.
    #[must_use]
    pub fn ready_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ready)
    }

    /// Subscribes to events.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.dispatcher.subscribe()
    }

    /// Creates a transmitter bound to a protocol and subtype.
    ///
    /// # Errors
    ///
    /// Returns an error if the protocol cannot transmit.
    pub fn transmitter(&self, protocol: Protocol, subtype: u8) -> Result<Transmitter> {
        if !protocol.is_transmit_capable() {
            return Err(Error::Protocol {
                message: format!("protocol {protocol} cannot transmit"),
            });
        }

        Ok(Transmitter {
            protocol,
            subtype,
            command_tx: self.command_tx.clone(),
            seq: Arc::clone(&self.seq),
        })
    }

    /// Stops the background tasks and closes the transport.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.abort_tasks();
        self.ready.store(false, Ordering::SeqCst);

        {
            let mut transport = self.transport.lock().await;
            transport.disconnect().await?;
        }

        self.dispatcher.dispatch(Event::Disconnected);
        Ok(())
    }

    async fn queue(&self, packet: Bytes) -> Result<()> {
        self.command_tx
            .send(packet)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    fn next_seq(&self) -> u8 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn abort_tasks(&mut self) {
        for task in [
            self.read_task.take(),
            self.process_task.take(),
            self.write_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

/// Transmitter bound to one lighting protocol and subtype.
#[derive(Clone)]
pub struct Transmitter {
    protocol: Protocol,
    subtype: u8,
    command_tx: mpsc::Sender<Bytes>,
    seq: Arc<AtomicU8>,
}

impl std::fmt::Debug for Transmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transmitter")
            .field("protocol", &self.protocol)
            .field("subtype", &self.subtype)
            .finish_non_exhaustive()
    }
}

impl Transmitter {
    /// Switches a unit on. `device_key` is `identifier/unitCode`.
    pub fn switch_on(&self, device_key: &str) -> Result<()> {
        self.send(device_key, SwitchCommand::On)
    }

    /// Switches a unit off. `device_key` is `identifier/unitCode`.
    pub fn switch_off(&self, device_key: &str) -> Result<()> {
        self.send(device_key, SwitchCommand::Off)
    }

    fn send(&self, device_key: &str, command: SwitchCommand) -> Result<()> {
        let address = DeviceAddress::parse(self.protocol, device_key)?;
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let packet = switch_command(self.protocol, self.subtype, seq, address, command)?;

        tracing::debug!(
            "queueing {:?} for {} {} (seq {})",
            command,
            self.protocol,
            device_key,
            seq
        );
        self.command_tx.try_send(packet).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => Error::Protocol {
                message: "transmit queue full".into(),
            },
            mpsc::error::TrySendError::Closed(_) => Error::ChannelClosed,
        })
    }
}

/// Processes a received packet and dispatches the matching events.
fn process_frame(frame: Bytes, dispatcher: &EventDispatcher, discard: &AtomicBool) {
    if frame.is_empty() {
        return;
    }
    if discard.load(Ordering::SeqCst) {
        tracing::trace!("discarding {} bytes received during reset", frame.len());
        return;
    }

    let packet_type = frame[0];
    tracing::trace!(
        "processing packet type 0x{packet_type:02x}, {} bytes",
        frame.len()
    );

    dispatcher.dispatch(Event::Receive(frame.clone()));

    let event = match PacketType::from_byte(packet_type) {
        Some(PacketType::InterfaceMessage) => match (frame.get(1), frame.get(3)) {
            (Some(0x00), Some(0x02 | 0x03)) => match parse_status(&frame) {
                Ok(status) => Event::Status(Box::new(status)),
                Err(e) => {
                    tracing::warn!("failed to parse status message: {}", e);
                    return;
                }
            },
            (Some(0x07), _) => {
                tracing::debug!("receiver started");
                return;
            }
            (Some(0xFF), _) => {
                tracing::warn!("transceiver rejected an interface command");
                return;
            }
            _ => return,
        },
        Some(PacketType::TransmitterResponse) => {
            let seq = frame.get(2).copied().unwrap_or_default();
            let accepted = frame.get(3) == Some(&0x00);
            if !accepted {
                tracing::warn!("transmitter rejected command (seq {})", seq);
            }
            Event::TransmitterResponse { seq, accepted }
        }
        _ => match parse_device_event(&frame) {
            Ok(Some(device)) => Event::Device(Box::new(device)),
            Ok(None) => {
                tracing::trace!("unhandled packet type 0x{packet_type:02x}");
                return;
            }
            Err(e) => {
                tracing::warn!("failed to parse packet 0x{packet_type:02x}: {}", e);
                return;
            }
        },
    };

    dispatcher.dispatch(event);
}

/// Logs a transceiver status report.
pub fn log_status(status: &StatusInfo) {
    tracing::info!(
        target: "rfxcom",
        "{}, HW version {}",
        status.receiver_type(),
        status.hardware_version
    );
    tracing::info!(
        target: "rfxcom",
        "Firmware version {} ({})",
        status.firmware_version,
        status.firmware_type()
    );
    tracing::info!(target: "rfxcom", "TX power +{} dBm", status.transmitter_power);
}

impl<T> Drop for RfxCom<T> {
    fn drop(&mut self) {
        for task in [
            self.read_task.take(),
            self.process_task.take(),
            self.write_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use tokio::io::{AsyncWriteExt, DuplexStream};

    use super::*;
    use crate::transport::BoxedReader;
    use crate::types::HardwareEvent;

    struct MockTransport {
        reader: Option<BoxedReader>,
        sent: Arc<std::sync::Mutex<Vec<Bytes>>>,
        connected: bool,
    }

    impl MockTransport {
        fn new() -> (Self, DuplexStream, Arc<std::sync::Mutex<Vec<Bytes>>>) {
            let (device, host) = tokio::io::duplex(256);
            let sent = Arc::new(std::sync::Mutex::new(Vec::new()));
            let transport = Self {
                reader: Some(Box::new(host)),
                sent: Arc::clone(&sent),
                connected: false,
            };
            (transport, device, sent)
        }
    }

    impl Transport for MockTransport {
        fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                self.connected = true;
                Ok(())
            })
        }

        fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                self.connected = false;
                Ok(())
            })
        }

        fn send(
            &mut self,
            packet: Bytes,
        ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            self.sent.lock().unwrap().push(packet);
            Box::pin(async { Ok(()) })
        }

        fn take_reader(&mut self) -> Option<BoxedReader> {
            self.reader.take()
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    const STATUS_FRAME: [u8; 21] = [
        0x14, 0x01, 0x00, 0x01, 0x02, 0x53, 0xF2, 0x00, 0x00, 0x00, 0x00, 0x01, 0x03, 0x0A,
        0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[tokio::test(start_paused = true)]
    async fn test_initialise_handshake() {
        let (transport, mut device, sent) = MockTransport::new();
        let mut rfx = RfxCom::new(transport);
        rfx.connect().await.unwrap();
        assert!(!rfx.ready_flag().load(Ordering::SeqCst));

        let device_script = async {
            tokio::time::sleep(Duration::from_millis(700)).await;
            device.write_all(&STATUS_FRAME).await.unwrap();
        };

        let (status, ()) = tokio::join!(rfx.initialise(), device_script);
        let status = status.unwrap();
        assert_eq!(status.receiver_type_code, 0x53);
        assert_eq!(status.hardware_version, "1.3");
        assert!(rfx.ready_flag().load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(10)).await;
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0][3], InterfaceCommand::Reset as u8);
        assert_eq!(sent[1][3], InterfaceCommand::GetStatus as u8);
        assert_eq!(sent[2][3], InterfaceCommand::StartReceiver as u8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialise_times_out_without_status() {
        let (transport, _device, _sent) = MockTransport::new();
        let mut rfx = RfxCom::new(transport);
        rfx.connect().await.unwrap();

        let result = rfx.initialise().await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
        assert!(!rfx.ready_flag().load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_device_events_dispatched() {
        let (transport, mut device, _sent) = MockTransport::new();
        let mut rfx = RfxCom::new(transport);
        let mut sub = rfx.subscribe();
        rfx.connect().await.unwrap();
        assert!(matches!(sub.recv().await, Some(Event::Connected)));

        device
            .write_all(&[0x0A, 0x52, 0x01, 0x03, 0x6A, 0x01, 0x00, 0xD7, 0x37, 0x02, 0x89])
            .await
            .unwrap();

        assert!(matches!(sub.recv().await, Some(Event::Receive(_))));
        let Some(Event::Device(event)) = sub.recv().await else {
            panic!("expected device event");
        };
        assert_eq!(event.protocol, Protocol::TemperatureHumidity1);
        assert!(matches!(event.reading, HardwareEvent::Sensor(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_clears_ready_and_notifies() {
        let (transport, mut device, _sent) = MockTransport::new();
        let mut rfx = RfxCom::new(transport);
        rfx.connect().await.unwrap();

        let device_script = async {
            tokio::time::sleep(Duration::from_millis(700)).await;
            device.write_all(&STATUS_FRAME).await.unwrap();
        };
        let (status, ()) = tokio::join!(rfx.initialise(), device_script);
        status.unwrap();

        let mut sub = rfx.subscribe();
        rfx.disconnect().await.unwrap();
        assert!(!rfx.ready_flag().load(Ordering::SeqCst));
        assert!(matches!(sub.recv().await, Some(Event::Disconnected)));
        assert!(!rfx.transport.lock().await.is_connected());
    }

    #[tokio::test]
    async fn test_transmitter_queues_switch_packet() {
        let (transport, _device, sent) = MockTransport::new();
        let mut rfx = RfxCom::new(transport);
        rfx.connect().await.unwrap();

        let tx = rfx.transmitter(Protocol::Lighting2, 0x00).unwrap();
        tx.switch_on("0x0100ABCD/3").unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let sent = sent.lock().unwrap();
        assert_eq!(
            &sent[0][..],
            &[0x11, 0x00, 0x00, 0x01, 0x00, 0xAB, 0xCD, 0x03, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_transmitter_rejects_bad_key() {
        let (transport, _device, _sent) = MockTransport::new();
        let rfx = RfxCom::new(transport);
        let tx = rfx.transmitter(Protocol::Lighting5, 0x04).unwrap();
        assert!(matches!(
            tx.switch_off("garage"),
            Err(Error::InvalidDeviceKey { .. })
        ));
    }

    #[test]
    fn test_transmitter_requires_tx_protocol() {
        let (transport, _device, _sent) = MockTransport::new();
        let rfx = RfxCom::new(transport);
        assert!(rfx.transmitter(Protocol::Temperature1, 0).is_err());
    }
}
