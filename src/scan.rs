//! Scan and stream modes: print discovered devices instead of bridging.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::bridge::normalize_key;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{Event, Subscription};
use crate::protocol::device_names;
use crate::rfxcom::{RfxCom, log_status};
use crate::transport::Transport;
use crate::types::{DeviceEvent, HardwareEvent, Protocol};

/// Discovery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Report each device once.
    Scan,
    /// Report every event, with command and signal strength.
    Stream,
}

/// Formats discovery reports and remembers the devices already reported.
#[derive(Debug)]
pub struct Scanner {
    mode: ScanMode,
    seen: HashSet<(Protocol, String)>,
}

impl Scanner {
    /// Creates a scanner.
    #[must_use]
    pub fn new(mode: ScanMode) -> Self {
        Self {
            mode,
            seen: HashSet::new(),
        }
    }

    /// Creates a scanner that skips devices already in the configuration.
    #[must_use]
    pub fn new_only(mode: ScanMode, config: &Config) -> Self {
        let mut scanner = Self::new(mode);
        for section in &config.protocols {
            let Some(protocol) = Protocol::from_name(&section.name) else {
                continue;
            };
            for (key, _) in &section.devices {
                scanner.seen.insert((protocol, normalize_key(key)));
            }
        }
        scanner
    }

    /// Returns the report for a device event, or `None` if it is suppressed.
    pub fn report(&mut self, event: &DeviceEvent) -> Option<String> {
        let device_id = event.reading.device_key();
        let seen_key = (event.protocol, normalize_key(&device_id));
        if self.seen.contains(&seen_key) {
            return None;
        }
        if self.mode == ScanMode::Scan {
            self.seen.insert(seen_key);
        }

        let names = device_names(event.packet_type, event.subtype).join(", ");
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# Device type: {}:{} ({})",
            event.packet_type, event.subtype, names
        );
        let _ = writeln!(out, "  * Device ID:  {device_id}");
        let _ = writeln!(out, "  * Protocol:   {}", event.protocol);
        if event.protocol.is_transmit_capable() {
            let subtype = event.protocol.subtype_name(event.subtype).unwrap_or("unknown");
            let _ = writeln!(out, "  * TX subtype: {subtype}");
        }
        if self.mode == ScanMode::Stream {
            if let HardwareEvent::Lighting(reading) = &event.reading {
                let _ = writeln!(out, "  * Command:    '{}'", reading.command);
            }
            if let Some(rssi) = event.rssi.filter(|&r| r > 0) {
                let _ = writeln!(out, "  * RSSI:       {rssi}");
            }
        }
        Some(out)
    }
}

/// Opens the transceiver and prints discovered devices until the
/// connection is lost.
///
/// # Errors
///
/// Returns an error if the transceiver cannot be opened or initialised, or
/// when the connection is lost.
pub async fn run<T: Transport + 'static>(rfx: &mut RfxCom<T>, scanner: Scanner) -> Result<()> {
    let mut events = rfx.subscribe();
    rfx.connect().await?;

    let result = scan(rfx, &mut events, scanner).await;
    if let Err(e) = rfx.disconnect().await {
        tracing::debug!(target: "rfxcom", "closing serial port failed: {}", e);
    }
    result
}

async fn scan<T: Transport + 'static>(
    rfx: &RfxCom<T>,
    events: &mut Subscription,
    mut scanner: Scanner,
) -> Result<()> {
    let status = rfx.initialise().await?;
    log_status(&status);
    tracing::info!(target: "rfxcom", "RFXCOM connection established");
    tracing::info!(target: "rfxcom", "Started scanning for devices...");

    loop {
        match events.recv().await {
            Some(Event::Device(event)) => {
                if let Some(report) = scanner.report(&event) {
                    println!("{report}");
                }
            }
            Some(Event::Disconnected) | None => {
                tracing::error!(target: "rfxcom", "RFXCOM connection lost");
                return Err(Error::NotConnected);
            }
            Some(_) => {}
        }
    }
}
