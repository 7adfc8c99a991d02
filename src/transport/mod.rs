//! Transport layer for RFXtrx communication.
//!
//! This module provides the abstraction for different transport methods.
//! Currently only USB/Serial is implemented.

pub mod serial;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::error::Result;

/// Read half handed to the background read loop.
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Trait for transport implementations.
pub trait Transport: Send {
    /// Connects to the device.
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Disconnects from the device.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Frames and sends a packet to the device.
    fn send(&mut self, packet: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Takes the read half for use in a background task.
    ///
    /// Returns `None` if not connected or already taken.
    fn take_reader(&mut self) -> Option<BoxedReader>;

    /// Returns true if connected.
    fn is_connected(&self) -> bool;
}

pub use serial::SerialTransport;
