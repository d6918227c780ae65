//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - USB printers (libusb bulk transfers via `rusb`)

use crate::error::{PrintError, PrintResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusb::{Direction, GlobalContext, TransferType, UsbContext};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Largest single bulk transfer handed to libusb
const CHUNK_SIZE: usize = 4096;

/// Trait for printer adapters
///
/// `open` must be idempotent: opening a device that is already open and still
/// attached is a no-op. A session whose device has gone must be dropped and
/// the open attempted afresh, so `open` always reflects the device's presence.
#[async_trait]
pub trait Printer: Send + Sync {
    /// Open (or re-open) the device
    async fn open(&self) -> PrintResult<()>;

    /// Send raw ESC/POS data to an open device
    async fn write(&self, data: &[u8]) -> PrintResult<()>;

    /// Release the device; safe to call when already closed
    async fn close(&self);

    /// Human-readable identity for logs
    fn describe(&self) -> String;
}

/// USB vendor/product id pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl UsbId {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl fmt::Display for UsbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// An opened and claimed USB device
struct UsbSession {
    handle: rusb::DeviceHandle<GlobalContext>,
    interface: u8,
    endpoint: u8,
}

struct UsbInner {
    id: UsbId,
    timeout: Duration,
    session: Mutex<Option<UsbSession>>,
}

/// USB printer (printer class, bulk OUT endpoint)
///
/// libusb calls block, so every operation runs on tokio's blocking pool.
#[derive(Clone)]
pub struct UsbPrinter {
    inner: Arc<UsbInner>,
}

impl UsbPrinter {
    /// Create a printer for the given vendor/product pair
    ///
    /// Nothing is opened until [`Printer::open`] is called.
    pub fn new(id: UsbId) -> Self {
        Self {
            inner: Arc::new(UsbInner {
                id,
                timeout: Duration::from_secs(5),
                session: Mutex::new(None),
            }),
        }
    }

    /// Set the bulk transfer timeout
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let inner = UsbInner {
            id: self.inner.id,
            timeout,
            session: Mutex::new(None),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    async fn blocking<T, F>(&self, f: F) -> PrintResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&UsbInner) -> PrintResult<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&inner))
            .await
            .map_err(|e| PrintError::Io(std::io::Error::other(format!("Task join failed: {}", e))))?
    }
}

impl fmt::Debug for UsbPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbPrinter")
            .field("id", &self.inner.id)
            .field("timeout", &self.inner.timeout)
            .field("open", &self.inner.session.lock().is_some())
            .finish()
    }
}

impl UsbInner {
    fn open_blocking(&self) -> PrintResult<()> {
        let mut guard = self.session.lock();
        if let Some(session) = guard.as_ref() {
            match session.handle.active_configuration() {
                Ok(_) => {
                    debug!(device = %self.id, "Device already open");
                    return Ok(());
                }
                Err(e) => {
                    warn!(device = %self.id, error = %e, "Open session is stale, reopening");
                    if let Some(stale) = guard.take() {
                        self.release(stale);
                    }
                }
            }
        }

        let handle = GlobalContext::default()
            .open_device_with_vid_pid(self.id.vendor_id, self.id.product_id)
            .ok_or_else(|| PrintError::DeviceNotFound(self.id.to_string()))?;

        // Not supported on every platform; claiming may still succeed.
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!(device = %self.id, error = %e, "Kernel driver auto-detach unavailable");
        }

        let (interface, endpoint) = find_bulk_out(&handle.device())?
            .ok_or_else(|| PrintError::NoEndpoint(self.id.to_string()))?;

        handle.claim_interface(interface)?;

        info!(
            device = %self.id,
            interface,
            endpoint = %format!("{:#04x}", endpoint),
            "USB printer opened"
        );

        *guard = Some(UsbSession {
            handle,
            interface,
            endpoint,
        });
        Ok(())
    }

    fn write_blocking(&self, data: &[u8]) -> PrintResult<()> {
        let guard = self.session.lock();
        let session = guard
            .as_ref()
            .ok_or_else(|| PrintError::NotOpen(self.id.to_string()))?;

        let mut offset = 0;
        while offset < data.len() {
            let end = (offset + CHUNK_SIZE).min(data.len());
            let written = session
                .handle
                .write_bulk(session.endpoint, &data[offset..end], self.timeout)
                .map_err(|e| match e {
                    rusb::Error::Timeout => {
                        PrintError::Timeout(format!("Bulk write to {} timed out", self.id))
                    }
                    other => PrintError::Usb(other),
                })?;

            if written == 0 {
                return Err(PrintError::Io(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    format!("Device {} accepted no data", self.id),
                )));
            }
            offset += written;
        }

        debug!(device = %self.id, bytes = data.len(), "Bulk write complete");
        Ok(())
    }

    fn close_blocking(&self) {
        if let Some(session) = self.session.lock().take() {
            self.release(session);
            info!(device = %self.id, "USB printer closed");
        }
    }

    /// Release the claimed interface; the handle closes when dropped
    fn release(&self, session: UsbSession) {
        if let Err(e) = session.handle.release_interface(session.interface) {
            debug!(device = %self.id, error = %e, "Release interface failed");
        }
    }
}

/// Find the first bulk OUT endpoint of the active configuration
///
/// Returns `(interface_number, endpoint_address)`.
fn find_bulk_out(device: &rusb::Device<GlobalContext>) -> PrintResult<Option<(u8, u8)>> {
    let config = device.active_config_descriptor()?;

    for interface in config.interfaces() {
        for descriptor in interface.descriptors() {
            for endpoint in descriptor.endpoint_descriptors() {
                if endpoint.direction() == Direction::Out
                    && endpoint.transfer_type() == TransferType::Bulk
                {
                    return Ok(Some((descriptor.interface_number(), endpoint.address())));
                }
            }
        }
    }

    Ok(None)
}

#[async_trait]
impl Printer for UsbPrinter {
    #[instrument(skip(self), fields(device = %self.inner.id))]
    async fn open(&self) -> PrintResult<()> {
        self.blocking(|inner| inner.open_blocking()).await
    }

    #[instrument(skip(self, data), fields(device = %self.inner.id, data_len = data.len()))]
    async fn write(&self, data: &[u8]) -> PrintResult<()> {
        let data = data.to_vec();
        self.blocking(move |inner| inner.write_blocking(&data)).await
    }

    async fn close(&self) {
        if let Err(e) = self
            .blocking(|inner| {
                inner.close_blocking();
                Ok(())
            })
            .await
        {
            warn!(device = %self.inner.id, error = %e, "Close failed");
        }
    }

    fn describe(&self) -> String {
        format!("usb:{}", self.inner.id)
    }
}
