#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kiosk_printer::{PrintError, PrintResult, Printer};
use kiosk_server::{Config, RetryPolicy, ServerState};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// In-memory printer that can be unplugged and records every job
///
/// Behaves like the USB adapter: unplugging leaves the session in place,
/// `open` is a no-op while the session is alive and drops it once the device
/// has gone.
#[derive(Default)]
pub struct FakePrinter {
    online: AtomicBool,
    fail_writes: AtomicBool,
    open: AtomicBool,
    opens: AtomicUsize,
    closes: AtomicUsize,
    /// One entry per write call
    writes: Mutex<Vec<Vec<u8>>>,
    /// Every byte in the order the device received it
    stream: Mutex<Vec<u8>>,
    /// Per-chunk delay, widens the window for interleaving
    chunk_delay: Mutex<Option<Duration>>,
}

impl FakePrinter {
    pub fn online() -> Arc<Self> {
        let printer = Self::default();
        printer.online.store(true, Ordering::SeqCst);
        Arc::new(printer)
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn plug_in(&self) {
        self.online.store(true, Ordering::SeqCst);
    }

    pub fn unplug(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn slow_chunks(&self, delay: Duration) {
        *self.chunk_delay.lock() = Some(delay);
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().clone()
    }

    pub fn stream(&self) -> Vec<u8> {
        self.stream.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Printer for FakePrinter {
    async fn open(&self) -> PrintResult<()> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if !self.online.load(Ordering::SeqCst) {
            self.open.store(false, Ordering::SeqCst);
            return Err(PrintError::DeviceNotFound("1fc9:2016".into()));
        }
        // Already-open sessions stay as they are
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn write(&self, data: &[u8]) -> PrintResult<()> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(PrintError::NotOpen("1fc9:2016".into()));
        }
        if !self.online.load(Ordering::SeqCst) {
            return Err(PrintError::Io(std::io::Error::other("device disconnected")));
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PrintError::Timeout("bulk write".into()));
        }

        let delay = *self.chunk_delay.lock();
        for chunk in data.chunks(16) {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.stream.lock().extend_from_slice(chunk);
        }
        self.writes.lock().push(data.to_vec());
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
    }

    fn describe(&self) -> String {
        "fake printer".to_string()
    }
}

/// Config with short retry delays
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.printer.retry = RetryPolicy::fixed(Duration::from_millis(100));
    config.printer.open_timeout_ms = 1000;
    config
}

pub fn test_state(printer: Arc<FakePrinter>) -> ServerState {
    ServerState::new(test_config(), printer, CancellationToken::new())
}

/// Coke/Fries sale used across tests
pub fn sample_order_json() -> serde_json::Value {
    serde_json::json!({
        "totalBill": 405.00,
        "discountAmount": 45.00,
        "discount": 10,
        "changeAmount": 95.00,
        "subTotal": 450.00,
        "cashAmount": 500,
        "date": "2024-05-01",
        "time": "12:30 PM",
        "billNo": "INV-0042",
        "cart": [
            {"name": "Coke", "quantity": 2, "price": 100.00},
            {"name": "Fries", "quantity": 1, "price": 250.00}
        ]
    })
}
