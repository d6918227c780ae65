//! Printer connection lifecycle
//!
//! [`ConnectionManager`] owns the single receipt printer. It opens the device
//! at startup, retries in the background while the device is absent and
//! serializes print jobs so their bytes never interleave.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use kiosk_printer::{PrintError, PrintResult, Printer};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use super::RetryPolicy;
use crate::utils::{AppError, AppResult};

/// Clears the retry flag when a retry chain ends, including on panic
struct RetryChainGuard<'a>(&'a AtomicBool);

impl Drop for RetryChainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Connection state and print serialization for one printer
pub struct ConnectionManager {
    printer: Arc<dyn Printer>,
    policy: RetryPolicy,
    open_timeout: Duration,
    connected: AtomicBool,
    failures: AtomicU32,
    retrying: AtomicBool,
    print_lock: Mutex<()>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("printer", &self.printer.describe())
            .field("connected", &self.is_connected())
            .field("failures", &self.consecutive_failures())
            .finish()
    }
}

impl ConnectionManager {
    pub fn new(
        printer: Arc<dyn Printer>,
        policy: RetryPolicy,
        open_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            printer,
            policy,
            open_timeout,
            connected: AtomicBool::new(false),
            failures: AtomicU32::new(0),
            retrying: AtomicBool::new(false),
            print_lock: Mutex::new(()),
            shutdown,
        }
    }

    /// Last known connectivity; performs no I/O
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Failed open attempts since the last success
    pub fn consecutive_failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Whether a background retry chain is currently running
    pub fn is_retrying(&self) -> bool {
        self.retrying.load(Ordering::SeqCst)
    }

    async fn try_open(&self) -> PrintResult<()> {
        match tokio::time::timeout(self.open_timeout, self.printer.open()).await {
            Ok(result) => result,
            Err(_) => Err(PrintError::Timeout(format!(
                "opening {} took longer than {:?}",
                self.printer.describe(),
                self.open_timeout
            ))),
        }
    }

    fn mark_connected(&self) {
        self.connected.store(true, Ordering::SeqCst);
        self.failures.store(0, Ordering::SeqCst);
    }

    fn mark_disconnected(&self) -> u32 {
        self.connected.store(false, Ordering::SeqCst);
        self.failures.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Attempt to open the printer once
    ///
    /// Never fails: the outcome lands in the connection state and the log.
    #[instrument(skip(self), fields(printer = %self.printer.describe()))]
    pub async fn connect(&self) -> bool {
        info!("🔄 Attempting to connect to printer...");
        match self.try_open().await {
            Ok(()) => {
                self.mark_connected();
                info!("✅ 🖨️ Printer successfully connected!");
                true
            }
            Err(e) => {
                let failures = self.mark_disconnected();
                error!(error = %e, failures, "❌ Printer connection failed");
                false
            }
        }
    }

    /// Keep calling [`connect`](Self::connect) until it succeeds
    ///
    /// Returns immediately when another retry chain is already running. Stops
    /// on success, on shutdown, or once the policy's attempt budget is spent.
    pub async fn connect_with_retry(&self) {
        if self.retrying.swap(true, Ordering::SeqCst) {
            info!("Printer retry already in progress");
            return;
        }
        self.run_retry_chain().await;
    }

    /// Spawn a retry chain unless one is already running
    ///
    /// Returns `true` when a new chain was started.
    pub fn schedule_reconnect(self: &Arc<Self>) -> bool {
        if self.retrying.swap(true, Ordering::SeqCst) {
            return false;
        }
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.run_retry_chain().await });
        true
    }

    /// Caller must have set `retrying`
    async fn run_retry_chain(&self) {
        let _guard = RetryChainGuard(&self.retrying);
        let mut attempts = 0u32;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }
            if self.connect().await {
                break;
            }

            attempts = attempts.saturating_add(1);
            if self.policy.is_exhausted(attempts) {
                warn!(attempts, "Giving up on printer connection");
                break;
            }

            let delay = self.policy.delay_for_attempt(attempts);
            info!("🔄 Retrying printer connection in {:?}...", delay);
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Printer retry cancelled by shutdown");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Probe the printer on demand
    ///
    /// On failure a background retry chain is scheduled.
    pub async fn check_online(self: &Arc<Self>) -> bool {
        if self.connect().await {
            info!("✅ Printer is online....");
            return true;
        }
        self.schedule_reconnect();
        false
    }

    /// (Re)open the device before printing
    ///
    /// A failure flips the state to disconnected but does not start a retry
    /// chain; the request fails instead.
    pub async fn ensure_open(&self) -> AppResult<()> {
        match self.try_open().await {
            Ok(()) => {
                self.mark_connected();
                Ok(())
            }
            Err(e) => {
                self.mark_disconnected();
                Err(AppError::Connection(e.to_string()))
            }
        }
    }

    /// Send one complete job to the printer
    ///
    /// Jobs are serialized. The device is closed after every job, whether the
    /// write succeeded or not.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn print(&self, data: &[u8]) -> AppResult<()> {
        let _job = self.print_lock.lock().await;

        self.ensure_open().await?;
        let written = self.printer.write(data).await;
        self.printer.close().await;

        written.map_err(|e| AppError::Print(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct AbsentPrinter;

    #[async_trait]
    impl Printer for AbsentPrinter {
        async fn open(&self) -> PrintResult<()> {
            Err(PrintError::DeviceNotFound("1fc9:2016".into()))
        }

        async fn write(&self, _data: &[u8]) -> PrintResult<()> {
            Err(PrintError::NotOpen("1fc9:2016".into()))
        }

        async fn close(&self) {}

        fn describe(&self) -> String {
            "absent".into()
        }
    }

    fn manager() -> ConnectionManager {
        ConnectionManager::new(
            Arc::new(AbsentPrinter),
            RetryPolicy::default(),
            Duration::from_secs(1),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_connect_counts_failures() {
        let manager = manager();
        assert!(!manager.connect().await);
        assert!(!manager.connect().await);
        assert!(!manager.is_connected());
        assert_eq!(manager.consecutive_failures(), 2);
    }

    #[tokio::test]
    async fn test_print_when_absent_is_connection_error() {
        let manager = manager();
        let err = manager.print(b"hello").await.unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
        assert!(!manager.is_retrying());
    }
}
