use std::sync::Arc;

use kiosk_printer::{Printer, UsbPrinter};
use tokio_util::sync::CancellationToken;

use super::Config;
use super::tasks::{BackgroundTasks, TaskKind};
use crate::printer::ConnectionManager;
use crate::receipt::ReceiptFormatter;

/// Server state - shared handles injected into every handler
///
/// Cloning is cheap: every field is behind an `Arc`.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Arc<Config> | immutable settings |
/// | printer | Arc<ConnectionManager> | device lifecycle and print jobs |
/// | receipts | Arc<ReceiptFormatter> | layout bound to the shop profile |
/// | shutdown | CancellationToken | observed by retry chains and background tasks |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub printer: Arc<ConnectionManager>,
    pub receipts: Arc<ReceiptFormatter>,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// Build state around any printer implementation
    pub fn new(config: Config, device: Arc<dyn Printer>, shutdown: CancellationToken) -> Self {
        let printer = ConnectionManager::new(
            device,
            config.printer.retry.clone(),
            config.printer.open_timeout(),
            shutdown.clone(),
        );
        let receipts = ReceiptFormatter::new(config.shop.clone(), config.printer.paper_width);

        Self {
            config: Arc::new(config),
            printer: Arc::new(printer),
            receipts: Arc::new(receipts),
            shutdown,
        }
    }

    /// Build state for the configured USB printer
    pub fn initialize(config: &Config, shutdown: CancellationToken) -> Self {
        let device = UsbPrinter::new(config.printer.usb_id())
            .with_timeout(config.printer.usb_timeout());
        tracing::info!(
            device = %config.printer.usb_id(),
            width = config.printer.paper_width,
            logo = config.shop.logo_path.is_some(),
            "Printer configured"
        );
        Self::new(config.clone(), Arc::new(device), shutdown)
    }

    /// Start the initial connect-and-retry loop
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let manager = Arc::clone(&self.printer);
        tasks.spawn("printer_connect", TaskKind::Startup, async move {
            manager.connect_with_retry().await;
        });
    }
}
