use std::str::FromStr;
use std::time::Duration;

use kiosk_printer::UsbId;

use crate::printer::RetryPolicy;
use crate::receipt::ShopProfile;

/// Printer-side settings
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Characters per printed line
    pub paper_width: usize,
    /// Upper bound for opening the device (milliseconds)
    pub open_timeout_ms: u64,
    /// Upper bound for one bulk transfer (milliseconds)
    pub usb_timeout_ms: u64,
    pub retry: RetryPolicy,
}

impl PrinterConfig {
    pub fn usb_id(&self) -> UsbId {
        UsbId::new(self.vendor_id, self.product_id)
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    pub fn usb_timeout(&self) -> Duration {
        Duration::from_millis(self.usb_timeout_ms)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            vendor_id: 0x1fc9,
            product_id: 0x2016,
            paper_width: 48,
            open_timeout_ms: 5000,
            usb_timeout_ms: 5000,
            retry: RetryPolicy::default(),
        }
    }
}

/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// honoured). Values that fail to parse fall back to the default.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_HOST | 0.0.0.0 | bind host |
/// | HTTP_PORT | 5000 | bind port |
/// | PRINTER_VENDOR_ID | 0x1fc9 | USB vendor id, hex or decimal |
/// | PRINTER_PRODUCT_ID | 0x2016 | USB product id, hex or decimal |
/// | PRINTER_PAPER_WIDTH | 48 | characters per line |
/// | PRINTER_OPEN_TIMEOUT_MS | 5000 | device open timeout |
/// | PRINTER_USB_TIMEOUT_MS | 5000 | bulk write timeout |
/// | PRINTER_RETRY_INTERVAL_MS | 5000 | first reconnect delay |
/// | PRINTER_RETRY_MULTIPLIER | 1.0 | backoff factor |
/// | PRINTER_RETRY_MAX_INTERVAL_MS | 60000 | backoff cap |
/// | PRINTER_RETRY_MAX_ATTEMPTS | 0 | 0 = retry forever |
/// | SHOP_NAME, SHOP_TAGLINE, SHOP_ADDRESS, SHOP_PHONE | | receipt header |
/// | SHOP_SALES_REF | Manager | sales ref label |
/// | SHOP_CURRENCY | Rs | money prefix |
/// | SHOP_FOOTER | THANK YOU PLEASE COME AGAIN! | footer line |
/// | SHOP_LOGO_PATH | | logo image above the header |
/// | LOG_LEVEL | info | used when RUST_LOG is unset |
/// | LOG_DIR | | daily rolling log directory |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | budget for stopping background tasks |
///
/// # Example
///
/// ```ignore
/// PRINTER_VENDOR_ID=0x04b8 PRINTER_PRODUCT_ID=0x0202 HTTP_PORT=8080 kiosk-server
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub printer: PrinterConfig,
    pub shop: ShopProfile,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Shutdown timeout (milliseconds)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    ///
    /// Used by tests to avoid touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vars = Vars(lookup);

        let printer_defaults = PrinterConfig::default();
        let retry_defaults = RetryPolicy::default();
        let shop_defaults = ShopProfile::default();

        let retry = RetryPolicy {
            initial_delay: vars
                .parsed("PRINTER_RETRY_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(retry_defaults.initial_delay),
            multiplier: vars
                .parsed("PRINTER_RETRY_MULTIPLIER")
                .filter(|m: &f64| m.is_finite() && *m >= 1.0)
                .unwrap_or(retry_defaults.multiplier),
            max_delay: vars
                .parsed("PRINTER_RETRY_MAX_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(retry_defaults.max_delay),
            max_attempts: None,
        }
        .with_max_attempts(vars.parsed("PRINTER_RETRY_MAX_ATTEMPTS").unwrap_or(0));

        let printer = PrinterConfig {
            vendor_id: vars
                .text("PRINTER_VENDOR_ID")
                .and_then(|v| parse_usb_id(&v))
                .unwrap_or(printer_defaults.vendor_id),
            product_id: vars
                .text("PRINTER_PRODUCT_ID")
                .and_then(|v| parse_usb_id(&v))
                .unwrap_or(printer_defaults.product_id),
            paper_width: vars
                .parsed("PRINTER_PAPER_WIDTH")
                .filter(|w: &usize| *w > 0)
                .unwrap_or(printer_defaults.paper_width),
            open_timeout_ms: vars
                .parsed("PRINTER_OPEN_TIMEOUT_MS")
                .unwrap_or(printer_defaults.open_timeout_ms),
            usb_timeout_ms: vars
                .parsed("PRINTER_USB_TIMEOUT_MS")
                .unwrap_or(printer_defaults.usb_timeout_ms),
            retry,
        };

        let shop = ShopProfile {
            name: vars.text("SHOP_NAME").unwrap_or(shop_defaults.name),
            tagline: vars.text("SHOP_TAGLINE").unwrap_or(shop_defaults.tagline),
            address: vars.text("SHOP_ADDRESS").unwrap_or(shop_defaults.address),
            phone: vars.text("SHOP_PHONE").unwrap_or(shop_defaults.phone),
            sales_ref: vars
                .text("SHOP_SALES_REF")
                .unwrap_or(shop_defaults.sales_ref),
            currency: vars.text("SHOP_CURRENCY").unwrap_or(shop_defaults.currency),
            footer: vars.text("SHOP_FOOTER").unwrap_or(shop_defaults.footer),
            logo_path: vars.text("SHOP_LOGO_PATH"),
        };

        Self {
            http_host: vars.text("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: vars.parsed("HTTP_PORT").unwrap_or(5000),
            printer,
            shop,
            log_level: vars.text("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: vars.text("LOG_DIR"),
            shutdown_timeout_ms: vars.parsed("SHUTDOWN_TIMEOUT_MS").unwrap_or(10000),
        }
    }

    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Trimmed, non-empty lookups with typed parsing
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn text(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.text(key).and_then(|v| v.parse().ok())
    }
}

/// Parse a USB id written as `0x1fc9` or `8137`
fn parse_usb_id(value: &str) -> Option<u16> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
