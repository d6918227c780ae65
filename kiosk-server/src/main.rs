use kiosk_server::{Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env, configuration, logging
    let config = setup_environment();

    print_banner();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        device = %config.printer.usb_id(),
        "Kiosk print server starting..."
    );

    // Server::run spawns the printer connect loop before serving
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
