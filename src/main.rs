use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use virtualpad::config::{config_path, AppConfig};
use virtualpad::layout::LayoutTree;
use virtualpad::transport::EventForwarder;
use virtualpad::ui::VirtualpadUI;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let path = config_path();
    let config = AppConfig::load_or_init(&path)
        .await
        .map_err(|e| eyre!("Failed to load configuration from {}: {}", path.display(), e))?;

    let tree = LayoutTree::from_config(&config.layout);

    let shutdown = CancellationToken::new();
    let (event_tx, event_rx) = mpsc::channel(256);
    let (forwarder, connection_rx) = EventForwarder::new(
        config.transport.clone(),
        config.options.connection_code.clone(),
        event_rx,
        shutdown.clone(),
    );
    let transport_handle = tokio::spawn(async move {
        if let Err(e) = forwarder.run().await {
            error!("Event forwarder failed: {}", e);
        }
    });

    info!("Starting controller surface");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default().with_fullscreen(true);

    let options = config.options;
    let surface = config.surface;
    let ui_result = eframe::run_native(
        "Virtualpad",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(VirtualpadUI::new(
                cc,
                tree,
                options,
                surface.columns,
                surface.adjusting,
                event_tx,
                connection_rx,
            )))
        }),
    );

    shutdown.cancel();
    transport_handle
        .await
        .map_err(|e| eyre!("Transport task panicked: {}", e))?;
    ui_result.map_err(|e| eyre!("UI terminated with error: {}", e))?;

    info!("Shut down cleanly");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
