use anyhow::{Context, Result};
use clap::Parser;
use qrshare::catalog::{FileCatalog, Owner, ThemeIconLookup};
use qrshare::common::config::{self, ConfigOverrides};
use qrshare::server::{runtime, ControlEvent, SessionController, SessionSettings};
use qrshare::transport::{Advertiser, MdnsAdvertiser, NoopAdvertiser};
use qrshare::ui::terminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrshare", version)]
#[command(about = "Share files with devices on the local network through a scannable link")]
struct Cli {
    #[arg(help = "Files to share", required_unless_present = "print_config")]
    files: Vec<PathBuf>,

    #[arg(long, help = "Listen port (0 picks a free port)")]
    port: Option<u16>,

    #[arg(long, help = "Do not advertise the server via mDNS")]
    no_advertise: bool,

    #[arg(long, help = "Print only the URI, no QR code")]
    no_qr: bool,

    #[arg(long, help = "Print the resolved configuration and exit")]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            advertise: self.no_advertise.then_some(false),
            show_qr: self.no_qr.then_some(false),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::load_config(&cli.overrides())?;

    if cli.print_config {
        print!("{}", config::to_toml(&config)?);
        return Ok(());
    }

    let owner = Owner::current();
    let icons = ThemeIconLookup::from_settings(&config.icons);
    let catalog = FileCatalog::from_paths(&cli.files, owner.clone(), &icons);
    if catalog.is_empty() {
        tracing::warn!("none of the given paths is a regular file; the listing will be empty");
    }
    println!("Sharing {} file(s)", catalog.len());

    let advertiser: Box<dyn Advertiser> = if config.advertise {
        Box::new(MdnsAdvertiser::new(&owner.host))
    } else {
        Box::new(NoopAdvertiser)
    };

    let controller = SessionController::initialize(
        Arc::new(catalog),
        advertiser,
        SessionSettings::from(&config),
    )
    .await
    .context("Failed to start sharing")?;

    let (event_sender, event_receiver) = mpsc::channel(8);
    let (update_sender, update_receiver) = watch::channel(None);

    let display = tokio::spawn(terminal::display(update_receiver, config.ui.show_qr));
    terminal::spawn_input(event_sender.clone());

    let signal_sender = event_sender;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("Ctrl+C received - shutting down");
        let _ = signal_sender.send(ControlEvent::Shutdown).await;
    });

    let control = tokio::spawn(runtime::run(controller, event_receiver, update_sender));
    let result = control.await.context("control task failed")?;
    let _ = display.await;
    result
}
