//! `deckhand` — production controller daemon.
//!
//! Loads the button and device documents, builds the engine, and serves
//! the TCP control protocol. The device adapter is external; this
//! binary stands in with a headless surface that logs render commands,
//! so the daemon is fully drivable over the control port.
//!
//! Configuration layers: CLI flags > `DECKHAND_*` env vars > settings
//! file > defaults. SIGHUP reloads both documents wholesale — a reload
//! that fails validation keeps the previously loaded data. Ctrl-C shuts
//! the control server down.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use deckhand_core::{
    ButtonTree, Deck, DeckOptions, DeviceList, KeyRender, Notifier, Surface,
};
use deckhand_wire::TokioSender;

/// Tree-driven control surface daemon with a TCP control protocol.
#[derive(Parser, Debug)]
#[command(name = "deckhand", version, about)]
struct Cli {
    /// Settings file (defaults to the platform config path)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Button document (overrides settings)
    #[arg(short = 'b', long)]
    button_file: Option<PathBuf>,

    /// Device document (overrides settings)
    #[arg(short = 'd', long)]
    device_file: Option<PathBuf>,

    /// Control server port (overrides settings)
    #[arg(short = 'p', long)]
    listen_port: Option<u16>,

    /// Disable the TCP control server
    #[arg(long)]
    no_listener: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deckhand={log_level}")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// ── Headless adapter stand-ins ───────────────────────────────────────

/// Surface that logs render commands instead of driving hardware.
struct LogSurface;

impl Surface for LogSurface {
    fn clear_all(&self) {
        debug!("surface: clear all keys");
    }

    fn render_key(&self, key: &KeyRender) {
        info!(
            index = key.index,
            name = %key.name,
            image = key.image.as_deref().unwrap_or("(blank)"),
            "surface: render key"
        );
    }
}

/// Notification sink that logs instead of popping toasts.
struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(%message, "notification");
    }
}

// ── Document loading ─────────────────────────────────────────────────

/// Load the button document, or fall back to an empty tree (every
/// operation is then a no-op until a reload succeeds).
fn initial_tree(path: Option<&Path>) -> ButtonTree {
    let Some(path) = path else {
        warn!("no button document configured; starting with an empty tree");
        return ButtonTree::default();
    };
    match deckhand_config::load_button_tree(path) {
        Ok(tree) => {
            info!(path = %path.display(), "button document loaded");
            tree
        }
        Err(err) => {
            error!(%err, path = %path.display(), "button document rejected; starting empty");
            ButtonTree::default()
        }
    }
}

fn initial_devices(path: Option<&Path>) -> DeviceList {
    let Some(path) = path else {
        return DeviceList::default();
    };
    match deckhand_config::load_device_list(path) {
        Ok(list) => {
            info!(path = %path.display(), devices = list.len(), "device document loaded");
            list
        }
        Err(err) => {
            error!(%err, path = %path.display(), "device document rejected; starting empty");
            DeviceList::default()
        }
    }
}

/// Replace both documents wholesale; a failed load keeps the previous
/// data.
async fn reload(deck: &Arc<Mutex<Deck>>, button: Option<&Path>, device: Option<&Path>) {
    if let Some(path) = device {
        match deckhand_config::load_device_list(path) {
            Ok(list) => deck.lock().await.replace_devices(list),
            Err(err) => {
                error!(%err, path = %path.display(), "device reload rejected; keeping previous list");
            }
        }
    }
    if let Some(path) = button {
        match deckhand_config::load_button_tree(path) {
            Ok(tree) => {
                deck.lock().await.replace_tree(tree);
                info!("button document reloaded; navigation reset to root");
            }
            Err(err) => {
                error!(%err, path = %path.display(), "button reload rejected; keeping previous tree");
            }
        }
    }
}

#[cfg(unix)]
fn spawn_reload_on_sighup(
    deck: Arc<Mutex<Deck>>,
    button: Option<PathBuf>,
    device: Option<PathBuf>,
) {
    tokio::spawn(async move {
        let mut hangup =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(%err, "SIGHUP handler unavailable; reload disabled");
                    return;
                }
            };
        while hangup.recv().await.is_some() {
            info!("SIGHUP received; reloading configuration documents");
            reload(&deck, button.as_deref(), device.as_deref()).await;
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    setup_tracing(&cli);

    let settings = match &cli.config {
        Some(path) => deckhand_config::load_settings_from(path)?,
        None => deckhand_config::load_settings()?,
    };

    // CLI flags win over file/env settings.
    let button_file = cli.button_file.clone().or(settings.button_file);
    let device_file = cli.device_file.clone().or(settings.device_file);
    let listen_port = cli.listen_port.unwrap_or(settings.tcp_listen_port);
    let listener_enabled = !cli.no_listener && settings.tcp_listener;

    let deck = Arc::new(Mutex::new(Deck::new(
        initial_tree(button_file.as_deref()),
        initial_devices(device_file.as_deref()),
        DeckOptions {
            notifications: settings.notifications,
            start_locked: settings.start_locked,
        },
        Arc::new(LogSurface),
        Arc::new(LogNotifier),
        Arc::new(TokioSender::new()),
    )));

    let cancel = CancellationToken::new();
    if listener_enabled {
        let listener = TcpListener::bind(("0.0.0.0", listen_port)).await?;
        tokio::spawn(deckhand_server::run(
            listener,
            Arc::clone(&deck),
            cancel.clone(),
        ));
    } else {
        info!("TCP control server disabled");
    }

    #[cfg(unix)]
    spawn_reload_on_sighup(Arc::clone(&deck), button_file, device_file);

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();

    Ok(())
}
