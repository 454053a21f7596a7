// ── Fire-and-forget executor ──
//
// TokioSender is the deck's WireSender seam: every action becomes one
// spawned task the engine never awaits. There is no timeout, retry, or
// backpressure; a stalled connection is simply abandoned when its task
// is superseded. Failures are logged and go nowhere else.

use std::sync::Arc;

use deckhand_core::{WireAction, WireSender};
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::WireError;
use crate::{osc, tcp, web};

/// Executes wire actions on the ambient tokio runtime.
///
/// The HTTP client is shared across sends; the OSC socket slot enforces
/// the one-send-in-flight contract.
#[derive(Clone)]
pub struct TokioSender {
    http: reqwest::Client,
    osc_socket: Arc<Mutex<Option<UdpSocket>>>,
}

impl TokioSender {
    /// Must be created (and used) inside a tokio runtime.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            osc_socket: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for TokioSender {
    fn default() -> Self {
        Self::new()
    }
}

impl WireSender for TokioSender {
    fn send(&self, action: WireAction) {
        let http = self.http.clone();
        let osc_socket = Arc::clone(&self.osc_socket);
        tokio::spawn(async move {
            if let Err(err) = execute(&http, &osc_socket, action).await {
                warn!(%err, "outbound send failed");
            }
        });
    }
}

/// Execute one action to completion. Exposed so callers that want to
/// await a send (tests, shutdown flushes) can bypass the spawn.
pub async fn execute(
    http: &reqwest::Client,
    osc_socket: &Mutex<Option<UdpSocket>>,
    action: WireAction,
) -> Result<(), WireError> {
    match action {
        WireAction::TcpLine { host, port, line } => tcp::send_line(&host, port, &line).await,
        WireAction::VideoHubRoute {
            host,
            port,
            destination,
            source,
        } => tcp::send_videohub_route(&host, port, destination, source).await,
        WireAction::Osc {
            host,
            port,
            message,
        } => osc::send(osc_socket, &host, port, &message).await,
        WireAction::DashboardCall {
            host,
            port,
            payload,
        } => web::dashboard_call(http, &host, port, &payload).await,
        WireAction::HttpGet { url } => web::url_get(http, &url).await,
    }
}
