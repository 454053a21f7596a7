// ── Outbound effect seams ──
//
// WireAction is a fully parameterized outbound protocol command; the
// WireSender implementation (deckhand-wire) executes each one as an
// unawaited task. Notifier is the user-notification sink. Both traits
// keep the engine synchronous and the I/O at the edges.

use crate::model::OscMessageSpec;

/// Default port for raw TCP message triggers.
pub const TCP_MESSAGE_PORT: u16 = 23;
/// Default RossTalk port.
pub const ROSSTALK_PORT: u16 = 7788;
/// Default OSC receiver port.
pub const OSC_PORT: u16 = 8000;
/// Default Blackmagic VideoHub control port.
pub const VIDEOHUB_PORT: u16 = 9990;
/// Default port for Dashboard web calls and URL building.
pub const HTTP_PORT: u16 = 80;

/// A resolved outbound protocol command, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum WireAction {
    /// Raw text line + CRLF over TCP (TCPMESSAGE and ROSSTALK).
    TcpLine {
        host: String,
        port: u16,
        line: String,
    },
    /// Single OSC datagram over UDP.
    Osc {
        host: String,
        port: u16,
        message: OscMessageSpec,
    },
    /// VideoHub routing block over TCP; destination/source are
    /// zero-based here.
    VideoHubRoute {
        host: String,
        port: u16,
        destination: u32,
        source: u32,
    },
    /// Dashboard custom-panel call: GET `/ajax/<payload>`.
    DashboardCall {
        host: String,
        port: u16,
        payload: String,
    },
    /// Background GET; the response is discarded.
    HttpGet { url: String },
}

/// Executes wire actions fire-and-forget: no awaited confirmation, no
/// timeout, no retry. Failures are logged by the executor only.
pub trait WireSender: Send + Sync {
    fn send(&self, action: WireAction);
}

/// User-notification sink. The deck applies the tri-state notification
/// preference before calling this; implementations just display.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
