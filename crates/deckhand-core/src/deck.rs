// ── Deck facade ──
//
// Owns all mutable engine state (tree, device list, navigation chain,
// lock gate) and dispatches resolved triggers exhaustively over
// TriggerKind. Entry points are synchronous and run to completion; the
// caller serializes them (key press, control batch, reload) and the
// only asynchrony is the fire-and-forget WireSender behind the seam.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::action::{
    HTTP_PORT, Notifier, OSC_PORT, ROSSTALK_PORT, TCP_MESSAGE_PORT, VIDEOHUB_PORT, WireAction,
    WireSender,
};
use crate::command::ControlCommand;
use crate::lock::LockGate;
use crate::model::{ButtonNode, ButtonTree, DeviceList, NotifyPreference, OscMessageSpec, TriggerPayload};
use crate::navigator::Navigator;
use crate::render::{self, Surface};
use crate::resolver::{self, ResolvedTrigger, TriggerKind};

/// Fixed rejection text while the lock gate is engaged.
pub const LOCKED_MESSAGE: &str = "Deck is locked and not currently accepting commands.";

/// Fixed text for unrecognized trigger types.
pub const NO_ACTION_MESSAGE: &str = "Trigger did not meet conditions. No action was performed.";

/// Construction options for a [`Deck`].
#[derive(Debug, Clone)]
pub struct DeckOptions {
    /// Process-wide notification preference, used when neither a trigger
    /// entry nor its button carries an override.
    pub notifications: bool,
    /// Engage the lock gate immediately at startup.
    pub start_locked: bool,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            notifications: true,
            start_locked: false,
        }
    }
}

/// The navigation + trigger-dispatch engine.
///
/// All state lives here and is mutated only through the public entry
/// points; collaborators receive the deck by explicit reference rather
/// than through globals.
pub struct Deck {
    tree: ButtonTree,
    devices: DeviceList,
    nav: Navigator,
    gate: LockGate,
    notifications_default: bool,
    surface: Arc<dyn Surface>,
    notifier: Arc<dyn Notifier>,
    wire: Arc<dyn WireSender>,
}

impl Deck {
    /// Build a deck and render its initial level (the lock screen when
    /// `start_locked` is set).
    pub fn new(
        tree: ButtonTree,
        devices: DeviceList,
        options: DeckOptions,
        surface: Arc<dyn Surface>,
        notifier: Arc<dyn Notifier>,
        wire: Arc<dyn WireSender>,
    ) -> Self {
        let deck = Self {
            tree,
            devices,
            nav: Navigator::new(),
            gate: LockGate::new(options.start_locked),
            notifications_default: options.notifications,
            surface,
            notifier,
            wire,
        };
        deck.render();
        deck
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn tree(&self) -> &ButtonTree {
        &self.tree
    }

    /// The buttons of the currently displayed level. Empty when nothing
    /// is loaded.
    pub fn current_level(&self) -> &[ButtonNode] {
        self.tree.level(self.nav.current_folder()).unwrap_or(&[])
    }

    // ── Entry points ─────────────────────────────────────────────────

    /// Key-index press from the device adapter: a back button ascends,
    /// a folder descends, anything else fires its triggers.
    pub fn press_key(&mut self, index: u8) {
        let Some(button) = self
            .current_level()
            .iter()
            .find(|b| b.button_number == index)
            .cloned()
        else {
            return;
        };
        debug!(index, id = %button.id, "key down");

        if button.back_button {
            if self.nav.back() {
                self.render();
            }
        } else if button.is_folder() {
            self.nav.enter(&button.id);
            self.render();
        } else if self.fire_button(&button) {
            self.render();
        }
    }

    /// One inbound batch from the control server: CRLF-split lines
    /// applied in order, then a single re-render if anything changed.
    pub fn handle_batch(&mut self, batch: &str) {
        let mut dirty = false;
        for line in batch.split("\r\n") {
            if let Some(cmd) = ControlCommand::parse(line) {
                dirty |= self.apply_command(cmd);
            }
        }
        if dirty {
            self.render();
        }
    }

    /// Replace the tree wholesale (configuration reload). Navigation
    /// resets to the root level.
    pub fn replace_tree(&mut self, tree: ButtonTree) {
        self.tree = tree;
        self.nav.reset();
        self.render();
    }

    /// Replace the device list wholesale.
    pub fn replace_devices(&mut self, devices: DeviceList) {
        self.devices = devices;
    }

    /// Render the current level — or the lock screen while the gate is
    /// engaged. Clears every key first so undeclared slots stay blank.
    pub fn render(&self) {
        self.surface.clear_all();
        let plan = if self.gate.is_locked() {
            render::lock_screen()
        } else {
            render::plan_level(self.current_level())
        };
        for key in &plan {
            self.surface.render_key(key);
        }
    }

    // ── Command application ──────────────────────────────────────────

    /// Apply one control command; returns `true` if the display needs a
    /// re-render. Trigger-shaped commands are routed through the same
    /// dispatch (and lock gate) as button presses.
    fn apply_command(&mut self, cmd: ControlCommand) -> bool {
        match cmd {
            ControlCommand::Toggle { on, button_id } => {
                let state = if on { "ON" } else { "OFF" };
                self.fire(&synthetic(TriggerKind::Toggle, format!("{state} {button_id}")))
            }
            ControlCommand::ChangeState {
                button_id,
                state_id,
            } => self.fire(&synthetic(
                TriggerKind::ChangeState,
                format!("{button_id} {state_id}"),
            )),
            ControlCommand::LoadButtonContent { button_id } => {
                self.fire(&synthetic(TriggerKind::LoadButtonContent, button_id))
            }
            ControlCommand::Lock => {
                self.gate.engage();
                true
            }
            ControlCommand::Unlock => {
                self.gate.release();
                self.nav.reset();
                true
            }
            ControlCommand::Trigger { button_id } => {
                let Some(button) = self.tree.find(&button_id).cloned() else {
                    return false;
                };
                self.fire_button(&button)
            }
            ControlCommand::Notify { message } => {
                self.notifier.notify(&message);
                false
            }
        }
    }

    // ── Trigger dispatch ─────────────────────────────────────────────

    /// Fire every trigger a button carries, in declaration order.
    /// Returns `true` if any of them changed displayed state.
    fn fire_button(&mut self, button: &ButtonNode) -> bool {
        let mut dirty = false;
        for resolved in resolver::resolve_all(button, &self.devices) {
            dirty |= self.fire(&resolved);
        }
        dirty
    }

    /// Dispatch one resolved trigger. Every attempt is gated on the
    /// lock; unrecognized types notify and do nothing. Returns `true`
    /// when displayed state changed.
    fn fire(&mut self, resolved: &ResolvedTrigger) -> bool {
        if self.gate.is_locked() {
            self.notifier.notify(LOCKED_MESSAGE);
            return false;
        }
        let Some(kind) = resolved.kind() else {
            self.notifier.notify(NO_ACTION_MESSAGE);
            return false;
        };
        debug!(%kind, "dispatching trigger");

        match kind {
            TriggerKind::LoadButtonContent => self.do_load_button_content(resolved),
            TriggerKind::ChangeState => self.do_change_state(resolved),
            TriggerKind::Toggle => self.do_toggle(resolved),
            TriggerKind::TcpMessage => {
                self.do_tcp_line(resolved, TCP_MESSAGE_PORT, "TCP message");
                false
            }
            TriggerKind::RossTalk => {
                // Only the TCP send — RossTalk never falls through to OSC.
                self.do_tcp_line(resolved, ROSSTALK_PORT, "RossTalk command");
                false
            }
            TriggerKind::DashboardWebCall => {
                self.do_dashboard(resolved);
                false
            }
            TriggerKind::Osc => {
                self.do_osc(resolved);
                false
            }
            TriggerKind::VideoHub => {
                self.do_videohub(resolved);
                false
            }
            TriggerKind::Url => {
                self.do_url(resolved);
                false
            }
            TriggerKind::Notify => {
                if let Some(text) = resolved.payload_text() {
                    self.send_notification(text, resolved.notify);
                }
                false
            }
            // Reserved extension points.
            TriggerKind::Application | TriggerKind::ProPresenter | TriggerKind::Custom => false,
        }
    }

    // ── Tree-action triggers ─────────────────────────────────────────

    fn do_load_button_content(&mut self, resolved: &ResolvedTrigger) -> bool {
        let Some(text) = resolved.payload_text() else {
            return false;
        };
        let button_id = text.trim();
        let Some(node) = self.tree.find(button_id) else {
            return false;
        };
        if !node.is_folder() {
            warn!(button_id, "LOADBUTTONCONTENT target is not a folder");
            return false;
        }
        let name = node.name.clone();
        let Some(ancestors) = self.tree.path_to(button_id) else {
            return false;
        };

        self.nav.jump(ancestors, button_id.to_owned());
        self.send_notification(&format!("Button content changed to {name}"), resolved.notify);
        true
    }

    fn do_change_state(&mut self, resolved: &ResolvedTrigger) -> bool {
        let Some(text) = resolved.payload_text() else {
            return false;
        };
        // "<buttonID> <stateID>": id before the first space, state after
        // the last.
        let mut parts = text.split_whitespace();
        let (Some(button_id), Some(state_id)) = (parts.next(), parts.next_back()) else {
            return false;
        };

        let Some((name, old_state)) = self
            .tree
            .find(button_id)
            .map(|n| (n.name.clone(), n.current_button_state_id.clone()))
        else {
            return false;
        };

        self.tree.set_current_state(button_id, state_id);

        let old_state = old_state.unwrap_or_else(|| "(unset)".to_owned());
        self.send_notification(
            &format!("{name} changed state from {old_state} to {state_id}"),
            resolved.notify,
        );
        true
    }

    fn do_toggle(&mut self, resolved: &ResolvedTrigger) -> bool {
        let Some(text) = resolved.payload_text() else {
            return false;
        };
        // "ON <buttonID>" / "OFF <buttonID>": ON maps to the `toggle`
        // state, everything else to `default`.
        let mut parts = text.split_whitespace();
        let on = parts.next().is_some_and(|t| t.eq_ignore_ascii_case("ON"));
        let Some(button_id) = parts.next_back() else {
            return false;
        };
        let state = if on { "toggle" } else { "default" };

        let Some(group) = self.tree.find(button_id).map(|n| n.button_group.clone()) else {
            return false;
        };
        if let Some(group) = group {
            self.tree.reset_group(&group);
        }
        self.tree.set_current_state(button_id, state);

        self.send_notification("Button toggled.", resolved.notify);
        true
    }

    // ── Network triggers ─────────────────────────────────────────────

    fn do_tcp_line(&self, resolved: &ResolvedTrigger, default_port: u16, what: &str) {
        let Some(host) = resolved.host.as_deref() else {
            return;
        };
        let port = resolved.port.unwrap_or(default_port);
        let line = resolved.payload_text().unwrap_or_default().to_owned();

        self.wire.send(WireAction::TcpLine {
            host: host.to_owned(),
            port,
            line: line.clone(),
        });
        self.send_notification(&format!("{what} sent to {host}: {line}"), resolved.notify);
    }

    fn do_dashboard(&self, resolved: &ResolvedTrigger) {
        let Some(host) = resolved.host.as_deref() else {
            return;
        };
        let Some(payload) = resolved.payload_text() else {
            return;
        };
        let port = resolved.port.unwrap_or(HTTP_PORT);

        self.wire.send(WireAction::DashboardCall {
            host: host.to_owned(),
            port,
            payload: payload.to_owned(),
        });
        self.send_notification(
            &format!("Dashboard web call sent to {host}:{port}: {payload}"),
            resolved.notify,
        );
    }

    fn do_osc(&self, resolved: &ResolvedTrigger) {
        let Some(host) = resolved.host.as_deref() else {
            return;
        };
        let port = resolved.port.unwrap_or(OSC_PORT);
        let message = match &resolved.payload {
            Some(TriggerPayload::Osc(spec)) => spec.clone(),
            Some(TriggerPayload::Text(address)) => OscMessageSpec {
                address: address.clone(),
                args: Vec::new(),
            },
            None => return,
        };
        let address = message.address.clone();

        self.wire.send(WireAction::Osc {
            host: host.to_owned(),
            port,
            message,
        });
        self.send_notification(
            &format!("OSC command sent to {host} ({port}): {address}"),
            resolved.notify,
        );
    }

    fn do_videohub(&self, resolved: &ResolvedTrigger) {
        let Some(host) = resolved.host.as_deref() else {
            return;
        };
        let Some(text) = resolved.payload_text() else {
            return;
        };
        let Some((destination, source)) = parse_route(text) else {
            warn!(payload = text, "malformed VideoHub route");
            return;
        };
        let port = resolved.port.unwrap_or(VIDEOHUB_PORT);

        // The wire block is zero-based; operators speak one-based.
        self.wire.send(WireAction::VideoHubRoute {
            host: host.to_owned(),
            port,
            destination: destination - 1,
            source: source - 1,
        });
        self.send_notification(
            &format!("VideoHub ({host}) route change: output {destination} set to {source}."),
            resolved.notify,
        );
    }

    fn do_url(&self, resolved: &ResolvedTrigger) {
        let payload = resolved.payload_text().unwrap_or_default();
        let Some(url) = build_url(resolved.host.as_deref(), resolved.port, payload) else {
            return;
        };

        self.wire.send(WireAction::HttpGet { url: url.clone() });
        self.send_notification(&format!("URL requested in background: {url}"), resolved.notify);
    }

    // ── Notifications ────────────────────────────────────────────────

    fn send_notification(&self, message: &str, pref: NotifyPreference) {
        let should = match pref {
            NotifyPreference::On => true,
            NotifyPreference::Off => false,
            NotifyPreference::UseDefault => self.notifications_default,
        };
        if should {
            self.notifier.notify(message);
        }
    }
}

/// A trigger arriving over the control protocol, shaped like a resolved
/// button trigger so it passes through the same dispatch and lock gate.
fn synthetic(kind: TriggerKind, payload: String) -> ResolvedTrigger {
    ResolvedTrigger {
        trigger_type: Some(kind.to_string()),
        payload: Some(TriggerPayload::Text(payload)),
        ..ResolvedTrigger::default()
    }
}

/// `"<destination> <source>"`, one-based on both sides.
fn parse_route(text: &str) -> Option<(u32, u32)> {
    let mut parts = text.split_whitespace();
    let destination: u32 = parts.next()?.parse().ok()?;
    let source: u32 = parts.next_back()?.parse().ok()?;
    (destination >= 1 && source >= 1).then_some((destination, source))
}

/// URL trigger address: `host:port/<payload>` when a host is resolved,
/// else the payload verbatim; prefixed `http://` unless already present.
fn build_url(host: Option<&str>, port: Option<u16>, payload: &str) -> Option<String> {
    let url = match host {
        Some(h) if !h.is_empty() => format!("{h}:{}/{payload}", port.unwrap_or(HTTP_PORT)),
        _ => payload.to_owned(),
    };
    if url.is_empty() {
        return None;
    }
    Some(if url.starts_with("http://") {
        url
    } else {
        format!("http://{url}")
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{build_url, parse_route};

    #[test]
    fn build_url_with_host_and_default_port() {
        assert_eq!(
            build_url(Some("panel.local"), None, "take"),
            Some("http://panel.local:80/take".to_owned())
        );
        assert_eq!(
            build_url(Some("panel.local"), Some(8080), "take"),
            Some("http://panel.local:8080/take".to_owned())
        );
    }

    #[test]
    fn build_url_without_host_uses_payload_verbatim() {
        assert_eq!(
            build_url(None, None, "http://example.com/go"),
            Some("http://example.com/go".to_owned())
        );
        assert_eq!(
            build_url(None, None, "example.com/go"),
            Some("http://example.com/go".to_owned())
        );
        assert_eq!(build_url(None, None, ""), None);
    }

    #[test]
    fn parse_route_is_one_based() {
        assert_eq!(parse_route("1 1"), Some((1, 1)));
        assert_eq!(parse_route("12 7"), Some((12, 7)));
        assert_eq!(parse_route("0 1"), None);
        assert_eq!(parse_route("1"), None);
        assert_eq!(parse_route("a b"), None);
    }
}
