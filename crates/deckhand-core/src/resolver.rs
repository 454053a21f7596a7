// ── Trigger resolver ──
//
// Flattens the three-level parameter chain into a ResolvedTrigger:
// trigger-entry value → button-level value → device-record value →
// protocol default (applied later, at dispatch). Each field resolves
// independently. An unresolvable deviceID contributes nothing — the
// record's fields are treated as absent, never dereferenced.

use std::str::FromStr;

use strum::EnumString;
use tracing::warn;

use crate::model::{ButtonNode, DeviceList, DeviceRecord, NotifyPreference, TriggerFields, TriggerPayload};

// ── Trigger kind ────────────────────────────────────────────────────

/// The closed set of dispatchable trigger types. Parsed from the raw
/// `triggerType` string case-insensitively; anything outside this set
/// stays a string and yields the "no action performed" notification at
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TriggerKind {
    LoadButtonContent,
    ChangeState,
    Toggle,
    TcpMessage,
    RossTalk,
    DashboardWebCall,
    Osc,
    VideoHub,
    Url,
    Notify,
    /// Reserved extension point; currently a no-op.
    Application,
    /// Reserved extension point; currently a no-op.
    ProPresenter,
    /// Reserved extension point; currently a no-op.
    Custom,
}

// ── Resolved trigger ────────────────────────────────────────────────

/// A trigger with its full parameter chain flattened. Ports and other
/// protocol defaults are still absent here; dispatch fills them in per
/// protocol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTrigger {
    pub trigger_type: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub payload: Option<TriggerPayload>,
    pub notify: NotifyPreference,
}

impl ResolvedTrigger {
    /// The dispatchable kind, if the type string is recognized.
    pub fn kind(&self) -> Option<TriggerKind> {
        self.trigger_type
            .as_deref()
            .and_then(|t| TriggerKind::from_str(t.trim()).ok())
    }

    /// Text payload, `None` for structured payloads.
    pub fn payload_text(&self) -> Option<&str> {
        self.payload.as_ref().and_then(TriggerPayload::as_text)
    }
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve every trigger a button activation fires, in declaration
/// order. A button with a `triggers` list fires one resolved trigger per
/// entry (an empty list fires nothing); otherwise its own flattened
/// fields form a single trigger.
pub fn resolve_all(button: &ButtonNode, devices: &DeviceList) -> Vec<ResolvedTrigger> {
    match &button.triggers {
        Some(entries) => entries
            .iter()
            .map(|entry| resolve(button, Some(entry), devices))
            .collect(),
        None => vec![resolve(button, None, devices)],
    }
}

/// Resolve one trigger entry (or the button's own fields when `entry` is
/// `None`) against the device list.
pub fn resolve(
    button: &ButtonNode,
    entry: Option<&TriggerFields>,
    devices: &DeviceList,
) -> ResolvedTrigger {
    let device = lookup_device(button, entry, devices);

    let trigger_type = pick_str(
        entry.and_then(|e| e.trigger_type.as_deref()),
        button.fields.trigger_type.as_deref(),
        device.and_then(|d| d.trigger_type.as_deref()),
    );

    let host = pick_str(
        entry.and_then(|e| e.host.as_deref()),
        button.fields.host.as_deref(),
        device.and_then(|d| d.host.as_deref()),
    );

    let port = entry
        .and_then(|e| e.port)
        .or(button.fields.port)
        .or_else(|| device.and_then(|d| d.port));

    let payload = entry
        .and_then(|e| e.trigger.clone())
        .or_else(|| button.fields.trigger.clone());

    let notify = match entry.map(|e| e.notify) {
        Some(pref) if !pref.is_unset() => pref,
        _ => button.fields.notify,
    };

    ResolvedTrigger {
        trigger_type,
        host,
        port,
        payload,
        notify,
    }
}

/// First non-blank value in chain order; blank strings count as absent.
fn pick_str(entry: Option<&str>, button: Option<&str>, device: Option<&str>) -> Option<String> {
    entry
        .filter(|s| !s.trim().is_empty())
        .or_else(|| button.filter(|s| !s.trim().is_empty()))
        .or_else(|| device.filter(|s| !s.trim().is_empty()))
        .map(str::to_owned)
}

/// Resolve the deviceID (entry → button) and look it up. A missing
/// record degrades to `None` with a warning — resolution falls through
/// to button-level values and protocol defaults.
fn lookup_device<'a>(
    button: &ButtonNode,
    entry: Option<&TriggerFields>,
    devices: &'a DeviceList,
) -> Option<&'a DeviceRecord> {
    let device_id = entry
        .and_then(|e| e.device_id.as_deref())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            button
                .fields
                .device_id
                .as_deref()
                .filter(|s| !s.trim().is_empty())
        })?;

    let record = devices.get(device_id);
    if record.is_none() {
        warn!(device_id, "device not found; treating device fields as absent");
    }
    record
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DeviceRecord;

    fn button(raw: &str) -> ButtonNode {
        serde_json::from_str(raw).unwrap()
    }

    fn devices() -> DeviceList {
        DeviceList::from_records(vec![DeviceRecord {
            device_id: "carbonite".into(),
            host: Some("10.0.0.8".into()),
            port: Some(200),
            trigger_type: Some("RossTalk".into()),
        }])
    }

    #[test]
    fn trigger_kind_parses_case_insensitively() {
        assert_eq!(
            TriggerKind::from_str("rosstalk").unwrap(),
            TriggerKind::RossTalk
        );
        assert_eq!(
            TriggerKind::from_str("LoadButtonContent").unwrap(),
            TriggerKind::LoadButtonContent
        );
        assert_eq!(TriggerKind::from_str("VIDEOHUB").unwrap(), TriggerKind::VideoHub);
        assert!(TriggerKind::from_str("teleport").is_err());
    }

    #[test]
    fn entry_beats_button_beats_device() {
        let btn = button(
            r#"{
                "id": "b", "deviceID": "carbonite",
                "host": "button-host", "port": 100,
                "triggers": [{"host": "entry-host", "trigger": "GPI 1"}]
            }"#,
        );

        let resolved = resolve_all(&btn, &devices());
        assert_eq!(resolved.len(), 1);
        let r = &resolved[0];

        // Host: entry value wins over button and device.
        assert_eq!(r.host.as_deref(), Some("entry-host"));
        // Port: entry silent, button-level 100 wins over device 200.
        assert_eq!(r.port, Some(100));
        // Type: entry and button silent, device fills in.
        assert_eq!(r.trigger_type.as_deref(), Some("RossTalk"));
        assert_eq!(r.payload_text(), Some("GPI 1"));
    }

    #[test]
    fn device_fills_in_only_when_entry_and_button_are_silent() {
        let btn = button(r#"{"id": "b", "deviceID": "carbonite", "trigger": "CC 1:2"}"#);

        let r = resolve(&btn, None, &devices());
        assert_eq!(r.host.as_deref(), Some("10.0.0.8"));
        assert_eq!(r.port, Some(200));
        assert_eq!(r.trigger_type.as_deref(), Some("RossTalk"));
    }

    #[test]
    fn unknown_device_degrades_to_absent_fields() {
        let btn = button(
            r#"{"id": "b", "deviceID": "ghost", "port": 100, "triggerType": "TCPMessage"}"#,
        );

        let r = resolve(&btn, None, &devices());
        assert_eq!(r.host, None);
        assert_eq!(r.port, Some(100));
        assert_eq!(r.trigger_type.as_deref(), Some("TCPMessage"));
    }

    #[test]
    fn entry_device_id_overrides_button_device_id() {
        let list = DeviceList::from_records(vec![
            DeviceRecord {
                device_id: "a".into(),
                host: Some("host-a".into()),
                port: None,
                trigger_type: None,
            },
            DeviceRecord {
                device_id: "b".into(),
                host: Some("host-b".into()),
                port: None,
                trigger_type: None,
            },
        ]);
        let btn = button(r#"{"id": "x", "deviceID": "a", "triggers": [{"deviceID": "b"}]}"#);

        let r = resolve_all(&btn, &list);
        assert_eq!(r[0].host.as_deref(), Some("host-b"));
    }

    #[test]
    fn empty_strings_are_absent() {
        let btn = button(
            r#"{"id": "b", "deviceID": "carbonite", "host": "", "triggerType": " "}"#,
        );

        let r = resolve(&btn, None, &devices());
        assert_eq!(r.host.as_deref(), Some("10.0.0.8"));
        assert_eq!(r.trigger_type.as_deref(), Some("RossTalk"));
    }

    #[test]
    fn notify_resolves_entry_then_button_then_unset() {
        let btn = button(
            r#"{
                "id": "b", "notify": "off",
                "triggers": [{"notify": "on"}, {}, {"notify": "bogus"}]
            }"#,
        );

        let resolved = resolve_all(&btn, &DeviceList::default());
        assert_eq!(resolved[0].notify, NotifyPreference::On);
        assert_eq!(resolved[1].notify, NotifyPreference::Off);
        // Unknown strings degrade to unset, falling back to the button.
        assert_eq!(resolved[2].notify, NotifyPreference::Off);
    }

    #[test]
    fn each_entry_resolves_independently_in_order() {
        let btn = button(
            r#"{
                "id": "macro", "host": "shared",
                "triggers": [
                    {"triggerType": "TCPMessage", "trigger": "one"},
                    {"triggerType": "OSC", "trigger": "/two"}
                ]
            }"#,
        );

        let resolved = resolve_all(&btn, &DeviceList::default());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].kind(), Some(TriggerKind::TcpMessage));
        assert_eq!(resolved[0].payload_text(), Some("one"));
        assert_eq!(resolved[1].kind(), Some(TriggerKind::Osc));
        assert_eq!(resolved[1].host.as_deref(), Some("shared"));
    }

    #[test]
    fn empty_trigger_list_fires_nothing() {
        let btn = button(r#"{"id": "b", "triggers": [], "triggerType": "TCPMessage"}"#);
        assert!(resolve_all(&btn, &DeviceList::default()).is_empty());
    }
}
