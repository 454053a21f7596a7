// ── Button node types ──
//
// ButtonNode is the unit of the configuration tree: a key slot that is
// either a folder (has child `buttons`), a back button, or a leaf that
// fires one or more triggers. Field names follow the on-disk document
// format, which uses camelCase with literal `ID` suffixes.

use serde::{Deserialize, Serialize};

// ── Notification preference ─────────────────────────────────────────

/// Tri-state notification override carried on triggers and buttons.
///
/// `"on"` always notifies, `"off"` never does, anything else (including
/// absence) defers to the process-wide preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyPreference {
    On,
    Off,
    #[default]
    #[serde(other)]
    UseDefault,
}

impl NotifyPreference {
    /// `true` when this preference defers to the process default.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::UseDefault)
    }
}

// ── Trigger payload ─────────────────────────────────────────────────

/// The `trigger` field: a plain command string for most protocols, or a
/// pre-structured OSC message used verbatim by the OSC sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerPayload {
    Text(String),
    Osc(OscMessageSpec),
}

impl TriggerPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Osc(_) => None,
        }
    }
}

/// Structured OSC message as it appears in a button document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscMessageSpec {
    pub address: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<OscArg>,
}

/// OSC argument, inferred from the JSON value shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OscArg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

// ── Trigger fields ──────────────────────────────────────────────────

/// The five trigger parameters plus the device reference, as they appear
/// at every level of the resolution chain: an entry in a button's
/// `triggers` list, the button itself (flattened), or a device record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Documents in the wild carry ports as numbers or numeric strings.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de_port")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerPayload>,

    #[serde(rename = "deviceID", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default, skip_serializing_if = "NotifyPreference::is_unset")]
    pub notify: NotifyPreference,
}

/// Accept a port as a JSON number or a numeric string; an empty string
/// means unset.
pub(crate) fn de_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u16),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed.parse().map(Some).map_err(serde::de::Error::custom)
            }
        }
    }
}

// ── Button state ────────────────────────────────────────────────────

/// One entry of a multi-state button's `buttonStates` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonState {
    #[serde(rename = "buttonStateID")]
    pub id: String,

    #[serde(rename = "buttonImage", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// ── Button node ─────────────────────────────────────────────────────

/// A node of the button tree.
///
/// `id` is globally unique (enforced at load), `button_number` is the key
/// slot and unique only within its parent level. A node with a `buttons`
/// list is a folder and is navigated into instead of fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_field_names)] // field names mirror the document format
pub struct ButtonNode {
    pub id: String,

    #[serde(default)]
    pub button_number: u8,

    #[serde(default)]
    pub name: String,

    /// Single-image form; ignored when `button_states` is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_states: Option<Vec<ButtonState>>,

    /// Selector into `button_states`; absent or unknown falls back to the
    /// first declared state.
    #[serde(
        rename = "currentButtonStateID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_button_state_id: Option<String>,

    /// Mutual-exclusion group: at most one member holds a non-default
    /// state at a time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_group: Option<String>,

    /// Pressing this button means "go to the parent level".
    #[serde(default)]
    pub back_button: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonNode>>,

    /// Independent trigger overrides, fired in order on activation. When
    /// absent the button's own flattened fields form a single trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<TriggerFields>>,

    #[serde(flatten)]
    pub fields: TriggerFields,
}

impl ButtonNode {
    pub fn is_folder(&self) -> bool {
        self.buttons.is_some()
    }

    /// `true` if `state` is declared in this button's state list.
    pub fn has_state(&self, state: &str) -> bool {
        self.button_states
            .as_deref()
            .is_some_and(|states| states.iter().any(|s| s.id == state))
    }

    /// The state a group reset puts this button into: a declared state
    /// literally named `default` if present, else the first declared
    /// state, else the literal `default`.
    pub fn default_state_id(&self) -> String {
        let states = self.button_states.as_deref().unwrap_or_default();
        states
            .iter()
            .find(|s| s.id == "default")
            .or_else(|| states.first())
            .map_or_else(|| "default".to_owned(), |s| s.id.clone())
    }

    /// The image to render right now: the current state's image (first
    /// declared state when the selector is unset or unknown), else the
    /// plain `image` field.
    pub fn current_image(&self) -> Option<&str> {
        match self.button_states.as_deref() {
            Some(states) if !states.is_empty() => {
                let selected = self
                    .current_button_state_id
                    .as_deref()
                    .and_then(|current| states.iter().find(|s| s.id == current));
                selected
                    .or_else(|| states.first())
                    .and_then(|s| s.image.as_deref())
            }
            _ => self.image.as_deref(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(raw: &str) -> ButtonNode {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn parses_leaf_with_direct_trigger_fields() {
        let node = parse(
            r#"{
                "id": "cam1",
                "buttonNumber": 3,
                "name": "Camera 1",
                "image": "cam1.png",
                "host": "10.0.0.5",
                "port": "7788",
                "triggerType": "RossTalk",
                "trigger": "GPI 1"
            }"#,
        );

        assert_eq!(node.button_number, 3);
        assert_eq!(node.fields.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(node.fields.port, Some(7788));
        assert_eq!(node.fields.trigger_type.as_deref(), Some("RossTalk"));
        assert_eq!(
            node.fields.trigger.as_ref().and_then(TriggerPayload::as_text),
            Some("GPI 1")
        );
        assert!(!node.is_folder());
    }

    #[test]
    fn parses_numeric_port() {
        let node = parse(r#"{"id": "x", "port": 9990}"#);
        assert_eq!(node.fields.port, Some(9990));
    }

    #[test]
    fn empty_string_port_is_unset() {
        let node = parse(r#"{"id": "x", "port": ""}"#);
        assert_eq!(node.fields.port, None);
    }

    #[test]
    fn parses_folder_with_children() {
        let node = parse(
            r#"{
                "id": "cams",
                "buttonNumber": 0,
                "name": "Cameras",
                "buttons": [
                    {"id": "cam1", "buttonNumber": 0},
                    {"id": "back", "buttonNumber": 14, "backButton": true}
                ]
            }"#,
        );

        assert!(node.is_folder());
        let children = node.buttons.unwrap();
        assert_eq!(children.len(), 2);
        assert!(children[1].back_button);
    }

    #[test]
    fn parses_trigger_override_list() {
        let node = parse(
            r#"{
                "id": "macro1",
                "triggers": [
                    {"triggerType": "TCPMessage", "host": "a", "trigger": "one"},
                    {"triggerType": "OSC", "deviceID": "qlab", "trigger": "/go"}
                ]
            }"#,
        );

        let triggers = node.triggers.unwrap();
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[1].device_id.as_deref(), Some("qlab"));
    }

    #[test]
    fn notify_parses_on_off_and_degrades_unknown() {
        let on = parse(r#"{"id": "a", "notify": "on"}"#);
        let off = parse(r#"{"id": "b", "notify": "off"}"#);
        let junk = parse(r#"{"id": "c", "notify": "sometimes"}"#);
        let unset = parse(r#"{"id": "d"}"#);

        assert_eq!(on.fields.notify, NotifyPreference::On);
        assert_eq!(off.fields.notify, NotifyPreference::Off);
        assert_eq!(junk.fields.notify, NotifyPreference::UseDefault);
        assert_eq!(unset.fields.notify, NotifyPreference::UseDefault);
    }

    #[test]
    fn structured_osc_payload() {
        let node = parse(
            r#"{
                "id": "q",
                "trigger": {"address": "/cue/5/start", "args": [1, 2.5, "go", true]}
            }"#,
        );

        match node.fields.trigger.unwrap() {
            TriggerPayload::Osc(msg) => {
                assert_eq!(msg.address, "/cue/5/start");
                assert_eq!(
                    msg.args,
                    vec![
                        OscArg::Int(1),
                        OscArg::Float(2.5),
                        OscArg::Text("go".into()),
                        OscArg::Bool(true)
                    ]
                );
            }
            TriggerPayload::Text(other) => panic!("expected structured payload, got {other:?}"),
        }
    }

    #[test]
    fn current_image_follows_state_selector() {
        let mut node = parse(
            r#"{
                "id": "lamp",
                "buttonStates": [
                    {"buttonStateID": "default", "buttonImage": "off.png"},
                    {"buttonStateID": "toggle", "buttonImage": "on.png"}
                ]
            }"#,
        );

        // Unset selector falls back to the first declared state.
        assert_eq!(node.current_image(), Some("off.png"));

        node.current_button_state_id = Some("toggle".into());
        assert_eq!(node.current_image(), Some("on.png"));

        // Unknown selector falls back to the first declared state.
        node.current_button_state_id = Some("missing".into());
        assert_eq!(node.current_image(), Some("off.png"));
    }

    #[test]
    fn default_state_prefers_declared_default() {
        let explicit = parse(
            r#"{
                "id": "a",
                "buttonStates": [
                    {"buttonStateID": "red"},
                    {"buttonStateID": "default"}
                ]
            }"#,
        );
        let positional = parse(
            r#"{
                "id": "b",
                "buttonStates": [{"buttonStateID": "red"}]
            }"#,
        );
        let stateless = parse(r#"{"id": "c"}"#);

        assert_eq!(explicit.default_state_id(), "default");
        assert_eq!(positional.default_state_id(), "red");
        assert_eq!(stateless.default_state_id(), "default");
    }
}
