// ── Control protocol parser ──
//
// The line-oriented command language spoken by the TCP control server.
// Keywords are case-insensitive; button ids are taken from the last
// whitespace-separated token (matching how panels address buttons),
// except CHANGESTATE where the id precedes the state. Unrecognized or
// malformed lines parse to None and are ignored by the server.

/// One parsed control-protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// `TOGGLE ON <id>` / `TOGGLE OFF <id>`
    Toggle { on: bool, button_id: String },
    /// `CHANGESTATE <id> <stateID>`
    ChangeState { button_id: String, state_id: String },
    /// `LOADBUTTONCONTENT <id>`
    LoadButtonContent { button_id: String },
    /// `LOCK`
    Lock,
    /// `UNLOCK`
    Unlock,
    /// `TRIGGER <id>` — fire the named button's triggers directly,
    /// bypassing navigation.
    Trigger { button_id: String },
    /// `NOTIFY <message>` — forced on regardless of the global
    /// preference.
    Notify { message: String },
}

impl ControlCommand {
    /// Parse a single command line. `None` for blank, unrecognized, or
    /// malformed input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let keyword = line.split_whitespace().next()?;
        let rest = line[keyword.len()..].trim();

        match keyword.to_ascii_uppercase().as_str() {
            "TOGGLE" => {
                let mut parts = rest.split_whitespace();
                let on = match parts.next()?.to_ascii_uppercase().as_str() {
                    "ON" => true,
                    "OFF" => false,
                    _ => return None,
                };
                let button_id = parts.next_back()?.to_owned();
                Some(Self::Toggle { on, button_id })
            }
            "CHANGESTATE" => {
                let mut parts = rest.split_whitespace();
                let button_id = parts.next()?.to_owned();
                let state_id = parts.next_back()?.to_owned();
                Some(Self::ChangeState {
                    button_id,
                    state_id,
                })
            }
            "LOADBUTTONCONTENT" => {
                let button_id = rest.split_whitespace().next_back()?.to_owned();
                Some(Self::LoadButtonContent { button_id })
            }
            "LOCK" => Some(Self::Lock),
            "UNLOCK" => Some(Self::Unlock),
            "TRIGGER" => {
                let button_id = rest.split_whitespace().next_back()?.to_owned();
                Some(Self::Trigger { button_id })
            }
            "NOTIFY" => {
                if rest.is_empty() {
                    None
                } else {
                    Some(Self::Notify {
                        message: rest.to_owned(),
                    })
                }
            }
            _ => None,
        }
    }
}
