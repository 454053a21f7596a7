//! Navigation and trigger-dispatch engine for a grid-button control
//! surface.
//!
//! The pieces, leaves first:
//!
//! - **Domain model** ([`model`]) — the hierarchical [`ButtonTree`]
//!   loaded from a button document, plus the flat [`DeviceList`] of
//!   shared trigger defaults. Ids are globally unique, enforced at load.
//!
//! - **[`Navigator`]** — "where we are" in the tree as an explicit
//!   ancestor chain; O(depth) back-navigation with full history.
//!
//! - **Trigger resolution** ([`resolver`]) — flattens the parameter
//!   chain trigger-entry → button → device-record into a
//!   [`ResolvedTrigger`]; protocol defaults apply at dispatch.
//!
//! - **[`Deck`]** — the facade owning all mutable state. Key presses
//!   and control-protocol batches enter here, run to completion, and
//!   leave through three seams: [`Surface`] (key rendering),
//!   [`Notifier`] (user notifications), and [`WireSender`] (outbound
//!   protocol commands, fire-and-forget).
//!
//! - **[`ControlCommand`]** — parser for the line-oriented TCP control
//!   protocol served by `deckhand-server`.
//!
//! The engine is fully synchronous; callers serialize entry points and
//! the wire layer supplies the asynchrony.

pub mod action;
pub mod command;
pub mod deck;
pub mod error;
pub mod lock;
pub mod model;
pub mod navigator;
pub mod render;
pub mod resolver;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{Notifier, WireAction, WireSender};
pub use command::ControlCommand;
pub use deck::{Deck, DeckOptions, LOCKED_MESSAGE, NO_ACTION_MESSAGE};
pub use error::CoreError;
pub use lock::LockGate;
pub use navigator::Navigator;
pub use render::{KeyRender, Surface};
pub use resolver::{ResolvedTrigger, TriggerKind};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ButtonNode,
    ButtonState,
    ButtonTree,
    DeviceList,
    DeviceRecord,
    NotifyPreference,
    OscArg,
    OscMessageSpec,
    TriggerFields,
    TriggerPayload,
};
