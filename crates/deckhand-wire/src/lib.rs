//! Outbound protocol senders for the deckhand engine.
//!
//! One module per wire format — raw TCP lines ([`tcp`], shared by
//! TCPMESSAGE and ROSSTALK), the VideoHub routing block, OSC datagrams
//! ([`osc`]), and HTTP calls ([`web`]) — plus [`TokioSender`], the
//! fire-and-forget executor implementing the engine's `WireSender` seam.
//!
//! Everything here is best-effort by contract: sends are not awaited by
//! the engine, carry no timeout or retry, and log their failures only.

pub mod error;
pub mod osc;
pub mod sender;
pub mod tcp;
pub mod web;

pub use error::WireError;
pub use sender::{TokioSender, execute};
