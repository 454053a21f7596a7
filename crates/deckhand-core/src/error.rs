use thiserror::Error;

/// Errors surfaced by the core engine.
///
/// Deliberately small: an unresolved device id degrades to absent fields,
/// protocol send failures belong to `deckhand-wire`, and unrecognized
/// triggers or locked rejections are notifications, not errors. Nothing
/// here is fatal — a failed load leaves the previously active data in
/// place.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or schema-missing configuration document, or a duplicate
    /// button id.
    #[error("invalid configuration document: {reason}")]
    ConfigInvalid { reason: String },
}
