//! Domain model: the button tree, its nodes, and the device list.
//!
//! Types mirror the on-disk document format (camelCase, literal `ID`
//! suffixes) so a button document round-trips through serde unchanged.

pub mod button;
pub mod device;
pub mod tree;

pub use button::{
    ButtonNode, ButtonState, NotifyPreference, OscArg, OscMessageSpec, TriggerFields,
    TriggerPayload,
};
pub use device::{DeviceList, DeviceRecord};
pub use tree::ButtonTree;
