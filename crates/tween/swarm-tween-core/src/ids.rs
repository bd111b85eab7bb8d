//! Handle identifiers.

use serde::{Deserialize, Serialize};

/// Generation-checked key of a pooled handle record.
///
/// The generation is bumped every time the record is released, so a key kept
/// past its tween's recycling no longer resolves.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandleKey {
    pub index: u32,
    pub generation: u32,
}

/// Which scheduler a handle belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum HandleScope {
    Single,
    Batch,
}

impl HandleScope {
    /// Warning logged when a command names a record that is gone.
    pub fn stale_message(self) -> &'static str {
        match self {
            HandleScope::Single => {
                "Tween not found for this handle, please remove local reference"
            }
            HandleScope::Batch => {
                "Tween Batch not found for this handle, please remove local reference"
            }
        }
    }
}
