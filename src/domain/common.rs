use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned numeric identifier.
///
/// Counters start at 1 for every record collection; zero marks a record that
/// has not been inserted yet and doubles as the transfer pseudo-category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Category slot carried by transfer records instead of a real category.
    pub const TRANSFER_CATEGORY: RecordId = RecordId(0);

    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        RecordId(raw)
    }
}

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> RecordId;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI output or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
