use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity record of a player account.
///
/// The uuid alone keys all permission data; the name is the last known
/// display name and carries no authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameProfile {
    pub id: Uuid,
    pub name: String,
}

impl GameProfile {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
