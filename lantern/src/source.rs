//! Traits the host server implements for the resolver to read.

use async_trait::async_trait;
use lantern_util::PermissionLvl;
use uuid::Uuid;

/// Origin of a permission query.
///
/// Implemented by the host's command-source type. A source either fronts a
/// connected player or an automated caller such as the console; the
/// resolution protocol only reads it.
pub trait CommandSource: Send + Sync {
    /// Whether this source fronts a connected player.
    fn is_player(&self) -> bool;

    /// Uuid of the player behind this source.
    ///
    /// `None` for the console and other automated sources.
    fn player_uuid(&self) -> Option<Uuid>;

    /// Whether the source meets the given operator level.
    fn has_permission_lvl(&self, lvl: PermissionLvl) -> bool;
}

/// Anything that can stand in for a command source, typically an entity.
pub trait EntitySource {
    type Source: CommandSource;

    /// Builds the command source representing this entity.
    fn command_source(&self) -> Self::Source;
}

/// Operator-level lookup for players that may not be connected.
///
/// Implemented by the host server; backs the required-level fallback of the
/// offline check variants.
#[async_trait]
pub trait LevelLookup: Send + Sync {
    /// Operator level on record for `uuid`.
    async fn permission_lvl(&self, uuid: Uuid) -> PermissionLvl;
}
