//! Convenience operators over the resolver core.
//!
//! Everything here is built from the three resolve paths and carries no
//! state of its own: boolean checks with an explicit default, operator-level
//! fallbacks, reusable predicates for command trees, and the entity and
//! profile adapters.

use std::sync::Arc;

use lantern_util::{GameProfile, PermissionLvl, Tristate};
use uuid::Uuid;

use crate::resolver::PermissionResolver;
use crate::source::{CommandSource, EntitySource, LevelLookup};

fn validated(permission: impl Into<String>) -> String {
    let permission = permission.into();
    assert!(!permission.is_empty(), "permission must not be empty");
    permission
}

impl PermissionResolver {
    /// Checks `permission`, treating an undefined result as denied.
    pub fn check(&self, src: &dyn CommandSource, permission: &str) -> bool {
        self.get_permission_value(src, permission).as_bool()
    }

    /// Checks `permission`, falling back to `default` when undefined.
    pub fn check_with_default(
        &self,
        src: &dyn CommandSource,
        permission: &str,
        default: bool,
    ) -> bool {
        self.get_permission_value(src, permission).or_default(default)
    }

    /// Checks `permission`, falling back to an operator-level check when
    /// undefined.
    pub fn check_with_lvl(
        &self,
        src: &dyn CommandSource,
        permission: &str,
        lvl: PermissionLvl,
    ) -> bool {
        match self.get_permission_value(src, permission) {
            Tristate::Undefined => src.has_permission_lvl(lvl),
            decided => decided.as_bool(),
        }
    }

    /// Builds a reusable predicate for [`check`](Self::check).
    ///
    /// The predicate holds the resolver and dispatches on every call, which
    /// makes it suitable for the `Require` nodes of a command tree.
    ///
    /// # Panics
    ///
    /// Panics if `permission` is empty.
    pub fn require(
        self: &Arc<Self>,
        permission: impl Into<String>,
    ) -> impl Fn(&dyn CommandSource) -> bool + Send + Sync + 'static {
        let resolver = Arc::clone(self);
        let permission = validated(permission);
        move |src| resolver.check(src, &permission)
    }

    /// Builds a reusable predicate for
    /// [`check_with_default`](Self::check_with_default).
    ///
    /// # Panics
    ///
    /// Panics if `permission` is empty.
    pub fn require_with_default(
        self: &Arc<Self>,
        permission: impl Into<String>,
        default: bool,
    ) -> impl Fn(&dyn CommandSource) -> bool + Send + Sync + 'static {
        let resolver = Arc::clone(self);
        let permission = validated(permission);
        move |src| resolver.check_with_default(src, &permission, default)
    }

    /// Builds a reusable predicate for
    /// [`check_with_lvl`](Self::check_with_lvl).
    ///
    /// # Panics
    ///
    /// Panics if `permission` is empty.
    pub fn require_with_lvl(
        self: &Arc<Self>,
        permission: impl Into<String>,
        lvl: PermissionLvl,
    ) -> impl Fn(&dyn CommandSource) -> bool + Send + Sync + 'static {
        let resolver = Arc::clone(self);
        let permission = validated(permission);
        move |src| resolver.check_with_lvl(src, &permission, lvl)
    }

    /// Resolves `permission` for an entity through its command source.
    pub fn get_permission_value_entity<E: EntitySource>(
        &self,
        entity: &E,
        permission: &str,
    ) -> Tristate {
        self.get_permission_value(&entity.command_source(), permission)
    }

    pub fn check_entity<E: EntitySource>(&self, entity: &E, permission: &str) -> bool {
        self.check(&entity.command_source(), permission)
    }

    pub fn check_entity_with_default<E: EntitySource>(
        &self,
        entity: &E,
        permission: &str,
        default: bool,
    ) -> bool {
        self.check_with_default(&entity.command_source(), permission, default)
    }

    pub fn check_entity_with_lvl<E: EntitySource>(
        &self,
        entity: &E,
        permission: &str,
        lvl: PermissionLvl,
    ) -> bool {
        self.check_with_lvl(&entity.command_source(), permission, lvl)
    }

    /// Checks `permission` for a possibly offline player, treating an
    /// undefined result as denied.
    pub async fn check_offline(&self, uuid: Uuid, permission: &str) -> bool {
        self.get_offline_permission_value(uuid, permission)
            .await
            .as_bool()
    }

    /// Checks `permission` for a possibly offline player, falling back to
    /// `default` when undefined.
    pub async fn check_offline_with_default(
        &self,
        uuid: Uuid,
        permission: &str,
        default: bool,
    ) -> bool {
        self.get_offline_permission_value(uuid, permission)
            .await
            .or_default(default)
    }

    /// Checks `permission` for a possibly offline player, consulting the
    /// operator level on record only when the result is undefined.
    pub async fn check_offline_with_lvl(
        &self,
        uuid: Uuid,
        permission: &str,
        lvl: PermissionLvl,
        levels: &dyn LevelLookup,
    ) -> bool {
        match self.get_offline_permission_value(uuid, permission).await {
            Tristate::Undefined => levels.permission_lvl(uuid).await >= lvl,
            decided => decided.as_bool(),
        }
    }

    pub async fn check_profile(&self, profile: &GameProfile, permission: &str) -> bool {
        self.check_offline(profile.id, permission).await
    }

    pub async fn check_profile_with_default(
        &self,
        profile: &GameProfile,
        permission: &str,
        default: bool,
    ) -> bool {
        self.check_offline_with_default(profile.id, permission, default)
            .await
    }

    pub async fn check_profile_with_lvl(
        &self,
        profile: &GameProfile,
        permission: &str,
        lvl: PermissionLvl,
        levels: &dyn LevelLookup,
    ) -> bool {
        self.check_offline_with_lvl(profile.id, permission, lvl, levels)
            .await
    }
}
