//! Built-in handler resolving events against a concrete permission backend.

use std::sync::Arc;

use async_trait::async_trait;
use lantern_util::Tristate;
use thiserror::Error;
use uuid::Uuid;

use crate::event::{
    OfflinePermissionCheckEvent, OfflinePermissionCheckHandler, OptionRequestEvent,
    OptionRequestHandler, PermissionCheckEvent, PermissionCheckHandler,
};
use crate::resolver::MissingCapabilityTracker;

/// Failure of the concrete permission backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend is not initialized for this server role.
    #[error("permission backend is not initialized")]
    Uninitialized,

    /// A lookup reached the backend but failed there.
    #[error("permission backend lookup failed: {0}")]
    Lookup(String),
}

/// Concrete permission data backend.
///
/// The synchronous methods answer from data the backend already holds for
/// connected players and must not block; lookups for players that may be
/// offline go through [`load_permission_value`](Self::load_permission_value).
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Cached permission value of a connected player.
    fn permission_value(&self, uuid: Uuid, permission: &str) -> Tristate;

    /// Cached option value of a connected player.
    fn option_value(&self, uuid: Uuid, key: &str) -> Option<String>;

    /// Loads the permission value of a player that may be offline.
    async fn load_permission_value(
        &self,
        uuid: Uuid,
        permission: &str,
    ) -> Result<Tristate, BackendError>;
}

/// Hands out the backend once it is ready.
///
/// [`BackendError::Uninitialized`] marks a server role that carries no
/// permission data, or a backend that has not finished loading. The store
/// handler abstains in that case instead of failing the query.
pub trait StoreProvider: Send + Sync {
    fn store(&self) -> Result<Arc<dyn PermissionStore>, BackendError>;
}

/// Resolves permission events against the attached [`PermissionStore`].
///
/// Registered for all three event kinds by
/// [`PermissionResolver::attach_store`](crate::PermissionResolver::attach_store).
/// Backend failures never cross the dispatch boundary: the handler abstains,
/// reports unavailable backends once per player, and maps failed offline
/// loads to [`Tristate::Undefined`] so the chain keeps going.
pub struct StoreHandler {
    provider: Arc<dyn StoreProvider>,
    missing_caps: Arc<MissingCapabilityTracker>,
}

impl StoreHandler {
    pub(crate) fn new(
        provider: Arc<dyn StoreProvider>,
        missing_caps: Arc<MissingCapabilityTracker>,
    ) -> Self {
        Self {
            provider,
            missing_caps,
        }
    }
}

impl PermissionCheckHandler for StoreHandler {
    fn on_permission_check(&self, event: &mut PermissionCheckEvent<'_>) {
        let Some(uuid) = event.source().player_uuid() else {
            return;
        };
        match self.provider.store() {
            Ok(store) => {
                let state = store.permission_value(uuid, event.permission());
                event.set_state(state);
            }
            Err(BackendError::Uninitialized) => self.missing_caps.report(uuid),
            Err(err) => log::warn!("permission lookup for {uuid} failed: {err}"),
        }
    }
}

impl OfflinePermissionCheckHandler for StoreHandler {
    fn on_offline_permission_check(&self, event: &mut OfflinePermissionCheckEvent) {
        let uuid = event.uuid();
        match self.provider.store() {
            Ok(store) => {
                let permission = event.permission().to_string();
                event.set_state(async move {
                    match store.load_permission_value(uuid, &permission).await {
                        Ok(state) => state,
                        Err(err) => {
                            log::warn!(
                                "offline permission lookup for {uuid} (\"{permission}\") failed: {err}"
                            );
                            Tristate::Undefined
                        }
                    }
                });
            }
            Err(BackendError::Uninitialized) => self.missing_caps.report(uuid),
            Err(err) => log::warn!("offline permission lookup for {uuid} failed: {err}"),
        }
    }
}

impl OptionRequestHandler for StoreHandler {
    fn on_option_request(&self, event: &mut OptionRequestEvent<'_>) {
        let Some(uuid) = event.source().player_uuid() else {
            return;
        };
        match self.provider.store() {
            Ok(store) => {
                if let Some(value) = store.option_value(uuid, event.key()) {
                    event.set_value(value);
                }
            }
            Err(BackendError::Uninitialized) => self.missing_caps.report(uuid),
            Err(err) => log::warn!("option lookup for {uuid} failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::event::EventPriority;
    use crate::resolver::PermissionResolver;
    use crate::source::CommandSource;
    use lantern_util::PermissionLvl;

    struct PlayerSource(Uuid);

    impl CommandSource for PlayerSource {
        fn is_player(&self) -> bool {
            true
        }

        fn player_uuid(&self) -> Option<Uuid> {
            Some(self.0)
        }

        fn has_permission_lvl(&self, _lvl: PermissionLvl) -> bool {
            false
        }
    }

    struct ConsoleSource;

    impl CommandSource for ConsoleSource {
        fn is_player(&self) -> bool {
            false
        }

        fn player_uuid(&self) -> Option<Uuid> {
            None
        }

        fn has_permission_lvl(&self, _lvl: PermissionLvl) -> bool {
            true
        }
    }

    /// Backend with a fixed grant table, options keyed per uuid.
    struct MapStore {
        grants: HashMap<(Uuid, String), bool>,
        options: HashMap<(Uuid, String), String>,
    }

    #[async_trait]
    impl PermissionStore for MapStore {
        fn permission_value(&self, uuid: Uuid, permission: &str) -> Tristate {
            Tristate::of(self.grants.get(&(uuid, permission.to_string())).copied())
        }

        fn option_value(&self, uuid: Uuid, key: &str) -> Option<String> {
            self.options.get(&(uuid, key.to_string())).cloned()
        }

        async fn load_permission_value(
            &self,
            uuid: Uuid,
            permission: &str,
        ) -> Result<Tristate, BackendError> {
            Ok(self.permission_value(uuid, permission))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl PermissionStore for FailingStore {
        fn permission_value(&self, _uuid: Uuid, _permission: &str) -> Tristate {
            Tristate::Undefined
        }

        fn option_value(&self, _uuid: Uuid, _key: &str) -> Option<String> {
            None
        }

        async fn load_permission_value(
            &self,
            _uuid: Uuid,
            _permission: &str,
        ) -> Result<Tristate, BackendError> {
            Err(BackendError::Lookup("connection reset".into()))
        }
    }

    struct Ready(Arc<dyn PermissionStore>);

    impl StoreProvider for Ready {
        fn store(&self) -> Result<Arc<dyn PermissionStore>, BackendError> {
            Ok(Arc::clone(&self.0))
        }
    }

    struct Unavailable;

    impl StoreProvider for Unavailable {
        fn store(&self) -> Result<Arc<dyn PermissionStore>, BackendError> {
            Err(BackendError::Uninitialized)
        }
    }

    fn map_store(uuid: Uuid) -> Arc<dyn PermissionStore> {
        let mut grants = HashMap::new();
        grants.insert((uuid, "lantern.fly".to_string()), true);
        grants.insert((uuid, "lantern.ban".to_string()), false);
        let mut options = HashMap::new();
        options.insert((uuid, "prefix".to_string()), "[admin]".to_string());
        Arc::new(MapStore { grants, options })
    }

    #[test]
    fn resolves_cached_values_for_players() {
        let uuid = Uuid::new_v4();
        let resolver = PermissionResolver::new();
        resolver.attach_store(Arc::new(Ready(map_store(uuid))));

        let src = PlayerSource(uuid);
        assert_eq!(
            resolver.get_permission_value(&src, "lantern.fly"),
            Tristate::Allow
        );
        assert_eq!(
            resolver.get_permission_value(&src, "lantern.ban"),
            Tristate::Deny
        );
        assert_eq!(
            resolver.get_permission_value(&src, "lantern.unknown"),
            Tristate::Undefined
        );
        assert_eq!(
            resolver.get_option_value(&src, "prefix").as_deref(),
            Some("[admin]")
        );
    }

    #[test]
    fn console_sources_abstain() {
        let resolver = PermissionResolver::new();
        resolver.attach_store(Arc::new(Ready(map_store(Uuid::new_v4()))));

        assert_eq!(
            resolver.get_permission_value(&ConsoleSource, "lantern.fly"),
            Tristate::Undefined
        );
        assert_eq!(resolver.get_option_value(&ConsoleSource, "prefix"), None);
    }

    #[test]
    fn unavailable_backend_reports_each_player_once() {
        let resolver = PermissionResolver::new();
        resolver.attach_store(Arc::new(Unavailable));

        let src = PlayerSource(Uuid::new_v4());
        assert_eq!(
            resolver.get_permission_value(&src, "lantern.fly"),
            Tristate::Undefined
        );
        assert_eq!(
            resolver.get_permission_value(&src, "lantern.fly"),
            Tristate::Undefined
        );
        assert_eq!(resolver.missing_capability_count(), 1);

        let other = PlayerSource(Uuid::new_v4());
        resolver.get_permission_value(&other, "lantern.fly");
        assert_eq!(resolver.missing_capability_count(), 2);
    }

    #[tokio::test]
    async fn offline_lookup_loads_through_the_store() {
        let uuid = Uuid::new_v4();
        let resolver = PermissionResolver::new();
        resolver.attach_store(Arc::new(Ready(map_store(uuid))));

        assert_eq!(
            resolver.get_offline_permission_value(uuid, "lantern.fly").await,
            Tristate::Allow
        );
        assert_eq!(
            resolver
                .get_offline_permission_value(Uuid::new_v4(), "lantern.fly")
                .await,
            Tristate::Undefined
        );
    }

    #[tokio::test]
    async fn failed_offline_load_keeps_the_chain_alive() {
        struct Grant;

        impl OfflinePermissionCheckHandler for Grant {
            fn on_offline_permission_check(&self, event: &mut OfflinePermissionCheckEvent) {
                event.set_state(std::future::ready(Tristate::Allow));
            }
        }

        let resolver = PermissionResolver::new();
        resolver.attach_store(Arc::new(Ready(Arc::new(FailingStore))));
        resolver.register_offline_permission_handler(EventPriority::Low, Arc::new(Grant));

        // the store step fails, resolves undefined, and the later handler
        // still answers
        assert_eq!(
            resolver
                .get_offline_permission_value(Uuid::new_v4(), "lantern.fly")
                .await,
            Tristate::Allow
        );
    }

    #[tokio::test]
    async fn unavailable_backend_reports_offline_queries_too() {
        let resolver = PermissionResolver::new();
        resolver.attach_store(Arc::new(Unavailable));

        let uuid = Uuid::new_v4();
        resolver.get_offline_permission_value(uuid, "lantern.fly").await;
        resolver.get_offline_permission_value(uuid, "lantern.fly").await;
        assert_eq!(resolver.missing_capability_count(), 1);
    }
}
