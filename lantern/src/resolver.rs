//! Priority-ordered handler registry and event dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashSet;
use lantern_util::Tristate;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::ResolverConfig;
use crate::event::{
    EventPriority, OfflinePermissionCheckEvent, OfflinePermissionCheckHandler, OptionRequestEvent,
    OptionRequestHandler, PermissionCheckEvent, PermissionCheckHandler,
};
use crate::source::CommandSource;
use crate::store::{StoreHandler, StoreProvider};

struct Registered<T: ?Sized> {
    priority: EventPriority,
    order: usize,
    handler: Arc<T>,
}

fn insert<T: ?Sized>(
    handlers: &RwLock<Vec<Registered<T>>>,
    count: &AtomicUsize,
    priority: EventPriority,
    handler: Arc<T>,
) {
    let order = count.fetch_add(1, Ordering::Relaxed);
    let mut handlers = handlers.write();
    handlers.push(Registered {
        priority,
        order,
        handler,
    });
    handlers.sort_by_key(|entry| (entry.priority, entry.order));
}

/// Registry and dispatcher for permission queries.
///
/// One resolver is owned by the server and shared behind an [`Arc`].
/// Handlers register during startup (plugin init) and observe every query
/// in priority order; the first decided answer wins, later handlers can
/// only fill in what is still undefined.
pub struct PermissionResolver {
    permission_handlers: RwLock<Vec<Registered<dyn PermissionCheckHandler>>>,
    offline_handlers: RwLock<Vec<Registered<dyn OfflinePermissionCheckHandler>>>,
    option_handlers: RwLock<Vec<Registered<dyn OptionRequestHandler>>>,
    registration_count: AtomicUsize,
    missing_caps: Arc<MissingCapabilityTracker>,
    config: ResolverConfig,
}

impl PermissionResolver {
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            permission_handlers: RwLock::new(Vec::new()),
            offline_handlers: RwLock::new(Vec::new()),
            option_handlers: RwLock::new(Vec::new()),
            registration_count: AtomicUsize::new(0),
            missing_caps: Arc::new(MissingCapabilityTracker::new()),
            config,
        }
    }

    /// Attaches the concrete permission backend.
    ///
    /// Registers the built-in store handler for all three event kinds at
    /// [`EventPriority::Highest`], so it observes queries before anything
    /// registered later; ordering alone decides which answer wins, other
    /// handlers may still sort above or below it.
    pub fn attach_store(&self, provider: Arc<dyn StoreProvider>) {
        let handler = Arc::new(StoreHandler::new(provider, Arc::clone(&self.missing_caps)));
        self.register_permission_handler(EventPriority::Highest, handler.clone());
        self.register_offline_permission_handler(EventPriority::Highest, handler.clone());
        self.register_option_handler(EventPriority::Highest, handler);
    }

    pub fn register_permission_handler(
        &self,
        priority: EventPriority,
        handler: Arc<dyn PermissionCheckHandler>,
    ) {
        insert(
            &self.permission_handlers,
            &self.registration_count,
            priority,
            handler,
        );
    }

    pub fn register_offline_permission_handler(
        &self,
        priority: EventPriority,
        handler: Arc<dyn OfflinePermissionCheckHandler>,
    ) {
        insert(
            &self.offline_handlers,
            &self.registration_count,
            priority,
            handler,
        );
    }

    pub fn register_option_handler(
        &self,
        priority: EventPriority,
        handler: Arc<dyn OptionRequestHandler>,
    ) {
        insert(
            &self.option_handlers,
            &self.registration_count,
            priority,
            handler,
        );
    }

    /// Resolves `permission` for `src` through the registered handlers.
    ///
    /// Every handler runs on the calling thread; the value belongs to the
    /// first one that decided. With no handlers the result is
    /// [`Tristate::Undefined`].
    ///
    /// # Panics
    ///
    /// Panics if `permission` is empty.
    pub fn get_permission_value(&self, src: &dyn CommandSource, permission: &str) -> Tristate {
        assert!(!permission.is_empty(), "permission must not be empty");
        let mut event = PermissionCheckEvent::new(src, permission);
        for entry in self.permission_handlers.read().iter() {
            entry.handler.on_permission_check(&mut event);
        }
        event.state()
    }

    /// Resolves `permission` for a player that may not be connected.
    ///
    /// The deferred chain is composed during this call and awaited under
    /// the configured timeout. Handler order decides the winner even when
    /// steps complete out of order; an elapsed timeout resolves to
    /// [`Tristate::Undefined`].
    ///
    /// # Panics
    ///
    /// Panics if `permission` is empty.
    pub async fn get_offline_permission_value(&self, uuid: Uuid, permission: &str) -> Tristate {
        assert!(!permission.is_empty(), "permission must not be empty");
        let mut event = OfflinePermissionCheckEvent::new(uuid, permission);
        {
            let handlers = self.offline_handlers.read();
            for entry in handlers.iter() {
                entry.handler.on_offline_permission_check(&mut event);
            }
        }
        match tokio::time::timeout(self.config.offline_timeout(), event.into_state()).await {
            Ok(state) => state,
            Err(_) => {
                log::warn!("offline permission lookup for {uuid} (\"{permission}\") timed out");
                Tristate::Undefined
            }
        }
    }

    /// Resolves the option `key` for `src`.
    ///
    /// The first handler to supply a value wins; with no handlers (or only
    /// abstaining ones) the result is `None`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn get_option_value(&self, src: &dyn CommandSource, key: &str) -> Option<String> {
        assert!(!key.is_empty(), "option key must not be empty");
        let mut event = OptionRequestEvent::new(src, key);
        for entry in self.option_handlers.read().iter() {
            entry.handler.on_option_request(&mut event);
        }
        event.into_value()
    }

    /// Number of players for which a backend-missing diagnostic has fired.
    pub fn missing_capability_count(&self) -> usize {
        self.missing_caps.len()
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only dedup set behind the one-shot "backend missing" diagnostics.
///
/// Shared between the resolver and the store handler; entries live for the
/// process lifetime.
pub(crate) struct MissingCapabilityTracker {
    seen: DashSet<Uuid>,
}

impl MissingCapabilityTracker {
    fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Records `uuid`, logging the first sighting only.
    pub(crate) fn report(&self, uuid: Uuid) {
        if self.seen.insert(uuid) {
            log::error!("permission backend unavailable while resolving for {uuid}");
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }
}
