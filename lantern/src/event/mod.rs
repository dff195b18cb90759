//! Per-query events and the handler seams they are dispatched through.

mod option;
mod permission;

pub use option::OptionRequestEvent;
pub use permission::{OfflinePermissionCheckEvent, PermissionCheckEvent, TristateFuture};

/// Order in which handlers observe an event.
///
/// `Highest` runs first; handlers at the same priority run in registration
/// order. The winning answer is decided purely by this order, never by who
/// a handler is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EventPriority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

/// Handler for synchronous permission checks.
///
/// Runs on the querying thread. Implementations must answer from data
/// already in memory and must not block on I/O; a handler that cannot
/// decide leaves the event untouched.
pub trait PermissionCheckHandler: Send + Sync {
    fn on_permission_check(&self, event: &mut PermissionCheckEvent<'_>);
}

impl<F> PermissionCheckHandler for F
where
    F: Fn(&mut PermissionCheckEvent<'_>) + Send + Sync,
{
    fn on_permission_check(&self, event: &mut PermissionCheckEvent<'_>) {
        self(event);
    }
}

/// Handler for permission checks against players that may be offline.
///
/// Runs synchronously to compose the deferred answer. The future handed to
/// [`OfflinePermissionCheckEvent::set_state`] may be arbitrarily expensive,
/// e.g. a remote data-store load; it only runs once the chain is awaited,
/// and not at all if an earlier handler already decided.
pub trait OfflinePermissionCheckHandler: Send + Sync {
    fn on_offline_permission_check(&self, event: &mut OfflinePermissionCheckEvent);
}

impl<F> OfflinePermissionCheckHandler for F
where
    F: Fn(&mut OfflinePermissionCheckEvent) + Send + Sync,
{
    fn on_offline_permission_check(&self, event: &mut OfflinePermissionCheckEvent) {
        self(event);
    }
}

/// Handler for string option lookups. Same threading rules as
/// [`PermissionCheckHandler`].
pub trait OptionRequestHandler: Send + Sync {
    fn on_option_request(&self, event: &mut OptionRequestEvent<'_>);
}

impl<F> OptionRequestHandler for F
where
    F: Fn(&mut OptionRequestEvent<'_>) + Send + Sync,
{
    fn on_option_request(&self, event: &mut OptionRequestEvent<'_>) {
        self(event);
    }
}
