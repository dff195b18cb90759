use std::future::{ready, Future};
use std::pin::Pin;

use lantern_util::Tristate;
use uuid::Uuid;

use crate::source::CommandSource;

/// Deferred permission decision produced by the offline chain.
pub type TristateFuture = Pin<Box<dyn Future<Output = Tristate> + Send>>;

/// Permission check for a currently known command source.
///
/// Accumulates at most one decision: [`set_state`](Self::set_state) keeps
/// the first non-[`Tristate::Undefined`] value and ignores everything
/// offered after it. Created per query and discarded once read.
pub struct PermissionCheckEvent<'a> {
    source: &'a dyn CommandSource,
    permission: &'a str,
    state: Tristate,
}

impl<'a> PermissionCheckEvent<'a> {
    pub(crate) fn new(source: &'a dyn CommandSource, permission: &'a str) -> Self {
        Self {
            source,
            permission,
            state: Tristate::Undefined,
        }
    }

    pub fn source(&self) -> &dyn CommandSource {
        self.source
    }

    pub fn permission(&self) -> &str {
        self.permission
    }

    /// Decision accumulated so far.
    pub fn state(&self) -> Tristate {
        self.state
    }

    /// Offers a decision. Ignored once a previous handler has decided.
    pub fn set_state(&mut self, state: Tristate) {
        self.state = self.state.or(state);
    }
}

/// Permission check for a player that may not be connected.
///
/// Handlers append deferred steps while the event is dispatched; the
/// composed chain resolves to the first decided value in handler order, no
/// matter how long individual steps take. Steps behind a decision are
/// dropped without ever being polled.
pub struct OfflinePermissionCheckEvent {
    uuid: Uuid,
    permission: String,
    state: TristateFuture,
}

impl OfflinePermissionCheckEvent {
    pub(crate) fn new(uuid: Uuid, permission: impl Into<String>) -> Self {
        Self {
            uuid,
            permission: permission.into(),
            state: Box::pin(ready(Tristate::Undefined)),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Appends a deferred decision to the chain.
    ///
    /// The step only runs if everything before it stayed
    /// [`Tristate::Undefined`]; otherwise `state` is dropped unpolled.
    pub fn set_state<F>(&mut self, state: F)
    where
        F: Future<Output = Tristate> + Send + 'static,
    {
        let prev = std::mem::replace(&mut self.state, Box::pin(ready(Tristate::Undefined)));
        self.state = Box::pin(async move {
            let decided = prev.await;
            if decided.is_undefined() {
                state.await
            } else {
                decided
            }
        });
    }

    pub(crate) fn into_state(self) -> TristateFuture {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use lantern_util::PermissionLvl;

    struct Console;

    impl CommandSource for Console {
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

    #[test]
    fn sync_event_keeps_first_decision() {
        let console = Console;
        let mut event = PermissionCheckEvent::new(&console, "lantern.test");
        assert_eq!(event.state(), Tristate::Undefined);

        event.set_state(Tristate::Undefined);
        assert_eq!(event.state(), Tristate::Undefined);

        event.set_state(Tristate::Deny);
        event.set_state(Tristate::Allow);
        assert_eq!(event.state(), Tristate::Deny);
    }

    #[tokio::test]
    async fn offline_chain_resolves_in_append_order() {
        let mut event = OfflinePermissionCheckEvent::new(Uuid::new_v4(), "lantern.test");
        event.set_state(ready(Tristate::Undefined));
        event.set_state(ready(Tristate::Allow));
        event.set_state(ready(Tristate::Deny));
        assert_eq!(event.into_state().await, Tristate::Allow);
    }

    #[tokio::test]
    async fn offline_chain_drops_steps_behind_a_decision() {
        let polled = Arc::new(AtomicBool::new(false));
        let mut event = OfflinePermissionCheckEvent::new(Uuid::new_v4(), "lantern.test");
        event.set_state(ready(Tristate::Deny));
        let flag = Arc::clone(&polled);
        event.set_state(async move {
            flag.store(true, Ordering::SeqCst);
            Tristate::Allow
        });
        assert_eq!(event.into_state().await, Tristate::Deny);
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn offline_chain_defaults_to_undefined() {
        let event = OfflinePermissionCheckEvent::new(Uuid::new_v4(), "lantern.test");
        assert_eq!(event.into_state().await, Tristate::Undefined);
    }
}
