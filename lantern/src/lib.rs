//! Pluggable permission resolution for game servers.
//!
//! Feature code asks "may this source do that" through a
//! [`PermissionResolver`]; zero or more registered handlers answer by
//! writing into a per-query event, and the first decided answer wins.
//! Handlers that abstain leave the event untouched, so a missing or broken
//! backend degrades to the fallback the caller asked for instead of
//! breaking the feature.
//!
//! Three query shapes exist:
//!
//! - [`PermissionCheckEvent`]: synchronous, for a currently known
//!   [`CommandSource`],
//! - [`OfflinePermissionCheckEvent`]: asynchronous, for a player uuid that
//!   may not be connected,
//! - [`OptionRequestEvent`]: synchronous, for string-valued options such as
//!   a chat prefix.
//!
//! A concrete permission backend plugs in through [`store`] and is
//! attached with [`PermissionResolver::attach_store`]; the host server
//! supplies the traits in [`source`]. Command code then asks
//! `resolver.check_with_lvl(&sender, "lantern.command.ban",
//! PermissionLvl::Three)`, or builds a reusable tree predicate with
//! `resolver.require("lantern.command.ban")`.

pub mod config;
pub mod event;
mod permissions;
pub mod resolver;
pub mod source;
pub mod store;

pub use config::ResolverConfig;
pub use event::{
    EventPriority, OfflinePermissionCheckEvent, OfflinePermissionCheckHandler, OptionRequestEvent,
    OptionRequestHandler, PermissionCheckEvent, PermissionCheckHandler,
};
pub use resolver::PermissionResolver;
pub use source::{CommandSource, EntitySource, LevelLookup};

pub use lantern_util::{GameProfile, PermissionLvl, Tristate};
