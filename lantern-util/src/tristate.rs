use serde::{Deserialize, Serialize};

/// Result of a permission lookup.
///
/// `Undefined` means nothing has decided yet; it is the only state a later
/// resolver may still replace. The ordering ranks states by specificity,
/// with `Undefined` below both decisions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tristate {
    /// No decision was made.
    #[default]
    Undefined,
    /// The permission is explicitly denied.
    Deny,
    /// The permission is explicitly granted.
    Allow,
}

impl Tristate {
    /// Converts the state into a boolean. `Undefined` counts as denied.
    #[must_use]
    pub fn as_bool(self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Combines two states, keeping the first decision.
    ///
    /// A decided state is never replaced; `Undefined` yields to `next`.
    #[must_use]
    pub fn or(self, next: Tristate) -> Tristate {
        if self.is_undefined() {
            next
        } else {
            self
        }
    }

    /// Converts into a boolean, falling back to `default` when `Undefined`.
    #[must_use]
    pub fn or_default(self, default: bool) -> bool {
        match self {
            Self::Undefined => default,
            decided => decided.as_bool(),
        }
    }

    /// Lifts an optional decision; `None` becomes `Undefined`.
    #[must_use]
    pub fn of(value: Option<bool>) -> Tristate {
        value.map_or(Self::Undefined, Tristate::from)
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}
