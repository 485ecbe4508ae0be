//! Migration units as loaded from a catalog

use crate::action::{Action, AsyncAction};

/// A loaded migration: forward action, optional reverse action, and the
/// idempotency flag that gates single runs.
#[derive(Debug, Clone)]
pub struct MigrationUnit {
    up: Action,
    down: Option<Action>,
    idempotent: bool,
}

impl MigrationUnit {
    /// Create a non-idempotent unit with only a forward action
    pub fn new(up: Action) -> Self {
        Self {
            up,
            down: None,
            idempotent: false,
        }
    }

    /// Attach a reverse action
    pub fn with_down(mut self, down: Action) -> Self {
        self.down = Some(down);
        self
    }

    /// Mark the unit as safe to run outside the changelog-tracked flow
    pub fn with_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }

    /// Forward action
    pub fn up(&self) -> &Action {
        &self.up
    }

    /// Reverse action, if declared
    pub fn down(&self) -> Option<&Action> {
        self.down.as_ref()
    }

    /// Whether the unit may be single-run
    pub fn is_idempotent(&self) -> bool {
        self.idempotent
    }
}

/// A unit whose actions have been adapted to the engine's async shape
pub(crate) struct PreparedUnit {
    pub(crate) up: AsyncAction,
    pub(crate) down: Option<AsyncAction>,
    pub(crate) idempotent: bool,
}

impl From<MigrationUnit> for PreparedUnit {
    fn from(unit: MigrationUnit) -> Self {
        Self {
            up: unit.up.into_async(),
            down: unit.down.map(Action::into_async),
            idempotent: unit.idempotent,
        }
    }
}
