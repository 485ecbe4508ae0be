//! Migration actions and their calling conventions.
//!
//! Authors write an action in one of two styles:
//!
//! - [`Action::direct`]: receives the database handle and returns a future
//!   that resolves to the outcome.
//! - [`Action::signaled`]: receives the handle plus a [`Done`] completion
//!   handle and reports the outcome through it, possibly from another task.
//!
//! The engine converts either style into one internal async shape when a
//! unit is loaded, so execution never branches on the convention. A `Done`
//! handle dropped without being signalled counts as a failed action.

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tm_db::Database;
use tokio::sync::oneshot;

/// Error type returned by migration actions
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a migration action
pub type ActionResult = Result<(), ActionError>;

type DirectFn = dyn Fn(Arc<dyn Database>) -> BoxFuture<'static, ActionResult> + Send + Sync;

type SignaledFn = dyn Fn(Arc<dyn Database>, Done) + Send + Sync;

/// Convention-agnostic action, ready to be awaited once
pub(crate) type AsyncAction =
    Box<dyn FnOnce(Arc<dyn Database>) -> BoxFuture<'static, ActionResult> + Send>;

/// Calling convention an action was declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// `(db) -> future`
    Direct,
    /// `(db, done)`
    Signaled,
}

/// A forward or reverse migration action
#[derive(Clone)]
pub enum Action {
    /// Takes the database handle, returns the outcome as a future
    Direct(Arc<DirectFn>),
    /// Takes the database handle and a completion handle
    Signaled(Arc<SignaledFn>),
}

impl Action {
    /// Declare an action that returns its outcome as a future
    pub fn direct<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<dyn Database>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Action::Direct(Arc::new(
            move |db: Arc<dyn Database>| -> BoxFuture<'static, ActionResult> { Box::pin(f(db)) },
        ))
    }

    /// Declare an action that reports its outcome through a [`Done`] handle
    pub fn signaled<F>(f: F) -> Self
    where
        F: Fn(Arc<dyn Database>, Done) + Send + Sync + 'static,
    {
        Action::Signaled(Arc::new(f))
    }

    /// The convention this action was declared with
    pub fn convention(&self) -> Convention {
        match self {
            Action::Direct(_) => Convention::Direct,
            Action::Signaled(_) => Convention::Signaled,
        }
    }

    /// Wrap the action into the engine's single async shape
    pub(crate) fn into_async(self) -> AsyncAction {
        match self {
            Action::Direct(f) => Box::new(
                move |db: Arc<dyn Database>| -> BoxFuture<'static, ActionResult> { f(db) },
            ),
            Action::Signaled(f) => Box::new(
                move |db: Arc<dyn Database>| -> BoxFuture<'static, ActionResult> {
                    Box::pin(async move {
                        let (tx, rx) = oneshot::channel();
                        f(db, Done { tx });
                        match rx.await {
                            Ok(result) => result,
                            Err(_) => Err(ActionError::from(
                                "completion was never signalled (done handle dropped)",
                            )),
                        }
                    })
                },
            ),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action::{:?}", self.convention())
    }
}

/// Completion handle passed to [`Action::signaled`] actions.
///
/// Consuming methods make double-signalling impossible.
pub struct Done {
    tx: oneshot::Sender<ActionResult>,
}

impl Done {
    /// Report success
    pub fn ok(self) {
        self.finish(Ok(()));
    }

    /// Report failure
    pub fn fail(self, err: impl Into<ActionError>) {
        self.finish(Err(err.into()));
    }

    /// Report an outcome
    pub fn finish(self, result: ActionResult) {
        // The receiver only goes away if the engine itself was dropped
        let _ = self.tx.send(result);
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Done")
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
