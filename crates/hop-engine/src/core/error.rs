//! Scene error types and the panic boundary used by every dispatch loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::api::types::{CompId, EntityId};

/// Errors raised synchronously by structural scene operations.
///
/// Absence (a missing capability, an empty tag) is never an error: queries
/// return `Option` or an empty `Vec` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// A component was attached without one of its declared requirements.
    #[error("component '{component}' requires component '{missing}'")]
    Requirement { component: CompId, missing: CompId },

    /// The handle refers to a destroyed or recycled entity.
    #[error("{0} does not exist")]
    InvalidHandle(EntityId),

    /// `go` was asked for a scene that was never defined.
    #[error("no scene named '{0}'")]
    UnknownScene(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Run `f`, catching any panic so one faulty hook cannot halt the frame.
/// Returns `false` if `f` panicked.
pub(crate) fn isolate<F: FnOnce()>(what: &dyn Fn() -> String, f: F) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            log::error!("{} panicked: {}", what(), panic_message(payload.as_ref()));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
