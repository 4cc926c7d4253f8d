//! Reconcilers for managed resource types.
//!
//! A reconciler turns one lifecycle operation plus a state record into
//! remote calls and the resulting state record. It holds no mutable state;
//! the host persists whatever it returns.

pub mod program;

use async_trait::async_trait;

use crate::error::Result;

pub use program::ProgramReconciler;

/// Trait for resource reconcilers.
///
/// Operations borrow their input so a failed call leaves the caller's
/// record untouched.
#[async_trait]
pub trait ResourceReconciler: Send + Sync {
    /// The persisted state record.
    type State: Send + Sync;

    /// Create the resource from planned state. Returns state with the
    /// remote-assigned fields filled in.
    async fn create(&self, planned: &Self::State) -> Result<Self::State>;

    /// Refresh state from the remote service (drift correction).
    async fn read(&self, current: &Self::State) -> Result<Self::State>;

    /// Apply planned state to an existing resource.
    async fn update(&self, planned: &Self::State) -> Result<Self::State>;

    /// Delete the resource. On success the host discards its state.
    async fn delete(&self, current: &Self::State) -> Result<()>;

    /// Seed state from an external id. Makes no remote call.
    fn import(&self, id: &str) -> Self::State;
}
