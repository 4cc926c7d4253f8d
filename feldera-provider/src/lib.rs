//! feldera-provider: declarative management of Feldera SQL programs.
//!
//! A [`ProgramReconciler`] maps the lifecycle operations of a managed
//! program (create, read, update, delete, import) to calls against the
//! Feldera API and returns the resulting [`ProgramState`] for the host to
//! persist. The [`ProviderContext`] holds the API client and is built once
//! per process from [`ProviderConfig`].

pub mod apply;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod plan;
pub mod reconciler;
pub mod state_file;

pub use apply::{
    apply, apply_state, destroy_state, import_state, refresh, refresh_state, ApplyOutcome,
    DestroyOutcome,
};
pub use client::{ApiError, HttpProgramClient, ProgramApi};
pub use config::{ProgramConfig, ProviderConfig};
pub use context::ProviderContext;
pub use error::{FileError, HostError, Operation, ProviderError, Result};
pub use model::ProgramState;
pub use plan::{plan, AttributeChange, Plan};
pub use reconciler::{ProgramReconciler, ResourceReconciler};
pub use state_file::StateFile;
